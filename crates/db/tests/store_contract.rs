use catalog_core::domain::price::Price;
use catalog_core::domain::product::{NewProduct, Product, ProductId, ProductPatch};
use catalog_core::domain::user::{NewUser, UserId};
use catalog_db::{
    connect_with_settings, migrations, CatalogStore, InMemoryCatalogStore, SqlCatalogStore,
};

type ContractResult = Result<(), String>;

macro_rules! require {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err(format!($($arg)*));
        }
    };
}

macro_rules! require_eq {
    ($left:expr, $right:expr) => {
        match (&$left, &$right) {
            (left, right) => {
                if left != right {
                    return Err(format!(
                        "assertion failed: `left == right` (`{left:?}` != `{right:?}`)"
                    ));
                }
            }
        }
    };
}

/// Runs every contract check against stores produced by `make_store`, one
/// fresh store per check.
macro_rules! contract_suite {
    ($module:ident, $make_store:expr) => {
        mod $module {
            use super::*;

            #[tokio::test]
            async fn ids_are_distinct_and_increasing() -> ContractResult {
                ids_are_distinct_and_increasing_check(&$make_store.await).await
            }

            #[tokio::test]
            async fn get_after_create_returns_input_plus_id() -> ContractResult {
                get_after_create_check(&$make_store.await).await
            }

            #[tokio::test]
            async fn missing_records_are_empty_not_errors() -> ContractResult {
                missing_records_check(&$make_store.await).await
            }

            #[tokio::test]
            async fn partial_update_preserves_unspecified_fields() -> ContractResult {
                partial_update_check(&$make_store.await).await
            }

            #[tokio::test]
            async fn delete_is_true_exactly_once() -> ContractResult {
                delete_once_check(&$make_store.await).await
            }

            #[tokio::test]
            async fn search_is_case_insensitive_substring() -> ContractResult {
                search_check(&$make_store.await).await
            }

            #[tokio::test]
            async fn matching_folds_non_ascii_case() -> ContractResult {
                non_ascii_case_check(&$make_store.await).await
            }

            #[tokio::test]
            async fn filter_combines_category_and_bucket() -> ContractResult {
                filter_check(&$make_store.await).await
            }

            #[tokio::test]
            async fn filter_bucket_boundaries() -> ContractResult {
                filter_boundaries_check(&$make_store.await).await
            }

            #[tokio::test]
            async fn users_lookup_by_id_and_username() -> ContractResult {
                users_check(&$make_store.await).await
            }
        }
    };
}

contract_suite!(in_memory, async { InMemoryCatalogStore::new() });
contract_suite!(sqlite, sqlite_store());

async fn sqlite_store() -> SqlCatalogStore {
    let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
    migrations::run_pending(&pool).await.expect("migrations");
    SqlCatalogStore::new(pool)
}

fn new_product(name: &str, description: &str, category: &str, price: &str) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: description.to_string(),
        price: price.parse::<Price>().expect("fixture price"),
        image_url: format!("https://example.com/{}.jpg", name.to_lowercase().replace(' ', "-")),
        category: category.to_string(),
        in_stock: true,
    }
}

fn ids(products: &[Product]) -> Vec<ProductId> {
    products.iter().map(|product| product.id).collect()
}

async fn ids_are_distinct_and_increasing_check(store: &dyn CatalogStore) -> ContractResult {
    let mut created = Vec::new();
    for index in 0..5 {
        let product = store
            .create_product(new_product(&format!("Item {index}"), "", "misc", "1.00"))
            .await
            .map_err(|e| e.to_string())?;
        created.push(product.id);
    }

    require!(created[0].0 > 0, "identifiers must be positive, got {:?}", created[0]);
    require!(
        created.windows(2).all(|pair| pair[0] < pair[1]),
        "identifiers should strictly increase: {created:?}"
    );
    require_eq!(ids(&store.get_products().await.map_err(|e| e.to_string())?), created);
    Ok(())
}

async fn get_after_create_check(store: &dyn CatalogStore) -> ContractResult {
    let input = new_product("Travel Backpack", "Durable and spacious", "clothing", "79.99");
    let created = store.create_product(input.clone()).await.map_err(|e| e.to_string())?;
    let fetched = store.get_product(created.id).await.map_err(|e| e.to_string())?;

    require_eq!(fetched, Some(input.into_product(created.id)));
    Ok(())
}

async fn missing_records_check(store: &dyn CatalogStore) -> ContractResult {
    let missing: Option<Product> =
        store.get_product(ProductId(404)).await.map_err(|e| e.to_string())?;
    require!(missing.is_none(), "missing product should be None: {missing:?}");

    let patch = ProductPatch { name: Some("ghost".to_string()), ..ProductPatch::default() };
    let not_updated: Option<Product> =
        store.update_product(ProductId(404), patch).await.map_err(|e| e.to_string())?;
    require!(not_updated.is_none(), "updating a missing product should be None");

    require_eq!(store.delete_product(ProductId(404)).await.map_err(|e| e.to_string())?, false);
    require!(
        store.get_user(UserId(404)).await.map_err(|e| e.to_string())?.is_none(),
        "missing user should be None"
    );
    Ok(())
}

async fn partial_update_check(store: &dyn CatalogStore) -> ContractResult {
    let created = store
        .create_product(new_product("Luxury Watch", "Precision timepiece", "electronics", "499.99"))
        .await
        .map_err(|e| e.to_string())?;

    let updated = store
        .update_product(created.id, ProductPatch {
            price: Some("450.00".parse::<Price>().map_err(|e| e.to_string())?),
            in_stock: Some(false),
            ..ProductPatch::default()
        })
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "existing product should update".to_string())?;

    require_eq!(updated.price.to_string(), "450.00");
    require_eq!(updated.in_stock, false);
    require_eq!(updated.name, created.name);
    require_eq!(updated.description, created.description);
    require_eq!(updated.image_url, created.image_url);
    require_eq!(updated.category, created.category);

    let fetched = store.get_product(created.id).await.map_err(|e| e.to_string())?;
    require_eq!(fetched, Some(updated));
    Ok(())
}

async fn delete_once_check(store: &dyn CatalogStore) -> ContractResult {
    let created = store
        .create_product(new_product("Mug", "Ceramic", "home", "12.00"))
        .await
        .map_err(|e| e.to_string())?;

    require_eq!(store.delete_product(created.id).await.map_err(|e| e.to_string())?, true);
    require_eq!(store.delete_product(created.id).await.map_err(|e| e.to_string())?, false);
    let gone: Option<Product> = store.get_product(created.id).await.map_err(|e| e.to_string())?;
    require!(gone.is_none(), "deleted product should be gone: {gone:?}");
    Ok(())
}

async fn search_check(store: &dyn CatalogStore) -> ContractResult {
    let shoes = store
        .create_product(new_product("Trail Pro", "Lightweight Running Shoes", "clothing", "89.99"))
        .await
        .map_err(|e| e.to_string())?;
    let headphones = store
        .create_product(new_product(
            "Wireless Headphones",
            "Noise cancellation",
            "Electronics",
            "299.99",
        ))
        .await
        .map_err(|e| e.to_string())?;

    let by_description = store.search_products("shoes").await.map_err(|e| e.to_string())?;
    require_eq!(ids(&by_description), vec![shoes.id]);

    let by_name = store.search_products("WIRELESS").await.map_err(|e| e.to_string())?;
    require_eq!(ids(&by_name), vec![headphones.id]);

    let by_category = store.search_products("electro").await.map_err(|e| e.to_string())?;
    require_eq!(ids(&by_category), vec![headphones.id]);

    let everything = store.search_products("").await.map_err(|e| e.to_string())?;
    require_eq!(ids(&everything), vec![shoes.id, headphones.id]);

    let nothing = store.search_products("espresso").await.map_err(|e| e.to_string())?;
    require!(nothing.is_empty(), "unexpected matches: {nothing:?}");
    Ok(())
}

async fn non_ascii_case_check(store: &dyn CatalogStore) -> ContractResult {
    let mixer = store
        .create_product(new_product("ÉCLAIR Mixer", "Crème pâtissière", "Électronique", "149.00"))
        .await
        .map_err(|e| e.to_string())?;
    store
        .create_product(new_product("Plain Kettle", "Boils water", "home", "29.00"))
        .await
        .map_err(|e| e.to_string())?;

    for query in ["éclair", "CRÈME", "PÂTISSIÈRE", "électronique"] {
        let matched = store.search_products(query).await.map_err(|e| e.to_string())?;
        require!(ids(&matched) == vec![mixer.id], "search {query}: {:?}", ids(&matched));
    }

    let by_category =
        store.filter_products(Some("électronique"), None).await.map_err(|e| e.to_string())?;
    require_eq!(ids(&by_category), vec![mixer.id]);

    let by_category_and_bucket = store
        .filter_products(Some("ÉLECTRONIQUE"), Some("100-200"))
        .await
        .map_err(|e| e.to_string())?;
    require_eq!(ids(&by_category_and_bucket), vec![mixer.id]);
    Ok(())
}

async fn filter_check(store: &dyn CatalogStore) -> ContractResult {
    let shoes = store
        .create_product(new_product("Running Shoes", "Daily runs", "clothing", "89.99"))
        .await
        .map_err(|e| e.to_string())?;
    let headphones = store
        .create_product(new_product("Headphones", "Noise cancellation", "electronics", "299.99"))
        .await
        .map_err(|e| e.to_string())?;
    let cable = store
        .create_product(new_product("USB Cable", "Braided", "Electronics", "9.99"))
        .await
        .map_err(|e| e.to_string())?;

    let electronics_mid =
        store.filter_products(Some("electronics"), Some("100-200")).await.map_err(|e| e.to_string())?;
    require!(electronics_mid.is_empty(), "expected no mid-priced electronics: {electronics_mid:?}");

    let premium = store.filter_products(None, Some("200+")).await.map_err(|e| e.to_string())?;
    require_eq!(ids(&premium), vec![headphones.id]);

    let premium_electronics =
        store.filter_products(Some("electronics"), Some("200+")).await.map_err(|e| e.to_string())?;
    require_eq!(ids(&premium_electronics), vec![headphones.id]);

    let cheap = store.filter_products(None, Some("0-50")).await.map_err(|e| e.to_string())?;
    require_eq!(ids(&cheap), vec![cable.id]);

    let electronics =
        store.filter_products(Some("ELECTRONICS"), None).await.map_err(|e| e.to_string())?;
    require_eq!(ids(&electronics), vec![headphones.id, cable.id]);

    let unknown_bucket =
        store.filter_products(Some("clothing"), Some("cheap")).await.map_err(|e| e.to_string())?;
    require_eq!(ids(&unknown_bucket), vec![shoes.id]);

    let everything = store.filter_products(None, None).await.map_err(|e| e.to_string())?;
    require_eq!(ids(&everything), vec![shoes.id, headphones.id, cable.id]);

    let partial_category =
        store.filter_products(Some("electro"), None).await.map_err(|e| e.to_string())?;
    require!(partial_category.is_empty(), "category match must be exact: {partial_category:?}");
    Ok(())
}

async fn filter_boundaries_check(store: &dyn CatalogStore) -> ContractResult {
    let mut created = Vec::new();
    for price in ["0.00", "50.00", "50.01", "100.00", "100.01", "200.00", "200.01"] {
        let product = store
            .create_product(new_product(&format!("At {price}"), "", "misc", price))
            .await
            .map_err(|e| e.to_string())?;
        created.push(product.id);
    }

    let expectations = [
        ("0-50", vec![created[0], created[1]]),
        ("50-100", vec![created[2], created[3]]),
        ("100-200", vec![created[4], created[5]]),
        ("200+", vec![created[6]]),
    ];
    for (label, expected) in expectations {
        let matched = store.filter_products(None, Some(label)).await.map_err(|e| e.to_string())?;
        require!(ids(&matched) == expected, "bucket {label}: {:?} != {expected:?}", ids(&matched));
    }
    Ok(())
}

async fn users_check(store: &dyn CatalogStore) -> ContractResult {
    let first = store
        .create_user(NewUser::new("shopper", "first-secret"))
        .await
        .map_err(|e| e.to_string())?;
    let duplicate = store
        .create_user(NewUser::new("shopper", "second-secret"))
        .await
        .map_err(|e| e.to_string())?;

    require!(duplicate.id > first.id, "duplicate usernames are accepted with a new id");
    require_eq!(store.get_user(first.id).await.map_err(|e| e.to_string())?, Some(first.clone()));

    let by_name = store.get_user_by_username("shopper").await.map_err(|e| e.to_string())?;
    require_eq!(by_name, Some(first));

    let case_mismatch = store.get_user_by_username("Shopper").await.map_err(|e| e.to_string())?;
    require!(case_mismatch.is_none(), "username lookup must be exact");
    Ok(())
}
