use catalog_core::domain::price::Price;
use catalog_core::domain::product::NewProduct;

use crate::repositories::{CatalogStore, RepositoryError};

struct SampleProduct {
    name: &'static str,
    description: &'static str,
    price_cents: u32,
    image_url: &'static str,
    category: &'static str,
}

/// Demonstration catalog shown by a fresh storefront.
const SAMPLE_PRODUCTS: &[SampleProduct] = &[
    SampleProduct {
        name: "Premium Wireless Headphones",
        description: "High-quality audio with noise cancellation",
        price_cents: 29_999,
        image_url: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&h=600",
        category: "electronics",
    },
    SampleProduct {
        name: "Designer Fashion Jacket",
        description: "Elegant and comfortable for any occasion",
        price_cents: 14_999,
        image_url: "https://images.unsplash.com/photo-1551698618-1dfe5d97d256?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&h=600",
        category: "clothing",
    },
    SampleProduct {
        name: "Modern Smartphone",
        description: "Latest technology with advanced features",
        price_cents: 79_999,
        image_url: "https://images.unsplash.com/photo-1511707171634-5f897ff02aa9?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&h=600",
        category: "electronics",
    },
    SampleProduct {
        name: "Athletic Running Shoes",
        description: "Comfortable and durable for daily runs",
        price_cents: 8_999,
        image_url: "https://images.unsplash.com/photo-1542291026-7eec264c27ff?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&h=600",
        category: "clothing",
    },
    SampleProduct {
        name: "Premium Coffee Maker",
        description: "Brew perfect coffee every morning",
        price_cents: 19_999,
        image_url: "https://images.unsplash.com/photo-1517487881594-2787fef5ebf7?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&h=600",
        category: "home",
    },
    SampleProduct {
        name: "Travel Backpack",
        description: "Durable and spacious for all adventures",
        price_cents: 7_999,
        image_url: "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&h=600",
        category: "clothing",
    },
    SampleProduct {
        name: "Luxury Watch",
        description: "Precision timepiece with elegant design",
        price_cents: 49_999,
        image_url: "https://images.unsplash.com/photo-1523275335684-37898b6baf30?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&h=600",
        category: "electronics",
    },
    SampleProduct {
        name: "Vintage Camera",
        description: "Classic design meets modern functionality",
        price_cents: 34_999,
        image_url: "https://images.unsplash.com/photo-1606983340126-99ab4feaa64a?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&h=600",
        category: "electronics",
    },
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedResult {
    pub inserted: usize,
    pub already_populated: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

pub struct SampleCatalog;

impl SampleCatalog {
    pub fn products() -> Vec<NewProduct> {
        SAMPLE_PRODUCTS
            .iter()
            .map(|sample| NewProduct {
                name: sample.name.to_string(),
                description: sample.description.to_string(),
                price: Price::from_cents(sample.price_cents),
                image_url: sample.image_url.to_string(),
                category: sample.category.to_string(),
                in_stock: true,
            })
            .collect()
    }

    /// Inserts the sample products into an empty store. A store that already
    /// holds products is left untouched, so repeated loads are no-ops.
    pub async fn load(store: &dyn CatalogStore) -> Result<SeedResult, RepositoryError> {
        if !store.get_products().await?.is_empty() {
            return Ok(SeedResult { inserted: 0, already_populated: true });
        }

        let mut inserted = 0;
        for product in Self::products() {
            store.create_product(product).await?;
            inserted += 1;
        }

        Ok(SeedResult { inserted, already_populated: false })
    }

    /// Reports, per sample product name, whether the store holds it.
    pub async fn verify(store: &dyn CatalogStore) -> Result<VerificationResult, RepositoryError> {
        let products = store.get_products().await?;
        let checks: Vec<(&'static str, bool)> = SAMPLE_PRODUCTS
            .iter()
            .map(|sample| {
                (sample.name, products.iter().any(|product| product.name == sample.name))
            })
            .collect();
        let all_present = checks.iter().all(|(_, present)| *present);

        Ok(VerificationResult { all_present, checks })
    }
}

#[cfg(test)]
mod tests {
    use catalog_core::domain::product::ProductId;

    use super::SampleCatalog;
    use crate::repositories::{CatalogStore, InMemoryCatalogStore};

    #[tokio::test]
    async fn load_inserts_eight_products_once() {
        let store = InMemoryCatalogStore::new();

        let first = SampleCatalog::load(&store).await.expect("first load");
        let second = SampleCatalog::load(&store).await.expect("second load");

        assert_eq!(first.inserted, 8);
        assert!(!first.already_populated);
        assert_eq!(second.inserted, 0);
        assert!(second.already_populated);
        assert_eq!(store.get_products().await.expect("list").len(), 8);
    }

    #[tokio::test]
    async fn sample_ids_follow_table_order() {
        let store = InMemoryCatalogStore::new();
        SampleCatalog::load(&store).await.expect("load");

        let headphones = store.get_product(ProductId(1)).await.expect("get").expect("present");
        let camera = store.get_product(ProductId(8)).await.expect("get").expect("present");

        assert_eq!(headphones.name, "Premium Wireless Headphones");
        assert_eq!(headphones.price.to_string(), "299.99");
        assert_eq!(camera.name, "Vintage Camera");
    }

    #[tokio::test]
    async fn verify_reports_missing_products() {
        let store = InMemoryCatalogStore::new();
        SampleCatalog::load(&store).await.expect("load");
        assert!(SampleCatalog::verify(&store).await.expect("verify").all_present);

        store.delete_product(ProductId(4)).await.expect("delete");
        let verification = SampleCatalog::verify(&store).await.expect("verify");

        assert!(!verification.all_present);
        assert!(verification.checks.contains(&("Athletic Running Shoes", false)));
        assert!(verification.checks.contains(&("Luxury Watch", true)));
    }
}
