use secrecy::ExposeSecret;
use sqlx::Row;

use catalog_core::domain::filter::ProductFilter;
use catalog_core::domain::price::Price;
use catalog_core::domain::product::{NewProduct, Product, ProductId, ProductPatch};
use catalog_core::domain::user::{NewUser, User, UserId};

use super::{CatalogStore, RepositoryError};
use crate::DbPool;

const PRODUCT_COLUMNS: &str = "id, name, description, price, image_url, category, in_stock";

/// SQLite-backed store over the `product` and `app_user` tables.
///
/// Search and filter predicates run on decoded rows through the same
/// [`Product`] and [`ProductFilter`] matchers the in-memory store uses.
/// SQLite's `lower()` only folds ASCII, so case-insensitive matching stays
/// out of SQL.
pub struct SqlCatalogStore {
    pool: DbPool,
}

impl SqlCatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn decode_err(error: sqlx::Error) -> RepositoryError {
    RepositoryError::Decode(error.to_string())
}

fn row_to_product(row: &sqlx::sqlite::SqliteRow) -> Result<Product, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(decode_err)?;
    let name: String = row.try_get("name").map_err(decode_err)?;
    let description: String = row.try_get("description").map_err(decode_err)?;
    let price_str: String = row.try_get("price").map_err(decode_err)?;
    let image_url: String = row.try_get("image_url").map_err(decode_err)?;
    let category: String = row.try_get("category").map_err(decode_err)?;
    let in_stock: bool = row.try_get("in_stock").map_err(decode_err)?;

    let price = price_str.parse::<Price>().map_err(|e| {
        RepositoryError::Decode(format!("product {id} has an unreadable price: {e}"))
    })?;

    Ok(Product {
        id: ProductId(id),
        name,
        description,
        price,
        image_url,
        category,
        in_stock,
    })
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(decode_err)?;
    let username: String = row.try_get("username").map_err(decode_err)?;
    let password: String = row.try_get("password").map_err(decode_err)?;

    Ok(NewUser::new(username, password).into_user(UserId(id)))
}

fn rows_to_products(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<Product>, RepositoryError> {
    rows.iter().map(row_to_product).collect()
}

#[async_trait::async_trait]
impl CatalogStore for SqlCatalogStore {
    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT id, username, password FROM app_user WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, username, password FROM app_user
             WHERE username = ?
             ORDER BY id
             LIMIT 1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO app_user (username, password) VALUES (?, ?) RETURNING id",
        )
        .bind(&user.username)
        .bind(user.password.expose_secret())
        .fetch_one(&self.pool)
        .await?;

        Ok(user.into_user(UserId(id)))
    }

    async fn get_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM product ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        rows_to_products(&rows)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_product).transpose()
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO product (name, description, price, image_url, category, in_stock)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.to_string())
        .bind(&product.image_url)
        .bind(&product.category)
        .bind(product.in_stock)
        .fetch_one(&self.pool)
        .await?;

        Ok(product.into_product(ProductId(id)))
    }

    async fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, RepositoryError> {
        if patch.is_empty() {
            return self.get_product(id).await;
        }

        let row = sqlx::query(&format!(
            "UPDATE product SET
                 name = COALESCE(?, name),
                 description = COALESCE(?, description),
                 price = COALESCE(?, price),
                 image_url = COALESCE(?, image_url),
                 category = COALESCE(?, category),
                 in_stock = COALESCE(?, in_stock)
             WHERE id = ?
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.price.map(|price| price.to_string()))
        .bind(patch.image_url)
        .bind(patch.category)
        .bind(patch.in_stock)
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_product).transpose()
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM product WHERE id = ?").bind(id.0).execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
        let products = self.get_products().await?;
        Ok(products.into_iter().filter(|product| product.matches_search(query)).collect())
    }

    async fn filter_products(
        &self,
        category: Option<&str>,
        price_range: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let filter = ProductFilter::from_params(category, price_range);
        let products = self.get_products().await?;
        if filter.is_unconstrained() {
            return Ok(products);
        }

        Ok(products.into_iter().filter(|product| filter.matches(product)).collect())
    }
}
