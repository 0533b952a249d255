use async_trait::async_trait;
use thiserror::Error;

use catalog_core::domain::product::{NewProduct, Product, ProductId, ProductPatch};
use catalog_core::domain::user::{NewUser, User, UserId};

pub mod memory;
pub mod sql;

pub use memory::InMemoryCatalogStore;
pub use sql::SqlCatalogStore;

/// Backing-store failure. Missing records are never reported through this
/// type; lookups return `None` and deletes return `false`.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Record store for catalog products and user accounts.
///
/// Implemented once in memory and once over SQLite; both honour the same
/// contract so callers can hold an `Arc<dyn CatalogStore>`. Identifiers are
/// positive, increase with every insert and are never reused.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// First user (lowest id) whose username equals `username` exactly.
    async fn get_user_by_username(&self, username: &str)
        -> Result<Option<User>, RepositoryError>;

    /// Usernames are not checked for uniqueness.
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Every product in insertion order.
    async fn get_products(&self) -> Result<Vec<Product>, RepositoryError>;

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    async fn create_product(&self, product: NewProduct) -> Result<Product, RepositoryError>;

    /// Overlays the supplied fields; `None` when `id` does not exist.
    async fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, RepositoryError>;

    /// `true` when a product existed and was removed.
    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError>;

    /// Case-insensitive substring search over name, description and
    /// category. An empty query returns everything.
    async fn search_products(&self, query: &str) -> Result<Vec<Product>, RepositoryError>;

    /// Case-insensitive exact category match AND price bucket. Absent or
    /// empty category and unknown bucket labels do not constrain.
    async fn filter_products(
        &self,
        category: Option<&str>,
        price_range: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError>;
}
