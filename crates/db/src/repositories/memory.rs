use std::collections::BTreeMap;

use tokio::sync::RwLock;

use catalog_core::domain::filter::ProductFilter;
use catalog_core::domain::product::{NewProduct, Product, ProductId, ProductPatch};
use catalog_core::domain::user::{NewUser, User, UserId};

use super::{CatalogStore, RepositoryError};

#[derive(Default)]
struct CatalogState {
    users: BTreeMap<UserId, User>,
    products: BTreeMap<ProductId, Product>,
    last_user_id: i64,
    last_product_id: i64,
}

/// Transient store. Ids are keyed in `BTreeMap`s so iteration follows
/// insertion order, and the counters are never rewound on delete.
#[derive(Default)]
pub struct InMemoryCatalogStore {
    state: RwLock<CatalogState>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|user| user.username == username).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut state = self.state.write().await;
        state.last_user_id += 1;
        let user = user.into_user(UserId(state.last_user_id));
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.products.values().cloned().collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.products.get(&id).cloned())
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let mut state = self.state.write().await;
        state.last_product_id += 1;
        let product = product.into_product(ProductId(state.last_product_id));
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut state = self.state.write().await;
        Ok(state.products.get_mut(&id).map(|product| {
            product.apply(patch);
            product.clone()
        }))
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        Ok(state.products.remove(&id).is_some())
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .products
            .values()
            .filter(|product| product.matches_search(query))
            .cloned()
            .collect())
    }

    async fn filter_products(
        &self,
        category: Option<&str>,
        price_range: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let filter = ProductFilter::from_params(category, price_range);
        let state = self.state.read().await;
        Ok(state.products.values().filter(|product| filter.matches(product)).cloned().collect())
    }
}
