use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use catalog_core::domain::filter::ProductFilter;
use catalog_core::domain::price::PriceRange;
use catalog_core::domain::product::{NewProduct, Product, ProductId, ProductPatch};
use catalog_core::errors::{ApplicationError, DomainError, InterfaceError};
use catalog_db::{CatalogStore, RepositoryError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct CatalogState {
    store: Arc<dyn CatalogStore>,
}

pub fn router(store: Arc<dyn CatalogStore>) -> Router {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .with_state(CatalogState { store })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub price_range: Option<String>,
}

impl ListProductsQuery {
    fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|term| !term.is_empty())
    }

    fn category(&self) -> Option<&str> {
        selected(self.category.as_deref())
    }

    fn price_range(&self) -> Option<&str> {
        selected(self.price_range.as_deref())
    }
}

/// Storefront selects send `all` for "no constraint".
fn selected(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("all"))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    correlation_id: String,
}

/// HTTP rendering of an [`InterfaceError`].
#[derive(Debug)]
pub struct ApiError(InterfaceError);

impl ApiError {
    fn bad_request(message: impl Into<String>, correlation_id: &str) -> Self {
        Self(InterfaceError::BadRequest {
            message: message.into(),
            correlation_id: correlation_id.to_string(),
        })
    }

    fn not_found(id: ProductId, correlation_id: &str) -> Self {
        Self(
            ApplicationError::NotFound { entity: "product", id: id.to_string() }
                .into_interface(correlation_id),
        )
    }

    /// Connection-level failures are retryable (503); rows that no longer
    /// decode are not (500).
    fn store(error: RepositoryError, correlation_id: &str) -> Self {
        warn!(
            event_name = "catalog.store.failure",
            correlation_id = %correlation_id,
            error = %error,
            "catalog store call failed"
        );
        let application = match error {
            RepositoryError::Database(error) => ApplicationError::Persistence(error.to_string()),
            RepositoryError::Decode(message) => ApplicationError::DataIntegrity(message),
        };
        Self(application.into_interface(correlation_id))
    }
}

impl From<InterfaceError> for ApiError {
    fn from(value: InterfaceError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self.0 {
            InterfaceError::BadRequest { message, .. } => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            InterfaceError::NotFound { message, .. } => (StatusCode::NOT_FOUND, message.clone()),
            InterfaceError::ServiceUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, self.0.user_message().to_string())
            }
            InterfaceError::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.0.user_message().to_string())
            }
        };
        let body = ErrorBody { error, correlation_id: self.0.correlation_id().to_string() };
        (status, Json(body)).into_response()
    }
}

fn correlation_id() -> String {
    Uuid::new_v4().to_string()
}

fn parse_id(raw: &str, correlation_id: &str) -> Result<ProductId, ApiError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(ProductId(id)),
        _ => Err(ApiError::from(
            ApplicationError::from(DomainError::InvariantViolation(format!(
                "product id `{raw}` must be a positive integer"
            )))
            .into_interface(correlation_id),
        )),
    }
}

fn parse_body<T>(body: Result<Json<T>, JsonRejection>, correlation_id: &str) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text(), correlation_id))
}

pub async fn list_products(
    State(state): State<CatalogState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let correlation_id = correlation_id();
    let filter = ProductFilter::from_params(query.category(), query.price_range());

    let products = if let Some(term) = query.search_term() {
        state
            .store
            .search_products(term)
            .await
            .map_err(|error| ApiError::store(error, &correlation_id))?
            .into_iter()
            .filter(|product| filter.matches(product))
            .collect()
    } else if !filter.is_unconstrained() {
        state
            .store
            .filter_products(query.category(), query.price_range())
            .await
            .map_err(|error| ApiError::store(error, &correlation_id))?
    } else {
        state
            .store
            .get_products()
            .await
            .map_err(|error| ApiError::store(error, &correlation_id))?
    };

    info!(
        event_name = "catalog.products.listed",
        correlation_id = %correlation_id,
        search = query.search_term().unwrap_or_default(),
        category = filter.category.as_deref().unwrap_or_default(),
        price_range = filter.price_range.as_ref().map(PriceRange::label).unwrap_or_default(),
        count = products.len(),
        "products listed"
    );
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<CatalogState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let correlation_id = correlation_id();
    let id = parse_id(&raw_id, &correlation_id)?;

    state
        .store
        .get_product(id)
        .await
        .map_err(|error| ApiError::store(error, &correlation_id))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(id, &correlation_id))
}

pub async fn create_product(
    State(state): State<CatalogState>,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let correlation_id = correlation_id();
    let new_product = parse_body(body, &correlation_id)?;

    let created = state
        .store
        .create_product(new_product)
        .await
        .map_err(|error| ApiError::store(error, &correlation_id))?;

    info!(
        event_name = "catalog.product.created",
        correlation_id = %correlation_id,
        product_id = created.id.0,
        "product created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_product(
    State(state): State<CatalogState>,
    Path(raw_id): Path<String>,
    body: Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let correlation_id = correlation_id();
    let id = parse_id(&raw_id, &correlation_id)?;
    let patch = parse_body(body, &correlation_id)?;

    let updated = state
        .store
        .update_product(id, patch)
        .await
        .map_err(|error| ApiError::store(error, &correlation_id))?
        .ok_or_else(|| ApiError::not_found(id, &correlation_id))?;

    info!(
        event_name = "catalog.product.updated",
        correlation_id = %correlation_id,
        product_id = id.0,
        "product updated"
    );
    Ok(Json(updated))
}

pub async fn delete_product(
    State(state): State<CatalogState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let correlation_id = correlation_id();
    let id = parse_id(&raw_id, &correlation_id)?;

    let removed = state
        .store
        .delete_product(id)
        .await
        .map_err(|error| ApiError::store(error, &correlation_id))?;
    if !removed {
        return Err(ApiError::not_found(id, &correlation_id));
    }

    info!(
        event_name = "catalog.product.deleted",
        correlation_id = %correlation_id,
        product_id = id.0,
        "product deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}
