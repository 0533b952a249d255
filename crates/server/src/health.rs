use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use catalog_core::config::StorageBackend;
use catalog_core::domain::product::ProductId;
use catalog_db::CatalogStore;
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

#[derive(Clone)]
pub struct HealthState {
    store: Arc<dyn CatalogStore>,
    backend: StorageBackend,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub store: HealthCheck,
    pub checked_at: String,
}

pub fn router(store: Arc<dyn CatalogStore>, backend: StorageBackend) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { store, backend })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let store = store_check(state.store.as_ref(), state.backend).await;
    let ready = store.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "catalog-server runtime initialized".to_string(),
        },
        store,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

/// Probes the backing store with a lookup that never matches a real row.
async fn store_check(store: &dyn CatalogStore, backend: StorageBackend) -> HealthCheck {
    match store.get_product(ProductId(0)).await {
        Ok(_) => HealthCheck { status: "ready", detail: format!("{backend:?} store reachable") },
        Err(error) => {
            warn!(
                event_name = "system.health.store_degraded",
                correlation_id = "health",
                error = %error,
                "catalog store probe failed"
            );
            HealthCheck { status: "degraded", detail: format!("store probe failed: {error}") }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, Json};
    use catalog_core::config::StorageBackend;
    use catalog_db::{connect_with_settings, migrations, InMemoryCatalogStore, SqlCatalogStore};

    use crate::health::{health, HealthState};

    #[tokio::test]
    async fn health_returns_ready_for_memory_store() {
        let state = HealthState {
            store: Arc::new(InMemoryCatalogStore::new()),
            backend: StorageBackend::Memory,
        };

        let (status, Json(payload)) = health(State(state)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.store.detail, "Memory store reachable");
    }

    #[tokio::test]
    async fn health_returns_ready_when_database_is_reachable() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("pool should connect");
        migrations::run_pending(&pool).await.expect("migrations");

        let state = HealthState {
            store: Arc::new(SqlCatalogStore::new(pool.clone())),
            backend: StorageBackend::Sqlite,
        };
        let (status, Json(payload)) = health(State(state)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.store.status, "ready");
        assert_eq!(payload.service.status, "ready");

        pool.close().await;
    }

    #[tokio::test]
    async fn health_returns_service_unavailable_when_database_is_unavailable() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("pool should connect");
        pool.close().await;

        let state = HealthState {
            store: Arc::new(SqlCatalogStore::new(pool)),
            backend: StorageBackend::Sqlite,
        };
        let (status, Json(payload)) = health(State(state)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.store.status, "degraded");
        assert_eq!(payload.service.status, "ready");
    }
}
