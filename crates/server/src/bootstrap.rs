use std::sync::Arc;

use catalog_core::config::{AppConfig, ConfigError, LoadOptions, StorageBackend};
use catalog_db::{
    connect_with_settings, migrations, CatalogStore, DbPool, InMemoryCatalogStore,
    RepositoryError, SampleCatalog, SqlCatalogStore,
};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub store: Arc<dyn CatalogStore>,
    pub db_pool: Option<DbPool>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("sample catalog seeding failed: {0}")]
    Seed(#[source] RepositoryError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        backend = ?config.storage.backend,
        "starting application bootstrap"
    );

    let (store, db_pool): (Arc<dyn CatalogStore>, Option<DbPool>) = match config.storage.backend {
        StorageBackend::Memory => (Arc::new(InMemoryCatalogStore::new()), None),
        StorageBackend::Sqlite => {
            let pool = connect_with_settings(
                &config.database.url,
                config.database.max_connections,
                config.database.timeout_secs,
            )
            .await
            .map_err(BootstrapError::DatabaseConnect)?;
            info!(
                event_name = "system.bootstrap.database_connected",
                correlation_id = "bootstrap",
                "database connection established"
            );

            migrations::run_pending(&pool).await.map_err(BootstrapError::Migration)?;
            info!(
                event_name = "system.bootstrap.migrations_applied",
                correlation_id = "bootstrap",
                "database migrations applied"
            );

            (Arc::new(SqlCatalogStore::new(pool.clone())), Some(pool))
        }
    };

    if config.storage.seed_sample_catalog {
        let seeded = SampleCatalog::load(store.as_ref()).await.map_err(BootstrapError::Seed)?;
        info!(
            event_name = "system.bootstrap.sample_catalog",
            correlation_id = "bootstrap",
            inserted = seeded.inserted,
            already_populated = seeded.already_populated,
            "sample catalog checked"
        );
    }

    Ok(Application { config, store, db_pool })
}
