//! Startup sequence: connect, migrate, seed defaults, and in testing mode seed test data.
//! Runs to completion before the server accepts requests.

use crate::config::{AppConfig, DatabaseConfig};
use crate::error::BootstrapError;
use crate::seed::{seed_default_data, seed_test_data, seeded_rng};
use crate::store::{connect, BootstrapRepository, MemoryStore, MilestoneRepository, PgStore};
use std::sync::Arc;

/// Build the configured store and prepare it. The returned handle is what handlers use.
pub async fn init(config: &AppConfig) -> Result<Arc<dyn MilestoneRepository>, BootstrapError> {
    match &config.database {
        DatabaseConfig::Memory => {
            tracing::info!("connected to the in-memory store");
            let store = Arc::new(MemoryStore::new());
            prepare(&*store, config).await?;
            Ok(store)
        }
        DatabaseConfig::Postgres(pg) => {
            let pool = connect(pg).await.map_err(BootstrapError::Connect)?;
            tracing::info!("connected to the PostgreSQL database");
            let store = Arc::new(PgStore::new(pool));
            prepare(&*store, config).await?;
            Ok(store)
        }
    }
}

/// Migrate and seed an already-connected store.
pub async fn prepare(store: &dyn BootstrapRepository, config: &AppConfig) -> Result<(), BootstrapError> {
    store.migrate().await.map_err(BootstrapError::Migrate)?;
    seed_default_data(store).await?;
    if config.is_testing() {
        let mut rng = seeded_rng(config.test_data_seed);
        seed_test_data(store, &config.fixtures_dir, &mut rng).await?;
    }
    Ok(())
}
