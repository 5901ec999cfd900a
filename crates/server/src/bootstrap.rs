use std::sync::Arc;

use gemhook_core::catalog::{Catalog, CatalogError};
use gemhook_core::config::{AppConfig, ConfigError, LoadOptions};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub catalog: Arc<Catalog>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("catalog load failed: {0}")]
    Catalog(#[from] CatalogError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

/// Build the application from an already-loaded config. The catalog is
/// loaded exactly once here; a missing or malformed file aborts startup.
pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        catalog_path = %config.catalog.path.display(),
        "starting application bootstrap"
    );

    let catalog = Catalog::load_from_path(&config.catalog.path)?;
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        total_products = catalog.len(),
        stone_types = catalog.stone_types().len(),
        "catalog loaded"
    );

    Ok(Application { config, catalog: Arc::new(catalog) })
}
