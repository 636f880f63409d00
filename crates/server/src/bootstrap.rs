use std::sync::Arc;

use autoflow_agent::ReplyEngine;
use autoflow_core::config::{AppConfig, ConfigError, LoadOptions};
use autoflow_sheets::{gateway_from_config, SheetError, SheetsInventoryGateway};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub gateway: Arc<SheetsInventoryGateway>,
    pub engine: Arc<ReplyEngine>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("inventory source setup failed: {0}")]
    Sheets(#[from] SheetError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        sheets_backend = ?config.sheets.backend,
        "starting application bootstrap"
    );

    let gateway = Arc::new(gateway_from_config(&config)?);
    let engine = Arc::new(ReplyEngine::new(gateway.clone(), &config.engine));
    info!(
        event_name = "system.bootstrap.engine_ready",
        correlation_id = "bootstrap",
        inventory_range = %config.sheets.inventory_range,
        orders_range = %config.sheets.orders_range,
        "reply engine wired to inventory gateway"
    );

    Ok(Application { config, gateway, engine })
}
