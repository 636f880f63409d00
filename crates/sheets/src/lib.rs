//! Inventory Gateway backed by a spreadsheet.
//!
//! - **Source** (`source`) - `SheetSource` trait over ranges of cells
//! - **Google** (`client`) - Sheets REST v4 client
//! - **Memory** (`memory`) - in-process tabs for demos and tests
//! - **Rows** (`rows`) - positional row to `InventoryItem` mapping
//! - **Gateway** (`gateway`) - fail-soft `InventoryGateway` implementation
//!
//! ```text
//! Reply engine → SheetsInventoryGateway → SheetSource (Google | Memory)
//! ```

pub mod client;
pub mod gateway;
pub mod memory;
pub mod rows;
pub mod source;

use std::sync::Arc;

use autoflow_core::config::{AppConfig, SheetsBackend, SheetsConfig};

pub use client::GoogleSheetsClient;
pub use gateway::{GatewayOutcome, GatewaySettings, SheetsInventoryGateway};
pub use memory::InMemorySheetSource;
pub use source::{SheetError, SheetRow, SheetSource};

pub fn source_from_config(config: &SheetsConfig) -> Result<Arc<dyn SheetSource>, SheetError> {
    Ok(match config.backend {
        SheetsBackend::Google => Arc::new(GoogleSheetsClient::from_config(config)?),
        SheetsBackend::Memory => Arc::new(InMemorySheetSource::demo()),
    })
}

pub fn gateway_from_config(config: &AppConfig) -> Result<SheetsInventoryGateway, SheetError> {
    let source = source_from_config(&config.sheets)?;
    Ok(SheetsInventoryGateway::new(source, GatewaySettings::from(config)))
}
