use std::sync::Arc;

use async_trait::async_trait;
use autoflow_core::config::AppConfig;
use autoflow_core::domain::inventory::{find_product, format_catalog, InventoryItem, ProductLookup};
use autoflow_core::domain::order::OrderRecord;
use autoflow_core::gateway::InventoryGateway;
use tracing::{info, warn};

use crate::rows::{inventory_item_from_row, order_row};
use crate::source::{SheetError, SheetSource};

/// Result of one call against the sheet, before it is collapsed to the
/// fail-soft public value.
#[derive(Debug)]
pub enum GatewayOutcome<T> {
    Fresh(T),
    Degraded(SheetError),
}

impl<T> GatewayOutcome<T> {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> GatewayOutcome<U> {
        match self {
            Self::Fresh(value) => GatewayOutcome::Fresh(f(value)),
            Self::Degraded(error) => GatewayOutcome::Degraded(error),
        }
    }
}

impl<T> From<Result<T, SheetError>> for GatewayOutcome<T> {
    fn from(value: Result<T, SheetError>) -> Self {
        match value {
            Ok(value) => Self::Fresh(value),
            Err(error) => Self::Degraded(error),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewaySettings {
    pub inventory_range: String,
    pub orders_range: String,
    pub currency_symbol: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for GatewaySettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            inventory_range: config.sheets.inventory_range.clone(),
            orders_range: config.sheets.orders_range.clone(),
            currency_symbol: config.engine.currency_symbol.clone(),
        }
    }
}

#[derive(Clone)]
pub struct SheetsInventoryGateway {
    source: Arc<dyn SheetSource>,
    settings: GatewaySettings,
}

impl SheetsInventoryGateway {
    pub fn new(source: Arc<dyn SheetSource>, settings: GatewaySettings) -> Self {
        Self { source, settings }
    }

    pub async fn fetch_inventory_outcome(&self) -> GatewayOutcome<Vec<InventoryItem>> {
        let rows = self.source.read_range(&self.settings.inventory_range).await;
        GatewayOutcome::from(rows).map(|rows| {
            rows.iter().filter_map(|row| inventory_item_from_row(row)).collect::<Vec<_>>()
        })
    }

    pub async fn log_order_outcome(&self, order: &OrderRecord) -> GatewayOutcome<()> {
        self.source.append_row(&self.settings.orders_range, order_row(order)).await.into()
    }
}

#[async_trait]
impl InventoryGateway for SheetsInventoryGateway {
    async fn fetch_inventory(&self) -> Vec<InventoryItem> {
        match self.fetch_inventory_outcome().await {
            GatewayOutcome::Fresh(items) => items,
            GatewayOutcome::Degraded(error) => {
                warn!(
                    event_name = "inventory.fetch.degraded",
                    range = %self.settings.inventory_range,
                    error = %error,
                    "inventory read failed; serving empty catalog"
                );
                Vec::new()
            }
        }
    }

    async fn list_formatted(&self) -> String {
        let items = self.fetch_inventory().await;
        format_catalog(&items, &self.settings.currency_symbol)
    }

    async fn lookup(&self, query: &str) -> ProductLookup {
        find_product(self.fetch_inventory().await, query)
    }

    async fn log_order(&self, order: &OrderRecord) -> bool {
        match self.log_order_outcome(order).await {
            GatewayOutcome::Fresh(()) => {
                info!(
                    event_name = "orders.append.completed",
                    order_id = %order.order_id,
                    customer = %order.customer,
                    "order logged to sheet"
                );
                true
            }
            GatewayOutcome::Degraded(error) => {
                warn!(
                    event_name = "orders.append.degraded",
                    order_id = %order.order_id,
                    range = %self.settings.orders_range,
                    error = %error,
                    "order append failed"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use autoflow_core::domain::inventory::{ProductLookup, EMPTY_CATALOG_MESSAGE};
    use autoflow_core::domain::order::OrderRecord;
    use autoflow_core::gateway::InventoryGateway;
    use serde_json::json;

    use super::{GatewayOutcome, GatewaySettings, SheetsInventoryGateway};
    use crate::memory::InMemorySheetSource;
    use crate::source::SheetError;

    fn gateway(source: &InMemorySheetSource) -> SheetsInventoryGateway {
        SheetsInventoryGateway::new(Arc::new(source.clone()), GatewaySettings::default())
    }

    #[tokio::test]
    async fn fetch_skips_header_and_maps_rows() {
        let source = InMemorySheetSource::demo();
        let items = gateway(&source).fetch_inventory().await;

        assert_eq!(items.len(), 4);
        assert_eq!(items[0].product, "Red Lipstick");
        assert_eq!(items[2].stock, 0);
    }

    #[tokio::test]
    async fn outage_degrades_to_empty_values() {
        let source = InMemorySheetSource::demo();
        source.set_offline(true);
        let gateway = gateway(&source);

        assert!(gateway.fetch_inventory_outcome().await.is_degraded());
        assert!(gateway.fetch_inventory().await.is_empty());
        assert_eq!(gateway.list_formatted().await, EMPTY_CATALOG_MESSAGE);
        assert_eq!(gateway.lookup("lipstick").await, ProductLookup::NotFound);
        assert!(!gateway.log_order(&OrderRecord::from_chat("user@s.whatsapp.net")).await);
    }

    #[tokio::test]
    async fn list_formatted_uses_configured_currency() {
        let source = InMemorySheetSource::demo();
        let settings = GatewaySettings { currency_symbol: "$".to_owned(), ..Default::default() };
        let gateway = SheetsInventoryGateway::new(Arc::new(source), settings);

        let listing = gateway.list_formatted().await;

        assert_eq!(
            listing,
            concat!(
                "- Red Lipstick ($299)\n",
                "- Blue Eyeliner ($349)\n",
                "- Foundation ($599)\n",
                "- Matte Compact ($199)"
            )
        );
    }

    #[tokio::test]
    async fn lookup_matches_first_case_insensitive_substring() {
        let source = InMemorySheetSource::demo();
        let gateway = gateway(&source);

        match gateway.lookup("LIPSTICK").await {
            ProductLookup::Found(item) => assert_eq!(item.id, "P-101"),
            ProductLookup::NotFound => panic!("expected a match"),
        }
        assert_eq!(gateway.lookup("mascara").await, ProductLookup::NotFound);
        assert_eq!(gateway.lookup("  ").await, ProductLookup::NotFound);
    }

    #[tokio::test]
    async fn log_order_appends_six_columns() {
        let source = InMemorySheetSource::demo();
        let order = OrderRecord::from_chat("919876543210@s.whatsapp.net");

        assert!(gateway(&source).log_order(&order).await);

        let orders = source.rows("Orders").await;
        let appended = orders.last().expect("appended row");
        assert_eq!(appended.len(), 6);
        assert_eq!(appended[0], json!(order.order_id.as_str()));
        assert_eq!(appended[1], json!("919876543210@s.whatsapp.net"));
        assert_eq!(appended[4], json!("Pending"));
    }

    #[test]
    fn map_keeps_the_degraded_error() {
        let fresh = GatewayOutcome::from(Ok::<u8, SheetError>(3)).map(|value| value * 2);
        let outage = Err::<u8, _>(SheetError::Unavailable("down".to_owned()));
        let degraded = GatewayOutcome::from(outage).map(|value| value * 2);

        assert!(matches!(fresh, GatewayOutcome::Fresh(6)));
        assert!(matches!(degraded, GatewayOutcome::Degraded(SheetError::Unavailable(_))));
    }
}
