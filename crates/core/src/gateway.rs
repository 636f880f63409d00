use async_trait::async_trait;

use crate::domain::inventory::{InventoryItem, ProductLookup};
use crate::domain::order::OrderRecord;

/// Boundary between the reply engine and the catalog / order-log source.
///
/// Every method is fail-soft: implementations swallow source failures and
/// report them as an empty catalog, a `NotFound` lookup or `false`.
#[async_trait]
pub trait InventoryGateway: Send + Sync {
    async fn fetch_inventory(&self) -> Vec<InventoryItem>;

    async fn list_formatted(&self) -> String;

    async fn lookup(&self, query: &str) -> ProductLookup;

    async fn log_order(&self, order: &OrderRecord) -> bool;
}
