use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const EMPTY_CATALOG_MESSAGE: &str = "No products available currently.";

/// One catalog row as read from the inventory tab.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub product: String,
    pub stock: u32,
    pub price: Decimal,
}

impl InventoryItem {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Price without trailing zeros, so `299.00` renders as `299`.
    pub fn display_price(&self) -> String {
        self.price.normalize().to_string()
    }

    fn matches(&self, needle_lowercase: &str) -> bool {
        self.product.to_lowercase().contains(needle_lowercase)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProductLookup {
    Found(InventoryItem),
    NotFound,
}

/// Renders the catalog as one `- <product> (<currency><price>)` line per item.
pub fn format_catalog(items: &[InventoryItem], currency_symbol: &str) -> String {
    if items.is_empty() {
        return EMPTY_CATALOG_MESSAGE.to_owned();
    }

    items
        .iter()
        .map(|item| format!("- {} ({currency_symbol}{})", item.product, item.display_price()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// First item in source order whose product name contains `query`, ignoring case.
///
/// There is no ranking: an ambiguous query resolves to whichever row the source
/// lists first. A blank query never matches.
pub fn find_product(items: Vec<InventoryItem>, query: &str) -> ProductLookup {
    if query.trim().is_empty() {
        return ProductLookup::NotFound;
    }

    let needle = query.to_lowercase();
    items
        .into_iter()
        .find(|item| item.matches(&needle))
        .map(ProductLookup::Found)
        .unwrap_or(ProductLookup::NotFound)
}
