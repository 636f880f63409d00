use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::source::{parse_a1, SheetError, SheetRow, SheetSource};

/// Spreadsheet held in process memory.
///
/// Tabs keep their header row so A1 start rows resolve the same way they do
/// against the real API. Used for the offline demo catalog and in tests.
///
/// Appended rows are never evicted, so a long-running memory backend grows
/// with every logged order.
#[derive(Clone, Debug, Default)]
pub struct InMemorySheetSource {
    tabs: Arc<RwLock<HashMap<String, Vec<SheetRow>>>>,
    order: Arc<RwLock<Vec<String>>>,
    offline: Arc<AtomicBool>,
}

impl InMemorySheetSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the spreadsheet up front. A repeated title replaces the earlier
    /// rows and keeps its first position in the tab list.
    pub fn from_tabs<I, T>(tabs: I) -> Self
    where
        I: IntoIterator<Item = (T, Vec<SheetRow>)>,
        T: Into<String>,
    {
        let mut by_title = HashMap::new();
        let mut order = Vec::new();
        for (title, rows) in tabs {
            let title = title.into();
            if by_title.insert(title.clone(), rows).is_none() {
                order.push(title);
            }
        }

        Self {
            tabs: Arc::new(RwLock::new(by_title)),
            order: Arc::new(RwLock::new(order)),
            offline: Arc::default(),
        }
    }

    /// Small cosmetics catalog with an empty Orders tab.
    pub fn demo() -> Self {
        Self::from_tabs([
            (
                "Inventory",
                vec![
                    vec![json!("ID"), json!("Product"), json!("Stock"), json!("Price")],
                    vec![json!("P-101"), json!("Red Lipstick"), json!(15), json!(299)],
                    vec![json!("P-102"), json!("Blue Eyeliner"), json!(8), json!(349)],
                    vec![json!("P-103"), json!("Foundation"), json!(0), json!(599)],
                    vec![json!("P-104"), json!("Matte Compact"), json!(20), json!(199)],
                ],
            ),
            (
                "Orders",
                vec![vec![
                    json!("Order ID"),
                    json!("Customer"),
                    json!("Items"),
                    json!("Total"),
                    json!("Status"),
                    json!("Timestamp"),
                ]],
            ),
        ])
    }

    /// Simulates an outage: every call fails with `Unavailable` until reset.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn rows(&self, tab: &str) -> Vec<SheetRow> {
        self.tabs.read().await.get(tab).cloned().unwrap_or_default()
    }

    fn ensure_online(&self) -> Result<(), SheetError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(SheetError::Unavailable("in-memory sheet is offline".to_owned()));
        }
        Ok(())
    }
}

fn missing_tab(tab: &str) -> SheetError {
    SheetError::Status { status: 400, body: format!("Unable to parse range: {tab}") }
}

#[async_trait]
impl SheetSource for InMemorySheetSource {
    async fn read_range(&self, range: &str) -> Result<Vec<SheetRow>, SheetError> {
        self.ensure_online()?;

        let a1 = parse_a1(range);
        let tabs = self.tabs.read().await;
        let rows = tabs.get(a1.tab).ok_or_else(|| missing_tab(a1.tab))?;
        Ok(rows.iter().skip(a1.start_row - 1).cloned().collect())
    }

    async fn append_row(&self, range: &str, row: SheetRow) -> Result<(), SheetError> {
        self.ensure_online()?;

        let a1 = parse_a1(range);
        let mut tabs = self.tabs.write().await;
        let rows = tabs.get_mut(a1.tab).ok_or_else(|| missing_tab(a1.tab))?;
        rows.push(row.into_iter().map(user_entered).collect());
        Ok(())
    }

    async fn sheet_titles(&self) -> Result<Vec<String>, SheetError> {
        self.ensure_online()?;
        Ok(self.order.read().await.clone())
    }
}

/// Numeric-looking strings are stored as numbers, like the API does for
/// `USER_ENTERED` input.
fn user_entered(cell: Value) -> Value {
    let Value::String(text) = &cell else {
        return cell;
    };
    let parsed = text
        .parse::<i64>()
        .map(Value::from)
        .or_else(|_| text.parse::<f64>().map(Value::from))
        .ok()
        .filter(|value| !value.is_null());
    parsed.unwrap_or(cell)
}
