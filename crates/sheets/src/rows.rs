use std::str::FromStr;

use autoflow_core::domain::inventory::InventoryItem;
use autoflow_core::domain::order::OrderRecord;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::source::SheetRow;

/// Maps `[id, product, stock, price]` positionally.
///
/// A bad numeric cell only defaults that cell. Rows without a product name
/// carry nothing to match against and are skipped.
pub fn inventory_item_from_row(row: &[Value]) -> Option<InventoryItem> {
    let product = cell_text(row.get(1)).trim().to_owned();
    if product.is_empty() {
        return None;
    }

    Some(InventoryItem {
        id: cell_text(row.get(0)).trim().to_owned(),
        product,
        stock: parse_stock(row.get(2)),
        price: parse_price(row.get(3)),
    })
}

pub fn order_row(order: &OrderRecord) -> SheetRow {
    order.to_row().into_iter().map(Value::String).collect()
}

fn cell_text(cell: Option<&Value>) -> String {
    match cell {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

fn parse_stock(cell: Option<&Value>) -> u32 {
    let text = cell_text(cell);
    let (negative, digits) = numeric_prefix(text.trim());
    let whole = digits.split('.').next().unwrap_or_default();
    if negative || whole.is_empty() {
        return 0;
    }

    whole.parse::<u32>().unwrap_or(0)
}

fn parse_price(cell: Option<&Value>) -> Decimal {
    let text = cell_text(cell);
    let (negative, digits) = numeric_prefix(text.trim());
    if negative || digits.is_empty() {
        return Decimal::ZERO;
    }

    let normalized =
        if digits.starts_with('.') { format!("0{digits}") } else { digits.to_owned() };
    Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)
}

/// Longest leading `[+-]?\d*(\.\d+)?` run, split into sign and unsigned part.
///
/// Mirrors how spreadsheet users write numbers: `15 units` reads as 15 and
/// `299.50/-` reads as 299.50.
fn numeric_prefix(text: &str) -> (bool, &str) {
    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let bytes = unsigned.as_bytes();
    let mut end = bytes.iter().take_while(|byte| byte.is_ascii_digit()).count();
    if bytes.get(end) == Some(&b'.') {
        let fraction = bytes[end + 1..].iter().take_while(|byte| byte.is_ascii_digit()).count();
        if fraction > 0 {
            end += 1 + fraction;
        }
    }

    let digits = &unsigned[..end];
    let is_zero = digits.bytes().all(|byte| byte == b'0' || byte == b'.');
    (negative && !is_zero, digits)
}
