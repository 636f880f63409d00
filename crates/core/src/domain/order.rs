use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

pub const CHAT_ORDER_ITEMS: &str = "Unknown Item (Chat Order)";

/// `ORD-` followed by four digits.
///
/// Ids are drawn at random from `1000..=9999` without a collision check, so two
/// orders can share an id. Good enough for the chat demo; not a primary key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn generate() -> Self {
        let number: u16 = rand::thread_rng().gen_range(1000..=9999);
        Self(format!("ORD-{number}"))
    }

    /// Accepts `ORD-1234` and the `#ORD-1234` form customers tend to paste.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let candidate = raw.trim().trim_start_matches('#');
        let digits = candidate
            .strip_prefix("ORD-")
            .ok_or_else(|| DomainError::InvalidOrderId(raw.to_owned()))?;

        if digits.len() == 4 && digits.bytes().all(|byte| byte.is_ascii_digit()) {
            Ok(Self(candidate.to_owned()))
        } else {
            Err(DomainError::InvalidOrderId(raw.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum OrderStatus {
    Pending,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: OrderId,
    pub customer: String,
    pub items: String,
    pub total: Decimal,
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
}

impl OrderRecord {
    /// Order placed from chat. There is no cart yet, so items and total are
    /// placeholders until a structured order flow exists.
    pub fn from_chat(customer: impl Into<String>) -> Self {
        Self {
            order_id: OrderId::generate(),
            customer: customer.into(),
            items: CHAT_ORDER_ITEMS.to_owned(),
            total: chat_order_total(),
            status: OrderStatus::Pending,
            timestamp: Utc::now(),
        }
    }

    /// Column order of the orders tab: id, customer, items, total, status, timestamp.
    pub fn to_row(&self) -> [String; 6] {
        [
            self.order_id.to_string(),
            self.customer.clone(),
            self.items.clone(),
            self.total.to_string(),
            self.status.as_str().to_owned(),
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        ]
    }
}

pub fn chat_order_total() -> Decimal {
    Decimal::new(9900, 2)
}
