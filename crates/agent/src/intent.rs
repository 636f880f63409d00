use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

/// Message body as delivered by a transport. Anything that is not text is
/// coerced rather than rejected.
#[derive(Clone, Debug, PartialEq)]
pub enum InboundBody {
    Text(String),
    Other(Value),
}

impl InboundBody {
    /// Text to classify: JSON text for structured payloads, empty for `null`.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Other(Value::Null) => String::new(),
            Self::Other(Value::String(text)) => text,
            Self::Other(other) => other.to_string(),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_) | Self::Other(Value::String(_)))
    }
}

impl From<&str> for InboundBody {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for InboundBody {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Value> for InboundBody {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            other => Self::Other(other),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Greeting,
    ListProducts,
    PlaceOrder,
    OrderTracking,
    ProductInquiry,
    Unknown,
}

impl IntentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::ListProducts => "list_products",
            Self::PlaceOrder => "place_order",
            Self::OrderTracking => "order_tracking",
            Self::ProductInquiry => "product_inquiry",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    ListProducts,
    PlaceOrder,
    OrderTracking,
    ProductInquiry { product_query: String },
    Unknown,
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Self::Greeting => IntentKind::Greeting,
            Self::ListProducts => IntentKind::ListProducts,
            Self::PlaceOrder => IntentKind::PlaceOrder,
            Self::OrderTracking => IntentKind::OrderTracking,
            Self::ProductInquiry { .. } => IntentKind::ProductInquiry,
            Self::Unknown => IntentKind::Unknown,
        }
    }
}

struct IntentRule {
    kind: IntentKind,
    contains_any: &'static [&'static str],
    equals_any: &'static [&'static str],
}

impl IntentRule {
    fn matches(&self, normalized: &str) -> bool {
        self.equals_any.iter().any(|candidate| *candidate == normalized)
            || self.contains_any.iter().any(|keyword| normalized.contains(keyword))
    }
}

/// Evaluated top to bottom; the first matching rule wins. Tracking sits above
/// inquiry, so "status of the price" is a tracking request.
const RULES: &[IntentRule] = &[
    IntentRule {
        kind: IntentKind::Greeting,
        contains_any: &[],
        equals_any: &["hi", "hello", "hy", "hey", "hyy", "hlo", "hola", "start"],
    },
    IntentRule {
        kind: IntentKind::ListProducts,
        contains_any: &["list", "products", "have", "catalogue"],
        equals_any: &[],
    },
    IntentRule {
        kind: IntentKind::PlaceOrder,
        contains_any: &["buy", "need one", "want", "book"],
        equals_any: &["order one"],
    },
    IntentRule {
        kind: IntentKind::OrderTracking,
        contains_any: &["track", "status", "where is"],
        equals_any: &[],
    },
    IntentRule {
        kind: IntentKind::ProductInquiry,
        contains_any: &["price", "available", "hai kya", "cost", "stock"],
        equals_any: &[],
    },
];

pub fn normalize(text: &str) -> String {
    text.to_lowercase().trim().to_owned()
}

pub fn classify(text: &str) -> Intent {
    let normalized = normalize(text);
    let kind = RULES
        .iter()
        .find(|rule| rule.matches(&normalized))
        .map(|rule| rule.kind)
        .unwrap_or(IntentKind::Unknown);

    match kind {
        IntentKind::Greeting => Intent::Greeting,
        IntentKind::ListProducts => Intent::ListProducts,
        IntentKind::PlaceOrder => Intent::PlaceOrder,
        IntentKind::OrderTracking => Intent::OrderTracking,
        IntentKind::ProductInquiry => {
            Intent::ProductInquiry { product_query: extract_product_query(text) }
        }
        IntentKind::Unknown => Intent::Unknown,
    }
}

fn stop_word_regex() -> &'static Regex {
    static STOP_WORD_RE: OnceLock<Regex> = OnceLock::new();
    STOP_WORD_RE.get_or_init(|| {
        Regex::new(r"(?i)price|available|hai kya|cost|stock|please|tell|me|the|for|is|of|what|are")
            .expect("stop word regex must compile")
    })
}

/// Strips inquiry keywords and filler from the original text.
///
/// Removal is by substring, not by word: "theme" loses both "the" and "me".
pub fn extract_product_query(text: &str) -> String {
    stop_word_regex().replace_all(text, "").trim().to_owned()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{classify, extract_product_query, InboundBody, Intent, IntentKind};

    #[test]
    fn greeting_is_exact_and_case_insensitive() {
        assert_eq!(classify("HI"), Intent::Greeting);
        assert_eq!(classify("  hi  "), Intent::Greeting);
        assert_eq!(classify("Hola"), Intent::Greeting);
        assert_ne!(classify("history").kind(), IntentKind::Greeting);
        assert_ne!(classify("hi there").kind(), IntentKind::Greeting);
    }

    #[test]
    fn listing_keywords_win_over_later_rules() {
        assert_eq!(classify("Show me the catalogue"), Intent::ListProducts);
        assert_eq!(classify("what do you have in stock"), Intent::ListProducts);
        assert_eq!(classify("List all products"), Intent::ListProducts);
    }

    #[test]
    fn order_rule_accepts_keywords_and_exact_phrase() {
        assert_eq!(classify("I want to buy the lipstick"), Intent::PlaceOrder);
        assert_eq!(classify("Buy now"), Intent::PlaceOrder);
        assert_eq!(classify("Order one"), Intent::PlaceOrder);
        assert_eq!(classify("order one more please").kind(), IntentKind::Unknown);
    }

    #[test]
    fn tracking_precedes_product_inquiry() {
        assert_eq!(classify("what is the status of the price"), Intent::OrderTracking);
        assert_eq!(classify("Where is my parcel"), Intent::OrderTracking);
        assert_eq!(classify("track #ORD-1234"), Intent::OrderTracking);
    }

    #[test]
    fn inquiry_extracts_query_from_original_text() {
        assert_eq!(
            classify("price of red lipstick"),
            Intent::ProductInquiry { product_query: "red lipstick".to_owned() }
        );
        assert_eq!(
            classify("Blue Eyeliner available?"),
            Intent::ProductInquiry { product_query: "Blue Eyeliner ?".to_owned() }
        );
        assert_eq!(
            classify("Foundation hai kya"),
            Intent::ProductInquiry { product_query: "Foundation".to_owned() }
        );
    }

    #[test]
    fn stop_words_are_removed_as_substrings() {
        assert_eq!(extract_product_query("PRICE of theme"), "");
        assert_eq!(extract_product_query("cost"), "");
        assert_eq!(extract_product_query("stock x"), "x");
    }

    #[test]
    fn anything_else_is_unknown() {
        assert_eq!(classify("xyz"), Intent::Unknown);
        assert_eq!(classify(""), Intent::Unknown);
        assert_eq!(classify("🙂🙂🙂"), Intent::Unknown);
        assert_eq!(classify(&"a".repeat(10_000)), Intent::Unknown);
    }

    #[test]
    fn inbound_bodies_are_coerced_to_text() {
        assert_eq!(InboundBody::from("hi").into_text(), "hi");
        assert_eq!(InboundBody::from(json!(null)).into_text(), "");
        assert_eq!(InboundBody::from(json!(42)).into_text(), "42");
        assert_eq!(InboundBody::from(json!({ "a": 1 })).into_text(), r#"{"a":1}"#);
        assert!(InboundBody::from(json!("text")).is_text());
        assert!(!InboundBody::from(json!([1, 2])).is_text());
    }
}
