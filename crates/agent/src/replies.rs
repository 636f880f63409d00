use autoflow_core::config::{AppConfig, EngineConfig};
use autoflow_core::domain::inventory::InventoryItem;
use autoflow_core::domain::order::OrderRecord;

pub const ORDER_FAILED: &str =
    "⚠️ Sorry, we couldn't place your order right now. Please try again later.";
pub const TRACKING_PROMPT: &str =
    "📦 To track your order, please send your Order ID (e.g. #ORD-123).";
pub const MISSING_PRODUCT_NAME: &str = "Please type the product name.";
pub const FALLBACK: &str = "🤖 I didn't understand. Try:\n- List products\n- Track order";

/// Customer-facing reply texts, parameterized by brand and currency.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyTemplates {
    brand_name: String,
    currency_symbol: String,
}

impl Default for ReplyTemplates {
    fn default() -> Self {
        Self::from(&AppConfig::default().engine)
    }
}

impl From<&EngineConfig> for ReplyTemplates {
    fn from(config: &EngineConfig) -> Self {
        Self {
            brand_name: config.brand_name.clone(),
            currency_symbol: config.currency_symbol.clone(),
        }
    }
}

impl ReplyTemplates {
    pub fn greeting(&self) -> String {
        format!(
            "🤖 {} System\n\n- List all products\n- Track order\n- Show me what’s available in your stock",
            self.brand_name
        )
    }

    pub fn catalog(&self, listing: &str) -> String {
        format!(
            "📋 *Here is our Product List:*\n\n{listing}\n\nReply with a product name to check stock!"
        )
    }

    pub fn order_placed(&self, order: &OrderRecord) -> String {
        format!(
            "✅ Order Placed Successfully!\n\n🔹 **Order ID:** {}\n📦 Status: {}\n💵 Total: {}{}\n\n\
             We will contact you shortly for address confirmation.",
            order.order_id,
            order.status.as_str(),
            self.currency_symbol,
            order.total,
        )
    }

    pub fn order_failed(&self) -> String {
        ORDER_FAILED.to_owned()
    }

    pub fn product_available(&self, item: &InventoryItem) -> String {
        format!(
            "✅ Yes! {} is available.\n💵 Price: {}{}\n📦 Stock: {} units.\n\nType \"Buy now\" to order!",
            item.product,
            self.currency_symbol,
            item.display_price(),
            item.stock,
        )
    }

    pub fn out_of_stock(&self, item: &InventoryItem) -> String {
        format!("❌ Sorry, {} is currently out of stock.", item.product)
    }

    pub fn not_found(&self, query: &str) -> String {
        format!("❓ I couldn't find \"{query}\". Try asking \"List products\" to see what we have.")
    }

    pub fn missing_product_name(&self) -> String {
        MISSING_PRODUCT_NAME.to_owned()
    }

    pub fn tracking_prompt(&self) -> String {
        TRACKING_PROMPT.to_owned()
    }

    pub fn fallback(&self) -> String {
        FALLBACK.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use autoflow_core::config::EngineConfig;
    use autoflow_core::domain::inventory::InventoryItem;
    use autoflow_core::domain::order::OrderRecord;
    use rust_decimal::Decimal;

    use super::ReplyTemplates;

    #[test]
    fn greeting_carries_brand_name() {
        let templates = ReplyTemplates::from(&EngineConfig {
            brand_name: "Glow Store".to_owned(),
            currency_symbol: "$".to_owned(),
        });

        assert!(templates.greeting().starts_with("🤖 Glow Store System\n\n- List all products"));
    }

    #[test]
    fn order_confirmation_renders_placeholder_total_with_two_decimals() {
        let order = OrderRecord::from_chat("user@s.whatsapp.net");
        let reply = ReplyTemplates::default().order_placed(&order);

        assert!(reply.contains(&format!("**Order ID:** {}", order.order_id)));
        assert!(reply.contains("📦 Status: Pending"));
        assert!(reply.contains("💵 Total: ₹99.00"));
        assert!(reply.ends_with("We will contact you shortly for address confirmation."));
    }

    #[test]
    fn availability_reply_drops_trailing_price_zeros() {
        let item = InventoryItem {
            id: "P-101".to_owned(),
            product: "Red Lipstick".to_owned(),
            stock: 15,
            price: Decimal::new(29900, 2),
        };

        assert_eq!(
            ReplyTemplates::default().product_available(&item),
            "✅ Yes! Red Lipstick is available.\n💵 Price: ₹299\n📦 Stock: 15 units.\n\n\
             Type \"Buy now\" to order!"
        );
    }
}
