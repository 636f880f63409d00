use std::sync::Arc;

use async_trait::async_trait;
use autoflow_core::config::EngineConfig;
use autoflow_core::domain::inventory::ProductLookup;
use autoflow_core::domain::order::OrderRecord;
use autoflow_core::gateway::InventoryGateway;
use tracing::{debug, info, warn};

use crate::intent::{classify, InboundBody, Intent};
use crate::replies::ReplyTemplates;

/// Outbound half of a chat channel.
///
/// Delivery is fire-and-forget from the engine's point of view: implementations
/// report their own failures.
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn send_text(&self, recipient: &str, text: &str);
}

/// Stateless intent router. Every call classifies one message, runs at most one
/// gateway operation and sends exactly one reply.
#[derive(Clone)]
pub struct ReplyEngine {
    gateway: Arc<dyn InventoryGateway>,
    templates: ReplyTemplates,
}

impl ReplyEngine {
    pub fn new(gateway: Arc<dyn InventoryGateway>, config: &EngineConfig) -> Self {
        Self { gateway, templates: ReplyTemplates::from(config) }
    }

    pub async fn handle_message(
        &self,
        sender: &dyn ReplySender,
        recipient: &str,
        raw: InboundBody,
    ) -> Intent {
        if !raw.is_text() {
            warn!(
                event_name = "engine.message.coerced",
                sender = %recipient,
                "non-text payload coerced to text"
            );
        }
        let text = raw.into_text();
        let intent = classify(&text);
        info!(
            event_name = "engine.message.classified",
            sender = %recipient,
            intent = %intent.kind(),
            "message classified"
        );

        let reply = self.reply_for(&intent, recipient).await;
        sender.send_text(recipient, &reply).await;
        debug!(
            event_name = "engine.reply.sent",
            sender = %recipient,
            intent = %intent.kind(),
            reply_chars = reply.chars().count(),
            "reply handed to sender"
        );

        intent
    }

    async fn reply_for(&self, intent: &Intent, recipient: &str) -> String {
        match intent {
            Intent::Greeting => self.templates.greeting(),
            Intent::ListProducts => {
                let listing = self.gateway.list_formatted().await;
                self.templates.catalog(&listing)
            }
            Intent::PlaceOrder => self.place_order(recipient).await,
            Intent::OrderTracking => self.templates.tracking_prompt(),
            Intent::ProductInquiry { product_query } => self.product_inquiry(product_query).await,
            Intent::Unknown => self.templates.fallback(),
        }
    }

    async fn place_order(&self, recipient: &str) -> String {
        let order = OrderRecord::from_chat(recipient);
        info!(
            event_name = "engine.order.placing",
            sender = %recipient,
            order_id = %order.order_id,
            "logging chat order"
        );

        if self.gateway.log_order(&order).await {
            self.templates.order_placed(&order)
        } else {
            self.templates.order_failed()
        }
    }

    async fn product_inquiry(&self, product_query: &str) -> String {
        match self.gateway.lookup(product_query).await {
            ProductLookup::Found(item) if item.in_stock() => {
                self.templates.product_available(&item)
            }
            ProductLookup::Found(item) => self.templates.out_of_stock(&item),
            ProductLookup::NotFound if product_query.chars().count() > 1 => {
                self.templates.not_found(product_query)
            }
            ProductLookup::NotFound => self.templates.missing_product_name(),
        }
    }
}
