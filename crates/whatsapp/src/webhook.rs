use autoflow_agent::{CapturingSender, InboundBody, IntentKind, ReplyEngine};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::events::{order_id_from_text, parse_upsert, InboundMessage};

/// Reply for one inbound message. The session gateway that posted the upsert
/// delivers it; nothing is sent from here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UpsertReply {
    pub message_id: Option<String>,
    pub recipient: String,
    pub intent: IntentKind,
    pub text: String,
}

/// Runs every chat message in a `messages.upsert` payload through the engine,
/// in payload order. Entries that carry no usable text produce no reply.
pub async fn dispatch_upsert(engine: &ReplyEngine, payload: &Value) -> Vec<UpsertReply> {
    let messages = parse_upsert(payload);
    debug!(
        event_name = "ingress.whatsapp.upsert_parsed",
        message_count = messages.len(),
        "parsed whatsapp upsert"
    );

    let mut replies = Vec::with_capacity(messages.len());
    for message in messages {
        replies.push(dispatch_one(engine, message).await);
    }
    replies
}

async fn dispatch_one(engine: &ReplyEngine, message: InboundMessage) -> UpsertReply {
    let InboundMessage { message_id, sender: from, text } = message;
    let correlation_id = message_id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
    let order_id = order_id_from_text(&text);
    info!(
        event_name = "ingress.whatsapp.message_received",
        correlation_id = %correlation_id,
        sender = %from,
        order_id = order_id.as_ref().map_or("unknown", |id| id.as_str()),
        "received whatsapp message"
    );

    let sender = CapturingSender::new();
    let intent = engine.handle_message(&sender, &from, InboundBody::Text(text)).await;
    let recipient = sender.recipient().await.unwrap_or(from);

    debug!(
        event_name = "ingress.whatsapp.message_handled",
        correlation_id = %correlation_id,
        intent = %intent.kind(),
        "whatsapp message handled"
    );

    UpsertReply { message_id, recipient, intent: intent.kind(), text: sender.reply().await }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use autoflow_agent::{IntentKind, ReplyEngine};
    use autoflow_core::config::AppConfig;
    use autoflow_sheets::{GatewaySettings, InMemorySheetSource, SheetsInventoryGateway};
    use serde_json::json;

    use super::dispatch_upsert;

    fn engine(source: InMemorySheetSource) -> ReplyEngine {
        let gateway = SheetsInventoryGateway::new(Arc::new(source), GatewaySettings::default());
        ReplyEngine::new(Arc::new(gateway), &AppConfig::default().engine)
    }

    #[tokio::test]
    async fn replies_to_each_inbound_message_in_order() {
        let payload = json!({
            "messages": [
                {
                    "key": { "remoteJid": "a@s.whatsapp.net", "id": "m1" },
                    "message": { "conversation": "hi" }
                },
                {
                    "key": { "remoteJid": "a@s.whatsapp.net", "fromMe": true, "id": "m2" },
                    "message": { "conversation": "echo" }
                },
                {
                    "key": { "remoteJid": "b@s.whatsapp.net", "id": "m3" },
                    "message": { "conversation": "price of blue eyeliner" }
                }
            ]
        });

        let replies = dispatch_upsert(&engine(InMemorySheetSource::demo()), &payload).await;

        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].message_id.as_deref(), Some("m1"));
        assert_eq!(replies[0].recipient, "a@s.whatsapp.net");
        assert_eq!(replies[0].intent, IntentKind::Greeting);
        assert!(replies[0].text.starts_with("🤖 AutoFlow AI System"));
        assert_eq!(replies[1].recipient, "b@s.whatsapp.net");
        assert!(replies[1].text.contains("Blue Eyeliner is available"));
    }

    #[tokio::test]
    async fn order_message_logs_to_the_orders_tab() {
        let source = InMemorySheetSource::demo();
        let payload = json!({
            "data": {
                "key": { "remoteJid": "c@s.whatsapp.net" },
                "message": { "conversation": "I want to buy" }
            }
        });

        let replies = dispatch_upsert(&engine(source.clone()), &payload).await;

        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].intent, IntentKind::PlaceOrder);
        let orders = source.rows("Orders").await;
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[1][1], json!("c@s.whatsapp.net"));
    }

    #[tokio::test]
    async fn payload_without_messages_yields_no_replies() {
        let replies =
            dispatch_upsert(&engine(InMemorySheetSource::demo()), &json!({ "type": "append" }))
                .await;

        assert!(replies.is_empty());
    }
}
