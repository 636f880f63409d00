use autoflow_core::domain::order::OrderId;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Text message addressed to the bot, already stripped of transport noise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage {
    pub message_id: Option<String>,
    pub sender: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    key: WireKey,
    #[serde(default)]
    message: Option<WireContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireKey {
    #[serde(default)]
    remote_jid: Option<String>,
    #[serde(default)]
    from_me: bool,
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireContent {
    #[serde(default)]
    conversation: Option<String>,
    #[serde(default)]
    extended_text_message: Option<ExtendedText>,
    #[serde(default)]
    image_message: Option<ImageMessage>,
}

#[derive(Debug, Deserialize)]
struct ExtendedText {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageMessage {
    #[serde(default)]
    caption: Option<String>,
}

impl WireContent {
    /// Plain text first, then quoted/linked text, then an image caption.
    fn text(self) -> Option<String> {
        let extended = self.extended_text_message.and_then(|body| body.text);
        let caption = self.image_message.and_then(|image| image.caption);
        [self.conversation, extended, caption]
            .into_iter()
            .flatten()
            .find(|candidate| !candidate.trim().is_empty())
    }
}

/// Extracts chat messages from a `messages.upsert` style payload.
///
/// Accepts `{"messages": [...]}`, `{"data": [...]}` and `{"data": {...}}`.
/// Messages sent by the bot itself, messages without content and messages
/// with no text are dropped.
pub fn parse_upsert(payload: &Value) -> Vec<InboundMessage> {
    let entries: Vec<&Value> = match (payload.get("messages"), payload.get("data")) {
        (Some(Value::Array(messages)), _) => messages.iter().collect(),
        (_, Some(Value::Array(messages))) => messages.iter().collect(),
        (_, Some(message @ Value::Object(_))) => vec![message],
        _ => Vec::new(),
    };

    entries.into_iter().filter_map(inbound_from_value).collect()
}

fn inbound_from_value(value: &Value) -> Option<InboundMessage> {
    let wire = match WireMessage::deserialize(value) {
        Ok(wire) => wire,
        Err(error) => {
            debug!(error = %error, "skipping undecodable upsert entry");
            return None;
        }
    };
    if wire.key.from_me {
        return None;
    }

    let sender = wire.key.remote_jid.filter(|jid| !jid.is_empty())?;
    let text = wire.message?.text()?;
    Some(InboundMessage { message_id: wire.key.id, sender, text })
}

/// First whitespace token that parses as an [`OrderId`], ignoring surrounding
/// punctuation.
pub fn order_id_from_text(text: &str) -> Option<OrderId> {
    text.split_whitespace().find_map(|token| {
        let candidate =
            token.trim_matches(|ch: char| !ch.is_ascii_alphanumeric() && ch != '-' && ch != '#');
        OrderId::parse(candidate).ok()
    })
}
