use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::runtime::ReplySender;

pub const NO_REPLY: &str = "No reply generated.";

/// Keeps the last reply instead of delivering it. Backs the simulation
/// endpoint and the `simulate` command.
#[derive(Debug, Default)]
pub struct CapturingSender {
    last: Mutex<Option<(String, String)>>,
}

impl CapturingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn recipient(&self) -> Option<String> {
        self.last.lock().await.as_ref().map(|(recipient, _)| recipient.clone())
    }

    /// Last captured text, or [`NO_REPLY`] when nothing was sent.
    pub async fn reply(&self) -> String {
        self.last
            .lock()
            .await
            .as_ref()
            .map(|(_, text)| text.clone())
            .unwrap_or_else(|| NO_REPLY.to_owned())
    }
}

#[async_trait]
impl ReplySender for CapturingSender {
    async fn send_text(&self, recipient: &str, text: &str) {
        *self.last.lock().await = Some((recipient.to_owned(), text.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::{CapturingSender, NO_REPLY};
    use crate::runtime::ReplySender;

    #[tokio::test]
    async fn reports_placeholder_until_something_is_sent() {
        let sender = CapturingSender::new();
        assert_eq!(sender.reply().await, NO_REPLY);
        assert_eq!(sender.recipient().await, None);

        sender.send_text("TestUser", "first").await;
        sender.send_text("TestUser", "second").await;

        assert_eq!(sender.reply().await, "second");
        assert_eq!(sender.recipient().await.as_deref(), Some("TestUser"));
    }
}
