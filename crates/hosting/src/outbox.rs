use duel_core::Handle;
use duel_matchroom::Transport;
use duel_matchroom::TransportError;
use duel_records::Channel;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Chat transport that queues messages per channel until the chat
/// bridge collects them.
#[derive(Debug, Default)]
pub struct Outbox {
    queues: Mutex<HashMap<Handle<Channel>, Vec<String>>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }
    /// Takes every message queued for a channel, oldest first.
    pub async fn drain(&self, channel: &Handle<Channel>) -> Vec<String> {
        self.queues.lock().await.remove(channel).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl Transport for Outbox {
    async fn send(&self, channel: &Handle<Channel>, text: &str) -> Result<(), TransportError> {
        if text.is_empty() {
            return Err(TransportError::Failed(String::from("refusing to send an empty message")));
        }
        self.queues
            .lock()
            .await
            .entry(channel.clone())
            .or_default()
            .push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drains_in_order_per_channel() {
        let outbox = Outbox::new();
        let a = Handle::from("a");
        let b = Handle::from("b");
        outbox.send(&a, "one").await.unwrap();
        outbox.send(&b, "other").await.unwrap();
        outbox.send(&a, "two").await.unwrap();
        assert_eq!(outbox.drain(&a).await, vec!["one", "two"]);
        assert!(outbox.drain(&a).await.is_empty());
        assert_eq!(outbox.drain(&b).await, vec!["other"]);
    }
    #[tokio::test]
    async fn empty_messages_fail() {
        let outbox = Outbox::new();
        assert!(outbox.send(&Handle::from("a"), "").await.is_err());
    }
}
