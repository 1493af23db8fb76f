use super::TransportError;
use duel_core::Handle;
use duel_records::Channel;

/// Outgoing chat delivery. Fire-and-forget: a failure is logged by the
/// caller and never rolls back the transition that produced the message.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, channel: &Handle<Channel>, text: &str) -> Result<(), TransportError>;
}
