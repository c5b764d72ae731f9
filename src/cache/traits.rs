use crate::session::Message;
use async_trait::async_trait;

/// Local durable cache for the single active conversation.
///
/// One fixed key: whatever was saved last is what `load` returns, regardless
/// of which session produced it. No versioning, no merge. This tier is the
/// availability guarantee for the current chat, so its failures are surfaced
/// rather than swallowed.
#[async_trait]
pub trait LocalCache: Send + Sync {
    /// Backend name
    fn name(&self) -> &str;

    /// Load the cached message sequence, or `None` if nothing is cached.
    async fn load(&self) -> anyhow::Result<Option<Vec<Message>>>;

    /// Overwrite the cached sequence wholesale.
    async fn save(&self, messages: &[Message]) -> anyhow::Result<()>;

    /// Remove the cached sequence.
    async fn clear(&self) -> anyhow::Result<()>;
}
