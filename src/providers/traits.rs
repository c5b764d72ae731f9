use crate::session::Message;
use async_trait::async_trait;

/// External text-generation call supplying the next bot turn.
///
/// One complete reply per submitted message: no retries, no streaming, no
/// batching. The full transcript is passed in; how much of it the provider
/// actually uses is provider-defined.
#[async_trait]
pub trait ResponseProvider: Send + Sync {
    async fn reply(&self, transcript: &[Message]) -> anyhow::Result<String>;
}
