use crate::session::{ArchivedSession, Message};
use async_trait::async_trait;

/// Failures of the remote tier.
///
/// The controller swallows all of these after logging: the local cache is
/// the source of truth for the active session and remote archival is
/// best-effort. `Decode` is only ever per-item: one undecodable archived
/// session never fails a whole `list`.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("remote archive unavailable: {0}")]
    Unavailable(String),

    #[error("session {0} not found in archive")]
    NotFound(String),

    #[error("decoding archived session {id}: {reason}")]
    Decode { id: String, reason: String },
}

/// Multi-session remote archive: create/update/list on session documents.
///
/// Each document holds the full message sequence plus a creation timestamp
/// set once at first persistence. `list` imposes no order guarantee beyond
/// whatever the backing store returns.
#[async_trait]
pub trait RemoteArchive: Send + Sync {
    /// Backend name
    fn name(&self) -> &str;

    /// Create a new session document and return its unique id.
    ///
    /// Callers must not already hold a bound id for this logical session.
    async fn create(
        &self,
        messages: &[Message],
        created_at: &str,
    ) -> Result<String, ArchiveError>;

    /// Overwrite the message sequence of an existing session document.
    async fn update(&self, id: &str, messages: &[Message]) -> Result<(), ArchiveError>;

    /// List all sessions visible to the authenticated identity.
    async fn list(&self) -> Result<Vec<ArchivedSession>, ArchiveError>;
}
