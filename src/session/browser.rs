//! Past-session browsing: list the remote archive, hand a selection to the
//! controller. Holds no durable state of its own.

use super::controller::SessionController;
use super::types::ArchivedSession;
use crate::archive::{ArchiveError, RemoteArchive};

use std::sync::Arc;

pub struct SessionBrowser {
    archive: Arc<dyn RemoteArchive>,
}

impl SessionBrowser {
    pub fn new(archive: Arc<dyn RemoteArchive>) -> Self {
        Self { archive }
    }

    /// Fetch all archived sessions, newest first.
    ///
    /// The archive contract guarantees no order; the descending sort here is
    /// a display choice.
    pub async fn open(&self) -> Result<Vec<ArchivedSession>, ArchiveError> {
        let mut sessions = self.archive.list().await?;
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    /// Swap the active transcript to `session`. Returns whether the swap was
    /// applied (it is rejected while a submit is in flight).
    pub fn select(&self, controller: &SessionController, session: ArchivedSession) -> bool {
        controller.restore(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::MemoryArchive;
    use crate::session::Message;

    #[tokio::test]
    async fn open_sorts_newest_first() {
        let archive = Arc::new(MemoryArchive::new());
        archive
            .create(&[Message::user("oldest")], "2026-01-01T00:00:00Z")
            .await
            .unwrap();
        archive
            .create(&[Message::user("newest")], "2026-03-01T00:00:00Z")
            .await
            .unwrap();
        archive
            .create(&[Message::user("middle")], "2026-02-01T00:00:00Z")
            .await
            .unwrap();

        let browser = SessionBrowser::new(archive);
        let sessions = browser.open().await.unwrap();
        let stamps: Vec<&str> = sessions.iter().map(|s| s.created_at.as_str()).collect();
        assert_eq!(
            stamps,
            vec![
                "2026-03-01T00:00:00Z",
                "2026-02-01T00:00:00Z",
                "2026-01-01T00:00:00Z"
            ]
        );
    }

    #[tokio::test]
    async fn open_on_empty_archive_is_empty() {
        let browser = SessionBrowser::new(Arc::new(MemoryArchive::new()));
        assert!(browser.open().await.unwrap().is_empty());
    }
}
