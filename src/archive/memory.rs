use super::traits::{ArchiveError, RemoteArchive};
use crate::session::{ArchivedSession, Message};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-process archive backend.
///
/// Drives the test suite and doubles as an offline backend when no remote
/// endpoint is configured. Ids are uuid v4, like the hosted backend.
#[derive(Debug, Default)]
pub struct MemoryArchive {
    sessions: Mutex<HashMap<String, ArchivedSession>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, ArchivedSession>>, ArchiveError> {
        self.sessions
            .lock()
            .map_err(|e| ArchiveError::Unavailable(format!("archive lock poisoned: {e}")))
    }
}

#[async_trait]
impl RemoteArchive for MemoryArchive {
    fn name(&self) -> &str {
        "memory"
    }

    async fn create(
        &self,
        messages: &[Message],
        created_at: &str,
    ) -> Result<String, ArchiveError> {
        let id = uuid::Uuid::new_v4().to_string();
        let mut guard = self.lock()?;
        guard.insert(
            id.clone(),
            ArchivedSession {
                id: id.clone(),
                messages: messages.to_vec(),
                created_at: created_at.to_string(),
            },
        );
        Ok(id)
    }

    async fn update(&self, id: &str, messages: &[Message]) -> Result<(), ArchiveError> {
        let mut guard = self.lock()?;
        let session = guard
            .get_mut(id)
            .ok_or_else(|| ArchiveError::NotFound(id.to_string()))?;
        session.messages = messages.to_vec();
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ArchivedSession>, ArchiveError> {
        let guard = self.lock()?;
        Ok(guard.values().cloned().collect())
    }
}
