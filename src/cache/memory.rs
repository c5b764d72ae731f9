use super::traits::LocalCache;
use crate::session::Message;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

/// In-process cache backend.
///
/// Used when on-disk persistence is disabled and throughout the test suite.
/// Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryCache {
    slot: Mutex<Option<Vec<Message>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalCache for MemoryCache {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self) -> Result<Option<Vec<Message>>> {
        let guard = self
            .slot
            .lock()
            .map_err(|e| anyhow::anyhow!("cache lock poisoned: {e}"))?;
        Ok(guard.clone())
    }

    async fn save(&self, messages: &[Message]) -> Result<()> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|e| anyhow::anyhow!("cache lock poisoned: {e}"))?;
        *guard = Some(messages.to_vec());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|e| anyhow::anyhow!("cache lock poisoned: {e}"))?;
        *guard = None;
        Ok(())
    }
}
