use super::traits::LocalCache;
use crate::session::Message;

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};

const CACHE_FILE: &str = "chat_history.json";

/// File-backed cache holding exactly one conversation as a JSON array.
///
/// Every save rewrites the whole file via temp-file-then-rename, so a crash
/// mid-write never leaves a truncated cache behind.
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    /// Create a cache rooted at `dir`. The cache file is `dir/chat_history.json`.
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(CACHE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LocalCache for FileCache {
    fn name(&self) -> &str {
        "file"
    }

    async fn load(&self) -> Result<Option<Vec<Message>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("reading cache file {}", self.path.display()))?;
        let messages: Vec<Message> = serde_json::from_str(&data)
            .with_context(|| format!("parsing cache file {}", self.path.display()))?;
        Ok(Some(messages))
    }

    async fn save(&self, messages: &[Message]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating cache directory {}", parent.display()))?;
        }

        let data = serde_json::to_string(messages).context("serializing cached transcript")?;

        // Atomic write: temp file → rename
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, &data)
            .with_context(|| format!("writing temp file {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!("renaming {} to {}", tmp_path.display(), self.path.display())
        })?;

        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("removing cache file {}", self.path.display()))?;
        }
        Ok(())
    }
}
