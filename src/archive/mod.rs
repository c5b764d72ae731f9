pub mod appwrite;
pub mod memory;
pub mod traits;

pub use appwrite::AppwriteArchive;
pub use memory::MemoryArchive;
pub use traits::{ArchiveError, RemoteArchive};

use crate::config::Config;

/// Factory: create the right archive backend from config
pub fn create_archive(config: &Config) -> Box<dyn RemoteArchive> {
    match config.archive.backend.as_str() {
        "appwrite" => Box::new(AppwriteArchive::new(
            &config.archive.endpoint,
            &config.archive.project_id,
            &config.archive.database_id,
            &config.archive.collection_id,
            config.archive.api_key.as_deref(),
        )),
        "memory" => Box::new(MemoryArchive::new()),
        other => {
            tracing::warn!("Unknown archive backend '{other}', falling back to memory");
            Box::new(MemoryArchive::new())
        }
    }
}
