pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileCache;
pub use memory::MemoryCache;
pub use traits::LocalCache;

use crate::config::Config;

/// Factory: create the right cache backend from config
pub fn create_cache(config: &Config) -> Box<dyn LocalCache> {
    match config.cache.backend.as_str() {
        "file" => Box::new(FileCache::new(&config.data_dir)),
        "memory" => Box::new(MemoryCache::new()),
        other => {
            tracing::warn!("Unknown cache backend '{other}', falling back to file");
            Box::new(FileCache::new(&config.data_dir))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_with_backend(dir: &TempDir, backend: &str) -> Config {
        let mut cfg = Config::default();
        cfg.data_dir = dir.path().to_path_buf();
        cfg.cache.backend = backend.into();
        cfg
    }

    #[test]
    fn factory_file() {
        let tmp = TempDir::new().unwrap();
        let cache = create_cache(&config_with_backend(&tmp, "file"));
        assert_eq!(cache.name(), "file");
    }

    #[test]
    fn factory_memory() {
        let tmp = TempDir::new().unwrap();
        let cache = create_cache(&config_with_backend(&tmp, "memory"));
        assert_eq!(cache.name(), "memory");
    }

    #[test]
    fn factory_unknown_falls_back_to_file() {
        let tmp = TempDir::new().unwrap();
        let cache = create_cache(&config_with_backend(&tmp, "redis"));
        assert_eq!(cache.name(), "file");
    }
}
