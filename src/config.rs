//! Crate configuration: TOML file under `~/.talkback/`, env overrides on top.

use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (cache file lives here) - computed from home, not serialized
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    pub api_key: Option<String>,
    pub default_provider: String,
    pub default_model: String,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub archive: ArchiveConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// "file" (default) or "memory"
    pub backend: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// "appwrite" or "memory" (default until an endpoint is configured)
    pub backend: String,
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::new(),
            config_path: PathBuf::new(),
            api_key: None,
            default_provider: "gemini".into(),
            default_model: "gemini-2.0-flash".into(),
            cache: CacheConfig::default(),
            archive: ArchiveConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: "file".into(),
        }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            backend: "memory".into(),
            endpoint: "https://cloud.appwrite.io/v1".into(),
            project_id: String::new(),
            database_id: String::new(),
            collection_id: String::new(),
            api_key: None,
        }
    }
}

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let talkback_dir = home.join(".talkback");
        let config_path = talkback_dir.join("config.toml");

        if !talkback_dir.exists() {
            fs::create_dir_all(&talkback_dir).context("Failed to create .talkback directory")?;
        }

        if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            // Set computed paths that are skipped during serialization
            config.config_path = config_path;
            config.data_dir = talkback_dir;
            config.apply_env_overrides();
            Ok(config)
        } else {
            let mut config = Config::default();
            config.config_path = config_path;
            config.data_dir = talkback_dir;
            config.save()?;
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        // API Key: TALKBACK_API_KEY or API_KEY (generic)
        if let Ok(key) = std::env::var("TALKBACK_API_KEY").or_else(|_| std::env::var("API_KEY")) {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }

        // Provider: TALKBACK_PROVIDER
        if let Ok(provider) = std::env::var("TALKBACK_PROVIDER") {
            if !provider.is_empty() {
                self.default_provider = provider;
            }
        }

        // Model: TALKBACK_MODEL
        if let Ok(model) = std::env::var("TALKBACK_MODEL") {
            if !model.is_empty() {
                self.default_model = model;
            }
        }

        // Data directory: TALKBACK_DATA_DIR
        if let Ok(dir) = std::env::var("TALKBACK_DATA_DIR") {
            if !dir.is_empty() {
                self.data_dir = PathBuf::from(dir);
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, contents).with_context(|| {
            format!("Failed to write config to {}", self.config_path.display())
        })?;
        Ok(())
    }
}
