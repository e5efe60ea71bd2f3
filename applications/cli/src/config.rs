/// CLI configuration
use crate::error::{CliError, Result};
use encore_catalog::CatalogConfig;
use encore_playback::{LoopMode, PlaybackConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EncoreConfig {
    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_catalog")]
    pub catalog: CatalogSettings,

    #[serde(default = "default_player")]
    pub player: PlayerSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerSettings {
    #[serde(default = "default_user_id")]
    pub user_id: String,

    #[serde(default)]
    pub loop_mode: LoopMode,

    #[serde(default)]
    pub shuffle: bool,

    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl EncoreConfig {
    /// Load configuration from file and environment.
    ///
    /// An explicit `path` must exist; otherwise `encore.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                let default_path = PathBuf::from("encore.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (ENCORE_STORAGE__DATABASE_URL, ...)
        settings = settings.add_source(
            config::Environment::with_prefix("ENCORE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        settings
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Parse configuration from TOML text, without environment overrides
    pub fn from_toml(text: &str) -> Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_url.trim().is_empty() {
            return Err(CliError::Config(
                "database URL is required (set ENCORE_STORAGE__DATABASE_URL)".to_string(),
            ));
        }

        let base_url = self.catalog.base_url.trim();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CliError::Config(format!(
                "catalog URL must be http(s), got {:?}",
                self.catalog.base_url
            )));
        }

        if self.catalog.timeout_secs == 0 {
            return Err(CliError::Config("catalog timeout must be positive".to_string()));
        }

        if self.player.user_id.trim().is_empty() {
            return Err(CliError::Config("player user id cannot be empty".to_string()));
        }

        if self.player.history_limit == 0 {
            return Err(CliError::Config("history limit must be positive".to_string()));
        }

        Ok(())
    }

    pub fn catalog_config(&self) -> CatalogConfig {
        let mut config = CatalogConfig::new(self.catalog.base_url.clone())
            .with_timeout(Duration::from_secs(self.catalog.timeout_secs));
        if let Some(key) = &self.catalog.api_key {
            config = config.with_api_key(key.clone());
        }
        config
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            loop_mode: self.player.loop_mode,
            shuffle: self.player.shuffle,
        }
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/encore.db".to_string()
}

fn default_catalog() -> CatalogSettings {
    CatalogSettings {
        base_url: default_base_url(),
        timeout_secs: default_timeout_secs(),
        api_key: None,
    }
}

fn default_base_url() -> String {
    "https://api.deezer.com".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_player() -> PlayerSettings {
    PlayerSettings {
        user_id: default_user_id(),
        loop_mode: LoopMode::Off,
        shuffle: false,
        history_limit: default_history_limit(),
    }
}

fn default_user_id() -> String {
    "local".to_string()
}

fn default_history_limit() -> usize {
    50
}

impl Default for EncoreConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            catalog: default_catalog(),
            player: default_player(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = EncoreConfig::from_toml("").unwrap();
        assert_eq!(config.storage.database_url, "sqlite://./data/encore.db");
        assert_eq!(config.catalog.base_url, "https://api.deezer.com");
        assert_eq!(config.catalog.timeout_secs, 15);
        assert_eq!(config.player.user_id, "local");
        assert_eq!(config.player.history_limit, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = EncoreConfig::from_toml(
            r#"
            [player]
            loop_mode = "all"
            shuffle = true

            [catalog]
            api_key = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.player.loop_mode, LoopMode::All);
        assert!(config.player.shuffle);
        assert_eq!(config.player.user_id, "local");
        assert_eq!(config.catalog.api_key.as_deref(), Some("secret"));
        assert_eq!(config.catalog.base_url, "https://api.deezer.com");

        let playback = config.playback_config();
        assert_eq!(playback.loop_mode, LoopMode::All);
        assert!(playback.shuffle);
    }

    #[test]
    fn unknown_loop_mode_is_rejected() {
        let result = EncoreConfig::from_toml("[player]\nloop_mode = \"sometimes\"");
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = EncoreConfig::default();
        config.catalog.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = EncoreConfig::default();
        config.player.history_limit = 0;
        assert!(config.validate().is_err());

        let mut config = EncoreConfig::default();
        config.catalog.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
