//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\songbook\config.toml
//! - macOS: ~/Library/Application Support/songbook/config.toml
//! - Linux: ~/.config/songbook/config.toml
//!
//! Every section has defaults, so a partial (or missing) file is fine.
//! Command-line flags override what the file says.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::catalog::EnrichmentFailurePolicy;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database settings
    pub database: DatabaseConfig,

    /// Metadata provider settings
    pub provider: ProviderConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Database settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file (None = `songbook.db` in the working directory)
    pub path: Option<PathBuf>,

    /// Pool size
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_connections: 5,
        }
    }
}

/// Metadata provider settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Endpoint queried with `group` and `song` parameters (None = enrichment disabled)
    pub base_url: Option<String>,

    /// Upper bound for one lookup, connect through body
    pub timeout_secs: u64,

    /// Upper bound for establishing the connection
    pub connect_timeout_secs: u64,

    /// What a failed lookup does to song creation
    pub failure_policy: EnrichmentFailurePolicy,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 5,
            connect_timeout_secs: 2,
            failure_policy: EnrichmentFailurePolicy::NonBlocking,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for the `songbook` target when RUST_LOG is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("songbook"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if the file doesn't exist or can't be parsed.
pub fn load() -> Config {
    match config_path() {
        Some(path) => load_from(&path),
        None => {
            tracing::warn!("Could not determine config directory, using defaults");
            Config::default()
        }
    }
}

/// Load configuration from an explicit path
///
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match parse(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Parse configuration from TOML text
pub fn parse(contents: &str) -> Result<Config, ConfigError> {
    toml::from_str(contents).map_err(ConfigError::Parse)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(toml::de::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database.max_connections, 5);
        assert!(config.provider.base_url.is_none());
        assert_eq!(config.provider.timeout_secs, 5);
        assert_eq!(
            config.provider.failure_policy,
            EnrichmentFailurePolicy::NonBlocking
        );
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[provider]
base_url = "http://localhost:8081/info"
failure_policy = "blocking"
"#;
        let config = parse(toml).unwrap();

        assert_eq!(
            config.provider.base_url.as_deref(),
            Some("http://localhost:8081/info")
        );
        assert_eq!(
            config.provider.failure_policy,
            EnrichmentFailurePolicy::Blocking
        );
        // Other fields use defaults
        assert_eq!(config.provider.timeout_secs, 5);
        assert!(config.database.path.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_policy_is_an_error() {
        let toml = r#"
[provider]
failure_policy = "sometimes"
"#;
        assert!(parse(toml).is_err());
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("nope.toml"));
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[database]\npath = \"/tmp/songs.db\"\nmax_connections = 2\n",
        )
        .unwrap();

        let config = load_from(&path);
        assert_eq!(config.database.path, Some(PathBuf::from("/tmp/songs.db")));
        assert_eq!(config.database.max_connections, 2);
    }
}
