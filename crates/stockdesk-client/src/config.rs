//! # Client Configuration
//!
//! Where the backend lives and how the client behaves.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOCKDESK_API_URL=https://dashboard.example.id/api                 │
//! │     STOCKDESK_TIMEOUT_SECS=15                                          │
//! │     STOCKDESK_TOKEN_PATH=/run/stockdesk/token                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/stockdesk/stockdesk.toml (Linux)                         │
//! │     ~/Library/Application Support/id.stockdesk.stockdesk/ (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8000/api, 30s timeout, 60s list cache             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # stockdesk.toml
//! [api]
//! url = "http://localhost:8000/api"
//! timeout_secs = 30
//!
//! [cache]
//! ttl_secs = 60
//!
//! [auth]
//! token_path = "/home/kasir/.local/share/stockdesk/token"
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
const CONFIG_FILE_NAME: &str = "stockdesk.toml";
const TOKEN_FILE_NAME: &str = "token";

// =============================================================================
// Sections
// =============================================================================

/// Backend location and request behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    #[serde(default = "default_api_url")]
    pub url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// List cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSection {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

fn default_cache_ttl() -> u64 {
    60
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
        }
    }
}

/// Where the bearer token is persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSection {
    /// Explicit token file. `None` means the platform data directory.
    #[serde(default)]
    pub token_path: Option<PathBuf>,
}

// =============================================================================
// Client Config
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSection,

    #[serde(default)]
    pub cache: CacheSection,

    #[serde(default)]
    pub auth: AuthSection,
}

impl ClientConfig {
    /// Loads configuration from file and environment.
    ///
    /// An explicit `config_path` wins over the platform config directory.
    /// A missing file is not an error.
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| ClientError::ConfigLoadFailed(format!("{}: {}", path.display(), e)))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.api.url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// TTL for cached lists.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    /// Base URL with a trailing slash so relative joins keep the `/api` prefix.
    pub fn base_url(&self) -> ClientResult<Url> {
        let mut raw = self.api.url.trim_end_matches('/').to_string();
        raw.push('/');
        Ok(Url::parse(&raw)?)
    }

    /// Resolved token file: explicit path, else the platform data directory.
    pub fn token_path(&self) -> Option<PathBuf> {
        self.auth.token_path.clone().or_else(|| {
            ProjectDirs::from("id", "stockdesk", "stockdesk")
                .map(|dirs| dirs.data_dir().join(TOKEN_FILE_NAME))
        })
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("STOCKDESK_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.url = url;
        }

        if let Some(secs) = lookup("STOCKDESK_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(secs) => {
                    debug!(secs, "Overriding request timeout from environment");
                    self.api.timeout_secs = secs;
                }
                Err(_) => warn!(value = %secs, "Ignoring non-numeric STOCKDESK_TIMEOUT_SECS"),
            }
        }

        if let Some(path) = lookup("STOCKDESK_TOKEN_PATH") {
            debug!(path = %path, "Overriding token path from environment");
            self.auth.token_path = Some(PathBuf::from(path));
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("id", "stockdesk", "stockdesk")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api.url, DEFAULT_API_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_keeps_prefix() {
        let config = ClientConfig::default();
        let base = config.base_url().unwrap();
        assert_eq!(base.join("login").unwrap().as_str(), "http://localhost:8000/api/login");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockdesk.toml");
        std::fs::write(
            &path,
            "[api]\nurl = \"https://dashboard.example.id/api\"\n\n[cache]\nttl_secs = 5\n",
        )
        .unwrap();

        let config = ClientConfig::load(Some(path)).unwrap();
        assert_eq!(config.api.url, "https://dashboard.example.id/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.cache.ttl_secs, 5);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("STOCKDESK_API_URL", "https://pos.example.id/api"),
            ("STOCKDESK_TIMEOUT_SECS", "nope"),
            ("STOCKDESK_TOKEN_PATH", "/tmp/stockdesk-token"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.url, "https://pos.example.id/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.token_path(), Some(PathBuf::from("/tmp/stockdesk-token")));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = ClientConfig::default();
        config.api.url = "ftp://files.example.id".into();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        let mut config = ClientConfig::default();
        config.api.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ClientError::InvalidConfig(_))));
    }
}
