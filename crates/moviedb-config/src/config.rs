use crate::credentials::CredentialStore;
use moviedb_models::MediaType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_OMDB_BASE_URL: &str = "https://www.omdbapi.com/";
pub const DEFAULT_FAVORITES_KEY: &str = "moviedb-favorites";
pub const API_KEY_ENV: &str = "MOVIEDB_OMDB_API_KEY";
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("OMDb API key is not configured (run `moviedb config init` or set MOVIEDB_OMDB_API_KEY)")]
    MissingApiKey,
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Where a resolved API key was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    Environment,
    Credentials,
    Config,
}

impl ApiKeySource {
    pub fn label(&self) -> &'static str {
        match self {
            ApiKeySource::Environment => "environment",
            ApiKeySource::Credentials => "credentials file",
            ApiKeySource::Config => "config file",
        }
    }
}

impl fmt::Display for ApiKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbConfig {
    /// Prefer credentials.toml or the environment; kept here for single-file setups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Media type every title search is restricted to
    #[serde(default = "default_search_type")]
    pub search_type: MediaType,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Namespace key of the persisted favorites slot
    #[serde(default = "default_favorites_key")]
    pub favorites_key: String,
    /// Overrides the platform data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_OMDB_BASE_URL.to_string()
}

fn default_search_type() -> MediaType {
    MediaType::Movie
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("moviedb/{}", env!("CARGO_PKG_VERSION"))
}

fn default_favorites_key() -> String {
    DEFAULT_FAVORITES_KEY.to_string()
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            search_type: default_search_type(),
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            favorites_key: default_favorites_key(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, or defaults when it does not exist yet
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.omdb.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::Invalid("omdb.base_url cannot be empty".to_string()));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "omdb.base_url must be an http(s) URL, got '{}'",
                base_url
            )));
        }
        if self.omdb.timeout_seconds == 0 {
            return Err(ConfigError::Invalid("omdb.timeout_seconds must be positive".to_string()));
        }
        if self.storage.favorites_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.favorites_key cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Data directory for persisted state, honoring `storage.data_dir`
    pub fn data_dir(&self, default_dir: &Path) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(|| default_dir.to_path_buf())
    }

    /// API key lookup order: environment, credentials.toml, config.toml
    pub fn resolve_api_key(&self, credentials: &CredentialStore) -> Result<String, ConfigError> {
        self.resolve_api_key_with_source(credentials).map(|(_, key)| key)
    }

    /// Same lookup as `resolve_api_key`, also reporting where the key came from
    pub fn resolve_api_key_with_source(
        &self,
        credentials: &CredentialStore,
    ) -> Result<(ApiKeySource, String), ConfigError> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        pick_api_key(from_env, credentials.get_omdb_api_key().cloned(), self.omdb.api_key.clone())
    }
}

fn is_usable_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key != API_KEY_PLACEHOLDER
}

fn pick_api_key(
    from_env: Option<String>,
    from_credentials: Option<String>,
    from_config: Option<String>,
) -> Result<(ApiKeySource, String), ConfigError> {
    [
        (ApiKeySource::Environment, from_env),
        (ApiKeySource::Credentials, from_credentials),
        (ApiKeySource::Config, from_config),
    ]
    .into_iter()
    .filter_map(|(source, key)| key.map(|k| (source, k)))
    .find(|(_, key)| is_usable_key(key))
    .map(|(source, key)| (source, key.trim().to_string()))
    .ok_or(ConfigError::MissingApiKey)
}
