pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{ApiKeySource, Config, ConfigError, OmdbConfig, StorageConfig, API_KEY_ENV, API_KEY_PLACEHOLDER, DEFAULT_FAVORITES_KEY, DEFAULT_OMDB_BASE_URL};
pub use credentials::CredentialStore;
pub use paths::{PathManager, base_path_override};
