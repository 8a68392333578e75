pub mod browse;
pub mod config;
pub mod favorites;
pub mod movie;
pub mod prompts;
pub mod search;
pub mod ui;

use color_eyre::Result;
use moviedb_config::{Config, CredentialStore, PathManager};
use moviedb_core::{FavoritesStore, Session};
use moviedb_sources::OmdbClient;
use std::sync::Arc;
use std::time::Duration;

/// Loaded configuration plus the directory layout it came from
pub struct AppContext {
    pub path_manager: PathManager,
    pub config: Config,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let path_manager = PathManager::default();
        let config_file = path_manager.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;

        Ok(Self { path_manager, config })
    }

    pub fn open_favorites(&self) -> Result<FavoritesStore> {
        FavoritesStore::open(&self.config, &self.path_manager)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to open favorites storage: {}", e))
    }

    pub fn api_key(&self) -> Result<String> {
        let mut credentials = CredentialStore::new(self.path_manager.credentials_file());
        credentials
            .load()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials: {}", e))?;

        self.config
            .resolve_api_key(&credentials)
            .map_err(|e| color_eyre::eyre::eyre!("{}", e))
    }

    pub fn omdb_client(&self) -> Result<OmdbClient> {
        let api_key = self.api_key()?;
        tracing::debug!(
            base_url = %self.config.omdb.base_url,
            timeout = ?Duration::from_secs(self.config.omdb.timeout_seconds),
            "Creating OMDb client"
        );
        Ok(OmdbClient::from_config(&self.config.omdb, api_key))
    }

    /// Session backed by the OMDb client and the file-backed favorites store
    pub fn open_session(&self) -> Result<Session> {
        let client = self.omdb_client()?;
        let favorites = self.open_favorites()?;
        Ok(Session::new(Arc::new(client), favorites))
    }
}
