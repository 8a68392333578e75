use crate::storage::{FavoritesStorage, FileStorage};
use anyhow::Result;
use moviedb_config::{Config, PathManager};
use moviedb_models::Movie;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// The user's favorite movies, in insertion order, mirrored into one
/// persisted slot.
///
/// Membership is by identifier only. Every mutation that changes the
/// collection serializes the whole collection back to storage; storage
/// failures are logged and never surface to callers.
pub struct FavoritesStore {
    movies: Vec<Movie>,
    storage: Box<dyn FavoritesStorage>,
    key: String,
}

impl FavoritesStore {
    /// Rehydrate from `key`. A missing slot yields an empty store, as does an
    /// unreadable or malformed payload (logged).
    pub fn load(storage: Box<dyn FavoritesStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let movies = match storage.read(&key) {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<Movie>>(&payload) {
                Ok(movies) => dedupe_by_id(movies),
                Err(e) => {
                    warn!("Error loading favorites from '{}': {}. Starting with no favorites.", key, e);
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("No persisted favorites under '{}'", key);
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to read favorites from '{}': {}. Starting with no favorites.", key, e);
                Vec::new()
            }
        };

        info!("Loaded {} favorites", movies.len());
        Self { movies, storage, key }
    }

    /// File-backed store under the configured data directory and key
    pub fn open(config: &Config, path_manager: &PathManager) -> Result<Self> {
        let data_dir = config.data_dir(path_manager.data_dir());
        std::fs::create_dir_all(&data_dir)?;
        let storage = FileStorage::new(data_dir);
        Ok(Self::load(Box::new(storage), config.storage.favorites_key.clone()))
    }

    /// Insert a copy of `movie` unless its identifier is already present
    pub fn add(&mut self, movie: Movie) -> bool {
        if self.contains(&movie.imdb_id) {
            debug!("{} is already a favorite", movie.imdb_id);
            return false;
        }

        info!("Adding {} ({}) to favorites", movie.imdb_id, movie.title);
        self.movies.push(movie);
        self.persist();
        true
    }

    /// Delete the entry with `imdb_id` if present
    pub fn remove(&mut self, imdb_id: &str) -> bool {
        let before = self.movies.len();
        self.movies.retain(|m| m.imdb_id != imdb_id);
        if self.movies.len() == before {
            debug!("{} is not a favorite, nothing to remove", imdb_id);
            return false;
        }

        info!("Removed {} from favorites", imdb_id);
        self.persist();
        true
    }

    /// Replace the entry sharing `movie`'s identifier (remove-then-add, so the
    /// entry moves to the end). One flush; no-op when the identifier is absent.
    pub fn replace(&mut self, movie: Movie) -> bool {
        if !self.contains(&movie.imdb_id) {
            return false;
        }

        self.movies.retain(|m| !m.same_id(&movie));
        info!("Updated favorite {} ({})", movie.imdb_id, movie.title);
        self.movies.push(movie);
        self.persist();
        true
    }

    /// Flip membership of `movie`; returns the new membership
    pub fn toggle(&mut self, movie: &Movie) -> bool {
        if self.contains(&movie.imdb_id) {
            self.remove(&movie.imdb_id);
            false
        } else {
            self.add(movie.clone());
            true
        }
    }

    pub fn contains(&self, imdb_id: &str) -> bool {
        self.movies.iter().any(|m| m.imdb_id == imdb_id)
    }

    pub fn get(&self, imdb_id: &str) -> Option<&Movie> {
        self.movies.iter().find(|m| m.imdb_id == imdb_id)
    }

    pub fn list(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    fn persist(&self) {
        let payload = match serde_json::to_string(&self.movies) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize favorites: {}", e);
                return;
            }
        };

        match self.storage.write(&self.key, &payload) {
            Ok(()) => debug!("Saved {} favorites to '{}'", self.movies.len(), self.key),
            Err(e) => warn!("Failed to save favorites to '{}': {}", self.key, e),
        }
    }
}

fn dedupe_by_id(movies: Vec<Movie>) -> Vec<Movie> {
    let mut seen = HashSet::new();
    let total = movies.len();
    let unique: Vec<Movie> = movies
        .into_iter()
        .filter(|m| seen.insert(m.imdb_id.clone()))
        .collect();
    if unique.len() != total {
        warn!("Dropped {} duplicate favorites from persisted payload", total - unique.len());
    }
    unique
}
