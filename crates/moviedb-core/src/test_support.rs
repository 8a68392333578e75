use async_trait::async_trait;
use moviedb_models::{MediaType, Movie, Poster};
use moviedb_sources::{LookupError, MovieLookup};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub fn create_movie(imdb_id: &str, title: &str) -> Movie {
    Movie::new(imdb_id, title, "1994", MediaType::Movie, Poster::Unavailable)
}

pub fn create_detailed_movie(imdb_id: &str, title: &str) -> Movie {
    let mut movie = create_movie(imdb_id, title);
    movie.plot = Some("Two imprisoned men bond over a number of years.".to_string());
    movie.actors = Some("Tim Robbins, Morgan Freeman".to_string());
    movie.director = Some("Frank Darabont".to_string());
    movie.genre = Some("Drama".to_string());
    movie.runtime = Some("142 min".to_string());
    movie.imdb_rating = Some("9.3".to_string());
    movie
}

/// Scripted lookup. Unscripted queries answer like the remote service does.
#[derive(Default)]
pub struct FakeLookup {
    searches: Mutex<HashMap<String, Result<Vec<Movie>, LookupError>>>,
    details: Mutex<HashMap<String, Result<Movie, LookupError>>>,
    delays: Mutex<HashMap<String, Duration>>,
    fetches: Mutex<Vec<String>>,
}

impl FakeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(self, query: &str, result: Result<Vec<Movie>, LookupError>) -> Self {
        self.searches.lock().unwrap().insert(query.to_string(), result);
        self
    }

    pub fn with_detail(self, imdb_id: &str, result: Result<Movie, LookupError>) -> Self {
        self.details.lock().unwrap().insert(imdb_id.to_string(), result);
        self
    }

    /// Delay the answer for a query or identifier
    pub fn with_delay(self, key: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(key.to_string(), delay);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }

    async fn wait_for(&self, key: &str) {
        let delay = self.delays.lock().unwrap().get(key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl MovieLookup for FakeLookup {
    fn lookup_name(&self) -> &str {
        "fake"
    }

    async fn search(&self, query: &str) -> Result<Vec<Movie>, LookupError> {
        self.wait_for(query).await;
        let scripted = self.searches.lock().unwrap().get(query).cloned();
        scripted.unwrap_or_else(|| Err(LookupError::remote("Movie not found!")))
    }

    async fn fetch(&self, imdb_id: &str) -> Result<Movie, LookupError> {
        self.fetches.lock().unwrap().push(imdb_id.to_string());
        self.wait_for(imdb_id).await;
        let scripted = self.details.lock().unwrap().get(imdb_id).cloned();
        scripted.unwrap_or_else(|| Err(LookupError::remote("Incorrect IMDb ID.")))
    }
}
