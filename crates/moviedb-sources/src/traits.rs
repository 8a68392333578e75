use crate::error::LookupError;
use async_trait::async_trait;
use moviedb_models::Movie;

/// Remote movie lookup: title search and fetch-by-identifier.
///
/// Implementations are shared behind `Arc<dyn MovieLookup>` so an in-flight
/// request never borrows the flow that issued it.
#[async_trait]
pub trait MovieLookup: Send + Sync {
    fn lookup_name(&self) -> &str;

    /// Search by free-text title fragment. Hits carry summary fields only.
    async fn search(&self, query: &str) -> Result<Vec<Movie>, LookupError>;

    /// Fetch the full record for one identifier
    async fn fetch(&self, imdb_id: &str) -> Result<Movie, LookupError>;
}
