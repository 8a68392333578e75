use crate::sequence::{RequestSequence, Ticket};
use moviedb_models::Movie;
use moviedb_sources::{LookupError, MovieLookup};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    /// No search issued yet
    Idle,
    Loading { query: String },
    Loaded { query: String, results: Vec<Movie> },
    Failed { query: String, message: String },
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading { .. })
    }

    pub fn query(&self) -> Option<&str> {
        match self {
            SearchState::Idle => None,
            SearchState::Loading { query }
            | SearchState::Loaded { query, .. }
            | SearchState::Failed { query, .. } => Some(query.as_str()),
        }
    }
}

/// A search that has been started but not yet resolved. Owns its own handle
/// to the lookup so it can be awaited while the flow keeps accepting input.
pub struct PendingSearch {
    ticket: Ticket,
    query: String,
    lookup: Arc<dyn MovieLookup>,
}

impl PendingSearch {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub async fn run(self) -> SearchCompletion {
        let result = self.lookup.search(&self.query).await;
        SearchCompletion {
            ticket: self.ticket,
            query: self.query,
            result,
        }
    }
}

pub struct SearchCompletion {
    ticket: Ticket,
    query: String,
    result: Result<Vec<Movie>, LookupError>,
}

impl SearchCompletion {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }
}

/// Title search with last-issued-wins result display
pub struct SearchFlow {
    lookup: Arc<dyn MovieLookup>,
    sequence: RequestSequence,
    state: SearchState,
}

impl SearchFlow {
    pub fn new(lookup: Arc<dyn MovieLookup>) -> Self {
        Self {
            lookup,
            sequence: RequestSequence::new(),
            state: SearchState::Idle,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Results of the last successful search, empty otherwise
    pub fn results(&self) -> &[Movie] {
        match &self.state {
            SearchState::Loaded { results, .. } => results,
            _ => &[],
        }
    }

    /// Supersede whatever is shown and enter the loading state. The query is
    /// passed through untouched, blank queries included.
    pub fn start(&mut self, query: &str) -> PendingSearch {
        let ticket = self.sequence.issue();
        debug!("Search {} started: '{}'", ticket, query);
        self.state = SearchState::Loading {
            query: query.to_string(),
        };
        PendingSearch {
            ticket,
            query: query.to_string(),
            lookup: Arc::clone(&self.lookup),
        }
    }

    /// Apply a resolved search. Returns false (and changes nothing) when a
    /// newer search has been issued since this one started.
    pub fn apply(&mut self, completion: SearchCompletion) -> bool {
        if !self.sequence.is_current(completion.ticket) {
            debug!(
                "Discarding stale search {} for '{}' (latest is #{})",
                completion.ticket,
                completion.query,
                self.sequence.latest()
            );
            return false;
        }

        self.state = match completion.result {
            Ok(results) => {
                info!("Search '{}' returned {} results", completion.query, results.len());
                SearchState::Loaded {
                    query: completion.query,
                    results,
                }
            }
            Err(e) => {
                match &e {
                    LookupError::Transport { detail, .. } => {
                        warn!("Search '{}' failed: {}", completion.query, detail)
                    }
                    LookupError::Remote { message } => {
                        info!("Search '{}' found nothing: {}", completion.query, message)
                    }
                }
                SearchState::Failed {
                    query: completion.query,
                    message: e.to_string(),
                }
            }
        };
        true
    }

    pub async fn search(&mut self, query: &str) -> &SearchState {
        let completion = self.start(query).run().await;
        self.apply(completion);
        &self.state
    }

    /// Back to idle; any outstanding search is ignored when it resolves
    pub fn reset(&mut self) {
        self.sequence.invalidate();
        self.state = SearchState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_movie, FakeLookup};
    use futures::stream::{FuturesUnordered, StreamExt};
    use moviedb_sources::LookupOperation;
    use std::time::Duration;

    fn batman_results() -> Vec<Movie> {
        vec![
            create_movie("tt0372784", "Batman Begins"),
            create_movie("tt0096895", "Batman"),
        ]
    }

    #[tokio::test]
    async fn test_search_success() {
        let lookup = FakeLookup::new().with_search("batman", Ok(batman_results()));
        let mut flow = SearchFlow::new(Arc::new(lookup));

        let state = flow.search("batman").await.clone();
        match state {
            SearchState::Loaded { query, results } => {
                assert_eq!(query, "batman");
                assert_eq!(results.len(), 2);
                assert!(results.iter().all(|m| m.plot.is_none() && m.actors.is_none()));
            }
            other => panic!("unexpected state: {:?}", other),
        }
        assert_eq!(flow.results().len(), 2);
    }

    #[tokio::test]
    async fn test_search_not_found_message_is_verbatim() {
        let lookup = FakeLookup::new().with_search("zzzznomatch", Err(LookupError::remote("Movie not found!")));
        let mut flow = SearchFlow::new(Arc::new(lookup));

        let state = flow.search("zzzznomatch").await.clone();
        assert_eq!(
            state,
            SearchState::Failed {
                query: "zzzznomatch".to_string(),
                message: "Movie not found!".to_string(),
            }
        );
        assert!(flow.results().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_generic() {
        let lookup = FakeLookup::new().with_search(
            "batman",
            Err(LookupError::transport(LookupOperation::Search, "HTTP 500 Internal Server Error")),
        );
        let mut flow = SearchFlow::new(Arc::new(lookup));

        flow.search("batman").await;
        match flow.state() {
            SearchState::Failed { message, .. } => assert_eq!(message, "Failed to fetch movies"),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_start_enters_loading_and_clears_results() {
        let lookup = FakeLookup::new().with_search("batman", Ok(batman_results()));
        let mut flow = SearchFlow::new(Arc::new(lookup));
        flow.search("batman").await;

        let pending = flow.start("   ");
        assert!(flow.state().is_loading());
        assert!(flow.results().is_empty());
        assert_eq!(pending.query(), "   ");
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let lookup = FakeLookup::new()
            .with_search("bat", Ok(vec![create_movie("tt001", "Bat")]))
            .with_search("batman", Ok(batman_results()));
        let mut flow = SearchFlow::new(Arc::new(lookup));

        let first = flow.start("bat");
        let second = flow.start("batman");

        // Second resolves first, first arrives late
        let second_done = second.run().await;
        assert!(flow.apply(second_done));
        let first_done = first.run().await;
        assert!(!flow.apply(first_done));

        assert_eq!(flow.state().query(), Some("batman"));
        assert_eq!(flow.results().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_searches_last_issued_wins() {
        let lookup = FakeLookup::new()
            .with_search("slow", Ok(vec![create_movie("tt001", "Slow")]))
            .with_search("fast", Ok(batman_results()))
            .with_delay("slow", Duration::from_millis(80));
        let mut flow = SearchFlow::new(Arc::new(lookup));

        let mut in_flight = FuturesUnordered::new();
        in_flight.push(flow.start("slow").run());
        in_flight.push(flow.start("fast").run());

        let mut applied = Vec::new();
        while let Some(completion) = in_flight.next().await {
            applied.push(flow.apply(completion));
        }

        assert_eq!(applied, vec![true, false]);
        assert_eq!(flow.state().query(), Some("fast"));
        assert_eq!(flow.results()[0].imdb_id, "tt0372784");
    }

    #[tokio::test]
    async fn test_reset_ignores_outstanding() {
        let lookup = FakeLookup::new().with_search("batman", Ok(batman_results()));
        let mut flow = SearchFlow::new(Arc::new(lookup));

        let pending = flow.start("batman");
        flow.reset();
        assert!(!flow.apply(pending.run().await));
        assert_eq!(flow.state(), &SearchState::Idle);
    }
}
