use crate::favorites::FavoritesStore;
use crate::sequence::{RequestSequence, Ticket};
use moviedb_models::{EditableField, Movie};
use moviedb_sources::{LookupError, MovieLookup};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Shown when the detail view is entered without an identifier
pub const MISSING_ID_MESSAGE: &str = "Movie ID not found";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("no movie is being displayed")]
    NothingDisplayed,
    #[error("movie is not being edited")]
    NotEditing,
}

/// Detail view states.
///
/// `Editing` keeps the last saved record next to the working copy so a cancel
/// can revert and the favorite toggle always acts on the saved record.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Idle,
    Loading { imdb_id: String },
    Displaying { movie: Movie },
    Editing { saved: Movie, working: Movie },
    Failed { message: String },
}

pub struct PendingDetail {
    ticket: Ticket,
    imdb_id: String,
    lookup: Arc<dyn MovieLookup>,
}

impl PendingDetail {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn imdb_id(&self) -> &str {
        &self.imdb_id
    }

    pub async fn run(self) -> DetailCompletion {
        let result = self.lookup.fetch(&self.imdb_id).await;
        DetailCompletion {
            ticket: self.ticket,
            imdb_id: self.imdb_id,
            result,
        }
    }
}

pub struct DetailCompletion {
    ticket: Ticket,
    imdb_id: String,
    result: Result<Movie, LookupError>,
}

impl DetailCompletion {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }
}

/// Loads one movie, then allows client-side edits of the loaded record.
/// Edits reach the favorites store only when the movie is a favorite.
pub struct DetailFlow {
    lookup: Arc<dyn MovieLookup>,
    sequence: RequestSequence,
    state: DetailState,
}

impl DetailFlow {
    pub fn new(lookup: Arc<dyn MovieLookup>) -> Self {
        Self {
            lookup,
            sequence: RequestSequence::new(),
            state: DetailState::Idle,
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// The last saved record, while displaying or editing
    pub fn current(&self) -> Option<&Movie> {
        match &self.state {
            DetailState::Displaying { movie } => Some(movie),
            DetailState::Editing { saved, .. } => Some(saved),
            _ => None,
        }
    }

    pub fn working_copy(&self) -> Option<&Movie> {
        match &self.state {
            DetailState::Editing { working, .. } => Some(working),
            _ => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, DetailState::Editing { .. })
    }

    /// Enter the loading state for `imdb_id`. A blank identifier fails
    /// immediately and no request is issued.
    pub fn open(&mut self, imdb_id: &str) -> Option<PendingDetail> {
        let imdb_id = imdb_id.trim();
        if imdb_id.is_empty() {
            self.sequence.invalidate();
            self.state = DetailState::Failed {
                message: MISSING_ID_MESSAGE.to_string(),
            };
            return None;
        }

        let ticket = self.sequence.issue();
        debug!("Detail {} started: {}", ticket, imdb_id);
        self.state = DetailState::Loading {
            imdb_id: imdb_id.to_string(),
        };
        Some(PendingDetail {
            ticket,
            imdb_id: imdb_id.to_string(),
            lookup: Arc::clone(&self.lookup),
        })
    }

    /// Apply a resolved fetch unless the view has moved on since it started
    pub fn apply(&mut self, completion: DetailCompletion) -> bool {
        if !self.sequence.is_current(completion.ticket) {
            debug!(
                "Discarding stale detail {} for {} (latest is #{})",
                completion.ticket,
                completion.imdb_id,
                self.sequence.latest()
            );
            return false;
        }

        self.state = match completion.result {
            Ok(movie) => {
                debug!("Loaded details for {} ({})", movie.imdb_id, movie.title);
                DetailState::Displaying { movie }
            }
            Err(e) => {
                match &e {
                    LookupError::Transport { detail, .. } => {
                        warn!("Detail fetch for {} failed: {}", completion.imdb_id, detail)
                    }
                    LookupError::Remote { message } => {
                        info!("Detail fetch for {} returned: {}", completion.imdb_id, message)
                    }
                }
                DetailState::Failed { message: e.to_string() }
            }
        };
        true
    }

    pub async fn load(&mut self, imdb_id: &str) -> &DetailState {
        if let Some(pending) = self.open(imdb_id) {
            let completion = pending.run().await;
            self.apply(completion);
        }
        &self.state
    }

    /// Leave the view. A fetch still in flight is dropped when it resolves,
    /// and unsaved edits are discarded.
    pub fn close(&mut self) {
        self.sequence.invalidate();
        self.state = DetailState::Idle;
    }

    /// Start editing a working copy of the displayed record (no-op if already editing)
    pub fn begin_edit(&mut self) -> Result<(), FlowError> {
        match std::mem::replace(&mut self.state, DetailState::Idle) {
            DetailState::Displaying { movie } => {
                self.state = DetailState::Editing {
                    working: movie.clone(),
                    saved: movie,
                };
                Ok(())
            }
            editing @ DetailState::Editing { .. } => {
                self.state = editing;
                Ok(())
            }
            other => {
                self.state = other;
                Err(FlowError::NothingDisplayed)
            }
        }
    }

    pub fn set_field(&mut self, field: EditableField, value: impl Into<String>) -> Result<(), FlowError> {
        match &mut self.state {
            DetailState::Editing { working, .. } => {
                working.set_field(field, value);
                Ok(())
            }
            _ => Err(FlowError::NotEditing),
        }
    }

    /// Discard the working copy and return to the last saved record
    pub fn cancel_edit(&mut self) -> Result<(), FlowError> {
        match std::mem::replace(&mut self.state, DetailState::Idle) {
            DetailState::Editing { saved, .. } => {
                debug!("Edit of {} cancelled", saved.imdb_id);
                self.state = DetailState::Displaying { movie: saved };
                Ok(())
            }
            other => {
                self.state = other;
                Err(FlowError::NotEditing)
            }
        }
    }

    /// Commit the working copy as the current record. If the movie is a
    /// favorite, its store entry is replaced by the edited record. Returns
    /// whether the favorites store was updated.
    pub fn save(&mut self, favorites: &mut FavoritesStore) -> Result<bool, FlowError> {
        match std::mem::replace(&mut self.state, DetailState::Idle) {
            DetailState::Editing { working, .. } => {
                let synced = favorites.contains(&working.imdb_id) && favorites.replace(working.clone());
                info!(
                    "Saved edits to {} ({}){}",
                    working.imdb_id,
                    working.title,
                    if synced { ", favorites updated" } else { "" }
                );
                self.state = DetailState::Displaying { movie: working };
                Ok(synced)
            }
            other => {
                self.state = other;
                Err(FlowError::NotEditing)
            }
        }
    }

    /// Flip favorite membership of the saved record (never the working copy).
    /// Returns the new membership.
    pub fn toggle_favorite(&self, favorites: &mut FavoritesStore) -> Result<bool, FlowError> {
        let movie = self.current().ok_or(FlowError::NothingDisplayed)?;
        Ok(favorites.toggle(movie))
    }

    pub fn is_favorite(&self, favorites: &FavoritesStore) -> bool {
        self.current()
            .map(|movie| favorites.contains(&movie.imdb_id))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::test_support::{create_detailed_movie, FakeLookup};
    use moviedb_sources::LookupOperation;

    const SHAWSHANK: &str = "tt0111161";

    fn favorites() -> FavoritesStore {
        FavoritesStore::load(Box::new(MemoryStorage::new()), "moviedb-favorites")
    }

    async fn loaded_flow() -> DetailFlow {
        let lookup = FakeLookup::new().with_detail(
            SHAWSHANK,
            Ok(create_detailed_movie(SHAWSHANK, "The Shawshank Redemption")),
        );
        let mut flow = DetailFlow::new(Arc::new(lookup));
        flow.load(SHAWSHANK).await;
        flow
    }

    #[tokio::test]
    async fn test_load_displays_record() {
        let flow = loaded_flow().await;
        let movie = flow.current().unwrap();
        assert_eq!(movie.title, "The Shawshank Redemption");
        assert!(movie.has_details());
        assert!(!flow.is_editing());
    }

    #[tokio::test]
    async fn test_blank_id_fails_without_request() {
        let lookup = Arc::new(FakeLookup::new());
        let mut flow = DetailFlow::new(lookup.clone());

        assert!(flow.open("  ").is_none());
        assert_eq!(
            flow.state(),
            &DetailState::Failed {
                message: MISSING_ID_MESSAGE.to_string()
            }
        );
        assert_eq!(lookup.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_remote_not_found_message() {
        let mut flow = DetailFlow::new(Arc::new(FakeLookup::new()));
        let state = flow.load("tt0000000").await.clone();
        assert_eq!(
            state,
            DetailState::Failed {
                message: "Incorrect IMDb ID.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_transport_failure_message() {
        let lookup = FakeLookup::new().with_detail(
            SHAWSHANK,
            Err(LookupError::transport(LookupOperation::Detail, "connection reset")),
        );
        let mut flow = DetailFlow::new(Arc::new(lookup));
        flow.load(SHAWSHANK).await;
        assert_eq!(
            flow.state(),
            &DetailState::Failed {
                message: "Failed to fetch movie details".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_cancel_restores_saved_record() {
        let mut flow = loaded_flow().await;
        flow.begin_edit().unwrap();
        flow.set_field(EditableField::Title, "X").unwrap();
        assert_eq!(flow.working_copy().unwrap().title, "X");
        assert_eq!(flow.current().unwrap().title, "The Shawshank Redemption");

        flow.cancel_edit().unwrap();
        assert!(!flow.is_editing());
        assert_eq!(flow.current().unwrap().title, "The Shawshank Redemption");
    }

    #[tokio::test]
    async fn test_save_updates_favorite_entry() {
        let mut flow = loaded_flow().await;
        let mut favorites = favorites();
        assert!(flow.toggle_favorite(&mut favorites).unwrap());

        flow.begin_edit().unwrap();
        flow.set_field(EditableField::Title, "X").unwrap();
        assert!(flow.save(&mut favorites).unwrap());

        assert_eq!(flow.current().unwrap().title, "X");
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites.get(SHAWSHANK).unwrap().title, "X");
        assert_eq!(favorites.get(SHAWSHANK).unwrap().imdb_rating.as_deref(), Some("9.3"));
    }

    #[tokio::test]
    async fn test_save_without_favorite_leaves_store_alone() {
        let mut flow = loaded_flow().await;
        let mut favorites = favorites();

        flow.begin_edit().unwrap();
        flow.set_field(EditableField::Director, "Someone Else").unwrap();
        assert!(!flow.save(&mut favorites).unwrap());

        assert!(favorites.is_empty());
        assert_eq!(flow.current().unwrap().director.as_deref(), Some("Someone Else"));
    }

    #[tokio::test]
    async fn test_toggle_uses_saved_record_while_editing() {
        let mut flow = loaded_flow().await;
        let mut favorites = favorites();

        flow.begin_edit().unwrap();
        flow.set_field(EditableField::Title, "Unsaved").unwrap();
        assert!(flow.toggle_favorite(&mut favorites).unwrap());

        assert_eq!(favorites.get(SHAWSHANK).unwrap().title, "The Shawshank Redemption");
        assert!(flow.is_editing());
        assert!(flow.is_favorite(&favorites));
    }

    #[tokio::test]
    async fn test_edit_operations_require_editing() {
        let mut flow = loaded_flow().await;
        let mut favorites = favorites();
        assert_eq!(flow.set_field(EditableField::Plot, "x"), Err(FlowError::NotEditing));
        assert_eq!(flow.cancel_edit(), Err(FlowError::NotEditing));
        assert_eq!(flow.save(&mut favorites), Err(FlowError::NotEditing));

        flow.close();
        assert_eq!(flow.begin_edit(), Err(FlowError::NothingDisplayed));
        assert_eq!(flow.toggle_favorite(&mut favorites), Err(FlowError::NothingDisplayed));
    }

    #[tokio::test]
    async fn test_late_fetch_after_close_is_dropped() {
        let lookup = FakeLookup::new().with_detail(
            SHAWSHANK,
            Ok(create_detailed_movie(SHAWSHANK, "The Shawshank Redemption")),
        );
        let mut flow = DetailFlow::new(Arc::new(lookup));

        let pending = flow.open(SHAWSHANK).unwrap();
        flow.close();
        assert!(!flow.apply(pending.run().await));
        assert_eq!(flow.state(), &DetailState::Idle);
    }

    #[tokio::test]
    async fn test_late_fetch_for_replaced_view_is_dropped() {
        let lookup = FakeLookup::new()
            .with_detail("tt001", Ok(create_detailed_movie("tt001", "First")))
            .with_detail("tt002", Ok(create_detailed_movie("tt002", "Second")));
        let mut flow = DetailFlow::new(Arc::new(lookup));

        let first = flow.open("tt001").unwrap();
        let second = flow.open("tt002").unwrap();
        assert!(flow.apply(second.run().await));
        assert!(!flow.apply(first.run().await));
        assert_eq!(flow.current().unwrap().imdb_id, "tt002");
    }
}
