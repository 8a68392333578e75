use crate::detail::{DetailCompletion, DetailFlow, FlowError, PendingDetail};
use crate::favorites::FavoritesStore;
use crate::search::{PendingSearch, SearchCompletion, SearchFlow};
use moviedb_models::Movie;
use moviedb_sources::MovieLookup;
use std::sync::Arc;
use tracing::debug;

/// Which screen the presentation layer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Results,
    Detail,
    Favorites,
}

/// One user session: the favorites store shared by the search and detail
/// flows, plus the currently selected view.
pub struct Session {
    favorites: FavoritesStore,
    search: SearchFlow,
    detail: DetailFlow,
    view: View,
}

impl Session {
    pub fn new(lookup: Arc<dyn MovieLookup>, favorites: FavoritesStore) -> Self {
        Self {
            favorites,
            search: SearchFlow::new(Arc::clone(&lookup)),
            detail: DetailFlow::new(lookup),
            view: View::Results,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn search_flow(&self) -> &SearchFlow {
        &self.search
    }

    pub fn detail_flow(&self) -> &DetailFlow {
        &self.detail
    }

    pub fn detail_flow_mut(&mut self) -> &mut DetailFlow {
        &mut self.detail
    }

    /// Starting a search always returns to the results view. Leaving the
    /// detail view drops its in-flight fetch and any unsaved edit.
    pub fn start_search(&mut self, query: &str) -> PendingSearch {
        self.leave_detail();
        self.view = View::Results;
        self.search.start(query)
    }

    pub fn apply_search(&mut self, completion: SearchCompletion) -> bool {
        self.search.apply(completion)
    }

    pub async fn search(&mut self, query: &str) {
        let completion = self.start_search(query).run().await;
        self.apply_search(completion);
    }

    pub fn open_detail(&mut self, imdb_id: &str) -> Option<PendingDetail> {
        self.view = View::Detail;
        self.detail.open(imdb_id)
    }

    pub fn apply_detail(&mut self, completion: DetailCompletion) -> bool {
        if self.view != View::Detail {
            debug!("Detail view closed, ignoring fetch {}", completion.ticket());
            return false;
        }
        self.detail.apply(completion)
    }

    pub async fn show_detail(&mut self, imdb_id: &str) {
        if let Some(pending) = self.open_detail(imdb_id) {
            let completion = pending.run().await;
            self.apply_detail(completion);
        }
    }

    /// Back to the last search results without re-running the search
    pub fn show_results(&mut self) {
        self.leave_detail();
        self.view = View::Results;
    }

    pub fn show_favorites(&mut self) {
        self.leave_detail();
        self.view = View::Favorites;
    }

    /// Toggle favorite membership from a results or favorites card
    pub fn toggle_favorite(&mut self, movie: &Movie) -> bool {
        self.favorites.toggle(movie)
    }

    /// Toggle favorite membership of the movie shown in the detail view
    pub fn toggle_detail_favorite(&mut self) -> Result<bool, FlowError> {
        self.detail.toggle_favorite(&mut self.favorites)
    }

    pub fn save_edit(&mut self) -> Result<bool, FlowError> {
        self.detail.save(&mut self.favorites)
    }

    pub fn remove_favorite(&mut self, imdb_id: &str) -> bool {
        self.favorites.remove(imdb_id)
    }

    pub fn is_favorite(&self, imdb_id: &str) -> bool {
        self.favorites.contains(imdb_id)
    }

    fn leave_detail(&mut self) {
        if self.view == View::Detail {
            self.detail.close();
        }
    }
}
