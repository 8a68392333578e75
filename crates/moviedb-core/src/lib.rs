pub mod detail;
pub mod favorites;
pub mod search;
pub mod sequence;
pub mod session;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

pub use detail::{DetailCompletion, DetailFlow, DetailState, FlowError, PendingDetail, MISSING_ID_MESSAGE};
pub use favorites::FavoritesStore;
pub use search::{PendingSearch, SearchCompletion, SearchFlow, SearchState};
pub use sequence::{RequestSequence, Ticket};
pub use session::{Session, View};
pub use storage::{FavoritesStorage, FileStorage, MemoryStorage, StorageError};
