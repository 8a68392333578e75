pub mod error;
pub mod omdb;
pub mod traits;

pub use error::{LookupError, LookupOperation};
pub use omdb::OmdbClient;
pub use traits::MovieLookup;
