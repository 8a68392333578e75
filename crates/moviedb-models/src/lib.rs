pub mod media;
pub mod movie;
pub mod poster;

pub use media::MediaType;
pub use movie::{EditableField, Movie};
pub use poster::Poster;
