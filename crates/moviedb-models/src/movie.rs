use crate::media::MediaType;
use crate::poster::Poster;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A movie record as returned by the remote lookup.
///
/// Field names follow the remote service so a persisted favorites payload is
/// a plain JSON array of the records the service returns. The identifier is
/// the only field used for equality checks in the favorites store.
///
/// Extended attributes (plot, actors, ...) are only present once a detail
/// fetch has succeeded; search hits carry the summary fields alone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Type", default)]
    pub media_type: MediaType,
    #[serde(rename = "Poster", default)]
    pub poster: Poster,

    #[serde(rename = "Plot", default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(rename = "Actors", default, skip_serializing_if = "Option::is_none")]
    pub actors: Option<String>,
    #[serde(rename = "Director", default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(rename = "Genre", default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(rename = "Runtime", default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(rename = "imdbRating", default, skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<String>,
}

impl Movie {
    pub fn new(
        imdb_id: impl Into<String>,
        title: impl Into<String>,
        year: impl Into<String>,
        media_type: MediaType,
        poster: Poster,
    ) -> Self {
        Self {
            imdb_id: imdb_id.into(),
            title: title.into(),
            year: year.into(),
            media_type,
            poster,
            plot: None,
            actors: None,
            director: None,
            genre: None,
            runtime: None,
            imdb_rating: None,
        }
    }

    /// Copy of this record with only the fields a search hit carries
    pub fn summary(&self) -> Self {
        Self::new(
            self.imdb_id.clone(),
            self.title.clone(),
            self.year.clone(),
            self.media_type.clone(),
            self.poster.clone(),
        )
    }

    /// True once any extended attribute has been populated
    pub fn has_details(&self) -> bool {
        self.plot.is_some()
            || self.actors.is_some()
            || self.director.is_some()
            || self.genre.is_some()
            || self.runtime.is_some()
            || self.imdb_rating.is_some()
    }

    /// Identifier equality, the only equality the favorites store uses
    pub fn same_id(&self, other: &Movie) -> bool {
        self.imdb_id == other.imdb_id
    }

    pub fn field(&self, field: EditableField) -> Option<&str> {
        match field {
            EditableField::Title => Some(self.title.as_str()),
            EditableField::Year => Some(self.year.as_str()),
            EditableField::Actors => self.actors.as_deref(),
            EditableField::Director => self.director.as_deref(),
            EditableField::Genre => self.genre.as_deref(),
            EditableField::Runtime => self.runtime.as_deref(),
            EditableField::Plot => self.plot.as_deref(),
        }
    }

    /// Overwrite one editable field. Identifier and rating are not editable.
    pub fn set_field(&mut self, field: EditableField, value: impl Into<String>) {
        let value = value.into();
        match field {
            EditableField::Title => self.title = value,
            EditableField::Year => self.year = value,
            EditableField::Actors => self.actors = Some(value),
            EditableField::Director => self.director = Some(value),
            EditableField::Genre => self.genre = Some(value),
            EditableField::Runtime => self.runtime = Some(value),
            EditableField::Plot => self.plot = Some(value),
        }
    }
}

/// Fields a working copy accepts overwrites for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditableField {
    Title,
    Year,
    Actors,
    Director,
    Genre,
    Runtime,
    Plot,
}

impl EditableField {
    pub const ALL: [EditableField; 7] = [
        EditableField::Title,
        EditableField::Year,
        EditableField::Actors,
        EditableField::Director,
        EditableField::Genre,
        EditableField::Runtime,
        EditableField::Plot,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EditableField::Title => "Title",
            EditableField::Year => "Year",
            EditableField::Actors => "Actors",
            EditableField::Director => "Director",
            EditableField::Genre => "Genre",
            EditableField::Runtime => "Runtime",
            EditableField::Plot => "Plot",
        }
    }
}

impl fmt::Display for EditableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
