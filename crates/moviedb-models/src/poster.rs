use serde::{Deserialize, Serialize};

/// Sentinel the remote service uses when no poster exists
pub const POSTER_UNAVAILABLE: &str = "N/A";

/// Poster reference: a URL, or the "unavailable" sentinel.
///
/// Serialized as the raw string so persisted favorites stay compatible
/// with the records the remote service returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Poster {
    Url(String),
    #[default]
    Unavailable,
}

impl Poster {
    pub fn url(&self) -> Option<&str> {
        match self {
            Poster::Url(url) => Some(url),
            Poster::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Poster::Url(_))
    }

    /// URL to render, falling back to `placeholder` when unavailable
    pub fn url_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.url().unwrap_or(placeholder)
    }
}

impl From<String> for Poster {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == POSTER_UNAVAILABLE {
            Poster::Unavailable
        } else {
            Poster::Url(value)
        }
    }
}

impl From<Poster> for String {
    fn from(value: Poster) -> Self {
        match value {
            Poster::Url(url) => url,
            Poster::Unavailable => POSTER_UNAVAILABLE.to_string(),
        }
    }
}
