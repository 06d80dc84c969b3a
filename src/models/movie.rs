use serde::{Deserialize, Serialize};

/// A movie as persisted in the favorites collection and returned by search
///
/// Identity is the IMDb id, compared case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    pub title: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub poster: String,
}

impl Movie {
    /// Whether this movie carries the given IMDb id
    pub fn has_id(&self, imdb_id: &str) -> bool {
        same_id(&self.imdb_id, imdb_id)
    }
}

/// Case-insensitive IMDb id comparison, ignoring surrounding whitespace
pub fn same_id(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Input for adding a favorite
///
/// Required fields default to empty so that a missing field is reported as a
/// validation failure rather than a decoding failure. Any `isFavorite` flag
/// sent by a client is ignored.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct NewFavorite {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
}

impl NewFavorite {
    /// Builds the record that gets stored: trimmed title and id, absent
    /// year/poster become empty strings.
    pub fn into_movie(self) -> Movie {
        Movie {
            title: self.title.trim().to_string(),
            imdb_id: self.imdb_id.trim().to_string(),
            year: self.year.unwrap_or_default(),
            poster: self.poster.unwrap_or_default(),
        }
    }
}

impl From<Movie> for NewFavorite {
    fn from(movie: Movie) -> Self {
        Self {
            title: movie.title,
            imdb_id: movie.imdb_id,
            year: Some(movie.year),
            poster: Some(movie.poster),
        }
    }
}

/// A movie annotated with its current favorite status
///
/// The flag is computed when a search result is served and never stored.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MovieView {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(rename = "isFavorite")]
    pub is_favorite: bool,
}
