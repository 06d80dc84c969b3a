pub mod movie;
pub mod pagination;

pub use movie::{same_id, Movie, MovieView, NewFavorite};
pub use pagination::{AnnotatedSearchResult, FavoritesPage, SearchResult};
