use std::sync::Arc;

use crate::{
    db::FavoritesRepository,
    error::{AppError, AppResult},
    models::{AnnotatedSearchResult, FavoritesPage, Movie, MovieView, NewFavorite},
    services::providers::MovieSearchProvider,
};

pub const MAX_PAGE_SIZE: i64 = 100;

/// Movie search and favorites use cases
///
/// Combines the search provider with the favorites store. The store is the
/// only owner of the collection; this service never touches the medium.
#[derive(Clone)]
pub struct CatalogService {
    provider: Arc<dyn MovieSearchProvider>,
    favorites: Arc<dyn FavoritesRepository>,
}

impl CatalogService {
    pub fn new(
        provider: Arc<dyn MovieSearchProvider>,
        favorites: Arc<dyn FavoritesRepository>,
    ) -> Self {
        Self {
            provider,
            favorites,
        }
    }

    /// Searches the provider and marks results that are already favorites
    pub async fn search_movies(&self, title: &str, page: i64) -> AppResult<AnnotatedSearchResult> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Search title cannot be empty".to_string()));
        }
        let page = u32::try_from(page)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| AppError::Validation(format!("Invalid page: {}", page)))?;

        let result = self.provider.search(title, page).await?;

        // One snapshot answers every lookup for this page
        let favorites = self.favorites.find_all().await?;
        let movies = result
            .movies
            .into_iter()
            .map(|movie| {
                let is_favorite = favorites.iter().any(|f| f.has_id(&movie.imdb_id));
                MovieView { movie, is_favorite }
            })
            .collect();

        Ok(AnnotatedSearchResult {
            movies,
            total_results: result.total_results,
        })
    }

    /// Adds a movie to favorites; an existing entry is never overwritten
    pub async fn add_to_favorites(&self, input: NewFavorite) -> AppResult<Movie> {
        if input.imdb_id.trim().is_empty() {
            return Err(AppError::Validation("imdbID is required".to_string()));
        }
        if input.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".to_string()));
        }

        let movie = input.into_movie();

        if self.favorites.exists(&movie.imdb_id).await? {
            return Err(AppError::Duplicate(movie.imdb_id));
        }

        let saved = self.favorites.save(movie).await?;
        tracing::info!(imdb_id = %saved.imdb_id, title = %saved.title, "Added to favorites");
        Ok(saved)
    }

    /// Removes a favorite and returns the removed record
    pub async fn remove_from_favorites(&self, imdb_id: &str) -> AppResult<Movie> {
        let imdb_id = imdb_id.trim();
        if imdb_id.is_empty() {
            return Err(AppError::Validation("imdbID is required".to_string()));
        }

        let removed = self
            .favorites
            .remove(imdb_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Favorite {}", imdb_id)))?;

        tracing::info!(imdb_id = %removed.imdb_id, "Removed from favorites");
        Ok(removed)
    }

    /// Returns one favorite by IMDb id
    pub async fn get_favorite(&self, imdb_id: &str) -> AppResult<Movie> {
        let imdb_id = imdb_id.trim();
        if imdb_id.is_empty() {
            return Err(AppError::Validation("imdbID is required".to_string()));
        }

        self.favorites
            .find_by_id(imdb_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Favorite {}", imdb_id)))
    }

    /// Returns a page of favorites in insertion order
    pub async fn get_favorites(&self, page: i64, page_size: i64) -> AppResult<FavoritesPage> {
        if page < 1 {
            return Err(AppError::Validation(format!("Invalid page: {}", page)));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::Validation(format!(
                "pageSize must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, page_size
            )));
        }
        let page = usize::try_from(page)
            .map_err(|_| AppError::Validation(format!("Invalid page: {}", page)))?;

        let collection = self.favorites.find_all().await?;
        Ok(FavoritesPage::paginate(&collection, page, page_size as usize))
    }

    pub async fn favorites_count(&self) -> AppResult<usize> {
        self.favorites.count().await
    }
}
