use std::sync::Arc;

use crate::db::FavoritesRepository;
use crate::services::providers::MovieSearchProvider;
use crate::services::CatalogService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
}

impl AppState {
    /// Creates application state around a search provider and favorites store
    pub fn new(
        provider: Arc<dyn MovieSearchProvider>,
        favorites: Arc<dyn FavoritesRepository>,
    ) -> Self {
        Self {
            catalog: CatalogService::new(provider, favorites),
        }
    }
}
