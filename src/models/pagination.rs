use serde::Serialize;

use super::{Movie, MovieView};

/// One page of provider search results
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub movies: Vec<Movie>,
    /// Total matches reported by the provider, not the size of this page
    pub total_results: u64,
}

impl SearchResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Search results with each movie's favorite status attached
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedSearchResult {
    pub movies: Vec<MovieView>,
    pub total_results: u64,
}

/// A slice of the favorites collection
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesPage {
    pub items: Vec<Movie>,
    pub count: usize,
    pub total_results: usize,
    pub current_page: usize,
    pub total_pages: usize,
}

impl FavoritesPage {
    /// Slices `collection` for the 1-based `page`.
    ///
    /// An empty collection has zero pages. A page past the end yields no
    /// items but keeps the computed page count.
    pub fn paginate(collection: &[Movie], page: usize, page_size: usize) -> Self {
        let total_results = collection.len();

        if total_results == 0 {
            return Self {
                items: Vec::new(),
                count: 0,
                total_results: 0,
                current_page: page,
                total_pages: 0,
            };
        }

        let total_pages = total_results.div_ceil(page_size);
        let start = page.saturating_sub(1).saturating_mul(page_size).min(total_results);
        let end = start.saturating_add(page_size).min(total_results);
        let items = collection[start..end].to_vec();

        Self {
            count: items.len(),
            items,
            total_results,
            current_page: page,
            total_pages,
        }
    }
}
