/// Movie search provider abstraction
///
/// A provider turns a title query into one page of domain `Movie`s. Provider
/// specific response shapes stay inside the implementing module.
use crate::{error::AppResult, models::SearchResult};

pub mod omdb;

pub use omdb::OmdbProvider;

/// Trait for external movie search providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieSearchProvider: Send + Sync {
    /// Search for movies by title
    ///
    /// `title` is already trimmed and non-empty, `page` is 1-based. A provider
    /// "no matches" answer is an empty result, not an error. Failures are
    /// reported as `ExternalTimeout`, `InvalidCredential` or `ExternalFailure`.
    async fn search(&self, title: &str, page: u32) -> AppResult<SearchResult>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
