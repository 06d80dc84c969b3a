/// OMDb API provider
///
/// Uses the `s=` search endpoint, which returns at most ten titles per page
/// along with the total match count as a decimal string.
use crate::{
    error::{AppError, AppResult},
    models::{Movie, SearchResult},
    services::providers::MovieSearchProvider,
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const NO_MATCHES: &str = "Movie not found!";
const INVALID_KEY: &str = "Invalid API key!";
const MISSING_VALUE: &str = "N/A";

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<OmdbMovie>,
    #[serde(rename = "totalResults", default)]
    total_results: Option<String>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbMovie {
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(rename = "Poster", default)]
    poster: String,
}

impl From<OmdbMovie> for Movie {
    fn from(raw: OmdbMovie) -> Self {
        let poster = if raw.poster == MISSING_VALUE {
            String::new()
        } else {
            raw.poster
        };

        Movie {
            title: raw.title.trim().to_string(),
            imdb_id: raw.imdb_id.trim().to_string(),
            year: raw.year,
            poster,
        }
    }
}

#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OmdbProvider {
    /// Creates a provider whose requests are bounded by `timeout`
    ///
    /// Fails when the API key is blank: a provider without a credential can
    /// never answer a search.
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> anyhow::Result<Self> {
        if api_key.trim().is_empty() {
            anyhow::bail!("OMDb API key is not configured");
        }

        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn convert_api_response(&self, body: OmdbSearchResponse) -> AppResult<SearchResult> {
        if !body.response.eq_ignore_ascii_case("true") {
            let message = body.error.unwrap_or_else(|| "Unknown error".to_string());
            return match message.as_str() {
                NO_MATCHES => Ok(SearchResult::empty()),
                INVALID_KEY => Err(AppError::InvalidCredential(message)),
                _ => Err(AppError::ExternalFailure(message)),
            };
        }

        let total_results = match body.total_results.as_deref() {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::ExternalFailure(format!("Unparsable totalResults: {}", raw))
            })?,
            None => 0,
        };

        let movies = body
            .search
            .into_iter()
            .map(Movie::from)
            .filter(|movie| {
                let keep = !movie.imdb_id.is_empty() && !movie.title.is_empty();
                if !keep {
                    tracing::debug!(?movie, "Dropping provider entry without id or title");
                }
                keep
            })
            .collect();

        Ok(SearchResult {
            movies,
            total_results,
        })
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() || err.is_connect() {
        AppError::ExternalTimeout(err.to_string())
    } else {
        AppError::ExternalFailure(err.to_string())
    }
}

#[async_trait::async_trait]
impl MovieSearchProvider for OmdbProvider {
    async fn search(&self, title: &str, page: u32) -> AppResult<SearchResult> {
        let url = format!("{}/", self.api_url);
        let page = page.to_string();
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("s", title),
                ("page", page.as_str()),
                ("type", "movie"),
                ("plot", "short"),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(AppError::InvalidCredential(format!(
                "API returned status {}",
                status
            )));
        }

        if !status.is_success() {
            return Err(AppError::ExternalFailure(format!(
                "API returned status {}: {}",
                status, body
            )));
        }

        let parsed: OmdbSearchResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::ExternalFailure(format!("Malformed response: {}", e)))?;
        let result = self.convert_api_response(parsed)?;

        tracing::info!(
            query = %title,
            page = %page,
            results = result.movies.len(),
            total_results = result.total_results,
            provider = self.name(),
            "Movie search completed"
        );

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}
