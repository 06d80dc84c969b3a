use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{AnnotatedSearchResult, FavoritesPage, Movie, NewFavorite};

use super::AppState;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PAGE_SIZE: i64 = 10;

// Request types

/// Query parameters arrive as text so that a non-numeric value becomes a
/// validation error with the usual error body.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub title: String,
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FavoritesQuery {
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

fn parse_integer(name: &str, raw: Option<&str>, default: i64) -> AppResult<i64> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse::<i64>().map_err(|_| {
            AppError::Validation(format!("{} must be an integer, got {:?}", name, value))
        }),
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Search movies by title with favorite annotations
pub async fn search_movies(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<AnnotatedSearchResult>> {
    let page = parse_integer("page", params.page.as_deref(), DEFAULT_PAGE)?;

    tracing::info!(
        request_id = %request_id,
        title = %params.title,
        page,
        "Processing movie search"
    );

    let result = state.catalog.search_movies(&params.title, page).await?;
    Ok(Json(result))
}

/// List favorites, one page at a time
pub async fn get_favorites(
    State(state): State<AppState>,
    Query(params): Query<FavoritesQuery>,
) -> AppResult<Json<FavoritesPage>> {
    let page = parse_integer("page", params.page.as_deref(), DEFAULT_PAGE)?;
    let page_size = parse_integer("pageSize", params.page_size.as_deref(), DEFAULT_PAGE_SIZE)?;

    let favorites = state.catalog.get_favorites(page, page_size).await?;
    Ok(Json(favorites))
}

/// Get a single favorite
pub async fn get_favorite(
    State(state): State<AppState>,
    Path(imdb_id): Path<String>,
) -> AppResult<Json<Movie>> {
    let movie = state.catalog.get_favorite(&imdb_id).await?;
    Ok(Json(movie))
}

/// Add a movie to favorites
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<NewFavorite>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    let Json(request) =
        payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    tracing::info!(
        request_id = %request_id,
        imdb_id = %request.imdb_id,
        "Adding favorite"
    );

    let movie = state.catalog.add_to_favorites(request).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

/// Remove a movie from favorites
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(imdb_id): Path<String>,
) -> AppResult<Json<Movie>> {
    tracing::info!(
        request_id = %request_id,
        imdb_id = %imdb_id,
        "Removing favorite"
    );

    let movie = state.catalog.remove_from_favorites(&imdb_id).await?;
    Ok(Json(movie))
}
