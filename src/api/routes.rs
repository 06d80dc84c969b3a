use axum::{
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// Routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        // Search
        .route("/movies/search", get(handlers::search_movies))
        // Favorites
        .route(
            "/favorites",
            get(handlers::get_favorites).post(handlers::add_favorite),
        )
        .route(
            "/favorites/:imdb_id",
            get(handlers::get_favorite).delete(handlers::remove_favorite),
        )
}
