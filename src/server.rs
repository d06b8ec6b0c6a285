use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::tmdb::TmdbClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tmdb: Arc<TmdbClient>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let tmdb = Arc::new(TmdbClient::new(&config.tmdb));
        Self {
            config: Arc::new(config),
            tmdb,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/movie/:id", get(crate::handlers::movie_detail))
        .route("/tv/:id", get(crate::handlers::tv_detail))
        .route("/api/search", get(crate::handlers::search))
        .route("/api/search-tv", get(crate::handlers::search_tv))
        .route("/api/popular-movies", get(crate::handlers::popular_movies))
        .route("/sitemap.xml", get(crate::handlers::sitemap))
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
