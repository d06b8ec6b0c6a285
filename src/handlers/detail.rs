use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::handlers::{html_response, ApiError};
use crate::page::aggregate::{movie_page, series_page, PageError};
use crate::page::not_found::{popular_entries, render_not_found};
use crate::page::render::render;
use crate::page::view::{resolve_region, MediaKind};
use crate::server::AppState;
use crate::tmdb::types::{MovieSearchResult, ResultsPage};

pub async fn movie_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    detail(state, MediaKind::Movie, id, headers).await
}

pub async fn tv_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    detail(state, MediaKind::Series, id, headers).await
}

async fn detail(state: AppState, kind: MediaKind, id: i64, headers: HeaderMap) -> Response {
    if !state.tmdb.has_credentials() {
        return ApiError::Credentials.into_response();
    }

    let region = resolve_region(
        headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok()),
    );

    let result = match kind {
        MediaKind::Movie => movie_page(&state.tmdb, id, &region).await,
        MediaKind::Series => series_page(&state.tmdb, id, &region).await,
    };

    match result {
        Ok(view) => html_response(StatusCode::OK, render(&view, &state.config.site.base_url)),
        Err(PageError::NotFound) => not_found_page(&state, kind).await,
        Err(PageError::Upstream(e)) => {
            error!(id, kind = kind.path_segment(), error = %e, "mandatory fetch failed");
            let message = match kind {
                MediaKind::Movie => "Failed to fetch movie data",
                MediaKind::Series => "Failed to fetch TV series data",
            };
            ApiError::Upstream(message.to_string()).into_response()
        }
    }
}

/// 404s get a browse page instead of an error body. The popular list
/// backing it is itself best-effort.
async fn not_found_page(state: &AppState, kind: MediaKind) -> Response {
    let popular = state
        .tmdb
        .get_or_default::<ResultsPage<MovieSearchResult>>("/movie/popular")
        .await;
    let entries = popular_entries(&state.tmdb, &popular.results);
    html_response(StatusCode::NOT_FOUND, render_not_found(kind, &entries))
}
