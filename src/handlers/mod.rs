pub mod detail;
pub mod search;
pub mod sitemap;

pub use detail::{movie_detail, tv_detail};
pub use search::{popular_movies, search, search_tv};
pub use sitemap::sitemap;

use axum::http::{header, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub(crate) const HTML_CACHE: &str = "public, s-maxage=3600, stale-while-revalidate=86400";
pub(crate) const SEARCH_CACHE: &str = "s-maxage=300, stale-while-revalidate=600";
pub(crate) const POPULAR_CACHE: &str = "s-maxage=1800, stale-while-revalidate=3600";

// Pages only carry inline styles, https images and a self-targeted
// search form; everything else is locked down.
const CSP: &str = "default-src 'none'; img-src https: data:; style-src 'unsafe-inline'; \
                   form-action 'self'; base-uri 'none'; frame-ancestors 'none'";

/// Error shape for the JSON endpoints and for page handlers that fail
/// before they can render HTML. Serializes as `{"error": message}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("TMDB credentials are not configured")]
    Credentials,
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Credentials | ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({"error": self.to_string()}))).into_response()
    }
}

/// HTML response with the caching and hardening headers every page
/// gets. `Vary: Accept-Language` because the watch-provider section
/// depends on the viewer's region.
pub(crate) fn html_response(status: StatusCode, body: String) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, "text/html; charset=UTF-8"),
            (header::CACHE_CONTROL, HTML_CACHE),
            (header::VARY, "Accept-Language"),
            (header::CONTENT_SECURITY_POLICY, CSP),
            (header::X_FRAME_OPTIONS, "DENY"),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
            (header::REFERRER_POLICY, "strict-origin-when-cross-origin"),
            (
                HeaderName::from_static("permissions-policy"),
                "camera=(), microphone=(), geolocation=()",
            ),
        ],
        body,
    )
        .into_response()
}

pub(crate) fn json_response(value: serde_json::Value, cache_control: &'static str) -> Response {
    (
        StatusCode::OK,
        [(header::CACHE_CONTROL, cache_control)],
        Json(value),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_statuses() {
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Credentials.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Upstream("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_html_response_headers() {
        let response = html_response(StatusCode::OK, "<html></html>".to_string());
        let headers = response.headers();
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=UTF-8"
        );
        assert_eq!(headers.get(header::VARY).unwrap(), "Accept-Language");
        assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
        assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));
        assert!(headers.contains_key("permissions-policy"));
        assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), HTML_CACHE);
    }
}
