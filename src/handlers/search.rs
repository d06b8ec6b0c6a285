use axum::extract::{Query, State};
use axum::response::Response;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::handlers::{json_response, ApiError, POPULAR_CACHE, SEARCH_CACHE};
use crate::server::AppState;
use crate::tmdb::types::{MovieSearchResult, ResultsPage, TvSearchResult};

pub const SEARCH_RESULT_LIMIT: usize = 8;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    query: Option<String>,
}

/// One merged search hit. Movies and TV shows use different native
/// title/date field names; both are normalized here and the origin kind
/// kept as `media_type`.
#[derive(Debug, Serialize)]
pub struct SearchItem {
    pub id: i64,
    pub media_type: &'static str,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    pub popularity: f64,
    pub vote_average: f64,
}

/// Combined movie + TV search. Each side is best-effort; an empty page
/// from one kind still returns the other's hits.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    if !state.tmdb.has_credentials() {
        return Err(ApiError::Credentials);
    }
    let query = validated_query(&params)?;
    let encoded = urlencoding::encode(&query);
    let movie_path = format!("/search/movie?query={encoded}&page=1");
    let tv_path = format!("/search/tv?query={encoded}&page=1");

    let (movies, shows) = tokio::join!(
        state
            .tmdb
            .get_or_default::<ResultsPage<MovieSearchResult>>(&movie_path),
        state
            .tmdb
            .get_or_default::<ResultsPage<TvSearchResult>>(&tv_path),
    );

    let results = merge_results(movies.results, shows.results);
    let total = results.len();
    Ok(json_response(
        json!({
            "page": 1,
            "results": results,
            "total_results": total,
            "total_pages": 1
        }),
        SEARCH_CACHE,
    ))
}

/// TV-only search; unlike the combined endpoint the single upstream
/// call is mandatory, and the TMDB page is passed through unchanged.
pub async fn search_tv(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    if !state.tmdb.has_credentials() {
        return Err(ApiError::Credentials);
    }
    let query = validated_query(&params)?;
    let path = format!("/search/tv?query={}&page=1", urlencoding::encode(&query));

    let page = state
        .tmdb
        .get::<serde_json::Value>(&path)
        .await
        .map_err(|e| {
            error!(error = %e, "TV search failed");
            ApiError::Upstream("Failed to search TV shows".to_string())
        })?;

    Ok(json_response(page, SEARCH_CACHE))
}

pub async fn popular_movies(State(state): State<AppState>) -> Result<Response, ApiError> {
    if !state.tmdb.has_credentials() {
        return Err(ApiError::Credentials);
    }

    let page = state
        .tmdb
        .get::<serde_json::Value>("/movie/popular")
        .await
        .map_err(|e| {
            error!(error = %e, "popular movies fetch failed");
            ApiError::Upstream("Failed to fetch popular movies".to_string())
        })?;

    Ok(json_response(page, POPULAR_CACHE))
}

fn validated_query(params: &SearchParams) -> Result<String, ApiError> {
    let query = params.query.as_deref().unwrap_or("").trim().to_string();
    if query.chars().count() < 2 {
        return Err(ApiError::Validation(
            "Query must be at least 2 characters".to_string(),
        ));
    }
    Ok(query)
}

fn merge_results(movies: Vec<MovieSearchResult>, shows: Vec<TvSearchResult>) -> Vec<SearchItem> {
    let mut items: Vec<SearchItem> = movies
        .into_iter()
        .map(movie_item)
        .chain(shows.into_iter().map(tv_item))
        .collect();
    items.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
    items.truncate(SEARCH_RESULT_LIMIT);
    items
}

fn movie_item(movie: MovieSearchResult) -> SearchItem {
    SearchItem {
        id: movie.id,
        media_type: "movie",
        title: movie.title,
        date: movie.release_date,
        overview: movie.overview,
        poster_path: movie.poster_path,
        popularity: movie.popularity,
        vote_average: movie.vote_average,
    }
}

fn tv_item(show: TvSearchResult) -> SearchItem {
    SearchItem {
        id: show.id,
        media_type: "tv",
        title: show.name,
        date: show.first_air_date,
        overview: show.overview,
        poster_path: show.poster_path,
        popularity: show.popularity,
        vote_average: show.vote_average,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(query: Option<&str>) -> SearchParams {
        SearchParams {
            query: query.map(String::from),
        }
    }

    #[test]
    fn test_query_validation() {
        assert!(validated_query(&params(None)).is_err());
        assert!(validated_query(&params(Some("a"))).is_err());
        assert!(validated_query(&params(Some("  b  "))).is_err());
        assert_eq!(validated_query(&params(Some(" batman "))).unwrap(), "batman");
    }

    fn movie(id: i64, title: &str, popularity: f64) -> MovieSearchResult {
        serde_json::from_value(json!({"id": id, "title": title, "popularity": popularity}))
            .unwrap()
    }

    fn show(id: i64, name: &str, popularity: f64) -> TvSearchResult {
        serde_json::from_value(
            json!({"id": id, "name": name, "first_air_date": "2019-01-01", "popularity": popularity}),
        )
        .unwrap()
    }

    #[test]
    fn test_merge_tags_and_sorts_by_popularity() {
        let merged = merge_results(
            vec![movie(1, "Batman", 50.0), movie(2, "Batman Begins", 80.0)],
            vec![show(3, "Batman: TAS", 65.0)],
        );
        let order: Vec<(i64, &str)> = merged
            .iter()
            .map(|item| (item.id, item.media_type))
            .collect();
        assert_eq!(order, vec![(2, "movie"), (3, "tv"), (1, "movie")]);
        // TV "name" normalized into the shared title field
        assert_eq!(merged[1].title, "Batman: TAS");
        assert_eq!(merged[1].date.as_deref(), Some("2019-01-01"));
    }

    #[test]
    fn test_merge_caps_at_eight() {
        let movies: Vec<MovieSearchResult> = (0..6)
            .map(|i| movie(i, "m", 100.0 - i as f64))
            .collect();
        let shows: Vec<TvSearchResult> = (10..16).map(|i| show(i, "s", 50.0 - i as f64)).collect();
        let merged = merge_results(movies, shows);
        assert_eq!(merged.len(), SEARCH_RESULT_LIMIT);
        // the six movies outrank every show; the two most popular shows fill the rest
        assert!(merged.windows(2).all(|w| w[0].popularity >= w[1].popularity));
        assert_eq!(merged[7].popularity, 39.0);
    }

    #[test]
    fn test_search_item_serialization() {
        let item = tv_item(show(42, "Dark", 33.5));
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["media_type"], "tv");
        assert_eq!(value["title"], "Dark");
        assert!(value.get("overview").is_none());
    }
}
