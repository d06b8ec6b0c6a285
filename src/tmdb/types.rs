//! Serde models for the TMDB payloads this server consumes.
//!
//! Every field that TMDB may omit or null out is either an `Option` or
//! carries `#[serde(default)]`, so a sparse upstream record never fails
//! deserialization.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProductionCompany {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Network {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpokenLanguage {
    #[serde(default)]
    pub iso_639_1: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetail {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeriesDetail {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub number_of_seasons: u32,
    #[serde(default)]
    pub number_of_episodes: u32,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub networks: Vec<Network>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub seasons: Vec<SeasonSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonSummary {
    pub season_number: i32,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub episode_count: u32,
    #[serde(default)]
    pub overview: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonDetail {
    pub season_number: i32,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub episodes: Vec<EpisodeSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeSummary {
    #[serde(default)]
    pub overview: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    pub name: String,
    #[serde(default)]
    pub job: String,
}

/// Movie keywords arrive under `keywords`, TV keywords under `results`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordList {
    #[serde(default, alias = "results")]
    pub keywords: Vec<Keyword>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Keyword {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewPage {
    #[serde(default)]
    pub results: Vec<Review>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    pub author: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub author_details: ReviewAuthorDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewAuthorDetails {
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchProviderMap {
    #[serde(default)]
    pub results: HashMap<String, RegionOffers>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionOffers {
    #[serde(default)]
    pub flatrate: Vec<ProviderEntry>,
    #[serde(default)]
    pub rent: Vec<ProviderEntry>,
    #[serde(default)]
    pub buy: Vec<ProviderEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderEntry {
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultsPage<T> {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub results: Vec<T>,
}

impl<T> Default for ResultsPage<T> {
    fn default() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MovieSearchResult {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TvSearchResult {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_movie_deserializes() {
        let movie: MovieDetail =
            serde_json::from_str(r#"{"id": 550, "title": "Fight Club", "runtime": null}"#).unwrap();
        assert_eq!(movie.id, 550);
        assert_eq!(movie.runtime, None);
        assert!(movie.genres.is_empty());
        assert_eq!(movie.vote_average, 0.0);
    }

    #[test]
    fn test_keyword_list_accepts_both_field_names() {
        let movie: KeywordList =
            serde_json::from_str(r#"{"keywords": [{"id": 1, "name": "heist"}]}"#).unwrap();
        assert_eq!(movie.keywords[0].name, "heist");

        let tv: KeywordList =
            serde_json::from_str(r#"{"results": [{"id": 2, "name": "space"}]}"#).unwrap();
        assert_eq!(tv.keywords[0].name, "space");
    }

    #[test]
    fn test_watch_providers_by_region() {
        let json = r#"{"results": {"US": {"flatrate": [{"provider_name": "Netflix", "logo_path": "/n.jpg"}]}}}"#;
        let providers: WatchProviderMap = serde_json::from_str(json).unwrap();
        let us = &providers.results["US"];
        assert_eq!(us.flatrate[0].provider_name, "Netflix");
        assert!(us.rent.is_empty());
    }
}
