//! Fetch fan-out and view assembly.
//!
//! The primary entity fetch is mandatory and runs first; every
//! sub-resource (credits, keywords, reviews, watch providers, season
//! details) is fetched concurrently through the lenient client path, so
//! a failed sub-resource degrades its page section instead of failing
//! the page.

use futures::future::join_all;

use crate::page::view::{
    bucket_crew, cast_views, display_year, review_views, MediaFacts, MediaKind, PageView,
    ProviderOffers, ProviderView, Rating, SeasonView, KEYWORD_DISPLAY_LIMIT, SEASON_DISPLAY_LIMIT,
};
use crate::tmdb::types::{
    Credits, KeywordList, MovieDetail, ProviderEntry, ReviewPage, SeasonDetail, SeasonSummary,
    SeriesDetail, WatchProviderMap,
};
use crate::tmdb::{TmdbClient, TmdbError};

pub const PLACEHOLDER_POSTER: &str =
    "https://via.placeholder.com/300x450/cccccc/666666?text=No+Image";

const POSTER_SIZE: &str = "w500";
const BACKDROP_SIZE: &str = "w1280";
const PROFILE_SIZE: &str = "w185";
const PROVIDER_LOGO_SIZE: &str = "w92";

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("entity not found upstream")]
    NotFound,
    #[error(transparent)]
    Upstream(TmdbError),
}

impl From<TmdbError> for PageError {
    fn from(e: TmdbError) -> Self {
        if e.is_not_found() {
            PageError::NotFound
        } else {
            PageError::Upstream(e)
        }
    }
}

pub async fn movie_page(
    client: &TmdbClient,
    id: i64,
    region: &str,
) -> Result<PageView, PageError> {
    let movie: MovieDetail = client.get(&format!("/movie/{id}")).await?;

    let credits_path = format!("/movie/{id}/credits");
    let keywords_path = format!("/movie/{id}/keywords");
    let reviews_path = format!("/movie/{id}/reviews");
    let providers_path = format!("/movie/{id}/watch/providers");
    let (credits, keywords, reviews, providers) = tokio::join!(
        client.get_or_default::<Credits>(&credits_path),
        client.get_or_default::<KeywordList>(&keywords_path),
        client.get_or_default::<ReviewPage>(&reviews_path),
        client.get_or_default::<WatchProviderMap>(&providers_path),
    );

    Ok(build_movie_view(
        client, movie, credits, keywords, reviews, providers, region,
    ))
}

pub async fn series_page(
    client: &TmdbClient,
    id: i64,
    region: &str,
) -> Result<PageView, PageError> {
    let series: SeriesDetail = client.get(&format!("/tv/{id}")).await?;

    // Season numbers come from the primary response, so the per-season
    // batch can only start after it. It still runs concurrently with
    // the other sub-resources.
    let season_fetches = displayed_seasons(&series.seasons).map(|summary| {
        let path = format!("/tv/{}/season/{}", id, summary.season_number);
        async move { client.get_or_default::<Option<SeasonDetail>>(&path).await }
    });

    let credits_path = format!("/tv/{id}/credits");
    let keywords_path = format!("/tv/{id}/keywords");
    let reviews_path = format!("/tv/{id}/reviews");
    let providers_path = format!("/tv/{id}/watch/providers");
    let (credits, keywords, reviews, providers, season_details) = tokio::join!(
        client.get_or_default::<Credits>(&credits_path),
        client.get_or_default::<KeywordList>(&keywords_path),
        client.get_or_default::<ReviewPage>(&reviews_path),
        client.get_or_default::<WatchProviderMap>(&providers_path),
        join_all(season_fetches),
    );

    Ok(build_series_view(
        client,
        series,
        credits,
        keywords,
        reviews,
        providers,
        season_details,
        region,
    ))
}

fn build_movie_view(
    client: &TmdbClient,
    movie: MovieDetail,
    credits: Credits,
    keywords: KeywordList,
    reviews: ReviewPage,
    providers: WatchProviderMap,
    region: &str,
) -> PageView {
    let poster_url = resolve_poster(client, movie.poster_path.as_deref());
    let backdrop_url = resolve_backdrop(client, movie.backdrop_path.as_deref(), &poster_url);

    PageView {
        kind: MediaKind::Movie,
        id: movie.id,
        title: movie.title,
        overview: non_empty(movie.overview),
        poster_url,
        backdrop_url,
        year: display_year(movie.release_date.as_deref()),
        release_date: non_empty(movie.release_date),
        rating: rating(movie.vote_average, movie.vote_count),
        status: non_empty(movie.status),
        original_language: non_empty(movie.original_language),
        spoken_language: first_language(&movie.spoken_languages),
        genres: movie.genres.into_iter().map(|g| g.name).collect(),
        production_companies: movie
            .production_companies
            .into_iter()
            .map(|c| c.name)
            .collect(),
        facts: MediaFacts::Movie {
            runtime: movie.runtime.filter(|r| *r > 0),
        },
        cast: cast_views(&credits.cast, |p| client.image_url(PROFILE_SIZE, p)),
        crew: bucket_crew(&credits.crew, MediaKind::Movie),
        keywords: keyword_names(keywords),
        reviews: review_views(reviews.results),
        providers: provider_offers(&providers, region, |p| {
            client.image_url(PROVIDER_LOGO_SIZE, p)
        }),
        region: region.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn build_series_view(
    client: &TmdbClient,
    series: SeriesDetail,
    credits: Credits,
    keywords: KeywordList,
    reviews: ReviewPage,
    providers: WatchProviderMap,
    season_details: Vec<Option<SeasonDetail>>,
    region: &str,
) -> PageView {
    let poster_url = resolve_poster(client, series.poster_path.as_deref());
    let backdrop_url = resolve_backdrop(client, series.backdrop_path.as_deref(), &poster_url);
    let season_list = season_views(
        displayed_seasons(&series.seasons).collect::<Vec<_>>().as_slice(),
        season_details,
    );

    PageView {
        kind: MediaKind::Series,
        id: series.id,
        title: series.name,
        overview: non_empty(series.overview),
        poster_url,
        backdrop_url,
        year: display_year(series.first_air_date.as_deref()),
        release_date: non_empty(series.first_air_date),
        rating: rating(series.vote_average, series.vote_count),
        status: non_empty(series.status),
        original_language: non_empty(series.original_language),
        spoken_language: first_language(&series.spoken_languages),
        genres: series.genres.into_iter().map(|g| g.name).collect(),
        production_companies: series
            .production_companies
            .into_iter()
            .map(|c| c.name)
            .collect(),
        facts: MediaFacts::Series {
            seasons: series.number_of_seasons,
            episodes: series.number_of_episodes,
            networks: series.networks.into_iter().map(|n| n.name).collect(),
            season_list,
        },
        cast: cast_views(&credits.cast, |p| client.image_url(PROFILE_SIZE, p)),
        crew: bucket_crew(&credits.crew, MediaKind::Series),
        keywords: keyword_names(keywords),
        reviews: review_views(reviews.results),
        providers: provider_offers(&providers, region, |p| {
            client.image_url(PROVIDER_LOGO_SIZE, p)
        }),
        region: region.to_string(),
    }
}

/// Seasons eligible for display: specials (season 0) excluded, first
/// ten kept, upstream order.
fn displayed_seasons(seasons: &[SeasonSummary]) -> impl Iterator<Item = &SeasonSummary> {
    seasons
        .iter()
        .filter(|s| s.season_number != 0)
        .take(SEASON_DISPLAY_LIMIT)
}

fn season_views(
    summaries: &[&SeasonSummary],
    details: Vec<Option<SeasonDetail>>,
) -> Vec<SeasonView> {
    let mut views: Vec<SeasonView> = summaries
        .iter()
        .zip(details)
        .map(|(summary, detail)| match detail {
            Some(detail) => SeasonView {
                number: summary.season_number,
                air_date: detail.air_date.or_else(|| summary.air_date.clone()),
                episode_count: if detail.episodes.is_empty() {
                    summary.episode_count
                } else {
                    detail.episodes.len() as u32
                },
                overview: non_empty(detail.overview)
                    .or_else(|| {
                        detail
                            .episodes
                            .first()
                            .and_then(|e| non_empty(e.overview.clone()))
                    })
                    .or_else(|| non_empty(summary.overview.clone())),
            },
            // Detail fetch failed: degrade to what the primary carried.
            None => SeasonView {
                number: summary.season_number,
                air_date: summary.air_date.clone(),
                episode_count: summary.episode_count,
                overview: non_empty(summary.overview.clone()),
            },
        })
        .collect();
    views.sort_by_key(|v| v.number);
    views
}

fn provider_offers(
    map: &WatchProviderMap,
    region: &str,
    logo_url: impl Fn(&str) -> String,
) -> ProviderOffers {
    let Some(offers) = map.results.get(region) else {
        return ProviderOffers::default();
    };
    let convert = |entries: &[ProviderEntry]| -> Vec<ProviderView> {
        entries
            .iter()
            .map(|p| ProviderView {
                name: p.provider_name.clone(),
                logo_url: p.logo_path.as_deref().map(&logo_url),
            })
            .collect()
    };
    ProviderOffers {
        stream: convert(&offers.flatrate),
        rent: convert(&offers.rent),
        buy: convert(&offers.buy),
    }
}

fn resolve_poster(client: &TmdbClient, path: Option<&str>) -> String {
    path.map(|p| client.image_url(POSTER_SIZE, p))
        .unwrap_or_else(|| PLACEHOLDER_POSTER.to_string())
}

fn resolve_backdrop(client: &TmdbClient, path: Option<&str>, poster_url: &str) -> String {
    path.map(|p| client.image_url(BACKDROP_SIZE, p))
        .unwrap_or_else(|| poster_url.to_string())
}

fn keyword_names(keywords: KeywordList) -> Vec<String> {
    keywords
        .keywords
        .into_iter()
        .take(KEYWORD_DISPLAY_LIMIT)
        .map(|k| k.name)
        .collect()
}

fn rating(average: f64, count: u64) -> Option<Rating> {
    (average > 0.0).then_some(Rating { average, count })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn first_language(languages: &[crate::tmdb::types::SpokenLanguage]) -> Option<String> {
    languages
        .first()
        .map(|l| l.iso_639_1.clone())
        .filter(|s| !s.is_empty())
}
