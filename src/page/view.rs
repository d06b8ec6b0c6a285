//! Render-ready view of one catalog entity.
//!
//! The aggregator assembles a `PageView` out of the primary TMDB record
//! and whatever sub-resources survived the fan-out. Everything here is
//! fully resolved: URLs are absolute, collections are capped, crew is
//! bucketed. The renderer never touches raw TMDB types.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::page::escape::strip_tags;
use crate::tmdb::types::{CastMember, CrewMember, Review};

pub const CAST_DISPLAY_LIMIT: usize = 6;
pub const CREW_BUCKET_LIMIT: usize = 3;
pub const KEYWORD_DISPLAY_LIMIT: usize = 10;
pub const REVIEW_DISPLAY_LIMIT: usize = 3;
pub const SEASON_DISPLAY_LIMIT: usize = 10;

pub const FALLBACK_REGION: &str = "US";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Movie,
    Series,
}

impl MediaKind {
    pub fn path_segment(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }

    pub fn og_type(&self) -> &'static str {
        match self {
            MediaKind::Movie => "video.movie",
            MediaKind::Series => "video.tv_show",
        }
    }

    pub fn display_noun(&self) -> &'static str {
        match self {
            MediaKind::Movie => "Movie",
            MediaKind::Series => "TV Series",
        }
    }
}

#[derive(Debug)]
pub struct PageView {
    pub kind: MediaKind,
    pub id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub poster_url: String,
    pub backdrop_url: String,
    pub release_date: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<Rating>,
    pub status: Option<String>,
    pub original_language: Option<String>,
    pub spoken_language: Option<String>,
    pub genres: Vec<String>,
    pub production_companies: Vec<String>,
    pub facts: MediaFacts,
    pub cast: Vec<CastView>,
    pub crew: CrewBuckets,
    pub keywords: Vec<String>,
    pub reviews: Vec<ReviewView>,
    pub providers: ProviderOffers,
    pub region: String,
}

#[derive(Debug)]
pub enum MediaFacts {
    Movie {
        runtime: Option<u32>,
    },
    Series {
        seasons: u32,
        episodes: u32,
        networks: Vec<String>,
        season_list: Vec<SeasonView>,
    },
}

#[derive(Debug, Clone)]
pub struct Rating {
    pub average: f64,
    pub count: u64,
}

impl Rating {
    pub fn stars(&self) -> String {
        star_glyphs(self.average)
    }
}

/// Maps a 10-point average onto exactly five star glyphs.
pub fn star_glyphs(average: f64) -> String {
    let filled = ((average / 2.0).round() as i64).clamp(0, 5) as usize;
    let mut stars = "★".repeat(filled);
    stars.push_str(&"☆".repeat(5 - filled));
    stars
}

#[derive(Debug, Clone)]
pub struct CastView {
    pub name: String,
    pub character: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CrewBuckets {
    pub directors: Vec<String>,
    pub writers: Vec<String>,
    pub producers: Vec<String>,
}

impl CrewBuckets {
    pub fn is_empty(&self) -> bool {
        self.directors.is_empty() && self.writers.is_empty() && self.producers.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ReviewView {
    pub author: String,
    /// Markup-stripped body text, not yet HTML-escaped.
    pub body: String,
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ProviderOffers {
    pub stream: Vec<ProviderView>,
    pub rent: Vec<ProviderView>,
    pub buy: Vec<ProviderView>,
}

impl ProviderOffers {
    pub fn is_empty(&self) -> bool {
        self.stream.is_empty() && self.rent.is_empty() && self.buy.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ProviderView {
    pub name: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SeasonView {
    pub number: i32,
    pub air_date: Option<String>,
    pub episode_count: u32,
    pub overview: Option<String>,
}

/// Year shown under the title; `None` renders as "Unknown".
pub fn display_year(date: Option<&str>) -> Option<i32> {
    let date = date?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

/// Resolves the viewer's watch-provider region from `Accept-Language`.
/// Takes the first entry, drops any quality weight, and uses the second
/// segment of a two-part locale. Anything else falls back to "US".
pub fn resolve_region(header: Option<&str>) -> String {
    let Some(value) = header else {
        return FALLBACK_REGION.to_string();
    };
    let first = value
        .split(',')
        .next()
        .unwrap_or("")
        .split(';')
        .next()
        .unwrap_or("")
        .trim();
    let mut parts = first.split('-');
    let _language = parts.next();
    match parts.next() {
        Some(region) if region.len() == 2 && region.chars().all(|c| c.is_ascii_alphabetic()) => {
            region.to_ascii_uppercase()
        }
        _ => FALLBACK_REGION.to_string(),
    }
}

const MOVIE_WRITER_JOBS: &[&str] = &["Writer", "Screenplay", "Story"];
const SERIES_WRITER_JOBS: &[&str] = &["Writer", "Screenplay", "Story", "Creator"];
const MOVIE_PRODUCER_JOBS: &[&str] = &["Producer"];
const SERIES_PRODUCER_JOBS: &[&str] = &["Producer", "Executive Producer"];

/// Sorts crew members into display buckets by exact job-title match,
/// keeping upstream order, capped per bucket.
pub fn bucket_crew(crew: &[CrewMember], kind: MediaKind) -> CrewBuckets {
    let (writer_jobs, producer_jobs) = match kind {
        MediaKind::Movie => (MOVIE_WRITER_JOBS, MOVIE_PRODUCER_JOBS),
        MediaKind::Series => (SERIES_WRITER_JOBS, SERIES_PRODUCER_JOBS),
    };

    let mut buckets = CrewBuckets::default();
    for member in crew {
        if member.job == "Director" && buckets.directors.len() < CREW_BUCKET_LIMIT {
            buckets.directors.push(member.name.clone());
        }
        if writer_jobs.contains(&member.job.as_str()) && buckets.writers.len() < CREW_BUCKET_LIMIT {
            buckets.writers.push(member.name.clone());
        }
        if producer_jobs.contains(&member.job.as_str())
            && buckets.producers.len() < CREW_BUCKET_LIMIT
        {
            buckets.producers.push(member.name.clone());
        }
    }
    buckets
}

pub fn cast_views(cast: &[CastMember], photo_url: impl Fn(&str) -> String) -> Vec<CastView> {
    cast.iter()
        .take(CAST_DISPLAY_LIMIT)
        .map(|member| CastView {
            name: member.name.clone(),
            character: member.character.clone().unwrap_or_default(),
            photo_url: member.profile_path.as_deref().map(&photo_url),
        })
        .collect()
}

/// Only reviews with a parseable timestamp are displayable; newest
/// first, capped. Bodies are markup-stripped here so the renderer and
/// the structured-data emitter work from the same text.
pub fn review_views(reviews: Vec<Review>) -> Vec<ReviewView> {
    let mut views: Vec<ReviewView> = reviews
        .into_iter()
        .filter_map(|review| {
            let created_at = review
                .created_at
                .as_deref()
                .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())?
                .with_timezone(&Utc);
            Some(ReviewView {
                author: review.author,
                body: strip_tags(&review.content),
                rating: review.author_details.rating,
                created_at,
            })
        })
        .collect();
    views.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    views.truncate(REVIEW_DISPLAY_LIMIT);
    views
}
