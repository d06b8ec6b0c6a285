//! Structured-data (schema.org JSON-LD) emission.
//!
//! The document is built as an object graph and serialized in one go;
//! keys are only inserted when their source value is present, so the
//! output never contains nulls or empty placeholders.

use serde_json::{json, Map, Value};

use crate::page::view::{MediaFacts, MediaKind, PageView};

/// JSON-LD review bodies are capped; the visible page renders the full
/// text.
const REVIEW_BODY_LIMIT: usize = 500;

pub fn document(view: &PageView, canonical_url: &str) -> Value {
    let mut doc = Map::new();
    doc.insert("@context".into(), json!("https://schema.org"));
    doc.insert(
        "@type".into(),
        json!(match view.kind {
            MediaKind::Movie => "Movie",
            MediaKind::Series => "TVSeries",
        }),
    );
    doc.insert("name".into(), json!(view.title));
    doc.insert("url".into(), json!(canonical_url));
    doc.insert(
        "image".into(),
        json!({
            "@type": "ImageObject",
            "url": view.poster_url,
            "width": 500,
            "height": 750
        }),
    );

    if let Some(ref overview) = view.overview {
        doc.insert("description".into(), json!(overview));
    }
    if let Some(ref date) = view.release_date {
        doc.insert("datePublished".into(), json!(date));
    }

    match &view.facts {
        MediaFacts::Movie { runtime } => {
            if let Some(runtime) = runtime {
                doc.insert("duration".into(), json!(format!("PT{runtime}M")));
            }
        }
        MediaFacts::Series {
            seasons, episodes, ..
        } => {
            if *seasons > 0 {
                doc.insert("numberOfSeasons".into(), json!(seasons));
            }
            if *episodes > 0 {
                doc.insert("numberOfEpisodes".into(), json!(episodes));
            }
        }
    }

    if let Some(ref rating) = view.rating {
        doc.insert(
            "aggregateRating".into(),
            json!({
                "@type": "AggregateRating",
                "ratingValue": rating.average,
                "ratingCount": rating.count.max(1),
                "bestRating": 10,
                "worstRating": 1
            }),
        );
    }

    if !view.genres.is_empty() {
        doc.insert("genre".into(), json!(view.genres));
    }
    if !view.production_companies.is_empty() {
        let companies: Vec<Value> = view
            .production_companies
            .iter()
            .map(|name| json!({"@type": "Organization", "name": name}))
            .collect();
        doc.insert("productionCompany".into(), json!(companies));
    }

    if !view.cast.is_empty() {
        let actors: Vec<Value> = view
            .cast
            .iter()
            .map(|member| {
                let mut person = Map::new();
                person.insert("@type".into(), json!("Person"));
                person.insert("name".into(), json!(member.name));
                if !member.character.is_empty() {
                    person.insert("character".into(), json!(member.character));
                }
                Value::Object(person)
            })
            .collect();
        doc.insert("actor".into(), json!(actors));
    }

    if !view.crew.directors.is_empty() {
        doc.insert("director".into(), persons(&view.crew.directors));
    }
    if !view.crew.writers.is_empty() {
        doc.insert("writer".into(), persons(&view.crew.writers));
    }

    if !view.reviews.is_empty() {
        let reviews: Vec<Value> = view
            .reviews
            .iter()
            .map(|review| {
                let mut entry = Map::new();
                entry.insert("@type".into(), json!("Review"));
                entry.insert(
                    "author".into(),
                    json!({"@type": "Person", "name": review.author}),
                );
                entry.insert(
                    "reviewBody".into(),
                    json!(truncate_chars(&review.body, REVIEW_BODY_LIMIT)),
                );
                entry.insert(
                    "datePublished".into(),
                    json!(review.created_at.format("%Y-%m-%d").to_string()),
                );
                if let Some(rating) = review.rating {
                    entry.insert(
                        "reviewRating".into(),
                        json!({
                            "@type": "Rating",
                            "ratingValue": rating,
                            "bestRating": 10,
                            "worstRating": 1
                        }),
                    );
                }
                Value::Object(entry)
            })
            .collect();
        doc.insert("review".into(), json!(reviews));
    }

    doc.insert(
        "inLanguage".into(),
        json!(view.spoken_language.as_deref().unwrap_or("en")),
    );

    Value::Object(doc)
}

fn persons(names: &[String]) -> Value {
    let list: Vec<Value> = names
        .iter()
        .map(|name| json!({"@type": "Person", "name": name}))
        .collect();
    json!(list)
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::view::{CrewBuckets, ProviderOffers, ReviewView};
    use chrono::{TimeZone, Utc};

    fn bare_view() -> PageView {
        PageView {
            kind: MediaKind::Movie,
            id: 550,
            title: "Fight Club".into(),
            overview: None,
            poster_url: "https://img/poster.jpg".into(),
            backdrop_url: "https://img/backdrop.jpg".into(),
            release_date: None,
            year: None,
            rating: None,
            status: None,
            original_language: None,
            spoken_language: None,
            genres: vec![],
            production_companies: vec![],
            facts: MediaFacts::Movie { runtime: None },
            cast: vec![],
            crew: CrewBuckets::default(),
            keywords: vec![],
            reviews: vec![],
            providers: ProviderOffers::default(),
            region: "US".into(),
        }
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let doc = document(&bare_view(), "https://example.org/movie/550");
        let obj = doc.as_object().unwrap();
        assert_eq!(obj["@type"], "Movie");
        assert!(!obj.contains_key("description"));
        assert!(!obj.contains_key("duration"));
        assert!(!obj.contains_key("aggregateRating"));
        assert!(!obj.contains_key("genre"));
        assert!(!obj.contains_key("actor"));
        assert!(!obj.contains_key("review"));
        assert_eq!(obj["inLanguage"], "en");
    }

    #[test]
    fn test_movie_fields() {
        let mut view = bare_view();
        view.overview = Some("An insomniac office worker.".into());
        view.release_date = Some("1999-10-15".into());
        view.facts = MediaFacts::Movie { runtime: Some(139) };
        view.genres = vec!["Drama".into()];

        let doc = document(&view, "https://example.org/movie/550");
        assert_eq!(doc["duration"], "PT139M");
        assert_eq!(doc["datePublished"], "1999-10-15");
        assert_eq!(doc["genre"][0], "Drama");
    }

    #[test]
    fn test_series_counts() {
        let mut view = bare_view();
        view.kind = MediaKind::Series;
        view.facts = MediaFacts::Series {
            seasons: 5,
            episodes: 62,
            networks: vec!["AMC".into()],
            season_list: vec![],
        };
        let doc = document(&view, "https://example.org/tv/1396");
        assert_eq!(doc["@type"], "TVSeries");
        assert_eq!(doc["numberOfSeasons"], 5);
        assert_eq!(doc["numberOfEpisodes"], 62);
    }

    #[test]
    fn test_review_body_truncated_to_500() {
        let mut view = bare_view();
        view.reviews = vec![ReviewView {
            author: "a".into(),
            body: "x".repeat(900),
            rating: Some(9.0),
            created_at: Utc.with_ymd_and_hms(2021, 3, 4, 0, 0, 0).unwrap(),
        }];
        let doc = document(&view, "u");
        let body = doc["review"][0]["reviewBody"].as_str().unwrap();
        assert_eq!(body.chars().count(), 500);
        assert_eq!(doc["review"][0]["datePublished"], "2021-03-04");
    }

    #[test]
    fn test_serializes_to_valid_json() {
        let mut view = bare_view();
        view.title = "Quote \" and <script>".into();
        let text = serde_json::to_string(&document(&view, "u")).unwrap();
        let round_trip: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(round_trip["name"], "Quote \" and <script>");
    }
}
