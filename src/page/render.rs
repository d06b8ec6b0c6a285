//! HTML rendering for detail pages.
//!
//! The document is assembled from small fragment functions, one per
//! page section. Every upstream-supplied string passes through
//! `escape()` at its interpolation point. An optional section whose
//! data is empty contributes the empty string, never an empty shell.

use crate::page::escape::escape;
use crate::page::jsonld;
use crate::page::view::{MediaFacts, PageView, ReviewView, SeasonView};

const CAST_PHOTO_PLACEHOLDER: &str = "https://via.placeholder.com/80x80/666/fff?text=?";

pub fn render(view: &PageView, site_base_url: &str) -> String {
    let canonical = format!(
        "{}/{}/{}",
        site_base_url,
        view.kind.path_segment(),
        view.id
    );
    let structured_data = script_payload(&jsonld::document(view, &canonical));

    let title = escape(&view.title);
    let description = escape(&meta_description(view));
    let og_description = escape(
        view.overview
            .as_deref()
            .unwrap_or("No description available"),
    );
    let poster_url = escape(&view.poster_url);
    let backdrop_url = escape(&view.backdrop_url);
    let og_type = view.kind.og_type();

    let sections = [
        year_fragment(view),
        rating_fragment(view),
        details_fragment(view),
        genres_fragment(view),
        overview_fragment(view),
        crew_fragment(view),
        cast_fragment(view),
        seasons_fragment(view),
        providers_fragment(view),
        keywords_fragment(view),
        reviews_fragment(view),
        production_fragment(view),
        network_fragment(view),
    ]
    .concat();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title} - Verdict</title>
<meta name="description" content="{description}">
<link rel="canonical" href="{canonical}">
<meta property="og:title" content="{title}">
<meta property="og:description" content="{og_description}">
<meta property="og:image" content="{poster_url}">
<meta property="og:url" content="{canonical}">
<meta property="og:type" content="{og_type}">
<script type="application/ld+json">{structured_data}</script>
<style>{style}</style>
</head>
<body>
<div class="background" style="background-image: url('{backdrop_url}')"></div>
<div class="background-overlay"></div>
<div class="app-banner">
<div class="banner-text">Open this in Verdict app for the best experience!</div>
<a href="https://go.daniyar.link/verdict-web" class="download-btn">Download from App Store</a>
</div>
<div class="content-container">
<div class="main-content">
<div class="poster-section">
<div class="poster-container">
<img src="{poster_url}" alt="{title}" class="poster">
<div class="poster-gradient"></div>
</div>
</div>
<div class="title-info">
<h1 class="page-title">{title}</h1>
{sections}</div>
</div>
<div class="footer">made in Verdict</div>
</div>
</body>
</html>
"#,
        style = STYLE,
    )
}

/// The serialized JSON-LD, with `<` encoded so upstream text can never
/// terminate the script element early.
fn script_payload(doc: &serde_json::Value) -> String {
    serde_json::to_string(doc)
        .unwrap_or_else(|_| "{}".to_string())
        .replace('<', "\\u003c")
}

fn meta_description(view: &PageView) -> String {
    match view.overview {
        Some(ref overview) => overview.clone(),
        None => format!(
            "{} - Watch and discover movies and TV shows on Verdict app",
            view.title
        ),
    }
}

fn year_fragment(view: &PageView) -> String {
    match view.year {
        Some(year) => format!(r#"<div class="release-year">{year}</div>
"#),
        None => String::new(),
    }
}

fn rating_fragment(view: &PageView) -> String {
    let Some(ref rating) = view.rating else {
        return String::new();
    };
    let votes = if rating.count > 0 {
        format!(" <span>({} votes)</span>", format_count(rating.count))
    } else {
        String::new()
    };
    format!(
        r#"<div class="rating"><span class="rating-stars">{}</span> <span>{}/10</span>{}</div>
"#,
        rating.stars(),
        rating.average,
        votes
    )
}

fn details_fragment(view: &PageView) -> String {
    let mut chips: Vec<String> = Vec::new();
    match &view.facts {
        MediaFacts::Movie { runtime } => {
            if let Some(runtime) = runtime {
                chips.push(format!("{runtime} minutes"));
            }
        }
        MediaFacts::Series {
            seasons, episodes, ..
        } => {
            if *seasons > 0 {
                let plural = if *seasons > 1 { "s" } else { "" };
                chips.push(format!("{seasons} Season{plural}"));
            }
            if *episodes > 0 {
                chips.push(format!("{episodes} Episodes"));
            }
        }
    }
    if let Some(ref status) = view.status {
        chips.push(escape(status));
    }
    if let Some(ref language) = view.original_language {
        chips.push(escape(&language.to_uppercase()));
    }
    if chips.is_empty() {
        return String::new();
    }

    let items: String = chips
        .iter()
        .map(|chip| format!(r#"<div class="detail-item">{chip}</div>"#))
        .collect();
    format!(
        r#"<div class="details">{items}</div>
"#
    )
}

fn genres_fragment(view: &PageView) -> String {
    tag_list(&view.genres, "genres", "genre-tag")
}

fn keywords_fragment(view: &PageView) -> String {
    if view.keywords.is_empty() {
        return String::new();
    }
    format!(
        "{}{}",
        section_heading("Keywords"),
        tag_list(&view.keywords, "keywords", "keyword-tag")
    )
}

fn tag_list(values: &[String], class: &str, item_class: &str) -> String {
    if values.is_empty() {
        return String::new();
    }
    let tags: String = values
        .iter()
        .map(|value| format!(r#"<span class="{item_class}">{}</span>"#, escape(value)))
        .collect();
    format!(
        r#"<div class="{class}">{tags}</div>
"#
    )
}

fn overview_fragment(view: &PageView) -> String {
    match view.overview {
        Some(ref overview) => format!(
            r#"<div class="overview">{}</div>
"#,
            escape(overview)
        ),
        None => String::new(),
    }
}

fn crew_fragment(view: &PageView) -> String {
    if view.crew.is_empty() {
        return String::new();
    }
    let roles = [
        ("Director", &view.crew.directors),
        ("Writer", &view.crew.writers),
        ("Producer", &view.crew.producers),
    ];
    let blocks: String = roles
        .iter()
        .filter(|(_, names)| !names.is_empty())
        .map(|(role, names)| {
            let joined = escape(&names.join(", "));
            format!(
                r#"<div class="crew-role"><div class="crew-role-title">{role}</div><div class="crew-names">{joined}</div></div>"#
            )
        })
        .collect();
    format!(
        r#"<div class="crew-section">{}<div class="crew-grid">{blocks}</div></div>
"#,
        section_heading("Crew")
    )
}

fn cast_fragment(view: &PageView) -> String {
    if view.cast.is_empty() {
        return String::new();
    }
    let members: String = view
        .cast
        .iter()
        .map(|member| {
            let photo = escape(member.photo_url.as_deref().unwrap_or(CAST_PHOTO_PLACEHOLDER));
            format!(
                r#"<div class="cast-member"><img src="{photo}" alt="{name}" class="cast-photo"><div class="cast-name">{name}</div><div class="cast-character">{character}</div></div>"#,
                name = escape(&member.name),
                character = escape(&member.character),
            )
        })
        .collect();
    format!(
        r#"<div class="cast-section">{}<div class="cast-grid">{members}</div></div>
"#,
        section_heading("Cast")
    )
}

fn seasons_fragment(view: &PageView) -> String {
    let MediaFacts::Series { season_list, .. } = &view.facts else {
        return String::new();
    };
    if season_list.is_empty() {
        return String::new();
    }
    let items: String = season_list.iter().map(season_item).collect();
    format!(
        r#"<div class="seasons-section">{}<div class="season-list">{items}</div></div>
"#,
        section_heading("Seasons")
    )
}

fn season_item(season: &SeasonView) -> String {
    let mut meta: Vec<String> = Vec::new();
    if let Some(ref air_date) = season.air_date {
        meta.push(escape(air_date));
    }
    if season.episode_count > 0 {
        meta.push(format!("{} episodes", season.episode_count));
    }
    let meta_line = if meta.is_empty() {
        String::new()
    } else {
        format!(r#"<div class="season-meta">{}</div>"#, meta.join(" · "))
    };
    let overview = match season.overview {
        Some(ref overview) => format!(r#"<div class="season-overview">{}</div>"#, escape(overview)),
        None => String::new(),
    };
    format!(
        r#"<div class="season-item"><div class="season-title">Season {}</div>{meta_line}{overview}</div>"#,
        season.number
    )
}

fn providers_fragment(view: &PageView) -> String {
    if view.providers.is_empty() {
        return String::new();
    }
    let groups = [
        ("Stream", &view.providers.stream),
        ("Rent", &view.providers.rent),
        ("Buy", &view.providers.buy),
    ];
    let blocks: String = groups
        .iter()
        .filter(|(_, offers)| !offers.is_empty())
        .map(|(label, offers)| {
            let entries: String = offers
                .iter()
                .map(|provider| {
                    let logo = match provider.logo_url {
                        Some(ref url) => {
                            format!(
                                r#"<img src="{}" alt="{}" class="provider-logo">"#,
                                escape(url),
                                escape(&provider.name)
                            )
                        }
                        None => String::new(),
                    };
                    format!(
                        r#"<div class="provider">{logo}<span>{}</span></div>"#,
                        escape(&provider.name)
                    )
                })
                .collect();
            format!(
                r#"<div class="provider-group"><div class="provider-group-title">{label}</div><div class="provider-list">{entries}</div></div>"#
            )
        })
        .collect();
    format!(
        r#"<div class="providers-section">{}<div class="provider-grid">{blocks}</div></div>
"#,
        section_heading(&format!("Where to Watch ({})", escape(&view.region)))
    )
}

fn reviews_fragment(view: &PageView) -> String {
    if view.reviews.is_empty() {
        return String::new();
    }
    let entries: String = view.reviews.iter().map(review_item).collect();
    format!(
        r#"<div class="reviews-section">{}<div class="review-list">{entries}</div></div>
"#,
        section_heading("Reviews")
    )
}

fn review_item(review: &ReviewView) -> String {
    let rating = match review.rating {
        Some(rating) => format!(r#"<span class="review-rating">{rating}/10</span>"#),
        None => String::new(),
    };
    format!(
        r#"<div class="review"><div class="review-header"><span class="review-author">{author}</span>{rating}<span class="review-date">{date}</span></div><div class="review-body">{body}</div></div>"#,
        author = escape(&review.author),
        date = review.created_at.format("%Y-%m-%d"),
        body = escape(&review.body),
    )
}

fn production_fragment(view: &PageView) -> String {
    if view.production_companies.is_empty() {
        return String::new();
    }
    format!(
        r#"<div class="production-info">{}<div class="company-names">{}</div></div>
"#,
        section_heading("Production"),
        escape(&view.production_companies.join(", "))
    )
}

fn network_fragment(view: &PageView) -> String {
    let MediaFacts::Series { networks, .. } = &view.facts else {
        return String::new();
    };
    if networks.is_empty() {
        return String::new();
    }
    format!(
        r#"<div class="network-info">{}<div class="company-names">{}</div></div>
"#,
        section_heading("Network"),
        escape(&networks.join(", "))
    )
}

fn section_heading(text: &str) -> String {
    format!(r#"<h3 class="section-heading">{text}</h3>"#)
}

fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub(crate) const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #000; color: #fff; overflow-x: hidden; }
.background { position: fixed; top: 0; left: 0; width: 100%; height: 100%; background-size: cover; background-position: center; filter: blur(30px); z-index: -2; }
.background.gradient { background-image: linear-gradient(135deg, #1a1a2e 0%, #16213e 50%, #0f3460 100%); filter: none; }
.background-overlay { position: fixed; top: 0; left: 0; width: 100%; height: 100%; background: linear-gradient(to bottom, rgba(0,0,0,0) 0%, rgba(0,0,0,0.9) 70%, rgba(0,0,0,0.9) 100%); z-index: -1; }
.app-banner { background: rgba(0,0,0,0.8); backdrop-filter: blur(20px); border-bottom: 1px solid rgba(255,255,255,0.1); color: white; padding: 20px; text-align: center; font-size: 16px; position: relative; z-index: 100; }
.banner-text { font-weight: 500; margin-bottom: 12px; color: rgba(255,255,255,0.9); }
.download-btn { background: rgba(255,255,255,0.15); border: 1px solid rgba(255,255,255,0.2); color: white; padding: 12px 24px; border-radius: 12px; text-decoration: none; font-weight: 600; display: inline-block; font-size: 15px; }
.download-btn:hover { background: rgba(255,255,255,0.25); }
.content-container { position: relative; z-index: 10; padding-top: 60px; min-height: 100vh; }
.main-content { display: flex; flex-direction: column; gap: 24px; padding: 0 24px; margin-bottom: 24px; }
.poster-section { display: flex; justify-content: center; }
.poster-container { width: 70%; max-width: 280px; position: relative; }
.poster { width: 100%; aspect-ratio: 2/3; object-fit: cover; border-radius: 12px; box-shadow: 0 10px 30px rgba(0,0,0,0.6); }
.poster-gradient { position: absolute; bottom: 0; left: 0; right: 0; height: 40%; background: linear-gradient(to bottom, transparent 0%, rgba(0,0,0,0.3) 100%); border-radius: 0 0 12px 12px; }
.title-info { margin-bottom: 24px; }
.page-title { font-size: 28px; font-weight: 700; line-height: 1.2; margin-bottom: 8px; }
.release-year { font-size: 17px; color: rgba(255,255,255,0.7); margin-bottom: 8px; }
.rating { display: flex; align-items: center; gap: 8px; margin: 12px 0; font-size: 16px; }
.rating-stars { color: #ffd700; }
.details { display: flex; flex-wrap: wrap; gap: 12px; margin: 16px 0; }
.detail-item { background: rgba(255,255,255,0.1); padding: 6px 12px; border-radius: 16px; font-size: 14px; color: rgba(255,255,255,0.9); }
.genres, .keywords { margin: 16px 0; }
.genre-tag, .keyword-tag { display: inline-block; background: rgba(255,255,255,0.15); padding: 4px 12px; border-radius: 12px; font-size: 13px; margin: 0 6px 6px 0; color: rgba(255,255,255,0.9); }
.overview { font-size: 17px; line-height: 1.6; color: rgba(255,255,255,0.9); margin-top: 8px; }
.section-heading { font-size: 18px; margin: 20px 0 10px 0; color: rgba(255,255,255,0.9); }
.crew-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 16px; }
.crew-role { background: rgba(255,255,255,0.05); border-radius: 12px; padding: 16px; }
.crew-role-title { font-size: 14px; font-weight: 600; color: rgba(255,255,255,0.7); margin-bottom: 8px; text-transform: uppercase; letter-spacing: 0.5px; }
.crew-names { font-size: 15px; color: rgba(255,255,255,0.9); line-height: 1.4; }
.cast-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(120px, 1fr)); gap: 16px; }
.cast-member { text-align: center; background: rgba(255,255,255,0.05); border-radius: 12px; padding: 12px; }
.cast-photo { width: 80px; height: 80px; border-radius: 50%; object-fit: cover; margin: 0 auto 8px; display: block; background: rgba(255,255,255,0.1); }
.cast-name { font-size: 14px; font-weight: 600; color: rgba(255,255,255,0.9); margin-bottom: 4px; }
.cast-character { font-size: 12px; color: rgba(255,255,255,0.6); }
.season-list { display: flex; flex-direction: column; gap: 12px; }
.season-item { background: rgba(255,255,255,0.05); border-radius: 12px; padding: 16px; }
.season-title { font-size: 15px; font-weight: 600; }
.season-meta { font-size: 13px; color: rgba(255,255,255,0.6); margin: 4px 0; }
.season-overview { font-size: 14px; color: rgba(255,255,255,0.8); line-height: 1.5; }
.provider-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 16px; }
.provider-group { background: rgba(255,255,255,0.05); border-radius: 12px; padding: 16px; }
.provider-group-title { font-size: 14px; font-weight: 600; color: rgba(255,255,255,0.7); margin-bottom: 8px; text-transform: uppercase; }
.provider { display: flex; align-items: center; gap: 8px; margin: 6px 0; font-size: 14px; }
.provider-logo { width: 28px; height: 28px; border-radius: 6px; }
.review-list { display: flex; flex-direction: column; gap: 12px; }
.review { background: rgba(255,255,255,0.05); border-radius: 12px; padding: 16px; }
.review-header { display: flex; gap: 12px; align-items: baseline; margin-bottom: 8px; }
.review-author { font-weight: 600; }
.review-rating { color: #ffd700; font-size: 14px; }
.review-date { font-size: 13px; color: rgba(255,255,255,0.5); }
.review-body { font-size: 14px; line-height: 1.6; color: rgba(255,255,255,0.85); }
.production-info, .network-info { margin: 16px 0; }
.company-names { font-size: 15px; color: rgba(255,255,255,0.7); }
.footer { text-align: center; padding: 40px 24px; color: rgba(255,255,255,0.6); font-size: 14px; }
@media (min-width: 768px) {
  .main-content { flex-direction: row; align-items: flex-start; gap: 40px; max-width: 1200px; margin: 0 auto; padding: 0 40px; }
  .poster-section { flex: 0 0 300px; justify-content: flex-start; }
  .poster-container { width: 100%; max-width: 300px; }
  .title-info { flex: 1; margin-bottom: 0; }
}
@media (max-width: 768px) { .content-container { padding-top: 40px; } .page-title { font-size: 24px; } }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::view::{
        CastView, CrewBuckets, MediaKind, ProviderOffers, ProviderView, Rating,
    };
    use chrono::{TimeZone, Utc};

    const SITE: &str = "https://verdict.example";

    fn movie_view() -> PageView {
        PageView {
            kind: MediaKind::Movie,
            id: 550,
            title: "Fight Club".into(),
            overview: Some("An insomniac office worker.".into()),
            poster_url: "https://img/poster.jpg".into(),
            backdrop_url: "https://img/backdrop.jpg".into(),
            release_date: Some("1999-10-15".into()),
            year: Some(1999),
            rating: Some(Rating {
                average: 8.4,
                count: 26000,
            }),
            status: Some("Released".into()),
            original_language: Some("en".into()),
            spoken_language: Some("en".into()),
            genres: vec!["Drama".into()],
            production_companies: vec!["Fox 2000 Pictures".into()],
            facts: MediaFacts::Movie { runtime: Some(139) },
            cast: vec![],
            crew: CrewBuckets::default(),
            keywords: vec![],
            reviews: vec![],
            providers: ProviderOffers::default(),
            region: "US".into(),
        }
    }

    fn extract_jsonld(html: &str) -> serde_json::Value {
        let start = html.find(r#"<script type="application/ld+json">"#).unwrap()
            + r#"<script type="application/ld+json">"#.len();
        let end = start + html[start..].find("</script>").unwrap();
        serde_json::from_str(&html[start..end]).unwrap()
    }

    #[test]
    fn test_exactly_one_title_element() {
        let html = render(&movie_view(), SITE);
        assert_eq!(html.matches("<title>").count(), 1);
        assert!(html.contains("<title>Fight Club - Verdict</title>"));
    }

    #[test]
    fn test_title_is_escaped() {
        let mut view = movie_view();
        view.title = r#"<script>alert("xss")</script>"#.into();
        let html = render(&view, SITE);
        assert!(!html.contains(r#"<script>alert("xss")</script>"#));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_jsonld_parses_and_cannot_break_out() {
        let mut view = movie_view();
        view.overview = Some("</script><script>alert(1)</script>".into());
        let html = render(&view, SITE);
        // no premature close inside the ld+json payload
        let doc = extract_jsonld(&html);
        assert_eq!(doc["@type"], "Movie");
        assert_eq!(
            doc["description"],
            "</script><script>alert(1)</script>"
        );
    }

    #[test]
    fn test_canonical_url() {
        let html = render(&movie_view(), SITE);
        assert!(html.contains(r#"<link rel="canonical" href="https://verdict.example/movie/550">"#));
        assert!(html.contains(r#"<meta property="og:type" content="video.movie">"#));
    }

    #[test]
    fn test_empty_cast_renders_no_cast_markup() {
        let html = render(&movie_view(), SITE);
        assert!(!html.contains(r#"class="cast-section""#));
        assert!(!html.contains(r#"class="cast-grid""#));
    }

    #[test]
    fn test_cast_section_present_when_populated() {
        let mut view = movie_view();
        view.cast = vec![CastView {
            name: "Edward Norton".into(),
            character: "The Narrator".into(),
            photo_url: None,
        }];
        let html = render(&view, SITE);
        assert!(html.contains(r#"class="cast-section""#));
        assert!(html.contains("Edward Norton"));
        assert!(html.contains(CAST_PHOTO_PLACEHOLDER));
    }

    #[test]
    fn test_empty_optional_sections_absent() {
        let html = render(&movie_view(), SITE);
        for class in [
            r#"class="crew-section""#,
            r#"class="keywords""#,
            r#"class="reviews-section""#,
            r#"class="providers-section""#,
            r#"class="seasons-section""#,
        ] {
            assert!(!html.contains(class), "unexpected section: {}", class);
        }
    }

    #[test]
    fn test_rating_stars() {
        let html = render(&movie_view(), SITE);
        // 8.4 / 2 = 4.2, rounds to 4 filled stars
        assert!(html.contains("★★★★☆"));
        assert!(html.contains("8.4/10"));
        assert!(html.contains("(26,000 votes)"));
    }

    #[test]
    fn test_review_order_in_markup() {
        let mut view = movie_view();
        view.reviews = vec![
            ReviewView {
                author: "newest-author".into(),
                body: "good".into(),
                rating: Some(9.0),
                created_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            },
            ReviewView {
                author: "older-author".into(),
                body: "fine".into(),
                rating: None,
                created_at: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
            },
        ];
        let html = render(&view, SITE);
        let first = html.find("newest-author").unwrap();
        let second = html.find("older-author").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_series_sections() {
        let mut view = movie_view();
        view.kind = MediaKind::Series;
        view.facts = MediaFacts::Series {
            seasons: 2,
            episodes: 16,
            networks: vec!["AMC".into()],
            season_list: vec![SeasonView {
                number: 1,
                air_date: Some("2008-01-20".into()),
                episode_count: 7,
                overview: Some("Season one.".into()),
            }],
        };
        let html = render(&view, SITE);
        assert!(html.contains("2 Seasons"));
        assert!(html.contains("16 Episodes"));
        assert!(html.contains("Season 1"));
        assert!(html.contains("AMC"));
        assert!(html.contains(r#"<meta property="og:type" content="video.tv_show">"#));
    }

    #[test]
    fn test_providers_section() {
        let mut view = movie_view();
        view.providers = ProviderOffers {
            stream: vec![ProviderView {
                name: "Netflix".into(),
                logo_url: Some("https://img/n.jpg".into()),
            }],
            rent: vec![],
            buy: vec![],
        };
        let html = render(&view, SITE);
        assert!(html.contains("Where to Watch (US)"));
        assert!(html.contains("Netflix"));
        assert!(!html.contains(">Rent<"));
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(5), "5");
        assert_eq!(format_count(1234), "1,234");
        assert_eq!(format_count(26000), "26,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
