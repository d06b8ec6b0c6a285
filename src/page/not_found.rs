//! Fallback page for entities the catalog doesn't know.
//!
//! Instead of a bare error, the viewer gets a search box and a
//! "Popular Now" browse grid. The grid comes from a best-effort popular
//! fetch; when that fails too, the page falls back to a gradient
//! background and no grid.

use crate::page::escape::escape;
use crate::page::render::STYLE;
use crate::page::view::{display_year, MediaKind};
use crate::tmdb::types::MovieSearchResult;
use crate::tmdb::TmdbClient;

pub const POPULAR_GRID_LIMIT: usize = 8;

#[derive(Debug, Clone)]
pub struct PopularEntry {
    pub id: i64,
    pub title: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub year: Option<i32>,
}

pub fn popular_entries(client: &TmdbClient, results: &[MovieSearchResult]) -> Vec<PopularEntry> {
    results
        .iter()
        .take(POPULAR_GRID_LIMIT)
        .map(|movie| PopularEntry {
            id: movie.id,
            title: movie.title.clone(),
            poster_url: movie
                .poster_path
                .as_deref()
                .map(|p| client.image_url("w342", p)),
            backdrop_url: movie
                .backdrop_path
                .as_deref()
                .map(|p| client.image_url("w1280", p)),
            year: display_year(movie.release_date.as_deref()),
        })
        .collect()
}

pub fn render_not_found(kind: MediaKind, popular: &[PopularEntry]) -> String {
    let noun = kind.display_noun();

    // Backdrop from the first popular title, gradient when nothing came back.
    let background = match popular.iter().find_map(|entry| entry.backdrop_url.as_deref()) {
        Some(url) => format!(
            r#"<div class="background" style="background-image: url('{}')"></div>"#,
            escape(url)
        ),
        None => r#"<div class="background gradient"></div>"#.to_string(),
    };

    let popular_section = if popular.is_empty() {
        String::new()
    } else {
        let cards: String = popular.iter().map(popular_card).collect();
        format!(
            r#"<div class="popular-section"><h3 class="section-heading">Popular Now</h3><div class="popular-grid">{cards}</div></div>
"#
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{noun} Not Found - Verdict</title>
<meta name="robots" content="noindex">
<style>{style}{extra_style}</style>
</head>
<body>
{background}
<div class="background-overlay"></div>
<div class="content-container">
<div class="not-found">
<h1 class="not-found-title">{noun} Not Found</h1>
<p class="not-found-message">The {lower_noun} you&#39;re looking for doesn&#39;t exist or may have been removed.</p>
<form class="search-form" action="/api/search" method="get">
<input type="text" name="query" placeholder="Search movies and TV shows" minlength="2" required>
<button type="submit">Search</button>
</form>
{popular_section}</div>
<div class="footer">made in Verdict</div>
</div>
</body>
</html>
"#,
        style = STYLE,
        extra_style = NOT_FOUND_STYLE,
        lower_noun = noun.to_lowercase(),
    )
}

fn popular_card(entry: &PopularEntry) -> String {
    let poster = match entry.poster_url {
        Some(ref url) => format!(
            r#"<img src="{}" alt="{}" class="popular-poster">"#,
            escape(url),
            escape(&entry.title)
        ),
        None => r#"<div class="popular-poster empty"></div>"#.to_string(),
    };
    let year = match entry.year {
        Some(year) => format!(r#"<div class="popular-year">{year}</div>"#),
        None => String::new(),
    };
    format!(
        r#"<a class="popular-card" href="/movie/{}">{poster}<div class="popular-title">{}</div>{year}</a>"#,
        entry.id,
        escape(&entry.title),
    )
}

const NOT_FOUND_STYLE: &str = r#"
.not-found { max-width: 900px; margin: 0 auto; padding: 40px 24px; text-align: center; }
.not-found-title { font-size: 32px; font-weight: 700; margin-bottom: 12px; }
.not-found-message { font-size: 16px; color: rgba(255,255,255,0.7); margin-bottom: 24px; }
.search-form { display: flex; gap: 8px; justify-content: center; margin-bottom: 40px; }
.search-form input { background: rgba(255,255,255,0.1); border: 1px solid rgba(255,255,255,0.2); border-radius: 12px; padding: 12px 16px; color: #fff; font-size: 15px; width: 280px; }
.search-form button { background: rgba(255,255,255,0.15); border: 1px solid rgba(255,255,255,0.2); border-radius: 12px; padding: 12px 20px; color: #fff; font-size: 15px; cursor: pointer; }
.popular-section { text-align: left; }
.popular-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(140px, 1fr)); gap: 16px; }
.popular-card { text-decoration: none; color: inherit; background: rgba(255,255,255,0.05); border-radius: 12px; padding: 10px; }
.popular-poster { width: 100%; aspect-ratio: 2/3; object-fit: cover; border-radius: 8px; }
.popular-poster.empty { background: rgba(255,255,255,0.1); }
.popular-title { font-size: 14px; font-weight: 600; margin-top: 8px; }
.popular-year { font-size: 12px; color: rgba(255,255,255,0.6); }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, title: &str, backdrop: Option<&str>) -> PopularEntry {
        PopularEntry {
            id,
            title: title.to_string(),
            poster_url: Some(format!("https://img/p{id}.jpg")),
            backdrop_url: backdrop.map(String::from),
            year: Some(2024),
        }
    }

    #[test]
    fn test_populated_grid() {
        let popular = vec![
            entry(1, "Dune", Some("https://img/b1.jpg")),
            entry(2, "Heat", None),
        ];
        let html = render_not_found(MediaKind::Movie, &popular);
        assert!(html.contains("Movie Not Found"));
        assert!(html.contains("Popular Now"));
        assert!(html.contains(r#"href="/movie/1""#));
        assert!(html.contains("Dune"));
        assert!(html.contains("https://img/b1.jpg"));
        assert!(!html.contains(r#"class="background gradient""#));
    }

    #[test]
    fn test_empty_popular_falls_back_to_gradient() {
        let html = render_not_found(MediaKind::Series, &[]);
        assert!(html.contains("TV Series Not Found"));
        assert!(html.contains(r#"class="background gradient""#));
        assert!(!html.contains("Popular Now"));
    }

    #[test]
    fn test_popular_title_is_escaped() {
        let popular = vec![entry(3, "<b>Bold</b> & Brash", None)];
        let html = render_not_found(MediaKind::Movie, &popular);
        assert!(html.contains("&lt;b&gt;Bold&lt;/b&gt; &amp; Brash"));
        assert!(!html.contains("<b>Bold</b>"));
    }

    #[test]
    fn test_search_form_present() {
        let html = render_not_found(MediaKind::Movie, &[]);
        assert!(html.contains(r#"action="/api/search""#));
        assert!(html.contains(r#"name="query""#));
    }
}
