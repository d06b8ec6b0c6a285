use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use crate::server::AppState;

pub async fn sitemap(State(state): State<AppState>) -> Response {
    let today = Utc::now().format("%Y-%m-%d").to_string();
    let body = sitemap_xml(&state.config.site.base_url, &today);
    ([(header::CONTENT_TYPE, "application/xml")], body).into_response()
}

fn sitemap_xml(base_url: &str, date: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>{base_url}</loc>
    <lastmod>{date}</lastmod>
    <changefreq>monthly</changefreq>
    <priority>1.0</priority>
  </url>
</urlset>"#
    )
}
