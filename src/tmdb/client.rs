use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::TmdbConfig;

/// Client for the TMDB v3 REST API.
///
/// Credentials are injected once at construction. A bearer token is
/// preferred; the v3 `api_key` query parameter is only used when no
/// bearer token is configured.
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    image_base_url: String,
    language: String,
    bearer_token: Option<String>,
    api_key: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TmdbError {
    #[error("TMDB responded with {0}")]
    Status(u16),
    #[error("TMDB request failed: {0}")]
    Network(#[from] reqwest::Error),
}

impl TmdbError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TmdbError::Status(404))
    }
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            image_base_url: config.image_base_url.clone(),
            language: config.language.clone(),
            bearer_token: config.bearer_token.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.bearer_token.is_some() || self.api_key.is_some()
    }

    /// Resolves an image path fragment against the TMDB image CDN.
    /// Path fragments come with a leading slash.
    pub fn image_url(&self, size: &str, path: &str) -> String {
        format!("{}/{}{}", self.image_base_url, size, path)
    }

    fn request_url(&self, path: &str) -> String {
        let sep = if path.contains('?') { '&' } else { '?' };
        let mut url = format!("{}{}{}language={}", self.base_url, path, sep, self.language);
        if self.bearer_token.is_none() {
            if let Some(ref key) = self.api_key {
                url.push_str("&api_key=");
                url.push_str(key);
            }
        }
        url
    }

    /// Single-attempt GET. Any non-2xx response maps to
    /// `TmdbError::Status` so callers can tell 404 apart from the rest.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TmdbError> {
        let mut request = self.http.get(self.request_url(path));
        if let Some(ref token) = self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TmdbError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }

    /// Lenient variant for sub-resources the page can live without:
    /// any failure yields the type's empty value.
    pub async fn get_or_default<T>(&self, path: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        match self.get(path).await {
            Ok(value) => value,
            Err(e) => {
                debug!(path = path, error = %e, "optional TMDB fetch failed");
                T::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(bearer: Option<&str>, key: Option<&str>) -> TmdbConfig {
        TmdbConfig {
            bearer_token: bearer.map(String::from),
            api_key: key.map(String::from),
            ..TmdbConfig::default()
        }
    }

    #[test]
    fn test_url_with_api_key() {
        let client = TmdbClient::new(&config(None, Some("k123")));
        assert_eq!(
            client.request_url("/movie/550"),
            "https://api.themoviedb.org/3/movie/550?language=en-US&api_key=k123"
        );
    }

    #[test]
    fn test_bearer_token_suppresses_api_key_param() {
        let client = TmdbClient::new(&config(Some("tok"), Some("k123")));
        assert_eq!(
            client.request_url("/movie/550"),
            "https://api.themoviedb.org/3/movie/550?language=en-US"
        );
    }

    #[test]
    fn test_url_with_existing_query() {
        let client = TmdbClient::new(&config(Some("tok"), None));
        assert_eq!(
            client.request_url("/search/movie?query=batman&page=1"),
            "https://api.themoviedb.org/3/search/movie?query=batman&page=1&language=en-US"
        );
    }

    #[test]
    fn test_image_url() {
        let client = TmdbClient::new(&config(Some("tok"), None));
        assert_eq!(
            client.image_url("w500", "/abc.jpg"),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[test]
    fn test_has_credentials() {
        assert!(!TmdbClient::new(&config(None, None)).has_credentials());
        assert!(TmdbClient::new(&config(None, Some("k"))).has_credentials());
        assert!(TmdbClient::new(&config(Some("t"), None)).has_credentials());
    }
}
