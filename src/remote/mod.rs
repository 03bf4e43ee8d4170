//! Remote catalog client
//!
//! Thin reqwest wrapper around the catalog API: bounded-timeout GET
//! requests with a bearer token, JSON parsing, and failure
//! normalization into the `ApiError` taxonomy. Endpoint methods live in
//! the per-entity submodules (`movies`, `tv`, `people`).

pub mod movies;
pub mod people;
pub mod tv;
pub mod types;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::ApiError;

use types::{ErrorBody, Page, RawPage};

/// Trending window accepted by the trending endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    #[default]
    Day,
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

/// HTTP client for the catalog API
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
}

impl TmdbClient {
    /// Build a client from configuration. The bearer token and accept
    /// header are installed as defaults; every request carries the
    /// configured timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_token))
            .map_err(|e| ApiError::Transport(format!("invalid api token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET a JSON document from `path` with the given query parameters
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        Self::handle_response(response).await
    }

    /// GET a paged endpoint and normalize the response
    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
        requested_page: u32,
    ) -> Result<Page<T>, ApiError> {
        let raw: RawPage<T> = self.get_json(path, query).await?;
        Ok(raw.into_page(requested_page))
    }

    /// Parse a successful response as JSON; on a non-2xx status, try to
    /// surface the server's `status_message`
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            return Err(ApiError::http(status.as_u16(), body.status_message));
        }

        response.json::<T>().await.map_err(map_reqwest_error)
    }
}

/// Normalize a reqwest failure into the error taxonomy
fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Transport(err.to_string())
    }
}

/// Standard `page` query parameter
pub(crate) fn page_param(page: u32) -> (String, String) {
    ("page".to_string(), page.to_string())
}

/// Standard `query` query parameter for the search endpoints
pub(crate) fn query_param(query: &str) -> (String, String) {
    ("query".to_string(), query.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_strips_trailing_slash_from_base_url() {
        let mut config = ClientConfig::with_token("token");
        config.base_url = "https://api.example.test/3/".to_string();
        let client = TmdbClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://api.example.test/3");
    }

    #[test]
    fn test_client_rejects_token_with_invalid_header_characters() {
        let config = ClientConfig::with_token("bad\ntoken");
        assert!(TmdbClient::new(&config).is_err());
    }

    #[test]
    fn test_time_window_as_str() {
        assert_eq!(TimeWindow::Day.as_str(), "day");
        assert_eq!(TimeWindow::Week.as_str(), "week");
        assert_eq!(TimeWindow::default(), TimeWindow::Day);
    }

    #[test]
    fn test_standard_query_parameters() {
        assert_eq!(page_param(3), ("page".to_string(), "3".to_string()));
        assert_eq!(
            query_param("the matrix"),
            ("query".to_string(), "the matrix".to_string())
        );
    }
}
