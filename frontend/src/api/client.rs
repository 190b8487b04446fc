use anyhow::anyhow;
use reqwest::{Client, Response, StatusCode, Url};
use std::time::Duration;

use crate::{api::types::ApiErrorBody, config::ClientConfig};

const USER_AGENT: &str = "hr-pulse-frontend/1.0";

/// Thin wrapper around a shared `reqwest::Client` and the API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let client = build_http_client(config.http_timeout)
            .map_err(|e| anyhow!("Failed to initialize HTTP client: {}", e))?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn new_with_base_url(base_url: impl Into<String>) -> anyhow::Result<Self> {
        Self::new(&ClientConfig::with_base_url(base_url.into()))
    }

    pub fn http_client(&self) -> &Client {
        &self.client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// URL of one item under `collection`, with `id` escaped as a single
    /// path segment.
    pub fn resource_url(&self, collection: &str, id: &str) -> Option<Url> {
        let mut url = Url::parse(&self.endpoint(collection)).ok()?;
        url.path_segments_mut().ok()?.pop_if_empty().push(id);
        Some(url)
    }
}

/// Best-effort human readable message for a non-2xx response.
pub(crate) async fn error_message(response: Response) -> String {
    let status = response.status();
    let fallback = status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string();
    match response.json::<ApiErrorBody>().await {
        Ok(body) => body.message().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

pub(crate) fn is_unauthorized(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_paths_without_double_slashes() {
        let api = ApiClient::new_with_base_url("http://localhost:8000/api/").expect("client");
        assert_eq!(api.base_url(), "http://localhost:8000/api");
        assert_eq!(
            api.endpoint("/feature-flags/"),
            "http://localhost:8000/api/feature-flags/"
        );
        assert_eq!(
            api.endpoint("auth/refresh-token"),
            "http://localhost:8000/api/auth/refresh-token"
        );
    }

    #[test]
    fn resource_url_escapes_reserved_characters_in_id() {
        let api = ApiClient::new_with_base_url("http://localhost:8000/api").expect("client");
        assert_eq!(
            api.resource_url("/feature-flags/", "ff_1").map(String::from),
            Some("http://localhost:8000/api/feature-flags/ff_1".to_string())
        );
        assert_eq!(
            api.resource_url("/feature-flags/", "a/b?c#d").map(String::from),
            Some("http://localhost:8000/api/feature-flags/a%2Fb%3Fc%23d".to_string())
        );
    }
}
