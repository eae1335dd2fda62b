//! HTTP client implementation

use std::time::Duration;

use reqwest::{header, Client};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::errors::WatchError;

/// HTTP client for dashboard backend communication
pub struct HttpClient {
    client: Client,
    base_url: Url,
    auth_token: Option<SecretString>,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, WatchError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(WatchError::ConfigError(format!(
                "backend URL cannot be used as a base: {}",
                base_url
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            auth_token: None,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request
    pub fn with_auth_token(mut self, token: SecretString) -> Self {
        self.auth_token = Some(token);
        self
    }

    /// Resolve path segments against the base URL.
    ///
    /// Segments are percent-encoded; an empty trailing segment yields a
    /// trailing slash.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, WatchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| WatchError::ConfigError(format!("invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Make a GET request and decode the JSON body
    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, WatchError> {
        debug!("GET {}", url);

        let mut request = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json");

        if let Some(token) = &self.auth_token {
            request = request.header(
                header::AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            );
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            debug!("HTTP GET failed: {} - {}", status, body);
            return Err(WatchError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.json().await?;
        Ok(body)
    }
}
