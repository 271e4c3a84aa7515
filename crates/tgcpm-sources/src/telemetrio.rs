//! HTTP client for the premium analytics service.
//!
//! Channel data is split across `channel/info` and `channel/stats`; both are
//! fetched and merged key-by-key, later endpoints overriding earlier ones.

use reqwest::{Client, Url};

use crate::error::SourceError;
use crate::fields::JsonObject;
use crate::http::{build_client, endpoint, get_json, parse_base_url};

pub const DEFAULT_BASE_URL: &str = "https://api.telemetr.io/v1";

const ENDPOINTS: [&str; 2] = ["channel/info", "channel/stats"];

pub struct TelemetrioClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl TelemetrioClient {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SourceError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SourceError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            api_key: api_key.to_owned(),
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Fetches and merges both endpoints for `handle`.
    ///
    /// A failing endpoint is logged and skipped; `Ok(None)` means neither
    /// endpoint produced a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidBaseUrl`] if an endpoint URL cannot be
    /// built. Transport and status failures are absorbed per endpoint.
    pub async fn fetch(&self, handle: &str) -> Result<Option<JsonObject>, SourceError> {
        let mut combined = JsonObject::new();

        for path in ENDPOINTS {
            let url = endpoint(&self.base_url, path)?;
            let request = self
                .client
                .get(url)
                .header("x-api-key", &self.api_key)
                .query(&[("handle", handle)]);

            match get_json(request, path).await {
                Ok(Some(serde_json::Value::Object(map))) => {
                    tracing::debug!(handle, endpoint = path, "primary endpoint returned data");
                    combined.extend(map);
                }
                Ok(Some(_)) => {
                    tracing::warn!(handle, endpoint = path, "primary endpoint returned a non-object body");
                }
                Ok(None) => {
                    tracing::info!(handle, endpoint = path, "channel not tracked by primary provider");
                }
                Err(e) => {
                    tracing::warn!(handle, endpoint = path, error = %e, "primary endpoint failed");
                }
            }
        }

        Ok((!combined.is_empty()).then_some(combined))
    }
}
