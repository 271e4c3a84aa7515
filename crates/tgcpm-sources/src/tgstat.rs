//! HTTP client for the public aggregator.

use reqwest::{Client, Url};

use crate::error::SourceError;
use crate::fields::JsonObject;
use crate::http::{build_client, endpoint, get_json, parse_base_url, unwrap_ok_envelope};

pub const DEFAULT_BASE_URL: &str = "https://api.tgstat.ru";

pub struct TgstatClient {
    client: Client,
    token: Option<String>,
    base_url: Url,
}

impl TgstatClient {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        token: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SourceError> {
        Self::with_base_url(token, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SourceError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        token: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            token: token.map(str::to_owned),
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Fetches the `result` object of `channels/get` for `@handle`.
    ///
    /// `Ok(None)` on 404 (unknown channel).
    ///
    /// # Errors
    ///
    /// - [`SourceError::Http`] on network failure.
    /// - [`SourceError::UnexpectedStatus`] on a non-2xx status other than 404.
    /// - [`SourceError::Api`] when the envelope is not `ok` or `result` is not
    ///   an object.
    /// - [`SourceError::Deserialize`] if the body is not JSON.
    pub async fn fetch(&self, handle: &str) -> Result<Option<JsonObject>, SourceError> {
        let url = endpoint(&self.base_url, "channels/get")?;
        let channel_id = format!("@{handle}");
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("channelId", channel_id.as_str())]);
        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Token {token}"));
        }

        let Some(body) = get_json(request, "channels/get").await? else {
            tracing::info!(handle, source = "aggregator", "channel not found");
            return Ok(None);
        };
        match unwrap_ok_envelope(body, "channels/get")? {
            serde_json::Value::Object(map) => Ok(Some(map)),
            other => Err(SourceError::Api(format!(
                "channels/get: expected an object result, got {other}"
            ))),
        }
    }
}
