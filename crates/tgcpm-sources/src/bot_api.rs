//! Lightweight messaging-platform lookup (`getChat`).
//!
//! Only title, description and verification are read from it.

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::SourceError;
use crate::http::{build_client, endpoint, get_json, parse_base_url, unwrap_ok_envelope};

pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Fields the lookup is trusted for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub username: Option<String>,
}

pub struct BotApiClient {
    client: Client,
    token: String,
    base_url: Url,
}

impl BotApiClient {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(token: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SourceError> {
        Self::with_base_url(token, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SourceError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        token: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            token: token.to_owned(),
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Looks up `@handle`. `Ok(None)` when the platform does not know it.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Http`] on network failure.
    /// - [`SourceError::UnexpectedStatus`] on a non-2xx status other than 404.
    /// - [`SourceError::Api`] when the envelope is not `ok`.
    /// - [`SourceError::Deserialize`] if the chat object has the wrong shape.
    pub async fn get_chat(&self, handle: &str) -> Result<Option<ChatInfo>, SourceError> {
        // The token is part of the path, so it never goes into error contexts.
        // "./" keeps the colon in the token from being read as a URL scheme.
        let url = endpoint(&self.base_url, &format!("./bot{}/getChat", self.token))?;
        let chat_id = format!("@{handle}");
        let request = self.client.get(url).query(&[("chat_id", chat_id.as_str())]);

        let Some(body) = get_json(request, "getChat").await? else {
            return Ok(None);
        };
        let result = unwrap_ok_envelope(body, "getChat")?;
        let chat = serde_json::from_value(result).map_err(|e| SourceError::Deserialize {
            context: format!("getChat(@{handle})"),
            source: e,
        })?;
        Ok(Some(chat))
    }
}
