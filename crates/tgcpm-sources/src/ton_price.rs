//! Live TON/USD quote used to present prices in dollars.

use reqwest::{Client, Url};

use crate::error::SourceError;
use crate::http::{build_client, get_json};

pub struct TonPriceClient {
    client: Client,
    url: Url,
    fallback_usd: f64,
}

impl TonPriceClient {
    /// `url` is the full simple-price endpoint including its query string.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SourceError::InvalidBaseUrl`] if `url` does not parse.
    pub fn new(
        url: &str,
        fallback_usd: f64,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SourceError> {
        let parsed = Url::parse(url).map_err(|e| SourceError::InvalidBaseUrl {
            base_url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            url: parsed,
            fallback_usd,
        })
    }

    /// Reads `the-open-network.usd` from the quote endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failure, a bad status, or a body
    /// without a positive price.
    pub async fn fetch_usd(&self) -> Result<f64, SourceError> {
        let context = "ton price";
        let body = get_json(self.client.get(self.url.clone()), context)
            .await?
            .ok_or_else(|| SourceError::Api(format!("{context}: endpoint not found")))?;
        body.get("the-open-network")
            .and_then(|v| v.get("usd"))
            .and_then(serde_json::Value::as_f64)
            .filter(|price| price.is_finite() && *price > 0.0)
            .ok_or_else(|| SourceError::Api(format!("{context}: no usd quote in response")))
    }

    /// [`Self::fetch_usd`], or the configured fallback rate on any failure.
    pub async fn usd_or_fallback(&self) -> f64 {
        match self.fetch_usd().await {
            Ok(price) => price,
            Err(e) => {
                tracing::warn!(error = %e, fallback = self.fallback_usd, "using fallback TON price");
                self.fallback_usd
            }
        }
    }
}
