//! Secondary provider blend: local analytics cache, optional live refresh,
//! and the platform lookup that is authoritative for title, description and
//! verification.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tgcpm_core::{ChannelStatsRow, ChannelStatsStore};

use crate::bot_api::BotApiClient;
use crate::error::SourceError;
use crate::http::{build_client, endpoint, get_json, parse_base_url};
use crate::payload::HarvesterSnapshot;

/// Re-harvests one channel on demand.
///
/// Injected into [`Harvester`] at construction; persisting the refreshed row
/// is the implementation's business, the blend only consumes the result.
#[async_trait]
pub trait HarvestRefresh: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SourceError`] when the refresh could not be completed.
    async fn refresh(&self, handle: &str) -> Result<Option<ChannelStatsRow>, SourceError>;
}

/// [`HarvestRefresh`] over HTTP: `GET {base}/stats/{handle}` returning a
/// cache-row shaped JSON object.
pub struct HttpHarvestRefresh {
    client: Client,
    base_url: Url,
}

impl HttpHarvestRefresh {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SourceError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            base_url: parse_base_url(base_url)?,
        })
    }
}

#[async_trait]
impl HarvestRefresh for HttpHarvestRefresh {
    async fn refresh(&self, handle: &str) -> Result<Option<ChannelStatsRow>, SourceError> {
        let url = endpoint(&self.base_url, &format!("./stats/{handle}"))?;
        let context = url.to_string();
        let Some(body) = get_json(self.client.get(url), &context).await? else {
            return Ok(None);
        };
        let row = serde_json::from_value(body).map_err(|e| SourceError::Deserialize {
            context,
            source: e,
        })?;
        Ok(Some(row))
    }
}

pub struct Harvester {
    store: Arc<dyn ChannelStatsStore>,
    refresher: Option<Arc<dyn HarvestRefresh>>,
    lookup: Option<BotApiClient>,
    freshness_secs: i64,
}

impl Harvester {
    #[must_use]
    pub fn new(store: Arc<dyn ChannelStatsStore>, freshness_secs: u64) -> Self {
        Self {
            store,
            refresher: None,
            lookup: None,
            freshness_secs: i64::try_from(freshness_secs).unwrap_or(i64::MAX),
        }
    }

    #[must_use]
    pub fn with_refresher(mut self, refresher: Arc<dyn HarvestRefresh>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    #[must_use]
    pub fn with_lookup(mut self, lookup: BotApiClient) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Builds the blended snapshot for `handle` as of `now_epoch`.
    ///
    /// A missing or stale cache row triggers one refresh attempt. When the
    /// refresh fails or returns nothing the stale row is served with
    /// `fresh = false`. `None` only when there is no analytics row at all.
    pub async fn snapshot(&self, handle: &str, now_epoch: i64) -> Option<HarvesterSnapshot> {
        let cached = match self.store.load(handle).await {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(handle, source = "harvester", error = %e, "cache read failed");
                None
            }
        };

        let stale = cached
            .as_ref()
            .is_none_or(|row| now_epoch.saturating_sub(row.last_updated_epoch) > self.freshness_secs);

        let mut snapshot = match (stale, cached) {
            (false, Some(row)) => HarvesterSnapshot::from_row(row, true),
            (_, cached) => match self.try_refresh(handle).await {
                Some(row) => HarvesterSnapshot::from_row(row, true),
                None => {
                    let Some(row) = cached else {
                        tracing::info!(handle, source = "harvester", "no cached analytics");
                        return None;
                    };
                    tracing::info!(handle, source = "harvester", "serving stale cache row");
                    HarvesterSnapshot::from_row(row, false)
                }
            },
        };

        self.apply_lookup(handle, &mut snapshot).await;
        Some(snapshot)
    }

    async fn try_refresh(&self, handle: &str) -> Option<ChannelStatsRow> {
        let refresher = self.refresher.as_ref()?;
        tracing::info!(handle, source = "harvester", "refreshing cache row");
        match refresher.refresh(handle).await {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(handle, source = "harvester", error = %e, "refresh failed");
                None
            }
        }
    }

    async fn apply_lookup(&self, handle: &str, snapshot: &mut HarvesterSnapshot) {
        let Some(lookup) = &self.lookup else {
            return;
        };
        match lookup.get_chat(handle).await {
            Ok(Some(chat)) => {
                tracing::debug!(handle, source = "bot_api", "merging lookup fields");
                snapshot.is_verified = chat.is_verified;
                snapshot.description = Some(chat.description);
                if !chat.title.trim().is_empty() {
                    snapshot.title = Some(chat.title);
                }
                snapshot.verified_by_lookup = true;
            }
            Ok(None) => {
                tracing::info!(handle, source = "bot_api", "chat not found");
            }
            Err(e) => {
                tracing::warn!(handle, source = "bot_api", error = %e, "lookup failed");
            }
        }
    }
}
