//! Source Fallback Coordinator.
//!
//! Providers are tried strictly in order (primary, harvester blend,
//! aggregator) and the first usable payload wins. A primary record with gaps
//! is patched field by field from the harvester blend. Provider failures are
//! logged and treated as absent; only a total miss reaches the caller, as
//! `None`.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime, Utc};
use tgcpm_core::{AppConfig, ChannelMetrics, ChannelStatsStore, DataSource, ResolvedChannel};

use crate::bot_api::BotApiClient;
use crate::error::SourceError;
use crate::harvester::{Harvester, HttpHarvestRefresh};
use crate::normalize::normalize;
use crate::payload::{HarvesterSnapshot, RawPayload};
use crate::telemetrio::TelemetrioClient;
use crate::tgstat::TgstatClient;

/// Provider settings, derived from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct SourcesConfig {
    pub telemetrio_api_key: Option<String>,
    pub telemetrio_base_url: String,
    pub tgstat_api_token: Option<String>,
    pub tgstat_base_url: String,
    pub bot_token: Option<String>,
    pub bot_api_base_url: String,
    pub harvester_enabled: bool,
    pub harvester_refresh_url: Option<String>,
    pub primary_timeout_secs: u64,
    pub secondary_timeout_secs: u64,
    pub tertiary_timeout_secs: u64,
    pub cache_freshness_secs: u64,
    pub user_agent: String,
}

impl SourcesConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            telemetrio_api_key: config.telemetrio_api_key.clone(),
            telemetrio_base_url: config.telemetrio_base_url.clone(),
            tgstat_api_token: config.tgstat_api_token.clone(),
            tgstat_base_url: config.tgstat_base_url.clone(),
            bot_token: config.bot_token.clone(),
            bot_api_base_url: config.bot_api_base_url.clone(),
            harvester_enabled: config.harvester_enabled,
            harvester_refresh_url: config.harvester_refresh_url.clone(),
            primary_timeout_secs: config.primary_timeout_secs,
            secondary_timeout_secs: config.secondary_timeout_secs,
            tertiary_timeout_secs: config.tertiary_timeout_secs,
            cache_freshness_secs: config.cache_freshness_secs,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Which fields of a primary record are worth patching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gaps {
    pub description: bool,
    pub cadence: bool,
    pub interactions: bool,
}

impl Gaps {
    #[must_use]
    pub fn of(metrics: &ChannelMetrics) -> Self {
        Self {
            description: metrics.description.trim().is_empty(),
            cadence: metrics.posts_per_day == 0.0,
            interactions: metrics.total_reactions == 0
                && metrics.total_forwards == 0
                && metrics.media_ratio == 0.0,
        }
    }

    #[must_use]
    pub fn any(self) -> bool {
        self.description || self.cadence || self.interactions
    }
}

/// Patches exactly the gap fields of `metrics` from `snapshot`.
///
/// Verification is only taken over when the snapshot's flag came from the
/// live lookup. Returns whether any field changed.
pub fn supplement(metrics: &mut ChannelMetrics, snapshot: &HarvesterSnapshot) -> bool {
    let gaps = Gaps::of(metrics);
    let mut changed = false;

    if gaps.description {
        if let Some(description) = snapshot
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
        {
            metrics.description = description.to_string();
            changed = true;
        }
    }
    if gaps.cadence && snapshot.posts_per_day > 0.0 {
        metrics.posts_per_day = snapshot.posts_per_day;
        changed = true;
    }
    if gaps.interactions {
        metrics.total_reactions = snapshot.total_reactions;
        metrics.total_forwards = snapshot.total_forwards;
        metrics.media_ratio = snapshot.media_ratio;
        changed |= snapshot.total_reactions > 0
            || snapshot.total_forwards > 0
            || snapshot.media_ratio > 0.0;
    }
    if snapshot.verified_by_lookup && metrics.is_verified != snapshot.is_verified {
        metrics.is_verified = snapshot.is_verified;
        changed = true;
    }

    changed
}

#[derive(Default)]
pub struct SourceCoordinator {
    primary: Option<TelemetrioClient>,
    harvester: Option<Harvester>,
    aggregator: Option<TgstatClient>,
}

impl SourceCoordinator {
    /// A coordinator with no providers; add them with the `with_*` builders.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_primary(mut self, client: TelemetrioClient) -> Self {
        self.primary = Some(client);
        self
    }

    #[must_use]
    pub fn with_harvester(mut self, harvester: Harvester) -> Self {
        self.harvester = Some(harvester);
        self
    }

    #[must_use]
    pub fn with_aggregator(mut self, client: TgstatClient) -> Self {
        self.aggregator = Some(client);
        self
    }

    /// Wires every configured provider. The primary provider needs an API key
    /// and the platform lookup a bot token; the aggregator is always present.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if a client cannot be constructed.
    pub fn from_config(
        config: &SourcesConfig,
        store: Arc<dyn ChannelStatsStore>,
    ) -> Result<Self, SourceError> {
        let mut coordinator = Self::new();

        if let Some(key) = &config.telemetrio_api_key {
            coordinator = coordinator.with_primary(TelemetrioClient::with_base_url(
                key,
                config.primary_timeout_secs,
                &config.user_agent,
                &config.telemetrio_base_url,
            )?);
        }

        if config.harvester_enabled {
            let mut harvester = Harvester::new(store, config.cache_freshness_secs);
            if let Some(url) = &config.harvester_refresh_url {
                harvester = harvester.with_refresher(Arc::new(HttpHarvestRefresh::new(
                    url,
                    config.secondary_timeout_secs,
                    &config.user_agent,
                )?));
            }
            if let Some(token) = &config.bot_token {
                harvester = harvester.with_lookup(BotApiClient::with_base_url(
                    token,
                    config.secondary_timeout_secs,
                    &config.user_agent,
                    &config.bot_api_base_url,
                )?);
            }
            coordinator = coordinator.with_harvester(harvester);
        }

        Ok(coordinator.with_aggregator(TgstatClient::with_base_url(
            config.tgstat_api_token.as_deref(),
            config.tertiary_timeout_secs,
            &config.user_agent,
            &config.tgstat_base_url,
        )?))
    }

    /// Runs the waterfall for an already-normalized `handle`.
    pub async fn resolve(&self, handle: &str) -> Option<ResolvedChannel> {
        let now = Local::now().naive_local();
        let now_epoch = Utc::now().timestamp();

        if let Some(resolved) = self.try_primary(handle, now, now_epoch).await {
            return Some(resolved);
        }

        if let Some(harvester) = &self.harvester {
            tracing::info!(handle, source = "harvester", "trying provider");
            if let Some(snapshot) = harvester.snapshot(handle, now_epoch).await {
                let fresh = snapshot.fresh;
                let metrics = normalize(handle, &RawPayload::Harvester(snapshot), now);
                tracing::info!(handle, source = "harvester", fresh, "using provider data");
                return Some(ResolvedChannel {
                    metrics,
                    source: DataSource::Harvester,
                    fresh,
                    supplemented: false,
                });
            }
        }

        if let Some(aggregator) = &self.aggregator {
            tracing::info!(handle, source = "aggregator", "trying provider");
            match aggregator.fetch(handle).await {
                Ok(Some(data)) => {
                    tracing::info!(handle, source = "aggregator", "using provider data");
                    return Some(ResolvedChannel {
                        metrics: normalize(handle, &RawPayload::Aggregator(data), now),
                        source: DataSource::Aggregator,
                        fresh: true,
                        supplemented: false,
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(handle, source = "aggregator", error = %e, "provider failed");
                }
            }
        }

        tracing::warn!(handle, "no data source produced this channel");
        None
    }

    async fn try_primary(
        &self,
        handle: &str,
        now: NaiveDateTime,
        now_epoch: i64,
    ) -> Option<ResolvedChannel> {
        let primary = self.primary.as_ref()?;
        tracing::info!(handle, source = "primary", "trying provider");

        let data = match primary.fetch(handle).await {
            Ok(Some(data)) => data,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(handle, source = "primary", error = %e, "provider failed");
                return None;
            }
        };

        let mut metrics = normalize(handle, &RawPayload::Primary(data), now);
        let mut supplemented = false;
        if let Some(harvester) = &self.harvester {
            if Gaps::of(&metrics).any() {
                if let Some(snapshot) = harvester.snapshot(handle, now_epoch).await {
                    supplemented = supplement(&mut metrics, &snapshot);
                }
            }
        }
        tracing::info!(handle, source = "primary", supplemented, "using provider data");

        Some(ResolvedChannel {
            metrics,
            source: DataSource::Primary,
            fresh: true,
            supplemented,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tgcpm_core::Niche;

    use super::*;

    fn primary_metrics() -> ChannelMetrics {
        ChannelMetrics {
            handle: "technews".to_string(),
            title: "Tech News".to_string(),
            description: String::new(),
            subscribers: 20_000,
            is_public: true,
            is_verified: false,
            has_profile_photo: true,
            avg_views: 4_000.0,
            engagement_rate: 20.0,
            recent_posts: 7,
            posts_per_day: 0.0,
            total_forwards: 0,
            total_reactions: 0,
            media_ratio: 0.0,
            niche: Niche::Tech,
            content_quality_score: 0.9,
            last_post_at: NaiveDate::from_ymd_opt(2025, 3, 9)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    fn snapshot() -> HarvesterSnapshot {
        HarvesterSnapshot {
            handle: "technews".to_string(),
            title: Some("Cached title".to_string()),
            description: Some("Gadgets and launches".to_string()),
            subscribers: 1,
            avg_views: 1.0,
            posts_per_day: 3.0,
            total_forwards: 50,
            total_reactions: 400,
            media_ratio: 0.6,
            is_verified: true,
            fresh: true,
            verified_by_lookup: true,
        }
    }

    #[test]
    fn gaps_detects_each_missing_group() {
        let gaps = Gaps::of(&primary_metrics());
        assert!(gaps.description && gaps.cadence && gaps.interactions);

        let mut complete = primary_metrics();
        complete.description = "x".to_string();
        complete.posts_per_day = 1.0;
        complete.media_ratio = 0.2;
        assert!(!Gaps::of(&complete).any());
    }

    #[test]
    fn supplement_fills_only_gap_fields() {
        let mut metrics = primary_metrics();
        assert!(supplement(&mut metrics, &snapshot()));
        assert_eq!(metrics.description, "Gadgets and launches");
        assert!((metrics.posts_per_day - 3.0).abs() < f64::EPSILON);
        assert_eq!(metrics.total_reactions, 400);
        assert_eq!(metrics.total_forwards, 50);
        assert!(metrics.is_verified);
        // fields primary supplied are untouched
        assert_eq!(metrics.title, "Tech News");
        assert_eq!(metrics.subscribers, 20_000);
        assert!((metrics.avg_views - 4_000.0).abs() < f64::EPSILON);
        assert!((metrics.content_quality_score - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn supplement_keeps_existing_description_and_cadence() {
        let mut metrics = primary_metrics();
        metrics.description = "Original".to_string();
        metrics.posts_per_day = 0.7;
        supplement(&mut metrics, &snapshot());
        assert_eq!(metrics.description, "Original");
        assert!((metrics.posts_per_day - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn supplement_ignores_cached_verification() {
        let mut metrics = primary_metrics();
        let mut snap = snapshot();
        snap.verified_by_lookup = false;
        supplement(&mut metrics, &snap);
        assert!(!metrics.is_verified);
    }

    #[test]
    fn supplement_reports_no_change_for_empty_snapshot() {
        let mut metrics = primary_metrics();
        let snap = HarvesterSnapshot {
            description: None,
            posts_per_day: 0.0,
            total_forwards: 0,
            total_reactions: 0,
            media_ratio: 0.0,
            verified_by_lookup: false,
            ..snapshot()
        };
        assert!(!supplement(&mut metrics, &snap));
    }
}
