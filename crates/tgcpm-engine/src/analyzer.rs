//! End-to-end analysis of one channel: resolve, evaluate, price, audit.

use std::sync::Arc;

use serde::Serialize;
use tgcpm_core::{
    normalize_handle, AnalysisRecord, AppConfig, AuditSink, ChannelStatsStore, CpmRecommendation,
    EligibilityResult, ResolvedChannel,
};
use tgcpm_sources::{SourceCoordinator, SourceError, SourcesConfig};

use crate::eligibility::{evaluate, EligibilityConfig};
use crate::pricing::{price, PricingConfig};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelAnalysis {
    pub channel: ResolvedChannel,
    pub eligibility: EligibilityResult,
    pub recommendation: CpmRecommendation,
}

impl ChannelAnalysis {
    #[must_use]
    pub fn audit_record(&self) -> AnalysisRecord {
        let m = &self.channel.metrics;
        AnalysisRecord {
            handle: m.handle.clone(),
            subscribers: m.subscribers,
            niche: m.niche,
            eligible: self.eligibility.eligible,
            competitive_cpm: self.recommendation.competitive,
            engagement_rate: m.engagement_rate,
            posts_per_day: m.posts_per_day,
            total_reactions: m.total_reactions,
            total_forwards: m.total_forwards,
            media_ratio: m.media_ratio,
            is_verified: m.is_verified,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Found(Box<ChannelAnalysis>),
    /// Every provider came back empty.
    NotFound,
    /// The reference normalized to an empty handle.
    InvalidHandle,
}

pub struct Analyzer {
    coordinator: SourceCoordinator,
    eligibility: EligibilityConfig,
    pricing: PricingConfig,
    audit: Option<Arc<dyn AuditSink>>,
}

impl Analyzer {
    #[must_use]
    pub fn new(coordinator: SourceCoordinator) -> Self {
        Self {
            coordinator,
            eligibility: EligibilityConfig::default(),
            pricing: PricingConfig::default(),
            audit: None,
        }
    }

    /// Builds the full pipeline from application config, reading cached
    /// analytics from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when a configured provider base URL is invalid.
    pub fn from_app_config(
        config: &AppConfig,
        store: Arc<dyn ChannelStatsStore>,
    ) -> Result<Self, SourceError> {
        let coordinator =
            SourceCoordinator::from_config(&SourcesConfig::from_app_config(config), store)?;
        Ok(Self::new(coordinator)
            .with_eligibility(EligibilityConfig::from_app_config(config))
            .with_pricing(PricingConfig::from_app_config(config)))
    }

    #[must_use]
    pub fn with_eligibility(mut self, config: EligibilityConfig) -> Self {
        self.eligibility = config;
        self
    }

    #[must_use]
    pub fn with_pricing(mut self, config: PricingConfig) -> Self {
        self.pricing = config;
        self
    }

    #[must_use]
    pub fn with_audit(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self
    }

    /// Analyzes a user-supplied channel reference (`@name`, `t.me/name`, ...).
    ///
    /// Audit failures are logged and never change the outcome.
    pub async fn analyze(&self, reference: &str) -> AnalysisOutcome {
        let handle = normalize_handle(reference);
        if handle.is_empty() {
            return AnalysisOutcome::InvalidHandle;
        }

        let Some(channel) = self.coordinator.resolve(&handle).await else {
            return AnalysisOutcome::NotFound;
        };

        let eligibility = evaluate(&channel.metrics, &self.eligibility);
        let recommendation = price(&channel.metrics, &eligibility, &self.pricing);

        tracing::info!(
            handle = %handle,
            source = channel.source.as_str(),
            fresh = channel.fresh,
            eligible = eligibility.eligible,
            competitive = recommendation.competitive,
            "channel analyzed"
        );

        let analysis = ChannelAnalysis {
            channel,
            eligibility,
            recommendation,
        };

        if let Some(sink) = &self.audit {
            if let Err(e) = sink.record(&analysis.audit_record()).await {
                tracing::warn!(handle = %handle, error = %e, "failed to persist analysis record");
            }
        }

        AnalysisOutcome::Found(Box::new(analysis))
    }
}
