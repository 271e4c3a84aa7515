//! Shared domain model and configuration for the channel pricing workspace.
//!
//! Every provider normalizes into [`ChannelMetrics`]; everything downstream of
//! the source coordinator (eligibility, pricing, persistence) only sees that
//! canonical record.

pub mod app_config;
pub mod assessment;
pub mod classify;
pub mod config;
pub mod metrics;
pub mod store;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use assessment::{CpmRecommendation, EligibilityResult, MarketPosition, PricingFactors};
pub use classify::{
    classify_niche, classify_niche_with, NicheTable, AGGREGATOR_NICHE_KEYWORDS,
    DEFAULT_NICHE_KEYWORDS,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use metrics::{
    engagement_rate, normalize_handle, ChannelMetrics, DataSource, Niche, ResolvedChannel,
};
pub use store::{AnalysisRecord, AuditSink, ChannelStatsRow, ChannelStatsStore, StoreError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
