//! Persistence seams consumed by the pipeline.
//!
//! The pipeline only reads the local analytics cache and writes one audit
//! record per analysis; the storage engine behind both lives elsewhere.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metrics::Niche;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("corrupt row for {handle}: {reason}")]
    Corrupt { handle: String, reason: String },
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::Backend(Box::new(err))
    }
}

/// One row of the locally harvested analytics cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStatsRow {
    pub handle: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub subscriber_count: u64,
    pub avg_views: f64,
    pub posts_per_day: f64,
    pub total_forwards: u64,
    pub total_reactions: u64,
    pub media_ratio: f64,
    pub is_verified: bool,
    /// Unix seconds of the last harvest.
    pub last_updated_epoch: i64,
}

/// Flattened record of one completed analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub handle: String,
    pub subscribers: u64,
    pub niche: Niche,
    pub eligible: bool,
    pub competitive_cpm: f64,
    pub engagement_rate: f64,
    pub posts_per_day: f64,
    pub total_reactions: u64,
    pub total_forwards: u64,
    pub media_ratio: f64,
    pub is_verified: bool,
}

/// Read side of the local analytics cache.
#[async_trait]
pub trait ChannelStatsStore: Send + Sync {
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend cannot be read.
    async fn load(&self, handle: &str) -> Result<Option<ChannelStatsRow>, StoreError>;
}

/// Receives one record per completed analysis.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record cannot be persisted.
    async fn record(&self, record: &AnalysisRecord) -> Result<(), StoreError>;
}
