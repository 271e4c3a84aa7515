use tgcpm_core::{ChannelStatsRow, DataSource};

use crate::fields::JsonObject;

/// Raw provider output, one variant per provider in the waterfall.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// Merged `channel/info` + `channel/stats` objects from the analytics service.
    Primary(JsonObject),
    /// Cache row (possibly refreshed) blended with the platform lookup.
    Harvester(HarvesterSnapshot),
    /// The `result` object of the aggregator's `channels/get`.
    Aggregator(JsonObject),
}

impl RawPayload {
    #[must_use]
    pub fn source(&self) -> DataSource {
        match self {
            RawPayload::Primary(_) => DataSource::Primary,
            RawPayload::Harvester(_) => DataSource::Harvester,
            RawPayload::Aggregator(_) => DataSource::Aggregator,
        }
    }
}

/// Typed view of the secondary blend.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvesterSnapshot {
    pub handle: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub subscribers: u64,
    pub avg_views: f64,
    pub posts_per_day: f64,
    pub total_forwards: u64,
    pub total_reactions: u64,
    pub media_ratio: f64,
    pub is_verified: bool,
    /// Row is within the freshness window.
    pub fresh: bool,
    /// `title`, `description` and `is_verified` came from the live lookup.
    pub verified_by_lookup: bool,
}

impl HarvesterSnapshot {
    #[must_use]
    pub fn from_row(row: ChannelStatsRow, fresh: bool) -> Self {
        Self {
            handle: row.handle,
            title: row.title,
            description: row.description,
            subscribers: row.subscriber_count,
            avg_views: row.avg_views.max(0.0),
            posts_per_day: row.posts_per_day.max(0.0),
            total_forwards: row.total_forwards,
            total_reactions: row.total_reactions,
            media_ratio: row.media_ratio.clamp(0.0, 1.0),
            is_verified: row.is_verified,
            fresh,
            verified_by_lookup: false,
        }
    }
}
