//! Conversion of raw provider payloads into [`ChannelMetrics`].
//!
//! Normalizers never fail. Missing or malformed fields fall back to neutral
//! defaults, and the engagement rate is always recomputed from views and
//! subscribers rather than copied from the payload.

mod aggregator;
mod harvester;
mod primary;

use chrono::NaiveDateTime;
use tgcpm_core::ChannelMetrics;

use crate::payload::RawPayload;

pub use aggregator::AggregatorNormalizer;
pub use harvester::HarvesterNormalizer;
pub use primary::PrimaryNormalizer;

/// Shared interface of the per-provider normalizers.
pub trait Normalizer {
    type Payload;

    /// `handle` must already be normalized; `now` is the timezone-naive
    /// local clock used for relative defaults.
    fn normalize(&self, handle: &str, payload: &Self::Payload, now: NaiveDateTime)
        -> ChannelMetrics;
}

/// Dispatches to the normalizer matching the payload variant.
#[must_use]
pub fn normalize(handle: &str, payload: &RawPayload, now: NaiveDateTime) -> ChannelMetrics {
    match payload {
        RawPayload::Primary(data) => PrimaryNormalizer.normalize(handle, data, now),
        RawPayload::Harvester(snapshot) => HarvesterNormalizer.normalize(handle, snapshot, now),
        RawPayload::Aggregator(data) => AggregatorNormalizer.normalize(handle, data, now),
    }
}

/// Converts a non-negative float count to `u32`, saturating.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn floor_to_u32(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.floor().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
