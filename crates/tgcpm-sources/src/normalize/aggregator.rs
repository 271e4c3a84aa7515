use chrono::NaiveDateTime;
use tgcpm_core::{classify_niche_with, engagement_rate, ChannelMetrics, AGGREGATOR_NICHE_KEYWORDS};

use super::{floor_to_u32, non_empty, Normalizer};
use crate::fields::{self, JsonObject};
use crate::quality::{AggregatorSignals, QualitySignals};

/// Cadence assumed when the aggregator reports a post count but an
/// unreadable creation date.
const FALLBACK_POSTS_PER_DAY: f64 = 0.5;
const DEFAULT_MEDIA_RATIO: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default)]
pub struct AggregatorNormalizer;

impl Normalizer for AggregatorNormalizer {
    type Payload = JsonObject;

    #[allow(clippy::cast_precision_loss)]
    fn normalize(&self, handle: &str, data: &JsonObject, now: NaiveDateTime) -> ChannelMetrics {
        let title = non_empty(fields::text(data, &["title"])).unwrap_or(handle);
        let description = fields::text(data, &["description"]).unwrap_or_default();
        let subscribers = fields::extract_subscribers(data);
        let avg_views = fields::number(data, &["avgPostReach"]).unwrap_or(0.0);
        let engagement = engagement_rate(avg_views, subscribers);
        let is_verified = fields::flag(data, &["verified"]).unwrap_or(false);

        let created_at = fields::text(data, &["createdAt"]).map(fields::parse_iso_timestamp);
        let age_days = created_at.flatten().map(|c| (now - c).num_days());
        let posts_per_day = match (fields::number(data, &["postsCount"]), created_at) {
            (Some(posts), Some(Some(_))) => age_days
                .filter(|days| *days > 0)
                .map_or(0.0, |days| posts / days as f64),
            (Some(_), Some(None)) => FALLBACK_POSTS_PER_DAY,
            _ => 0.0,
        };

        let last_post_at = fields::text(data, &["lastPostDate"])
            .and_then(fields::parse_iso_timestamp)
            .unwrap_or_else(|| fields::default_last_post(now));

        let content_quality_score = AggregatorSignals {
            engagement_rate: engagement,
            subscribers,
            description,
            verified: is_verified,
            age_days,
        }
        .score();

        ChannelMetrics {
            handle: handle.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            subscribers,
            // the aggregator only indexes public channels
            is_public: true,
            is_verified,
            has_profile_photo: true,
            avg_views,
            engagement_rate: engagement,
            recent_posts: floor_to_u32(posts_per_day * 7.0).max(1),
            posts_per_day,
            total_forwards: 0,
            total_reactions: 0,
            media_ratio: DEFAULT_MEDIA_RATIO,
            niche: classify_niche_with(AGGREGATOR_NICHE_KEYWORDS, title, description),
            content_quality_score,
            last_post_at,
        }
    }
}
