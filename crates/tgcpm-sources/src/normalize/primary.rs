use chrono::NaiveDateTime;
use tgcpm_core::{classify_niche, engagement_rate, ChannelMetrics};

use super::{non_empty, Normalizer};
use crate::fields::{self, JsonObject};
use crate::quality::{PrimarySignals, QualitySignals};

/// Normalizer for the premium analytics service.
///
/// The service carries no interaction or cadence data, so those fields stay
/// zero and become candidates for supplementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimaryNormalizer;

impl Normalizer for PrimaryNormalizer {
    type Payload = JsonObject;

    fn normalize(&self, handle: &str, data: &JsonObject, now: NaiveDateTime) -> ChannelMetrics {
        let title = non_empty(fields::text(data, &["title", "name"])).unwrap_or(handle);
        let description = fields::text(data, &["description", "about"]).unwrap_or_default();
        let subscribers = fields::extract_subscribers(data);
        let avg_views = fields::number(data, &["avg_views", "avgViews"]).unwrap_or(0.0);
        let engagement = engagement_rate(avg_views, subscribers);
        let is_verified = fields::flag(data, &["verified", "is_verified"]).unwrap_or(false);
        let recent_posts = fields::count(data, &["posts_last_week", "recent_posts"]).unwrap_or(0);

        let content_quality_score = PrimarySignals {
            engagement_rate: engagement,
            posts_last_week: recent_posts,
            verified: is_verified,
            description,
        }
        .score();

        ChannelMetrics {
            handle: handle.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            subscribers,
            is_public: true,
            is_verified,
            has_profile_photo: fields::flag(data, &["has_photo"]).unwrap_or(true),
            avg_views,
            engagement_rate: engagement,
            recent_posts: u32::try_from(recent_posts).unwrap_or(u32::MAX),
            posts_per_day: 0.0,
            total_forwards: 0,
            total_reactions: 0,
            media_ratio: 0.0,
            niche: classify_niche(title, description),
            content_quality_score,
            last_post_at: fields::last_post(data, now),
        }
    }
}
