use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use tgcpm_core::{ChannelMetrics, Niche};

pub(crate) fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 10)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// A healthy, eligible crypto channel: 20k subscribers, 30% engagement.
pub(crate) fn sample_metrics() -> ChannelMetrics {
    ChannelMetrics {
        handle: "cryptodaily".to_string(),
        title: "Crypto Daily".to_string(),
        description: "Market wrap-ups and on-chain analysis".to_string(),
        subscribers: 20_000,
        is_public: true,
        is_verified: true,
        has_profile_photo: true,
        avg_views: 6_000.0,
        engagement_rate: 30.0,
        recent_posts: 10,
        posts_per_day: 1.5,
        total_forwards: 0,
        total_reactions: 0,
        media_ratio: 0.0,
        niche: Niche::Crypto,
        content_quality_score: 0.8,
        last_post_at: now() - TimeDelta::hours(5),
    }
}
