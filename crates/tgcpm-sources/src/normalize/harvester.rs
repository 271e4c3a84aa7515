use chrono::NaiveDateTime;
use tgcpm_core::{classify_niche, engagement_rate, ChannelMetrics};

use super::{floor_to_u32, non_empty, Normalizer};
use crate::fields::default_last_post;
use crate::payload::HarvesterSnapshot;
use crate::quality::{HarvesterSignals, QualitySignals};

#[derive(Debug, Clone, Copy, Default)]
pub struct HarvesterNormalizer;

impl Normalizer for HarvesterNormalizer {
    type Payload = HarvesterSnapshot;

    fn normalize(
        &self,
        handle: &str,
        snapshot: &HarvesterSnapshot,
        now: NaiveDateTime,
    ) -> ChannelMetrics {
        let title = non_empty(snapshot.title.as_deref())
            .or_else(|| non_empty(Some(handle)))
            .or_else(|| non_empty(Some(snapshot.handle.as_str())))
            .unwrap_or("Unknown");
        let description = snapshot.description.as_deref().unwrap_or_default();
        let engagement = engagement_rate(snapshot.avg_views, snapshot.subscribers);

        let content_quality_score = HarvesterSignals {
            engagement_rate: engagement,
            posts_per_day: snapshot.posts_per_day,
            media_ratio: snapshot.media_ratio,
            has_interactions: snapshot.total_reactions > 0 || snapshot.total_forwards > 0,
            verified: snapshot.is_verified,
        }
        .score();

        ChannelMetrics {
            handle: handle.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            subscribers: snapshot.subscribers,
            is_public: true,
            is_verified: snapshot.is_verified,
            has_profile_photo: true,
            avg_views: snapshot.avg_views,
            engagement_rate: engagement,
            recent_posts: floor_to_u32(snapshot.posts_per_day),
            posts_per_day: snapshot.posts_per_day,
            total_forwards: snapshot.total_forwards,
            total_reactions: snapshot.total_reactions,
            media_ratio: snapshot.media_ratio,
            niche: classify_niche(title, description),
            content_quality_score,
            // the cache does not track post timestamps
            last_post_at: default_last_post(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeDelta};
    use tgcpm_core::Niche;

    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn snapshot() -> HarvesterSnapshot {
        HarvesterSnapshot {
            handle: "gamehub".to_string(),
            title: Some("Game Hub".to_string()),
            description: Some("Esports results".to_string()),
            subscribers: 40_000,
            avg_views: 8_000.0,
            posts_per_day: 2.7,
            total_forwards: 120,
            total_reactions: 900,
            media_ratio: 0.8,
            is_verified: false,
            fresh: true,
            verified_by_lookup: false,
        }
    }

    #[test]
    fn carries_cache_fields_through() {
        let m = HarvesterNormalizer.normalize("gamehub", &snapshot(), now());
        assert_eq!(m.title, "Game Hub");
        assert_eq!(m.subscribers, 40_000);
        assert!((m.engagement_rate - 20.0).abs() < 1e-9);
        assert_eq!(m.recent_posts, 2);
        assert_eq!(m.total_reactions, 900);
        assert_eq!(m.total_forwards, 120);
        assert_eq!(m.niche, Niche::Gaming);
        assert_eq!(m.last_post_at, now() - TimeDelta::days(1));
        // 0.5 + 0.2 (engagement) + 0.2 (cadence) + 0.1 (media) + 0.1 (interactions)
        assert!((m.content_quality_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn title_falls_back_to_handle() {
        let mut snap = snapshot();
        snap.title = Some("   ".to_string());
        let m = HarvesterNormalizer.normalize("gamehub", &snap, now());
        assert_eq!(m.title, "gamehub");
    }

    #[test]
    fn title_falls_back_to_unknown() {
        let mut snap = snapshot();
        snap.title = None;
        snap.handle = String::new();
        let m = HarvesterNormalizer.normalize("", &snap, now());
        assert_eq!(m.title, "Unknown");
    }
}
