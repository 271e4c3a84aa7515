//! The canonical channel record every provider normalizes into.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Topical category of a channel. Closed set; see [`crate::classify`] for how
/// free text maps onto it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Niche {
    Crypto,
    Tech,
    Business,
    Entertainment,
    News,
    Gaming,
    Finance,
    Education,
    Lifestyle,
}

impl Niche {
    pub const ALL: [Niche; 9] = [
        Niche::Crypto,
        Niche::Tech,
        Niche::Business,
        Niche::Entertainment,
        Niche::News,
        Niche::Gaming,
        Niche::Finance,
        Niche::Education,
        Niche::Lifestyle,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Niche::Crypto => "crypto",
            Niche::Tech => "tech",
            Niche::Business => "business",
            Niche::Entertainment => "entertainment",
            Niche::News => "news",
            Niche::Gaming => "gaming",
            Niche::Finance => "finance",
            Niche::Education => "education",
            Niche::Lifestyle => "lifestyle",
        }
    }

    /// Capitalized label used in pricing explanations, e.g. `"Crypto"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Niche::Crypto => "Crypto",
            Niche::Tech => "Tech",
            Niche::Business => "Business",
            Niche::Entertainment => "Entertainment",
            Niche::News => "News",
            Niche::Gaming => "Gaming",
            Niche::Finance => "Finance",
            Niche::Education => "Education",
            Niche::Lifestyle => "Lifestyle",
        }
    }
}

impl std::fmt::Display for Niche {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Niche {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Niche::ALL
            .into_iter()
            .find(|n| n.as_str() == lower)
            .ok_or_else(|| format!("unknown niche \"{s}\""))
    }
}

/// Which provider in the waterfall produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Premium analytics service.
    Primary,
    /// Local analytics cache blended with the messaging-platform lookup.
    Harvester,
    /// Public aggregator.
    Aggregator,
}

impl DataSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DataSource::Primary => "primary",
            DataSource::Harvester => "harvester",
            DataSource::Aggregator => "aggregator",
        }
    }
}

/// Normalized analytics for one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMetrics {
    /// Lower-case handle without the leading `@`.
    pub handle: String,
    pub title: String,
    pub description: String,
    pub subscribers: u64,
    pub is_public: bool,
    pub is_verified: bool,
    pub has_profile_photo: bool,
    pub avg_views: f64,
    /// `avg_views / subscribers * 100`; always derived via [`engagement_rate`].
    pub engagement_rate: f64,
    pub recent_posts: u32,
    pub posts_per_day: f64,
    pub total_forwards: u64,
    pub total_reactions: u64,
    /// Share of posts carrying media, in `[0, 1]`.
    pub media_ratio: f64,
    pub niche: Niche,
    /// Heuristic content quality in `[0, 1]`.
    pub content_quality_score: f64,
    /// Timezone-naive local time of the most recent post.
    pub last_post_at: NaiveDateTime,
}

impl ChannelMetrics {
    #[must_use]
    pub fn has_interaction_data(&self) -> bool {
        self.total_reactions > 0 || self.total_forwards > 0
    }
}

/// A metrics record plus where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedChannel {
    pub metrics: ChannelMetrics,
    pub source: DataSource,
    /// `false` when the record was served from a cache entry older than the
    /// freshness window (or from a cache entry that was never refreshed).
    pub fresh: bool,
    /// `true` when a primary record had gaps patched from the secondary blend.
    pub supplemented: bool,
}

/// Engagement rate as a percentage: `avg_views / subscribers * 100`.
///
/// Returns `0.0` when there are no subscribers or the view count is not a
/// usable non-negative number.
#[must_use]
pub fn engagement_rate(avg_views: f64, subscribers: u64) -> f64 {
    if subscribers == 0 || !avg_views.is_finite() || avg_views <= 0.0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let subs = subscribers as f64;
    avg_views / subs * 100.0
}

/// Normalizes user-supplied channel references to a bare lower-case handle.
///
/// Accepts `@name`, `name`, `t.me/name` and `https://t.me/name`.
#[must_use]
pub fn normalize_handle(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let without_host = without_scheme
        .strip_prefix("t.me/")
        .or_else(|| without_scheme.strip_prefix("telegram.me/"))
        .unwrap_or(without_scheme);
    without_host
        .trim_start_matches('@')
        .trim_end_matches('/')
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engagement_rate_is_zero_without_subscribers() {
        assert_eq!(engagement_rate(5_000.0, 0), 0.0);
    }

    #[test]
    fn engagement_rate_is_views_over_subscribers() {
        let rate = engagement_rate(6_000.0, 20_000);
        assert!((rate - 30.0).abs() < 1e-9, "got {rate}");
    }

    #[test]
    fn engagement_rate_ignores_negative_views() {
        assert_eq!(engagement_rate(-10.0, 1_000), 0.0);
        assert_eq!(engagement_rate(f64::NAN, 1_000), 0.0);
    }

    #[test]
    fn normalize_handle_strips_marker_and_lowercases() {
        assert_eq!(normalize_handle("@CryptoDaily"), "cryptodaily");
        assert_eq!(normalize_handle("  durov "), "durov");
    }

    #[test]
    fn normalize_handle_accepts_links() {
        assert_eq!(normalize_handle("https://t.me/TechNews/"), "technews");
        assert_eq!(normalize_handle("t.me/@gamehub"), "gamehub");
    }

    #[test]
    fn niche_parses_case_insensitively() {
        assert_eq!("Crypto".parse::<Niche>().unwrap(), Niche::Crypto);
        assert_eq!(" lifestyle ".parse::<Niche>().unwrap(), Niche::Lifestyle);
        assert!("cooking".parse::<Niche>().is_err());
    }

    #[test]
    fn niche_serializes_lowercase() {
        let json = serde_json::to_string(&Niche::Finance).unwrap();
        assert_eq!(json, "\"finance\"");
    }
}
