//! Per-provider content-quality heuristics.
//!
//! Every scorer starts at 0.5, adds tiered bonuses (within a tier only the
//! highest threshold met counts) and clamps to `[0, 1]`. Inputs are the
//! values the matching normalizer already extracted, never the raw payload.

/// Signals one provider can offer towards a quality score.
pub trait QualitySignals {
    fn score(&self) -> f64;
}

const BASE_SCORE: f64 = 0.5;
const RICH_DESCRIPTION_CHARS: usize = 50;

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 1.0)
}

fn is_rich_description(description: &str) -> bool {
    description.chars().count() > RICH_DESCRIPTION_CHARS
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimarySignals<'a> {
    pub engagement_rate: f64,
    pub posts_last_week: u64,
    pub verified: bool,
    pub description: &'a str,
}

impl QualitySignals for PrimarySignals<'_> {
    fn score(&self) -> f64 {
        let mut score = BASE_SCORE;

        if self.engagement_rate > 30.0 {
            score += 0.3;
        } else if self.engagement_rate > 15.0 {
            score += 0.2;
        }

        if self.posts_last_week >= 7 {
            score += 0.2;
        } else if self.posts_last_week >= 3 {
            score += 0.1;
        }

        if self.verified {
            score += 0.2;
        }
        if is_rich_description(self.description) {
            score += 0.1;
        }

        clamp_score(score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarvesterSignals {
    pub engagement_rate: f64,
    pub posts_per_day: f64,
    pub media_ratio: f64,
    pub has_interactions: bool,
    pub verified: bool,
}

impl QualitySignals for HarvesterSignals {
    fn score(&self) -> f64 {
        let mut score = BASE_SCORE;

        if self.engagement_rate > 30.0 {
            score += 0.3;
        } else if self.engagement_rate > 15.0 {
            score += 0.2;
        }

        if self.posts_per_day >= 1.0 {
            score += 0.2;
        } else if self.posts_per_day >= 0.5 {
            score += 0.1;
        }

        if self.media_ratio > 0.5 {
            score += 0.1;
        }
        if self.has_interactions {
            score += 0.1;
        }
        if self.verified {
            score += 0.2;
        }

        clamp_score(score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatorSignals<'a> {
    pub engagement_rate: f64,
    pub subscribers: u64,
    pub description: &'a str,
    pub verified: bool,
    /// Days since channel creation, when the provider reports it.
    pub age_days: Option<i64>,
}

impl QualitySignals for AggregatorSignals<'_> {
    fn score(&self) -> f64 {
        let mut score = BASE_SCORE;

        if self.engagement_rate > 20.0 {
            score += 0.3;
        } else if self.engagement_rate > 10.0 {
            score += 0.2;
        } else if self.engagement_rate > 5.0 {
            score += 0.1;
        }

        if self.subscribers > 50_000 {
            score += 0.15;
        } else if self.subscribers > 10_000 {
            score += 0.1;
        } else if self.subscribers > 1_000 {
            score += 0.05;
        }

        if is_rich_description(self.description) {
            score += 0.1;
        }
        if self.verified {
            score += 0.15;
        }
        if self.age_days.is_some_and(|days| days > 365) {
            score += 0.1;
        }

        clamp_score(score)
    }
}
