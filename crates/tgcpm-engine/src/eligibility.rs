//! Eligibility rule set for paid placement.
//!
//! Hard requirements collect every failure (no short-circuit); soft warnings
//! each subtract a fixed amount from a confidence that starts at 1.0.

use chrono::{Local, NaiveDateTime};
use tgcpm_core::{AppConfig, ChannelMetrics, EligibilityResult};

const LOW_ENGAGEMENT_RATE: f64 = 10.0;
const LOW_QUALITY_SCORE: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityConfig {
    pub min_subscribers: u64,
    /// Maximum whole days since the last post.
    pub activity_days: i64,
}

impl EligibilityConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            min_subscribers: config.min_subscribers,
            activity_days: config.activity_days,
        }
    }
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            min_subscribers: 1000,
            activity_days: 14,
        }
    }
}

/// Evaluates `metrics` against the local wall clock.
#[must_use]
pub fn evaluate(metrics: &ChannelMetrics, config: &EligibilityConfig) -> EligibilityResult {
    evaluate_at(metrics, config, Local::now().naive_local())
}

/// Evaluates `metrics` as of `now`. Both `now` and the last-post timestamp are
/// timezone-naive.
#[must_use]
pub fn evaluate_at(
    metrics: &ChannelMetrics,
    config: &EligibilityConfig,
    now: NaiveDateTime,
) -> EligibilityResult {
    let mut reasons = Vec::new();
    let mut warnings = Vec::new();
    let mut eligible = true;
    let mut confidence: f64 = 1.0;

    if !metrics.is_public {
        eligible = false;
        reasons.push("Channel must be public".to_string());
    }

    if metrics.subscribers < config.min_subscribers {
        eligible = false;
        reasons.push(format!(
            "Needs {}+ subscribers (has {})",
            config.min_subscribers, metrics.subscribers
        ));
    }

    let days_since_last_post = (now - metrics.last_post_at).num_days();
    if days_since_last_post > config.activity_days {
        eligible = false;
        reasons.push(format!(
            "No activity in last {} days",
            config.activity_days
        ));
    }

    if !metrics.has_profile_photo {
        warnings.push("Missing profile photo".to_string());
        confidence -= 0.1;
    }
    if metrics.description.trim().is_empty() {
        warnings.push("Missing channel description".to_string());
        confidence -= 0.1;
    }
    if metrics.engagement_rate < LOW_ENGAGEMENT_RATE {
        warnings.push("Low engagement rate (<10%)".to_string());
        confidence -= 0.2;
    }
    if metrics.content_quality_score < LOW_QUALITY_SCORE {
        warnings.push("Low content quality score".to_string());
        confidence -= 0.1;
    }

    if eligible {
        reasons.push("Meets basic ad placement requirements".to_string());
    }

    EligibilityResult {
        eligible,
        reasons,
        warnings,
        confidence: confidence.clamp(0.0, 1.0),
    }
}

#[cfg(test)]
#[path = "eligibility_test.rs"]
mod tests;
