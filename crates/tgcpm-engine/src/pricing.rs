//! CPM Pricing Engine.
//!
//! A subscriber-tier base price is scaled by six independent multipliers
//! (niche, engagement, quality, verification, interaction, cadence) combined
//! by multiplication. Three price points are derived from the result and
//! floored at a configured minimum.

use tgcpm_core::{
    AppConfig, ChannelMetrics, CpmRecommendation, EligibilityResult, MarketPosition, Niche,
    PricingFactors,
};

const CONSERVATIVE_FACTOR: f64 = 0.8;
const AGGRESSIVE_FACTOR: f64 = 1.3;

/// `(min_subscribers, base_ton, tier_name)`, highest tier first.
pub const SUBSCRIBER_TIERS: &[(u64, f64, &str)] = &[
    (100_000, 0.75, "100K+ tier"),
    (50_000, 0.45, "50K-100K tier"),
    (10_000, 0.25, "10K-50K tier"),
    (1_000, 0.15, "1K-10K tier"),
];

/// Per-niche price multipliers; anything not listed prices at 1.0.
pub const NICHE_MULTIPLIERS: &[(Niche, f64)] = &[
    (Niche::Crypto, 1.4),
    (Niche::Finance, 1.3),
    (Niche::Tech, 1.2),
    (Niche::Business, 1.1),
    (Niche::Gaming, 1.0),
    (Niche::Education, 0.9),
    (Niche::News, 0.8),
    (Niche::Entertainment, 0.7),
    (Niche::Lifestyle, 0.8),
];

#[derive(Debug, Clone, PartialEq)]
pub struct PricingConfig {
    /// Floor applied independently to each price point, in TON.
    pub min_cpm_ton: f64,
}

impl PricingConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            min_cpm_ton: config.min_cpm_ton,
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self { min_cpm_ton: 0.1 }
    }
}

/// Base price and tier name. Counts below the lowest tier use its price.
#[must_use]
pub fn base_price(subscribers: u64) -> (f64, &'static str) {
    let lowest = SUBSCRIBER_TIERS[SUBSCRIBER_TIERS.len() - 1];
    let (_, price, name) = SUBSCRIBER_TIERS
        .iter()
        .copied()
        .find(|(threshold, _, _)| subscribers >= *threshold)
        .unwrap_or(lowest);
    (price, name)
}

#[must_use]
pub fn niche_multiplier(niche: Niche) -> f64 {
    NICHE_MULTIPLIERS
        .iter()
        .find(|(n, _)| *n == niche)
        .map_or(1.0, |(_, m)| *m)
}

#[must_use]
pub fn engagement_multiplier(engagement_rate: f64) -> f64 {
    if engagement_rate >= 50.0 {
        1.3
    } else if engagement_rate >= 30.0 {
        1.15
    } else if engagement_rate >= 20.0 {
        1.0
    } else if engagement_rate >= 10.0 {
        0.9
    } else {
        0.8
    }
}

/// Linear map of `[0, 1]` quality onto `[0.8, 1.2]`.
#[must_use]
pub fn quality_multiplier(quality: f64) -> f64 {
    0.8 + quality.clamp(0.0, 1.0) * 0.4
}

#[must_use]
pub fn verification_multiplier(is_verified: bool) -> f64 {
    if is_verified {
        1.1
    } else {
        1.0
    }
}

/// Reactions plus forwards over `avg_views * 100`.
///
/// The denominator makes channels with very few views look far more
/// interactive than they are; see `interaction_rate_is_view_sensitive` in the
/// tests before recalibrating.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn interaction_multiplier(metrics: &ChannelMetrics) -> f64 {
    let interactions = metrics.total_reactions.saturating_add(metrics.total_forwards);
    if interactions == 0 || metrics.avg_views <= 0.0 {
        return 1.0;
    }
    let rate = interactions as f64 / (metrics.avg_views * 100.0);
    if rate > 10.0 {
        1.2
    } else if rate > 5.0 {
        1.1
    } else if rate < 1.0 {
        0.95
    } else {
        1.0
    }
}

/// Posting-cadence multiplier; 0 posts/day means "unknown" and is neutral.
#[must_use]
pub fn frequency_multiplier(posts_per_day: f64) -> f64 {
    if posts_per_day <= 0.0 {
        1.0
    } else if posts_per_day >= 2.0 {
        1.1
    } else if posts_per_day >= 1.0 {
        1.05
    } else if posts_per_day >= 0.5 {
        1.0
    } else {
        0.95
    }
}

/// First matching band wins, evaluated top-down.
#[must_use]
pub fn market_position(metrics: &ChannelMetrics) -> MarketPosition {
    let er = metrics.engagement_rate;
    if er >= 40.0 && metrics.subscribers >= 50_000 {
        MarketPosition::Premium
    } else if er >= 25.0 && metrics.subscribers >= 10_000 {
        MarketPosition::Strong
    } else if er >= 15.0 {
        MarketPosition::Average
    } else {
        MarketPosition::BelowAverage
    }
}

/// `confidence * 0.7` when eligible, else a flat 0.1.
#[must_use]
pub fn success_probability(eligibility: &EligibilityResult) -> f64 {
    if eligibility.eligible {
        (eligibility.confidence * 0.7).clamp(0.0, 1.0)
    } else {
        0.1
    }
}

#[must_use]
pub fn compute_factors(metrics: &ChannelMetrics) -> PricingFactors {
    let (base, tier_name) = base_price(metrics.subscribers);
    let niche = niche_multiplier(metrics.niche);
    let engagement = engagement_multiplier(metrics.engagement_rate);
    let quality = quality_multiplier(metrics.content_quality_score);
    let verification = verification_multiplier(metrics.is_verified);
    let interaction = interaction_multiplier(metrics);
    let frequency = frequency_multiplier(metrics.posts_per_day);

    PricingFactors {
        base_price: base,
        tier_name: tier_name.to_string(),
        niche_multiplier: niche,
        engagement_multiplier: engagement,
        quality_multiplier: quality,
        verification_multiplier: verification,
        interaction_multiplier: interaction,
        frequency_multiplier: frequency,
        combined_multiplier: niche * engagement * quality * verification * interaction * frequency,
    }
}

/// Produces the tiered recommendation for `metrics`.
///
/// All three price points derive from the unrounded competitive price, each
/// floored at `config.min_cpm_ton` and only then rounded to two decimals, so
/// `min <= conservative <= competitive <= aggressive`.
#[must_use]
pub fn price(
    metrics: &ChannelMetrics,
    eligibility: &EligibilityResult,
    config: &PricingConfig,
) -> CpmRecommendation {
    let factors = compute_factors(metrics);
    let floor = config.min_cpm_ton.max(0.0);

    let raw = factors.base_price * factors.combined_multiplier;
    let settle = |value: f64| round2(value.max(floor)).max(floor);
    let conservative = settle(raw * CONSERVATIVE_FACTOR);
    let competitive = settle(raw);
    let aggressive = settle(raw.max(floor) * AGGRESSIVE_FACTOR);

    CpmRecommendation {
        conservative,
        competitive,
        aggressive,
        reasoning: reasoning(metrics, &factors),
        market_position: market_position(metrics),
        success_probability: success_probability(eligibility),
        factors,
    }
}

/// Non-neutral factors only, in fixed order: base tier, engagement, niche,
/// activity, interaction, quality, verification.
#[must_use]
pub fn reasoning(metrics: &ChannelMetrics, factors: &PricingFactors) -> Vec<String> {
    let mut lines = vec![format!(
        "Base ({}): {} TON",
        factors.tier_name, factors.base_price
    )];

    let engagement = factors.engagement_multiplier;
    if engagement > 1.0 {
        lines.push(format!("High engagement (+{}%)", percent(engagement - 1.0)));
    } else if engagement < 1.0 {
        lines.push(format!("Low engagement ({}% discount)", percent(1.0 - engagement)));
    }

    let niche = factors.niche_multiplier;
    let label = metrics.niche.label();
    if niche > 1.0 {
        lines.push(format!("{label} niche premium (+{}%)", percent(niche - 1.0)));
    } else if niche < 1.0 {
        lines.push(format!("{label} niche discount ({}%)", percent(1.0 - niche)));
    }

    let frequency = factors.frequency_multiplier;
    if frequency > 1.0 {
        lines.push(format!(
            "High activity ({:.1} posts/day)",
            metrics.posts_per_day
        ));
    } else if frequency < 1.0 {
        lines.push(format!(
            "Low activity ({:.1} posts/day)",
            metrics.posts_per_day
        ));
    }

    let interaction = factors.interaction_multiplier;
    if interaction > 1.0 {
        lines.push(format!(
            "Strong interaction metrics (+{}%)",
            percent(interaction - 1.0)
        ));
    } else if interaction < 1.0 {
        lines.push(format!(
            "Low interaction density ({}% discount)",
            percent(1.0 - interaction)
        ));
    }

    if metrics.content_quality_score > 0.7 {
        lines.push("High content quality".to_string());
    } else if metrics.content_quality_score < 0.4 {
        lines.push("Content quality concerns".to_string());
    }

    if metrics.is_verified {
        lines.push("Verified channel (+10%)".to_string());
    }

    lines
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[allow(clippy::cast_possible_truncation)]
fn percent(fraction: f64) -> i64 {
    (fraction * 100.0).round() as i64
}

#[cfg(test)]
#[path = "pricing_test.rs"]
mod tests;
