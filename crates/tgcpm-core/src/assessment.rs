use serde::{Deserialize, Serialize};

/// Outcome of the eligibility rule set.
///
/// `reasons` lists hard-requirement failures first; when the channel passes
/// it holds a single confirmation line instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub eligible: bool,
    pub reasons: Vec<String>,
    pub warnings: Vec<String>,
    /// In `[0, 1]`; starts at 1.0 and only soft warnings reduce it.
    pub confidence: f64,
}

/// Coarse competitive band derived from engagement and audience size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPosition {
    Premium,
    Strong,
    Average,
    BelowAverage,
}

impl MarketPosition {
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            MarketPosition::Premium => "Premium channel - high competition expected",
            MarketPosition::Strong => "Strong performer - competitive market",
            MarketPosition::Average => "Average performer - moderate competition",
            MarketPosition::BelowAverage => "Below average - easier entry but lower ROI",
        }
    }
}

impl std::fmt::Display for MarketPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Every factor that went into a price, kept for display and auditing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingFactors {
    pub base_price: f64,
    pub tier_name: String,
    pub niche_multiplier: f64,
    pub engagement_multiplier: f64,
    pub quality_multiplier: f64,
    pub verification_multiplier: f64,
    pub interaction_multiplier: f64,
    pub frequency_multiplier: f64,
    /// Product of the six multipliers above.
    pub combined_multiplier: f64,
}

/// Tiered CPM recommendation in TON.
///
/// Invariant: `min <= conservative <= competitive <= aggressive`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpmRecommendation {
    pub conservative: f64,
    pub competitive: f64,
    pub aggressive: f64,
    /// Applied non-neutral factors, in emission order.
    pub reasoning: Vec<String>,
    pub market_position: MarketPosition,
    pub success_probability: f64,
    pub factors: PricingFactors,
}

impl CpmRecommendation {
    /// Reasoning lines joined for single-line display.
    #[must_use]
    pub fn reasoning_text(&self) -> String {
        self.reasoning.join(" • ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_position_serializes_snake_case() {
        let json = serde_json::to_string(&MarketPosition::BelowAverage).unwrap();
        assert_eq!(json, "\"below_average\"");
    }

    #[test]
    fn reasoning_text_joins_with_bullets() {
        let rec = CpmRecommendation {
            conservative: 0.1,
            competitive: 0.1,
            aggressive: 0.13,
            reasoning: vec!["Base: 0.15 TON".to_string(), "Verified channel (+10%)".to_string()],
            market_position: MarketPosition::Average,
            success_probability: 0.7,
            factors: PricingFactors {
                base_price: 0.15,
                tier_name: "1K-10K tier".to_string(),
                niche_multiplier: 1.0,
                engagement_multiplier: 1.0,
                quality_multiplier: 1.0,
                verification_multiplier: 1.1,
                interaction_multiplier: 1.0,
                frequency_multiplier: 1.0,
                combined_multiplier: 1.1,
            },
        };
        assert_eq!(
            rec.reasoning_text(),
            "Base: 0.15 TON • Verified channel (+10%)"
        );
    }
}
