//! Niche-adjusted rate card built from the pricing tier table.

use serde::Serialize;
use tgcpm_core::Niche;

use crate::pricing::{niche_multiplier, SUBSCRIBER_TIERS};

/// Niche name used when the caller does not ask for one.
pub const GENERAL_NICHE: &str = "general";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierRate {
    pub name: String,
    pub min_subscribers: u64,
    pub base_ton: f64,
    pub adjusted_ton: f64,
    pub base_usd: f64,
    pub adjusted_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketRates {
    pub niche: String,
    /// `None` when the name is not a recognised niche; the multiplier is 1.0 then.
    pub known_niche: Option<Niche>,
    pub multiplier: f64,
    pub ton_usd: f64,
    /// Lowest tier first.
    pub tiers: Vec<TierRate>,
}

/// Rate card for `niche` (case-insensitive) at the given TON/USD rate.
///
/// An empty name reports as [`GENERAL_NICHE`]. Names that are not a known
/// niche are echoed back lower-cased with a neutral multiplier.
#[must_use]
pub fn market_rates(niche: &str, ton_usd: f64) -> MarketRates {
    let name = match niche.trim().to_lowercase() {
        n if n.is_empty() => GENERAL_NICHE.to_string(),
        n => n,
    };
    let known_niche = name.parse::<Niche>().ok();
    let multiplier = known_niche.map_or(1.0, niche_multiplier);

    let tiers = SUBSCRIBER_TIERS
        .iter()
        .rev()
        .map(|&(min_subscribers, base_ton, tier)| {
            let adjusted_ton = round2(base_ton * multiplier);
            TierRate {
                name: tier.to_string(),
                min_subscribers,
                base_ton,
                adjusted_ton,
                base_usd: round2(base_ton * ton_usd),
                adjusted_usd: round2(adjusted_ton * ton_usd),
            }
        })
        .collect();

    MarketRates {
        niche: name,
        known_niche,
        multiplier,
        ton_usd,
        tiers,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
