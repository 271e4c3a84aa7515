//! Eligibility rules, CPM pricing and the analysis pipeline that ties them to
//! the source coordinator.

pub mod analyzer;
pub mod eligibility;
pub mod labels;
pub mod market;
pub mod pricing;

#[cfg(test)]
mod test_support;

pub use analyzer::{AnalysisOutcome, Analyzer, ChannelAnalysis};
pub use eligibility::{evaluate, evaluate_at, EligibilityConfig};
pub use labels::{activity_level, engagement_tier, format_time_ago};
pub use market::{market_rates, MarketRates, TierRate, GENERAL_NICHE};
pub use pricing::{compute_factors, price, PricingConfig};
