//! Plain-text rendering for CLI output.

use std::fmt;

use chrono::NaiveDateTime;
use tgcpm_db::StoredAnalysis;
use tgcpm_engine::{
    activity_level, engagement_tier, format_time_ago, ChannelAnalysis, MarketRates,
};

const DESCRIPTION_PREVIEW_CHARS: usize = 100;
const LIST_PREVIEW: usize = 3;

/// Text report for one analysis. `min_subscribers` is the configured
/// eligibility minimum quoted in the advice for ineligible channels.
pub(crate) struct AnalysisReport<'a> {
    pub analysis: &'a ChannelAnalysis,
    pub ton_usd: f64,
    pub now: NaiveDateTime,
    pub min_subscribers: u64,
}

impl fmt::Display for AnalysisReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channel = &self.analysis.channel;
        let m = &channel.metrics;
        let eligibility = &self.analysis.eligibility;
        let rec = &self.analysis.recommendation;

        writeln!(f, "CPM analysis: @{}", m.handle)?;
        writeln!(
            f,
            "Source: {}{}{}",
            channel.source.as_str(),
            if channel.fresh { "" } else { " (stale cache)" },
            if channel.supplemented {
                " + supplemented"
            } else {
                ""
            }
        )?;
        writeln!(
            f,
            "Eligibility: {}",
            if eligibility.eligible {
                "ELIGIBLE"
            } else {
                "NOT ELIGIBLE"
            }
        )?;

        writeln!(f, "\nCore metrics")?;
        writeln!(f, "  Subscribers:   {}", group_thousands(m.subscribers))?;
        writeln!(f, "  Avg views:     {}", group_thousands(whole(m.avg_views)))?;
        writeln!(
            f,
            "  Engagement:    {:.1}% ({})",
            m.engagement_rate,
            engagement_tier(m.engagement_rate)
        )?;
        writeln!(f, "  Niche:         {}", m.niche.label())?;
        writeln!(
            f,
            "  Verified:      {}",
            if m.is_verified { "yes" } else { "no" }
        )?;
        writeln!(f, "  Description:   {}", preview(&m.description))?;

        writeln!(f, "\nActivity")?;
        writeln!(
            f,
            "  Cadence:       {:.1} posts/day ({})",
            m.posts_per_day,
            activity_level(m.posts_per_day)
        )?;
        writeln!(f, "  Media content: {:.0}% visual posts", m.media_ratio * 100.0)?;
        writeln!(f, "  Reactions:     {}", group_thousands(m.total_reactions))?;
        writeln!(f, "  Forwards:      {}", group_thousands(m.total_forwards))?;
        writeln!(f, "  Last post:     {}", format_time_ago(m.last_post_at, self.now))?;

        writeln!(f, "\nEligibility assessment")?;
        for reason in eligibility.reasons.iter().take(LIST_PREVIEW) {
            writeln!(f, "  - {reason}")?;
        }
        if !eligibility.warnings.is_empty() {
            writeln!(f, "\nConsiderations")?;
            for warning in eligibility.warnings.iter().take(LIST_PREVIEW) {
                writeln!(f, "  - {warning}")?;
            }
        }

        if !eligibility.eligible {
            writeln!(f, "\nNot ready for paid placement.")?;
            return writeln!(
                f,
                "Look for public, actively posting channels with {}+ subscribers, \
                 15%+ engagement and a complete profile in the {} niche.",
                group_thousands(self.min_subscribers),
                m.niche
            );
        }

        writeln!(f, "\nCPM recommendations")?;
        writeln!(f, "  Conservative:  {}", ton_with_usd(rec.conservative, self.ton_usd))?;
        writeln!(
            f,
            "  Competitive:   {}  recommended",
            ton_with_usd(rec.competitive, self.ton_usd)
        )?;
        writeln!(f, "  Aggressive:    {}", ton_with_usd(rec.aggressive, self.ton_usd))?;
        writeln!(f, "\nPricing factors: {}", rec.reasoning_text())?;
        writeln!(f, "Market position: {}", rec.market_position)?;
        writeln!(
            f,
            "Success probability: {:.0}%",
            rec.success_probability * 100.0
        )
    }
}

pub(crate) struct MarketReport<'a>(pub &'a MarketRates);

impl fmt::Display for MarketReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rates = self.0;
        writeln!(f, "Market rates: {} niche", rates.niche)?;
        writeln!(f, "TON price: ${:.2}", rates.ton_usd)?;
        writeln!(f, "Niche multiplier: {:.1}x", rates.multiplier)?;
        if rates.known_niche.is_none() {
            writeln!(f, "(not a recognised niche; showing neutral rates)")?;
        }
        writeln!(f)?;
        for tier in &rates.tiers {
            writeln!(
                f,
                "  {:<14} base {:.2} TON (${:.2})  adjusted {:.2} TON (${:.2})",
                tier.name, tier.base_ton, tier.base_usd, tier.adjusted_ton, tier.adjusted_usd
            )?;
        }
        writeln!(
            f,
            "\nBidding: conservative = competitive x 0.8, aggressive = competitive x 1.3"
        )
    }
}

pub(crate) fn render_recent(row: &StoredAnalysis) -> String {
    let r = &row.record;
    format!(
        "{}  @{:<24} {:>10} subs  {:<13} {:<12} {:.2} TON  x{}",
        row.analyzed_at.format("%Y-%m-%d %H:%M"),
        r.handle,
        group_thousands(r.subscribers),
        r.niche.as_str(),
        if r.eligible { "eligible" } else { "ineligible" },
        r.competitive_cpm,
        row.analysis_count
    )
}

fn ton_with_usd(ton: f64, ton_usd: f64) -> String {
    format!("{ton:.2} TON (${:.2})", ton * ton_usd)
}

fn preview(text: &str) -> String {
    if text.chars().count() > DESCRIPTION_PREVIEW_CHARS {
        let head: String = text.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole(value: f64) -> u64 {
    value.max(0.0).round() as u64
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeDelta};
    use tgcpm_core::{ChannelMetrics, DataSource, EligibilityResult, Niche, ResolvedChannel};
    use tgcpm_engine::{evaluate_at, market_rates, price, EligibilityConfig, PricingConfig};

    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn analysis(subscribers: u64) -> ChannelAnalysis {
        let metrics = ChannelMetrics {
            handle: "cryptodaily".to_string(),
            title: "Crypto Daily".to_string(),
            description: "x".repeat(120),
            subscribers,
            is_public: true,
            is_verified: true,
            has_profile_photo: true,
            avg_views: 6_000.0,
            engagement_rate: 30.0,
            recent_posts: 10,
            posts_per_day: 1.5,
            total_forwards: 1_200,
            total_reactions: 34_500,
            media_ratio: 0.25,
            niche: Niche::Crypto,
            content_quality_score: 0.8,
            last_post_at: now() - TimeDelta::hours(5),
        };
        let eligibility: EligibilityResult =
            evaluate_at(&metrics, &EligibilityConfig::default(), now());
        let recommendation = price(&metrics, &eligibility, &PricingConfig::default());
        ChannelAnalysis {
            channel: ResolvedChannel {
                metrics,
                source: DataSource::Harvester,
                fresh: false,
                supplemented: false,
            },
            eligibility,
            recommendation,
        }
    }

    fn report(analysis: &ChannelAnalysis, min_subscribers: u64) -> AnalysisReport<'_> {
        AnalysisReport {
            analysis,
            ton_usd: 2.0,
            now: now(),
            min_subscribers,
        }
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn preview_truncates_long_descriptions() {
        assert_eq!(preview("short"), "short");
        let long = "y".repeat(101);
        assert_eq!(preview(&long), format!("{}...", "y".repeat(100)));
    }

    #[test]
    fn eligible_report_shows_prices_in_ton_and_usd() {
        let a = analysis(20_000);
        let text = report(&a, 1_000).to_string();

        assert!(text.starts_with("CPM analysis: @cryptodaily\n"), "{text}");
        assert!(text.contains("Source: harvester (stale cache)"), "{text}");
        assert!(text.contains("Eligibility: ELIGIBLE"));
        assert!(text.contains("Subscribers:   20,000"));
        assert!(text.contains("Engagement:    30.0% (Excellent)"));
        assert!(text.contains("Reactions:     34,500"));
        assert!(text.contains("Cadence:       1.5 posts/day (Active)"));
        assert!(text.contains("Last post:     5 hours ago"));
        assert!(text.contains(&format!(
            "Competitive:   {:.2} TON (${:.2})  recommended",
            a.recommendation.competitive,
            a.recommendation.competitive * 2.0
        )));
        assert!(text.contains("Pricing factors: Base (10K-50K tier): 0.25 TON • "));
        assert!(text.contains("Market position: Strong performer - competitive market"));
        assert!(text.contains("Success probability: 70%"));
    }

    #[test]
    fn ineligible_report_omits_prices() {
        let a = analysis(300);
        let text = report(&a, 1_000).to_string();
        assert!(text.contains("Eligibility: NOT ELIGIBLE"));
        assert!(text.contains("  - Needs 1000+ subscribers (has 300)"));
        assert!(!text.contains("CPM recommendations"));
        assert!(text.contains("Not ready for paid placement."));
        assert!(text.contains("channels with 1,000+ subscribers"), "{text}");
    }

    #[test]
    fn ineligible_advice_quotes_configured_minimum() {
        let a = analysis(300);
        let text = report(&a, 5_000).to_string();
        assert!(text.contains("channels with 5,000+ subscribers"), "{text}");
        assert!(!text.contains("1,000+"));
    }

    #[test]
    fn market_report_lists_every_tier() {
        let text = MarketReport(&market_rates("crypto", 2.0)).to_string();
        assert!(text.starts_with("Market rates: crypto niche\n"));
        assert!(text.contains("Niche multiplier: 1.4x"));
        assert_eq!(text.matches(" tier ").count(), 4, "{text}");
        assert!(!text.contains("not a recognised niche"));

        let text = MarketReport(&market_rates("cooking", 2.0)).to_string();
        assert!(text.contains("not a recognised niche"));
    }
}
