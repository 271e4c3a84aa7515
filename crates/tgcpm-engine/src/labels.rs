//! Human-readable labels used in reports.

use chrono::NaiveDateTime;

#[must_use]
pub fn engagement_tier(engagement_rate: f64) -> &'static str {
    if engagement_rate >= 40.0 {
        "Outstanding"
    } else if engagement_rate >= 30.0 {
        "Excellent"
    } else if engagement_rate >= 20.0 {
        "Good"
    } else if engagement_rate >= 10.0 {
        "Average"
    } else {
        "Low"
    }
}

#[must_use]
pub fn activity_level(posts_per_day: f64) -> &'static str {
    if posts_per_day >= 2.0 {
        "Very active"
    } else if posts_per_day >= 1.0 {
        "Active"
    } else if posts_per_day >= 0.5 {
        "Regular"
    } else {
        "Low activity"
    }
}

/// Coarse "N days/hours/minutes ago". Timestamps in the future read as
/// "0 minutes ago".
#[must_use]
pub fn format_time_ago(last: NaiveDateTime, now: NaiveDateTime) -> String {
    let delta = now - last;
    let days = delta.num_days();
    if days > 0 {
        return format!("{days} days ago");
    }
    let hours = delta.num_hours();
    if delta.num_seconds() > 3600 {
        return format!("{hours} hours ago");
    }
    format!("{} minutes ago", delta.num_minutes().max(0))
}
