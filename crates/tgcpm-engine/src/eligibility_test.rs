use chrono::TimeDelta;

use super::*;
use crate::test_support::{now, sample_metrics};

fn config() -> EligibilityConfig {
    EligibilityConfig::default()
}

#[test]
fn healthy_channel_is_eligible_with_full_confidence() {
    let result = evaluate_at(&sample_metrics(), &config(), now());
    assert!(result.eligible);
    assert_eq!(result.reasons, vec!["Meets basic ad placement requirements"]);
    assert!(result.warnings.is_empty());
    assert!((result.confidence - 1.0).abs() < f64::EPSILON);
}

#[test]
fn subscriber_shortfall_is_single_reason_and_leaves_confidence() {
    let mut metrics = sample_metrics();
    metrics.subscribers = 500;
    metrics.engagement_rate = 30.0;

    let result = evaluate_at(&metrics, &config(), now());
    assert!(!result.eligible);
    assert_eq!(result.reasons, vec!["Needs 1000+ subscribers (has 500)"]);
    assert!(
        (result.confidence - 1.0).abs() < f64::EPSILON,
        "expected untouched confidence, got {}",
        result.confidence
    );
}

#[test]
fn collects_every_failure_in_order() {
    let mut metrics = sample_metrics();
    metrics.is_public = false;
    metrics.subscribers = 10;
    metrics.last_post_at = now() - TimeDelta::days(30);

    let result = evaluate_at(&metrics, &config(), now());
    assert!(!result.eligible);
    assert_eq!(
        result.reasons,
        vec![
            "Channel must be public",
            "Needs 1000+ subscribers (has 10)",
            "No activity in last 14 days",
        ]
    );
}

#[test]
fn activity_window_is_inclusive() {
    let mut metrics = sample_metrics();
    metrics.last_post_at = now() - TimeDelta::days(14) - TimeDelta::hours(23);
    assert!(evaluate_at(&metrics, &config(), now()).eligible);

    metrics.last_post_at = now() - TimeDelta::days(15);
    assert!(!evaluate_at(&metrics, &config(), now()).eligible);
}

#[test]
fn warnings_reduce_confidence_in_fixed_order() {
    let mut metrics = sample_metrics();
    metrics.has_profile_photo = false;
    metrics.description = "   ".to_string();
    metrics.engagement_rate = 5.0;
    metrics.content_quality_score = 0.2;

    let result = evaluate_at(&metrics, &config(), now());
    assert!(result.eligible, "warnings are soft");
    assert_eq!(
        result.warnings,
        vec![
            "Missing profile photo",
            "Missing channel description",
            "Low engagement rate (<10%)",
            "Low content quality score",
        ]
    );
    assert!(
        (result.confidence - 0.5).abs() < 1e-9,
        "got {}",
        result.confidence
    );
}

#[test]
fn confidence_never_negative() {
    let mut metrics = sample_metrics();
    metrics.has_profile_photo = false;
    metrics.description.clear();
    metrics.engagement_rate = 0.0;
    metrics.content_quality_score = 0.0;

    let result = evaluate_at(&metrics, &config(), now());
    assert!(result.confidence >= 0.0);
    assert!(result.confidence <= 1.0);
}

#[test]
fn custom_thresholds_are_honoured() {
    let strict = EligibilityConfig {
        min_subscribers: 50_000,
        activity_days: 1,
    };
    let mut metrics = sample_metrics();
    metrics.last_post_at = now() - TimeDelta::days(3);

    let result = evaluate_at(&metrics, &strict, now());
    assert_eq!(
        result.reasons,
        vec![
            "Needs 50000+ subscribers (has 20000)",
            "No activity in last 1 days",
        ]
    );
}
