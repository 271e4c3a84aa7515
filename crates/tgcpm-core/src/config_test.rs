use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("DATABASE_URL", "sqlite://./stats.db?mode=rwc");
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "TGCPM_ENV"));
}

#[test]
fn build_app_config_fails_without_database_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "DATABASE_URL"),
        "expected MissingEnvVar(DATABASE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should parse");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.telemetrio_api_key.is_none());
    assert!(cfg.tgstat_api_token.is_none());
    assert!(cfg.bot_token.is_none());
    assert!(cfg.harvester_enabled);
    assert!(cfg.harvester_refresh_url.is_none());
    assert_eq!(cfg.primary_timeout_secs, 10);
    assert_eq!(cfg.secondary_timeout_secs, 10);
    assert_eq!(cfg.tertiary_timeout_secs, 15);
    assert_eq!(cfg.cache_freshness_secs, 6 * 3600);
    assert!((cfg.min_cpm_ton - 0.1).abs() < f64::EPSILON);
    assert!((cfg.ton_to_usd - 5.0).abs() < f64::EPSILON);
    assert_eq!(cfg.min_subscribers, 1000);
    assert_eq!(cfg.activity_days, 14);
    assert_eq!(cfg.requester_cooldown_secs, 60);
}

#[test]
fn build_app_config_reads_provider_tokens() {
    let mut map = full_env();
    map.insert("TELEMETRIO_API_KEY", "tm-key");
    map.insert("TGSTAT_API_TOKEN", "tg-token");
    map.insert("TELEGRAM_BOT_TOKEN", "123:abc");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.telemetrio_api_key.as_deref(), Some("tm-key"));
    assert_eq!(cfg.tgstat_api_token.as_deref(), Some("tg-token"));
    assert_eq!(cfg.bot_token.as_deref(), Some("123:abc"));
}

#[test]
fn build_app_config_treats_blank_token_as_unset() {
    let mut map = full_env();
    map.insert("TELEMETRIO_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.telemetrio_api_key.is_none());
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("TGCPM_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TGCPM_BIND_ADDR"),
        "expected InvalidEnvVar(TGCPM_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_min_subscribers() {
    let mut map = full_env();
    map.insert("MIN_SUBSCRIBERS", "lots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MIN_SUBSCRIBERS"),
        "expected InvalidEnvVar(MIN_SUBSCRIBERS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_negative_min_cpm() {
    let mut map = full_env();
    map.insert("MIN_CPM_TON", "-0.5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MIN_CPM_TON"),
        "expected InvalidEnvVar(MIN_CPM_TON), got: {result:?}"
    );
}

#[test]
fn build_app_config_overrides_market_settings() {
    let mut map = full_env();
    map.insert("MIN_CPM_TON", "0.25");
    map.insert("TON_TO_USD", "3.2");
    map.insert("ACTIVITY_DAYS", "7");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!((cfg.min_cpm_ton - 0.25).abs() < f64::EPSILON);
    assert!((cfg.ton_to_usd - 3.2).abs() < f64::EPSILON);
    assert_eq!(cfg.activity_days, 7);
}

#[test]
fn build_app_config_can_disable_harvester() {
    let mut map = full_env();
    map.insert("TGCPM_HARVESTER_ENABLED", "false");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(!cfg.harvester_enabled);
}

#[test]
fn app_config_debug_redacts_secrets() {
    let mut map = full_env();
    map.insert("TELEMETRIO_API_KEY", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(!rendered.contains("stats.db"));
    assert!(rendered.contains("[redacted]"));
}
