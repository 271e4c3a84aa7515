use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_TON_PRICE_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=the-open-network&vs_currencies=usd";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Use it in tests
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values count as unset so `.env` templates with `KEY=` lines work.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        parse_value::<SocketAddr>(var, &or_default(var, default))
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("TGCPM_ENV", "development"))?;
    let bind_addr = parse("TGCPM_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("TGCPM_LOG_LEVEL", "info");

    let telemetrio_api_key = optional("TELEMETRIO_API_KEY");
    let telemetrio_base_url = or_default("TGCPM_TELEMETRIO_BASE_URL", "https://api.telemetr.io/v1");
    let tgstat_api_token = optional("TGSTAT_API_TOKEN");
    let tgstat_base_url = or_default("TGCPM_TGSTAT_BASE_URL", "https://api.tgstat.ru");
    let bot_token = optional("TELEGRAM_BOT_TOKEN");
    let bot_api_base_url = or_default("TGCPM_BOT_API_BASE_URL", "https://api.telegram.org");
    let harvester_enabled =
        parse_value::<bool>("TGCPM_HARVESTER_ENABLED", &or_default("TGCPM_HARVESTER_ENABLED", "true"))?;
    let harvester_refresh_url = optional("TGCPM_HARVESTER_REFRESH_URL");

    let primary_timeout_secs = parse_value::<u64>(
        "TGCPM_PRIMARY_TIMEOUT_SECS",
        &or_default("TGCPM_PRIMARY_TIMEOUT_SECS", "10"),
    )?;
    let secondary_timeout_secs = parse_value::<u64>(
        "TGCPM_SECONDARY_TIMEOUT_SECS",
        &or_default("TGCPM_SECONDARY_TIMEOUT_SECS", "10"),
    )?;
    let tertiary_timeout_secs = parse_value::<u64>(
        "TGCPM_TERTIARY_TIMEOUT_SECS",
        &or_default("TGCPM_TERTIARY_TIMEOUT_SECS", "15"),
    )?;
    let cache_freshness_secs = parse_value::<u64>(
        "TGCPM_CACHE_FRESHNESS_SECS",
        &or_default("TGCPM_CACHE_FRESHNESS_SECS", "21600"),
    )?;
    let user_agent = or_default("TGCPM_USER_AGENT", "tgcpm/0.1 (channel-pricing)");

    let min_cpm_ton = parse_non_negative("MIN_CPM_TON", &or_default("MIN_CPM_TON", "0.1"))?;
    let ton_to_usd = parse_non_negative("TON_TO_USD", &or_default("TON_TO_USD", "5.0"))?;
    let ton_price_url = or_default("TGCPM_TON_PRICE_URL", DEFAULT_TON_PRICE_URL);

    let min_subscribers =
        parse_value::<u64>("MIN_SUBSCRIBERS", &or_default("MIN_SUBSCRIBERS", "1000"))?;
    let activity_days = parse_value::<i64>("ACTIVITY_DAYS", &or_default("ACTIVITY_DAYS", "14"))?;
    let requester_cooldown_secs = parse_value::<u64>(
        "TGCPM_REQUESTER_COOLDOWN_SECS",
        &or_default("TGCPM_REQUESTER_COOLDOWN_SECS", "60"),
    )?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        telemetrio_api_key,
        telemetrio_base_url,
        tgstat_api_token,
        tgstat_base_url,
        bot_token,
        bot_api_base_url,
        harvester_enabled,
        harvester_refresh_url,
        primary_timeout_secs,
        secondary_timeout_secs,
        tertiary_timeout_secs,
        cache_freshness_secs,
        user_agent,
        min_cpm_ton,
        ton_to_usd,
        ton_price_url,
        min_subscribers,
        activity_days,
        requester_cooldown_secs,
    })
}

fn parse_value<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

fn parse_non_negative(var: &str, raw: &str) -> Result<f64, ConfigError> {
    let value = parse_value::<f64>(var, raw)?;
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a non-negative number, got {raw}"),
        });
    }
    Ok(value)
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TGCPM_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
