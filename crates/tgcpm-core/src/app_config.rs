use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub telemetrio_api_key: Option<String>,
    pub telemetrio_base_url: String,
    pub tgstat_api_token: Option<String>,
    pub tgstat_base_url: String,
    pub bot_token: Option<String>,
    pub bot_api_base_url: String,
    pub harvester_enabled: bool,
    pub harvester_refresh_url: Option<String>,
    pub primary_timeout_secs: u64,
    pub secondary_timeout_secs: u64,
    pub tertiary_timeout_secs: u64,
    pub cache_freshness_secs: u64,
    pub user_agent: String,
    pub min_cpm_ton: f64,
    pub ton_to_usd: f64,
    pub ton_price_url: String,
    pub min_subscribers: u64,
    pub activity_days: i64,
    pub requester_cooldown_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field(
                "telemetrio_api_key",
                &self.telemetrio_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("telemetrio_base_url", &self.telemetrio_base_url)
            .field(
                "tgstat_api_token",
                &self.tgstat_api_token.as_ref().map(|_| "[redacted]"),
            )
            .field("tgstat_base_url", &self.tgstat_base_url)
            .field("bot_token", &self.bot_token.as_ref().map(|_| "[redacted]"))
            .field("bot_api_base_url", &self.bot_api_base_url)
            .field("harvester_enabled", &self.harvester_enabled)
            .field("harvester_refresh_url", &self.harvester_refresh_url)
            .field("primary_timeout_secs", &self.primary_timeout_secs)
            .field("secondary_timeout_secs", &self.secondary_timeout_secs)
            .field("tertiary_timeout_secs", &self.tertiary_timeout_secs)
            .field("cache_freshness_secs", &self.cache_freshness_secs)
            .field("user_agent", &self.user_agent)
            .field("min_cpm_ton", &self.min_cpm_ton)
            .field("ton_to_usd", &self.ton_to_usd)
            .field("ton_price_url", &self.ton_price_url)
            .field("min_subscribers", &self.min_subscribers)
            .field("activity_days", &self.activity_days)
            .field("requester_cooldown_secs", &self.requester_cooldown_secs)
            .finish()
    }
}
