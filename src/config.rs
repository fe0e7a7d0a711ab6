use std::str::FromStr;
use std::time::Duration;

/// Which market-data backend serves price history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Yahoo,
    AlphaVantage,
    Multi,
    Mock,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yahoo" => Ok(ProviderKind::Yahoo),
            "alphavantage" => Ok(ProviderKind::AlphaVantage),
            "multi" => Ok(ProviderKind::Multi),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(format!(
                "Invalid PRICE_PROVIDER: {}. Must be 'yahoo', 'alphavantage', 'multi' or 'mock'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
    pub provider: ProviderKind,
    pub alphavantage_api_key: Option<String>,
    pub provider_timeout: Duration,
    /// Seconds between automatic chart refreshes in the page; 0 disables
    pub auto_refresh_secs: u64,
    pub debug: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
            provider: ProviderKind::Yahoo,
            alphavantage_api_key: None,
            provider_timeout: Duration::from_secs(30),
            auto_refresh_secs: 60,
            debug: false,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| format!("{} has an invalid value: {}", key, raw)),
        _ => Ok(default),
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let provider = match std::env::var("PRICE_PROVIDER") {
            Ok(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => defaults.provider,
        };

        let debug_flag = std::env::args().any(|a| a == "--debug");

        let config = Self {
            host: env_or("HOST", defaults.host)?,
            port: env_or("PORT", defaults.port)?,
            provider,
            alphavantage_api_key: std::env::var("ALPHAVANTAGE_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            provider_timeout: Duration::from_secs(env_or("PROVIDER_TIMEOUT_SECS", 30u64)?),
            auto_refresh_secs: env_or("AUTO_REFRESH_SECS", defaults.auto_refresh_secs)?,
            debug: debug_flag || env_or("DEBUG", false)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        let needs_key = matches!(self.provider, ProviderKind::AlphaVantage | ProviderKind::Multi);
        if needs_key && self.alphavantage_api_key.is_none() {
            return Err("ALPHAVANTAGE_API_KEY must be set for the alphavantage and multi providers".to_string());
        }
        if self.provider_timeout.is_zero() {
            return Err("PROVIDER_TIMEOUT_SECS must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
