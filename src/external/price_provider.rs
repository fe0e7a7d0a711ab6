use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::PriceBar;

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,
}

impl PriceProviderError {
    /// Short label for structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            PriceProviderError::Network(_) => "network",
            PriceProviderError::BadResponse(_) => "bad_response",
            PriceProviderError::Parse(_) => "parse",
            PriceProviderError::RateLimited => "rate_limited",
        }
    }
}

/// Source of daily OHLCV history.
///
/// `start` is inclusive and `end` exclusive. A symbol or range the provider has no
/// data for yields `Ok` with an empty vector; errors are reserved for transport and
/// decoding failures.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_daily_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, PriceProviderError>;
}

/// Builds the shared HTTP client used by the remote providers.
pub fn http_client(timeout: std::time::Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("Mozilla/5.0 (compatible; stockviz/0.1)")
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
