use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::PriceBar;
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{info, warn};

/// MultiProvider asks the primary provider first and falls back when it fails.
///
/// An empty answer from the primary is a real "no data" and is returned as-is;
/// only errors (network, throttling, malformed payloads) trigger the fallback.
pub struct MultiProvider {
    primary: Box<dyn PriceProvider>,
    fallback: Box<dyn PriceProvider>,
}

impl MultiProvider {
    pub fn new(primary: Box<dyn PriceProvider>, fallback: Box<dyn PriceProvider>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl PriceProvider for MultiProvider {
    fn name(&self) -> &'static str {
        "multi"
    }

    async fn fetch_daily_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, PriceProviderError> {
        match self.primary.fetch_daily_history(symbol, start, end).await {
            Ok(data) => {
                info!(provider = self.primary.name(), bars = data.len(), "✓ Fetched {} from primary provider", symbol);
                return Ok(data);
            }
            Err(PriceProviderError::RateLimited) => {
                info!("⚠️ Primary provider rate limited, trying fallback");
            }
            Err(e) => {
                warn!(provider = self.primary.name(), "Primary provider error for {}: {}", symbol, e);
            }
        }

        match self.fallback.fetch_daily_history(symbol, start, end).await {
            Ok(data) => {
                info!(provider = self.fallback.name(), bars = data.len(), "✓ Fetched {} from fallback provider", symbol);
                Ok(data)
            }
            Err(e) => {
                warn!(provider = self.fallback.name(), "Fallback provider failed for {}: {}", symbol, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Canned {
        result: fn() -> Result<Vec<PriceBar>, PriceProviderError>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PriceProvider for Canned {
        fn name(&self) -> &'static str {
            "canned"
        }

        async fn fetch_daily_history(
            &self,
            _symbol: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<PriceBar>, PriceProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }
    }

    fn one_bar() -> Result<Vec<PriceBar>, PriceProviderError> {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        Ok(vec![PriceBar::new(date, 1.0, 1.0, 1.0, 1.0, 10)])
    }

    fn empty() -> Result<Vec<PriceBar>, PriceProviderError> {
        Ok(Vec::new())
    }

    fn down() -> Result<Vec<PriceBar>, PriceProviderError> {
        Err(PriceProviderError::Network("connection refused".into()))
    }

    fn provider(
        primary: fn() -> Result<Vec<PriceBar>, PriceProviderError>,
        fallback: fn() -> Result<Vec<PriceBar>, PriceProviderError>,
    ) -> (MultiProvider, Arc<AtomicUsize>) {
        let fallback_calls = Arc::new(AtomicUsize::new(0));
        let multi = MultiProvider::new(
            Box::new(Canned { result: primary, calls: Arc::new(AtomicUsize::new(0)) }),
            Box::new(Canned { result: fallback, calls: fallback_calls.clone() }),
        );
        (multi, fallback_calls)
    }

    fn range() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_primary_error_uses_fallback() {
        let (multi, fallback_calls) = provider(down, one_bar);
        let (start, end) = range();
        let bars = multi.fetch_daily_history("AAPL", start, end).await.unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_primary_empty_is_final() {
        let (multi, fallback_calls) = provider(empty, one_bar);
        let (start, end) = range();
        let bars = multi.fetch_daily_history("ZZZZ", start, end).await.unwrap();
        assert!(bars.is_empty());
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_both_failing_returns_fallback_error() {
        let (multi, _) = provider(down, down);
        let (start, end) = range();
        let err = multi.fetch_daily_history("AAPL", start, end).await.unwrap_err();
        assert!(matches!(err, PriceProviderError::Network(_)));
    }
}
