use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::{normalize_series, TimeSeries};

/// Fetch daily bars for `symbol` in `[start, end)`.
///
/// An inverted or empty range returns an empty series without calling the provider.
pub async fn fetch_history(
    provider: &dyn PriceProvider,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<TimeSeries, PriceProviderError> {
    if start >= end {
        info!("Empty date range for {} ({} .. {}), skipping provider call", symbol, start, end);
        return Ok(Vec::new());
    }

    match provider.fetch_daily_history(symbol, start, end).await {
        Ok(bars) => {
            let series = normalize_series(bars);
            if series.is_empty() {
                warn!(provider = provider.name(), "No price data for {} between {} and {}", symbol, start, end);
            } else {
                info!(
                    provider = provider.name(),
                    bars = series.len(),
                    "✓ Fetched price history for {}",
                    symbol
                );
            }
            Ok(series)
        }
        Err(e) => {
            match &e {
                PriceProviderError::RateLimited => warn!(provider = provider.name(), "Rate limited fetching {}", symbol),
                _ => error!(provider = provider.name(), error_kind = e.kind(), "✗ Failed to fetch price data for {}: {}", symbol, e),
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceBar;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PriceProvider for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn fetch_daily_history(
            &self,
            _symbol: &str,
            start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<PriceBar>, PriceProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let later = start + chrono::Duration::days(1);
            // Deliberately out of order with a duplicate date
            Ok(vec![
                PriceBar::new(later, 2.0, 2.0, 2.0, 2.0, 1),
                PriceBar::new(start, 1.0, 1.0, 1.0, 1.0, 1),
                PriceBar::new(later, 3.0, 3.0, 3.0, 3.0, 1),
            ])
        }
    }

    #[tokio::test]
    async fn test_inverted_range_skips_provider() {
        let provider = Counting { calls: AtomicUsize::new(0) };
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();

        let series = fetch_history(&provider, "AAPL", start, end).await.unwrap();
        assert!(series.is_empty());

        let same_day = fetch_history(&provider, "AAPL", start, start).await.unwrap();
        assert!(same_day.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_series_is_normalized() {
        let provider = Counting { calls: AtomicUsize::new(0) };
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let series = fetch_history(&provider, "AAPL", start, end).await.unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, start);
        assert_eq!(series[1].close, 3.0);
    }
}
