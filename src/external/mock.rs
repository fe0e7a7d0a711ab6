use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::PriceBar;
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Offline provider producing a random-walk series on weekdays.
///
/// The walk is seeded from the symbol and starts at a fixed anchor date, so the
/// same symbol always shows the same prices for a given day.
pub struct MockProvider {
    anchor: NaiveDate,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            anchor: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default(),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_for(symbol: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    symbol.hash(&mut hasher);
    hasher.finish()
}

#[async_trait]
impl PriceProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_daily_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, PriceProviderError> {
        if start >= end || end <= self.anchor {
            return Ok(Vec::new());
        }

        let mut rng = StdRng::seed_from_u64(seed_for(symbol));
        let mut current = 50.0 + rng.random::<f64>() * 250.0;
        let mut points = Vec::new();
        let mut day = self.anchor;

        while day < end {
            let weekend = matches!(day.weekday(), Weekday::Sat | Weekday::Sun);
            if !weekend {
                let open = current;
                current *= 1.0 + (rng.random::<f64>() - 0.5) * 0.04;
                let spread = current * rng.random::<f64>() * 0.02;
                let volume = 1_000_000 + (rng.random::<f64>() * 50_000_000.0) as u64;

                if day >= start {
                    points.push(PriceBar::new(
                        day,
                        open,
                        open.max(current) + spread,
                        open.min(current) - spread,
                        current,
                        volume,
                    ));
                }
            }
            day += Duration::days(1);
        }

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_series_is_stable_and_skips_weekends() {
        let provider = MockProvider::new();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

        let first = provider.fetch_daily_history("AAPL", start, end).await.unwrap();
        let second = provider.fetch_daily_history("AAPL", start, end).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 23);
        assert!(first.iter().all(|b| !matches!(b.date.weekday(), Weekday::Sat | Weekday::Sun)));
        assert!(first.iter().all(|b| b.low <= b.open.min(b.close) && b.high >= b.open.max(b.close)));
    }
}
