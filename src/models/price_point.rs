use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// One trading day of OHLCV data for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Daily bars ordered by date ascending, one bar per date.
pub type TimeSeries = Vec<PriceBar>;

/// Sorts bars ascending and drops repeated dates, keeping the last bar seen for a date.
pub fn normalize_series(mut bars: TimeSeries) -> TimeSeries {
    bars.sort_by_key(|b| b.date);

    let mut out: TimeSeries = Vec::with_capacity(bars.len());
    for bar in bars {
        match out.last_mut() {
            Some(prev) if prev.date == bar.date => *prev = bar,
            _ => out.push(bar),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> PriceBar {
        let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        PriceBar::new(date, close, close, close, close, 100)
    }

    #[test]
    fn test_normalize_sorts_ascending() {
        let series = normalize_series(vec![bar(5, 3.0), bar(1, 1.0), bar(3, 2.0)]);
        let days: Vec<u32> = series.iter().map(|b| chrono::Datelike::day(&b.date)).collect();
        assert_eq!(days, vec![1, 3, 5]);
    }

    #[test]
    fn test_normalize_drops_duplicate_dates() {
        let series = normalize_series(vec![bar(1, 1.0), bar(2, 2.0), bar(2, 2.5)]);
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].close, 2.5);
    }
}
