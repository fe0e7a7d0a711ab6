use crate::external::price_provider::{http_client, PriceProvider, PriceProviderError};
use crate::models::{normalize_series, PriceBar};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Yahoo Finance provider - free v8 chart API, no API key required.
pub struct YahooFinanceProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            base_url: "https://query1.finance.yahoo.com".to_string(),
        }
    }

    /// Daily chart request for `[start, end)`. The symbol is a single encoded path
    /// segment, so `?`, `#` or `/` in it cannot reach the query string.
    fn chart_request(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<reqwest::Request, PriceProviderError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| PriceProviderError::Parse(format!("base url {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| PriceProviderError::Parse(format!("base url {} cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);

        let period1 = unix_midnight(start).to_string();
        let period2 = unix_midnight(end).to_string();

        self.client
            .get(url)
            .query(&[
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("interval", "1d"),
                ("events", "history"),
            ])
            .build()
            .map_err(|e| PriceProviderError::Parse(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: Option<YahooMeta>,
    // Absent when the range has no trading days
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or(0)
}

fn field(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

fn is_no_data(error: &YahooError) -> bool {
    let code = error.code.as_deref().unwrap_or_default();
    let description = error.description.as_deref().unwrap_or_default();
    code.eq_ignore_ascii_case("Not Found") || description.contains("No data found")
}

/// Turns a decoded chart response into ascending bars.
pub(crate) fn parse_chart_response(body: YahooChartResponse) -> Result<Vec<PriceBar>, PriceProviderError> {
    if let Some(error) = body.chart.error {
        if is_no_data(&error) {
            return Ok(Vec::new());
        }
        return Err(PriceProviderError::BadResponse(
            error.description.unwrap_or_else(|| "unknown chart error".into()),
        ));
    }

    let Some(result) = body.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };

    let offset = result.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    if !result.timestamp.is_empty() && quote.close.len() != result.timestamp.len() {
        return Err(PriceProviderError::Parse(
            "timestamp and close arrays have different lengths".into(),
        ));
    }

    let bars: Vec<PriceBar> = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            // Skip holidays and partial rows
            let open = field(&quote.open, i)?;
            let high = field(&quote.high, i)?;
            let low = field(&quote.low, i)?;
            let close = field(&quote.close, i)?;
            let volume = field(&quote.volume, i).unwrap_or(0.0).max(0.0) as u64;

            // Timestamps are the session open; shift into exchange time before taking the date
            let date = chrono::DateTime::from_timestamp(ts + offset, 0)?.date_naive();

            Some(PriceBar::new(date, open, high, low, close, volume))
        })
        .collect();

    Ok(normalize_series(bars))
}

#[async_trait]
impl PriceProvider for YahooFinanceProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch_daily_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, PriceProviderError> {
        if start >= end {
            return Ok(Vec::new());
        }

        let request = self.chart_request(symbol, start, end)?;
        let resp = self
            .client
            .execute(request)
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        match resp.status() {
            // Unknown or delisted symbol
            reqwest::StatusCode::NOT_FOUND => return Ok(Vec::new()),
            reqwest::StatusCode::TOO_MANY_REQUESTS => return Err(PriceProviderError::RateLimited),
            s if !s.is_success() => {
                return Err(PriceProviderError::BadResponse(format!("HTTP {}", s)));
            }
            _ => {}
        }

        let body: YahooChartResponse = resp
            .json()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        let bars = parse_chart_response(body)?;

        // period2 lands on midnight UTC but exchange offsets can pull an extra day in
        Ok(bars
            .into_iter()
            .filter(|b| b.date >= start && b.date < end)
            .collect())
    }
}
