use crate::external::price_provider::{http_client, PriceProvider, PriceProviderError};
use crate::models::PriceBar;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

pub struct AlphaVantageProvider {
    client: reqwest::Client,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AvDailyResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<BTreeMap<String, AvDailyBar>>,

    // When rate-limited Alpha Vantage returns:
    // { "Note": "Thank you for using Alpha Vantage! ... 5 calls per minute ..." }
    #[serde(rename = "Note")]
    note: Option<String>,

    // Newer throttle/premium responses use "Information" instead of "Note"
    #[serde(rename = "Information")]
    information: Option<String>,

    // When invalid:
    // { "Error Message": "Invalid API call. ..." }
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AvDailyBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

fn parse_price(raw: &str) -> Result<f64, PriceProviderError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| PriceProviderError::Parse(format!("{}: {:?}", e, raw)))
}

/// Keeps bars in `[start, end)`. An "Invalid API call" answer means the symbol is unknown.
pub(crate) fn parse_daily_response(
    body: AvDailyResponse,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PriceBar>, PriceProviderError> {
    if body.note.is_some() {
        // This is the throttle response
        return Err(PriceProviderError::RateLimited);
    }

    if let Some(msg) = body.error_message {
        if msg.contains("Invalid API call") {
            return Ok(Vec::new());
        }
        return Err(PriceProviderError::BadResponse(msg));
    }

    let Some(series) = body.time_series else {
        return match body.information {
            Some(info) if info.contains("rate limit") => Err(PriceProviderError::RateLimited),
            Some(info) => Err(PriceProviderError::BadResponse(info)),
            None => Err(PriceProviderError::BadResponse("missing time series".into())),
        };
    };

    // series is keyed by "YYYY-MM-DD" strings; BTreeMap sorts ascending
    let mut out = Vec::new();
    for (date_str, bar) in series {
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        if date < start || date >= end {
            continue;
        }

        let volume = bar
            .volume
            .trim()
            .parse::<u64>()
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        out.push(PriceBar::new(
            date,
            parse_price(&bar.open)?,
            parse_price(&bar.high)?,
            parse_price(&bar.low)?,
            parse_price(&bar.close)?,
            volume,
        ));
    }

    Ok(out)
}

#[async_trait]
impl PriceProvider for AlphaVantageProvider {
    fn name(&self) -> &'static str {
        "alphavantage"
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

        // compact covers roughly the latest 100 trading days (~140 calendar days)
        let today = Utc::now().date_naive();
        let outputsize = if (today - start).num_days() <= 140 { "compact" } else { "full" };

        let resp = self
            .client
            .get("https://www.alphavantage.co/query")
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", outputsize),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceProviderError::RateLimited);
        }

        let body = resp
            .json::<AvDailyResponse>()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        parse_daily_response(body, start, end)
    }
}
