use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Single point in a price forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub forecast: f64,
}

/// Forecasting methodology used
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    LinearRegression,
    FlatLine, // Single-point history, nothing to fit
}

impl ForecastMethod {
    pub fn description(&self) -> &'static str {
        match self {
            ForecastMethod::LinearRegression => {
                "Ordinary least squares of close price against days since the first bar"
            }
            ForecastMethod::FlatLine => "Last close carried forward (fewer than two bars)",
        }
    }
}

/// Close-price projection for the days after the last historical bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub points: Vec<ForecastPoint>,
    pub methodology: ForecastMethod,
    /// Price change per calendar day of the fitted line
    pub slope: f64,
    /// Fitted price at the first historical date
    pub intercept: f64,
}

impl ForecastSeries {
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            methodology: ForecastMethod::LinearRegression,
            slope: 0.0,
            intercept: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Response body for the forecast endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SymbolForecast {
    pub symbol: String,
    pub last_close: f64,
    pub last_date: NaiveDate,
    pub horizon: u32,
    pub description: &'static str,
    #[serde(flatten)]
    pub forecast: ForecastSeries,
    pub generated_at: DateTime<Utc>,
}
