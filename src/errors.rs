use axum::http::{HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use chrono::NaiveDate;
use reqwest::StatusCode;
use thiserror::Error;

use crate::external::price_provider::PriceProviderError;

/// Errors surfaced by the JSON endpoints
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Rate limited by external provider")]
    RateLimited,
    #[error("External error: {0}")]
    External(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::RateLimited => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("60"));
                (StatusCode::TOO_MANY_REQUESTS, headers, "Rate limited").into_response()
            },
            AppError::External(msg) => (StatusCode::BAD_GATEWAY, msg).into_response(),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response(),
        }
    }
}

impl From<String> for AppError {
    fn from(value: String) -> Self {
        AppError::Validation(value)
    }
}

impl From<PriceProviderError> for AppError {
    fn from(e: PriceProviderError) -> Self {
        match e {
            PriceProviderError::RateLimited => AppError::RateLimited,
            other => AppError::External(other.to_string()),
        }
    }
}

/// Failures of the regression forecaster
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("cannot forecast from an empty series")]
    EmptySeries,
    #[error("invalid regression input: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("regression fit failed: {0}")]
    Fit(String),
}

/// Why a chart could not be drawn. Logged for the operator; the page only sees a blank figure.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid chart request: {0}")]
    InvalidRequest(String),
    #[error("price provider unavailable for {symbol}: {source}")]
    ProviderUnavailable {
        symbol: String,
        #[source]
        source: PriceProviderError,
    },
    #[error("no price data for {symbol} between {start} and {end}")]
    NoData {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("forecast failed for {symbol}: {source}")]
    Computation {
        symbol: String,
        #[source]
        source: ForecastError,
    },
}

impl ChartError {
    /// Short label for structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            ChartError::InvalidRequest(_) => "invalid_request",
            ChartError::ProviderUnavailable { .. } => "provider_unavailable",
            ChartError::NoData { .. } => "no_data",
            ChartError::Computation { .. } => "computation_failure",
        }
    }
}

impl From<ChartError> for AppError {
    fn from(e: ChartError) -> Self {
        let message = e.to_string();
        match e {
            ChartError::InvalidRequest(msg) => AppError::Validation(msg),
            ChartError::ProviderUnavailable { source, .. } => source.into(),
            ChartError::NoData { .. } => AppError::NotFound(message),
            ChartError::Computation { .. } => AppError::Internal(message),
        }
    }
}
