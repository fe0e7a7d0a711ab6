use axum::extract::{Path, Query, State};
use axum::{Json, Router};
use axum::routing::get;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::{default_start_date, normalize_symbol, TimeSeries};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:symbol", get(get_prices))
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

/// GET /api/prices/:symbol?start_date=..&end_date=..
///
/// Raw daily OHLCV bars; an empty array when the provider has nothing for the range.
pub async fn get_prices(
    Path(symbol): Path<String>,
    Query(range): Query<RangeQuery>,
    State(state): State<AppState>,
) -> Result<Json<TimeSeries>, AppError> {
    let symbol = normalize_symbol(&symbol)
        .ok_or_else(|| AppError::Validation(format!("invalid symbol {:?}", symbol.trim())))?;
    let start = range.start_date.unwrap_or_else(default_start_date);
    let end = range.end_date.unwrap_or_else(|| Utc::now().date_naive());

    info!("GET /api/prices/{} - Getting price history {} .. {}", symbol, start, end);
    let series = services::price_service::fetch_history(state.price_provider.as_ref(), &symbol, start, end)
        .await
        .map_err(|e| {
            match &e {
                crate::external::price_provider::PriceProviderError::RateLimited => {
                    warn!("Rate limited when fetching prices for {}", symbol)
                }
                _ => error!("Failed to get price history for {}: {}", symbol, e),
            }
            AppError::from(e)
        })?;
    Ok(Json(series))
}
