use axum::extract::{Path, Query, State};
use axum::{Json, Router};
use axum::routing::get;
use chrono::Utc;
use tracing::{error, info};

use crate::errors::{AppError, ChartError};
use crate::models::{ChartQuery, SymbolForecast};
use crate::services::dashboard_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:symbol", get(get_forecast))
}

/// GET /api/forecast/:symbol?start_date=..&end_date=..&horizon=30
///
/// Linear-trend projection of the close price with the fitted slope and intercept.
pub async fn get_forecast(
    Path(symbol): Path<String>,
    Query(query): Query<ChartQuery>,
    State(state): State<AppState>,
) -> Result<Json<SymbolForecast>, AppError> {
    let request = query
        .resolve(Some(&symbol), Utc::now().date_naive())
        .map_err(AppError::Validation)?;

    info!(
        "GET /api/forecast/{} - {} day forecast from {} .. {}",
        request.symbol,
        request.horizon.days(),
        request.start_date,
        request.end_date
    );

    dashboard_service::build_forecast(state.price_provider.as_ref(), &request)
        .await
        .map(Json)
        .map_err(|e: ChartError| {
            error!(error_kind = e.kind(), "Failed to forecast {}: {}", request.symbol, e);
            e.into()
        })
}
