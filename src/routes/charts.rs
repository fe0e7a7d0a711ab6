use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::errors::ChartError;
use crate::models::{ChartQuery, RenderedChart};
use crate::services::dashboard_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_chart))
}

/// GET /api/chart?symbol=AAPL&start_date=2020-01-01&end_date=2024-01-01&horizon=30&kind=line
///
/// Always answers with a figure. Anything that goes wrong is logged and the page gets a blank chart.
pub async fn get_chart(
    State(state): State<AppState>,
    query: Result<Query<ChartQuery>, QueryRejection>,
) -> Json<RenderedChart> {
    let request_id = Uuid::new_v4();

    let request = query
        .map_err(|rejection| ChartError::InvalidRequest(rejection.body_text()))
        .and_then(|Query(q)| {
            q.resolve(None, Utc::now().date_naive())
                .map_err(ChartError::InvalidRequest)
        });

    let request = match request {
        Ok(request) => request,
        Err(e) => {
            warn!(%request_id, error_kind = e.kind(), "Rejected chart request: {}", e);
            return Json(RenderedChart::empty());
        }
    };

    let span = info_span!(
        "chart",
        %request_id,
        symbol = %request.symbol,
        kind = %request.kind,
        start = %request.start_date,
        end = %request.end_date,
        horizon = request.horizon.days()
    );

    async move {
        info!("GET /api/chart - Rendering chart");
        match dashboard_service::build_chart(state.price_provider.as_ref(), &request).await {
            Ok(chart) => Json(chart),
            Err(e) => {
                match &e {
                    ChartError::NoData { .. } => warn!(error_kind = e.kind(), "{}", e),
                    _ => error!(error_kind = e.kind(), "Error updating chart: {}", e),
                }
                Json(RenderedChart::empty())
            }
        }
    }
    .instrument(span)
    .await
}
