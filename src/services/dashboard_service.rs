use chrono::Utc;
use tracing::info;

use crate::errors::ChartError;
use crate::external::price_provider::PriceProvider;
use crate::models::{ChartRequest, ForecastSeries, RenderedChart, SymbolForecast, TimeSeries};
use crate::services::{chart_service, forecasting_service, price_service};

/// Fetch, forecast and render one chart.
pub async fn build_chart(
    provider: &dyn PriceProvider,
    request: &ChartRequest,
) -> Result<RenderedChart, ChartError> {
    let history = load_history(provider, request).await?;

    // The volume chart never shows the overlay, so skip the fit entirely
    let forecast = if request.kind.includes_forecast() {
        forecasting_service::forecast(&history, request.horizon.days()).map_err(|source| {
            ChartError::Computation {
                symbol: request.symbol.clone(),
                source,
            }
        })?
    } else {
        ForecastSeries::empty()
    };

    let chart = chart_service::render(request, &history, &forecast);
    info!(
        symbol = %request.symbol,
        kind = %request.kind,
        bars = history.len(),
        forecast_points = forecast.len(),
        "Rendered chart"
    );
    Ok(chart)
}

/// Fetch history and return the close-price projection with fit details.
pub async fn build_forecast(
    provider: &dyn PriceProvider,
    request: &ChartRequest,
) -> Result<SymbolForecast, ChartError> {
    let history = load_history(provider, request).await?;

    let forecast = forecasting_service::forecast(&history, request.horizon.days()).map_err(|source| {
        ChartError::Computation {
            symbol: request.symbol.clone(),
            source,
        }
    })?;

    let (last_close, last_date) = history
        .last()
        .map(|b| (b.close, b.date))
        .ok_or_else(|| no_data(request))?;

    Ok(SymbolForecast {
        symbol: request.symbol.clone(),
        last_close,
        last_date,
        horizon: request.horizon.days(),
        description: forecast.methodology.description(),
        forecast,
        generated_at: Utc::now(),
    })
}

/// Fetch history for the request, treating an empty answer as `NoData`.
pub async fn load_history(
    provider: &dyn PriceProvider,
    request: &ChartRequest,
) -> Result<TimeSeries, ChartError> {
    let history = price_service::fetch_history(provider, &request.symbol, request.start_date, request.end_date)
        .await
        .map_err(|source| ChartError::ProviderUnavailable {
            symbol: request.symbol.clone(),
            source,
        })?;

    if history.is_empty() {
        return Err(no_data(request));
    }
    Ok(history)
}

fn no_data(request: &ChartRequest) -> ChartError {
    ChartError::NoData {
        symbol: request.symbol.clone(),
        start: request.start_date,
        end: request.end_date,
    }
}
