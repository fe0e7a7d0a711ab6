use chrono::Duration;
use linfa::prelude::*;
use linfa::Dataset;
use linfa_linear::{FittedLinearRegression, LinearRegression};
use ndarray::{Array1, Array2};
use tracing::debug;

use crate::errors::ForecastError;
use crate::models::{ForecastMethod, ForecastPoint, ForecastSeries, PriceBar};

/// Project closing prices `horizon` calendar days past the last bar.
///
/// The single regression feature is the number of days since the first bar, so
/// weekend and holiday gaps keep their real width. With one bar there is nothing
/// to fit and the last close is carried forward.
pub fn forecast(series: &[PriceBar], horizon: u32) -> Result<ForecastSeries, ForecastError> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(ForecastError::EmptySeries),
    };

    let last_offset = (last.date - first.date).num_days();
    let future_offsets: Vec<f64> = (1..=horizon as i64)
        .map(|day| (last_offset + day) as f64)
        .collect();

    let (values, slope, intercept, methodology) = if series.len() < 2 {
        (
            vec![last.close; future_offsets.len()],
            0.0,
            last.close,
            ForecastMethod::FlatLine,
        )
    } else {
        let offsets: Vec<f64> = series
            .iter()
            .map(|b| (b.date - first.date).num_days() as f64)
            .collect();
        let closes: Vec<f64> = series.iter().map(|b| b.close).collect();

        let model = fit_trend(offsets, closes)?;
        let future = Array2::from_shape_vec((future_offsets.len(), 1), future_offsets)?;
        let predicted: Array1<f64> = model.predict(&future);

        let slope = model.params().get(0).copied().unwrap_or(0.0);
        (predicted.to_vec(), slope, model.intercept(), ForecastMethod::LinearRegression)
    };

    debug!(
        bars = series.len(),
        horizon,
        slope,
        intercept,
        "Fitted close-price trend"
    );

    let points = values
        .into_iter()
        .enumerate()
        .map(|(i, forecast)| ForecastPoint {
            date: last.date + Duration::days(i as i64 + 1),
            forecast,
        })
        .collect();

    Ok(ForecastSeries {
        points,
        methodology,
        slope,
        intercept,
    })
}

/// Ordinary least squares of `targets` on the single feature `offsets`, with intercept.
fn fit_trend(offsets: Vec<f64>, targets: Vec<f64>) -> Result<FittedLinearRegression<f64>, ForecastError> {
    let records = Array2::from_shape_vec((offsets.len(), 1), offsets)?;
    let dataset = Dataset::new(records, Array1::from_vec(targets));

    LinearRegression::new()
        .fit(&dataset)
        .map_err(|e| ForecastError::Fit(e.to_string()))
}
