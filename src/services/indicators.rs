use chrono::NaiveDate;

use crate::models::PriceBar;

/// Window used by the moving-average chart
pub const DEFAULT_MA_WINDOW: usize = 20;

/// Trailing mean over the last `window` values, aligned with `values`.
///
/// Index `i` is `None` while fewer than `window` values end at `i`, so a series of
/// length `L` has `L - window + 1` defined entries.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    // prefix[k] = values[0] + .. + values[k - 1]
    let prefix: Vec<f64> = std::iter::once(0.0)
        .chain(values.iter().scan(0.0_f64, |acc, &v| {
            *acc += v;
            Some(*acc)
        }))
        .collect();

    (1..=values.len())
        .map(|end| {
            end.checked_sub(window)
                .map(|begin| (prefix[end] - prefix[begin]) / window as f64)
        })
        .collect()
}

/// Close-price moving average keyed by bar date, i.e. the series with one computed column added.
pub fn close_moving_average(series: &[PriceBar], window: usize) -> Vec<(NaiveDate, Option<f64>)> {
    let closes: Vec<f64> = series.iter().map(|b| b.close).collect();

    series
        .iter()
        .map(|b| b.date)
        .zip(rolling_mean(&closes, window))
        .collect()
}
