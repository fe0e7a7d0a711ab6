use chrono::NaiveDate;

use crate::models::{
    Axis, BarTrace, CandlestickTrace, ChartKind, ChartRequest, Font, ForecastSeries, Layout, LineStyle,
    Marker, PriceBar, RangeSlider, RenderedChart, ScatterMode, ScatterTrace, Title, Trace,
};
use crate::services::indicators::{close_moving_average, DEFAULT_MA_WINDOW};

pub const FORECAST_TRACE_NAME: &str = "Forecasted Prices";

/// Build the figure for one chart request. Pure: same inputs, same figure.
///
/// An empty history still yields a complete figure whose traces have no points.
pub fn render(request: &ChartRequest, history: &[PriceBar], forecast: &ForecastSeries) -> RenderedChart {
    let dates: Vec<NaiveDate> = history.iter().map(|b| b.date).collect();
    let closes: Vec<f64> = history.iter().map(|b| b.close).collect();

    let (primary, title_prefix, y_title) = match request.kind {
        ChartKind::Line => (
            Trace::Scatter(ScatterTrace {
                x: dates,
                y: closes,
                mode: ScatterMode::Lines,
                name: "Historical Prices".into(),
                line: Some(line("blue")),
                marker: None,
            }),
            "Stock Price for",
            "Price",
        ),
        ChartKind::Candlestick => (
            Trace::Candlestick(CandlestickTrace {
                x: dates,
                open: history.iter().map(|b| b.open).collect(),
                high: history.iter().map(|b| b.high).collect(),
                low: history.iter().map(|b| b.low).collect(),
                close: closes,
                name: "Candlestick Chart".into(),
            }),
            "Candlestick Chart for",
            "Price",
        ),
        ChartKind::Volume => (
            Trace::Bar(BarTrace {
                x: dates,
                y: history.iter().map(|b| b.volume as f64).collect(),
                name: "Volume".into(),
                marker: Some(marker("orange")),
            }),
            "Stock Volume for",
            "Volume",
        ),
        ChartKind::MovingAverage => {
            // Points before the window fills are left out of the line
            let (x, y): (Vec<NaiveDate>, Vec<f64>) = close_moving_average(history, DEFAULT_MA_WINDOW)
                .into_iter()
                .filter_map(|(date, value)| value.map(|v| (date, v)))
                .unzip();
            (
                Trace::Scatter(ScatterTrace {
                    x,
                    y,
                    mode: ScatterMode::Lines,
                    name: format!("{}-Day Moving Average", DEFAULT_MA_WINDOW),
                    line: Some(line("green")),
                    marker: None,
                }),
                "Moving Average for",
                "Price",
            )
        }
        ChartKind::Bar => (
            Trace::Bar(BarTrace {
                x: dates,
                y: closes,
                name: "Close Price".into(),
                marker: Some(marker("purple")),
            }),
            "Bar Chart for",
            "Close Price",
        ),
        ChartKind::Scatter => (
            Trace::Scatter(ScatterTrace {
                x: dates,
                y: closes,
                mode: ScatterMode::Markers,
                name: "Close Price".into(),
                line: None,
                marker: Some(marker("red")),
            }),
            "Scatter Plot for",
            "Close Price",
        ),
    };

    let mut data = vec![primary];
    if request.kind.includes_forecast() {
        data.push(forecast_trace(forecast));
    }

    RenderedChart {
        data,
        layout: layout(&format!("{} {}", title_prefix, request.symbol), y_title),
    }
}

fn forecast_trace(forecast: &ForecastSeries) -> Trace {
    Trace::Scatter(ScatterTrace {
        x: forecast.points.iter().map(|p| p.date).collect(),
        y: forecast.points.iter().map(|p| p.forecast).collect(),
        mode: ScatterMode::Lines,
        name: FORECAST_TRACE_NAME.into(),
        line: Some(LineStyle {
            color: "black".into(),
            dash: Some("dash".into()),
        }),
        marker: None,
    })
}

fn line(color: &str) -> LineStyle {
    LineStyle {
        color: color.into(),
        dash: None,
    }
}

fn marker(color: &str) -> Marker {
    Marker { color: color.into() }
}

fn layout(title: &str, y_title: &str) -> Layout {
    Layout {
        title: Some(title.into()),
        xaxis: Some(Axis {
            title: "Date".into(),
            rangeslider: Some(RangeSlider { visible: true }),
        }),
        yaxis: Some(Axis {
            title: Title::from(y_title),
            rangeslider: None,
        }),
        plot_bgcolor: Some("white".into()),
        paper_bgcolor: Some("white".into()),
        font: Some(Font { color: "black".into() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForecastPoint, Horizon};
    use crate::services::forecasting_service;
    use chrono::Duration;

    fn request(kind: ChartKind) -> ChartRequest {
        ChartRequest {
            symbol: "AAPL".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            horizon: Horizon::Week,
            kind,
        }
    }

    fn history(len: usize) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..len)
            .map(|i| {
                let c = 100.0 + i as f64;
                PriceBar::new(start + Duration::days(i as i64), c - 0.5, c + 1.0, c - 1.0, c, 1_000 + i as u64)
            })
            .collect()
    }

    #[test]
    fn test_every_kind_renders_empty_history() {
        for kind in ChartKind::ALL {
            let chart = render(&request(kind), &[], &ForecastSeries::empty());
            assert!(!chart.data.is_empty(), "{} produced no traces", kind);
            assert!(chart.data.iter().all(|t| t.is_empty()));
            assert!(chart.layout.title.is_some());
            assert!(serde_json::to_string(&chart).is_ok());
        }
    }

    #[test]
    fn test_volume_never_has_forecast() {
        let series = history(40);
        let forecast = forecasting_service::forecast(&series, 90).unwrap();
        let chart = render(&request(ChartKind::Volume), &series, &forecast);

        assert_eq!(chart.data.len(), 1);
        assert!(!chart.has_trace(FORECAST_TRACE_NAME));
        assert_eq!(chart.layout.yaxis.unwrap().title.text, "Volume");
    }

    #[test]
    fn test_price_kinds_overlay_forecast() {
        let series = history(40);
        let forecast = forecasting_service::forecast(&series, 7).unwrap();

        for kind in ChartKind::ALL.into_iter().filter(|k| *k != ChartKind::Volume) {
            let chart = render(&request(kind), &series, &forecast);
            assert_eq!(chart.data.len(), 2, "{}", kind);
            let overlay = &chart.data[1];
            assert_eq!(overlay.name(), FORECAST_TRACE_NAME);
            assert_eq!(overlay.len(), 7);
        }
    }

    #[test]
    fn test_moving_average_omits_unfilled_window() {
        let series = history(30);
        let chart = render(&request(ChartKind::MovingAverage), &series, &ForecastSeries::empty());

        let Trace::Scatter(ma) = &chart.data[0] else {
            panic!("moving average should be a scatter trace");
        };
        assert_eq!(ma.y.len(), 30 - DEFAULT_MA_WINDOW + 1);
        assert_eq!(ma.x[0], series[DEFAULT_MA_WINDOW - 1].date);
        // closes are 100..=119 for the first window
        assert!((ma.y[0] - 109.5).abs() < 1e-9);
    }

    #[test]
    fn test_candlestick_maps_ohlc() {
        let series = history(3);
        let chart = render(&request(ChartKind::Candlestick), &series, &ForecastSeries::empty());

        let Trace::Candlestick(c) = &chart.data[0] else {
            panic!("expected candlestick");
        };
        assert_eq!(c.open, vec![99.5, 100.5, 101.5]);
        assert_eq!(c.high[2], 103.0);
        assert_eq!(c.low[0], 99.0);
        assert_eq!(chart.layout.title.unwrap().text, "Candlestick Chart for AAPL");
    }

    #[test]
    fn test_figure_json_shape() {
        let series = history(2);
        let forecast = ForecastSeries {
            points: vec![ForecastPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                forecast: 102.0,
            }],
            ..ForecastSeries::empty()
        };
        let json = serde_json::to_value(render(&request(ChartKind::Scatter), &series, &forecast)).unwrap();

        assert_eq!(json["data"][0]["type"], "scatter");
        assert_eq!(json["data"][0]["mode"], "markers");
        assert_eq!(json["data"][0]["marker"]["color"], "red");
        assert_eq!(json["data"][1]["line"]["dash"], "dash");
        assert_eq!(json["layout"]["xaxis"]["rangeslider"]["visible"], true);
        assert_eq!(json["layout"]["yaxis"]["title"]["text"], "Close Price");
    }
}
