mod price_point;
mod forecast;
mod chart;
mod symbol;

pub use price_point::{normalize_series, PriceBar, TimeSeries};
pub use forecast::{ForecastMethod, ForecastPoint, ForecastSeries, SymbolForecast};
pub use chart::{
    default_start_date, Axis, BarTrace, CandlestickTrace, ChartKind, ChartQuery, ChartRequest, Font, Horizon, Layout, LineStyle,
    Marker, RangeSlider, RenderedChart, ScatterMode, ScatterTrace, Title, Trace,
};
pub use symbol::{normalize_symbol, suggested_symbols, SymbolOption, DEFAULT_SYMBOL, SUGGESTED_SYMBOLS};
