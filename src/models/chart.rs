use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{normalize_symbol, DEFAULT_SYMBOL};

/// Chart types offered by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    #[default]
    Line,
    Candlestick,
    Volume,
    #[serde(alias = "moving_average")]
    MovingAverage,
    Bar,
    Scatter,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::Line,
        ChartKind::Candlestick,
        ChartKind::Volume,
        ChartKind::MovingAverage,
        ChartKind::Bar,
        ChartKind::Scatter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Candlestick => "candlestick",
            ChartKind::Volume => "volume",
            ChartKind::MovingAverage => "moving-average",
            ChartKind::Bar => "bar",
            ChartKind::Scatter => "scatter",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line Chart",
            ChartKind::Candlestick => "Candlestick Chart",
            ChartKind::Volume => "Volume Chart",
            ChartKind::MovingAverage => "Moving Average",
            ChartKind::Bar => "Bar Chart",
            ChartKind::Scatter => "Scatter Plot",
        }
    }

    /// Volume bars are on a different scale than prices, so they never carry the overlay.
    pub fn includes_forecast(&self) -> bool {
        !matches!(self, ChartKind::Volume)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of calendar days to project past the last bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Horizon {
    Week,
    TwoWeeks,
    #[default]
    Month,
    TwoMonths,
    Quarter,
}

impl Horizon {
    pub const ALL: [Horizon; 5] = [
        Horizon::Week,
        Horizon::TwoWeeks,
        Horizon::Month,
        Horizon::TwoMonths,
        Horizon::Quarter,
    ];

    pub fn days(&self) -> u32 {
        match self {
            Horizon::Week => 7,
            Horizon::TwoWeeks => 14,
            Horizon::Month => 30,
            Horizon::TwoMonths => 60,
            Horizon::Quarter => 90,
        }
    }

    pub fn label(&self) -> String {
        format!("{} Days", self.days())
    }
}

impl TryFrom<u32> for Horizon {
    type Error = String;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        Horizon::ALL
            .into_iter()
            .find(|h| h.days() == days)
            .ok_or_else(|| format!("unsupported forecast horizon: {} days (expected 7, 14, 30, 60 or 90)", days))
    }
}

impl From<Horizon> for u32 {
    fn from(h: Horizon) -> Self {
        h.days()
    }
}

/// Current values of the dashboard controls. Rebuilt on every interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub horizon: Horizon,
    pub kind: ChartKind,
}

/// First day shown when the page does not pick a start date
pub const DEFAULT_START_DATE: (i32, u32, u32) = (2020, 1, 1);

pub fn default_start_date() -> NaiveDate {
    let (y, m, d) = DEFAULT_START_DATE;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Query-string form of [`ChartRequest`]; missing controls fall back to the page defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartQuery {
    pub symbol: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub horizon: Option<Horizon>,
    pub kind: Option<ChartKind>,
}

impl ChartQuery {
    /// Resolve defaults against `today`. `symbol_override` comes from a path segment when present.
    pub fn resolve(self, symbol_override: Option<&str>, today: NaiveDate) -> Result<ChartRequest, String> {
        let raw_symbol = symbol_override
            .map(str::to_string)
            .or(self.symbol)
            .unwrap_or_else(|| DEFAULT_SYMBOL.to_string());
        let symbol = normalize_symbol(&raw_symbol)
            .ok_or_else(|| format!("invalid symbol {:?}", raw_symbol.trim()))?;

        Ok(ChartRequest {
            symbol,
            start_date: self.start_date.unwrap_or_else(default_start_date),
            end_date: self.end_date.unwrap_or(today),
            horizon: self.horizon.unwrap_or_default(),
            kind: self.kind.unwrap_or_default(),
        })
    }
}

// ==============================================================================
// Figure JSON (plotly.js shape)
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter(ScatterTrace),
    Candlestick(CandlestickTrace),
    Bar(BarTrace),
}

impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Trace::Scatter(t) => &t.name,
            Trace::Candlestick(t) => &t.name,
            Trace::Bar(t) => &t.name,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Trace::Scatter(t) => t.x.len(),
            Trace::Candlestick(t) => t.x.len(),
            Trace::Bar(t) => t.x.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScatterMode {
    Lines,
    Markers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterTrace {
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    pub mode: ScatterMode,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandlestickTrace {
    pub x: Vec<NaiveDate>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarTrace {
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
}

impl From<&str> for Title {
    fn from(text: &str) -> Self {
        Self { text: text.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSlider {
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: Title,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rangeslider: Option<RangeSlider>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub color: String,
}

/// Figure layout. Every field is optional so the blank figure serialises as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_bgcolor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderedChart {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl RenderedChart {
    /// The blank figure shown when there is nothing to draw.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_trace(&self, name: &str) -> bool {
        self.data.iter().any(|t| t.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_kind_parses_page_values() {
        let kind: ChartKind = serde_json::from_str("\"moving-average\"").unwrap();
        assert_eq!(kind, ChartKind::MovingAverage);

        let alias: ChartKind = serde_json::from_str("\"moving_average\"").unwrap();
        assert_eq!(alias, ChartKind::MovingAverage);

        assert!(serde_json::from_str::<ChartKind>("\"pie\"").is_err());
    }

    #[test]
    fn test_horizon_accepts_only_offered_values() {
        for days in [7u32, 14, 30, 60, 90] {
            let h = Horizon::try_from(days).unwrap();
            assert_eq!(h.days(), days);
        }
        assert!(Horizon::try_from(10).is_err());
        assert!(serde_json::from_str::<Horizon>("45").is_err());
        assert_eq!(serde_json::to_string(&Horizon::Quarter).unwrap(), "90");
    }

    #[test]
    fn test_only_volume_skips_forecast() {
        let without: Vec<ChartKind> = ChartKind::ALL
            .into_iter()
            .filter(|k| !k.includes_forecast())
            .collect();
        assert_eq!(without, vec![ChartKind::Volume]);
    }

    #[test]
    fn test_empty_figure_serialises_blank() {
        let json = serde_json::to_value(RenderedChart::empty()).unwrap();
        assert_eq!(json, serde_json::json!({ "data": [], "layout": {} }));
    }

    #[test]
    fn test_query_defaults() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let request = ChartQuery::default().resolve(None, today).unwrap();

        assert_eq!(request.symbol, DEFAULT_SYMBOL);
        assert_eq!(request.start_date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(request.end_date, today);
        assert_eq!(request.horizon, Horizon::Month);
        assert_eq!(request.kind, ChartKind::Line);
    }

    #[test]
    fn test_query_symbol_override_and_blank() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let query = ChartQuery {
            symbol: Some("aapl".into()),
            ..ChartQuery::default()
        };
        assert_eq!(query.clone().resolve(Some("nvda"), today).unwrap().symbol, "NVDA");
        assert_eq!(query.resolve(None, today).unwrap().symbol, "AAPL");

        let blank = ChartQuery {
            symbol: Some("  ".into()),
            ..ChartQuery::default()
        };
        assert!(blank.resolve(None, today).is_err());

        let with_query = ChartQuery {
            symbol: Some("AAPL?interval=1wk#x".into()),
            ..ChartQuery::default()
        };
        assert!(with_query.resolve(None, today).is_err());
    }

    #[test]
    fn test_trace_is_tagged_with_plotly_type() {
        let trace = Trace::Bar(BarTrace {
            x: vec![NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()],
            y: vec![1.0],
            name: "Volume".into(),
            marker: None,
        });
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["type"], "bar");
        assert_eq!(json["x"][0], "2024-01-02");
        assert!(json.get("marker").is_none());
    }
}
