use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::models::{default_start_date, suggested_symbols, ChartKind, Horizon, SymbolOption, DEFAULT_SYMBOL};
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/api/options", get(get_options))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Debug, Serialize)]
pub struct ChoiceOption<T: Serialize> {
    pub label: String,
    pub value: T,
}

#[derive(Debug, Serialize)]
pub struct DefaultControls {
    pub symbol: &'static str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub horizon: Horizon,
    pub kind: ChartKind,
}

/// Everything the page needs to build its controls
#[derive(Debug, Serialize)]
pub struct DashboardOptions {
    pub symbols: Vec<SymbolOption>,
    pub horizons: Vec<ChoiceOption<Horizon>>,
    pub kinds: Vec<ChoiceOption<ChartKind>>,
    pub defaults: DefaultControls,
    pub auto_refresh_secs: u64,
}

async fn get_options(State(state): State<AppState>) -> Json<DashboardOptions> {
    Json(DashboardOptions {
        symbols: suggested_symbols(),
        horizons: Horizon::ALL
            .into_iter()
            .map(|h| ChoiceOption { label: h.label(), value: h })
            .collect(),
        kinds: ChartKind::ALL
            .into_iter()
            .map(|k| ChoiceOption { label: k.label().to_string(), value: k })
            .collect(),
        defaults: DefaultControls {
            symbol: DEFAULT_SYMBOL,
            start_date: default_start_date(),
            end_date: Utc::now().date_naive(),
            horizon: Horizon::default(),
            kind: ChartKind::default(),
        },
        auto_refresh_secs: state.config.auto_refresh_secs,
    })
}
