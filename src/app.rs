use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::routes::{charts, dashboard, forecast, health, prices};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .merge(dashboard::router())
        .nest("/health", health::router())
        .nest("/api/chart", charts::router())
        .nest("/api/prices", prices::router())
        .nest("/api/forecast", forecast::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
