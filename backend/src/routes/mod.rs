//! Route definitions for CuacaMap

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::api_info))
        // Village directory
        .route("/desa", get(handlers::list_villages))
        .route("/desa/provinsi/:provinsi", get(handlers::villages_by_provinsi))
        .route("/search-desa", get(handlers::search_villages))
        .route("/search-with-weather", get(handlers::search_with_weather))
        // BMKG weather
        .nest("/weather", weather_routes())
}

/// Weather routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_weather))
        .route("/search", get(handlers::search_weather))
        .route("/hourly", get(handlers::hourly_weather))
        .route("/alerts", get(handlers::weather_alerts))
        .route("/test", get(handlers::test_bmkg))
        .route("/info", get(handlers::weather_info))
}
