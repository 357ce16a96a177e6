//! HTTP handlers for BMKG weather endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::error::AppResult;
use crate::services::WeatherService;
use crate::AppState;

/// ADM4 code sampled by the connectivity test (Gambir, Jakarta Pusat)
pub const SAMPLE_ADM4: &str = "31.71.01.1001";

fn weather_service(state: &AppState) -> WeatherService {
    WeatherService::new(state.bmkg.clone(), state.villages.clone(), state.clock.clone())
}

/// Query parameters addressing a village by ADM4 code
#[derive(Debug, Deserialize)]
pub struct Adm4Query {
    pub adm4: Option<String>,
}

/// Forecast for an ADM4 code
pub async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<Adm4Query>,
) -> AppResult<Json<Value>> {
    let service = weather_service(&state);
    let target = service.resolve_target(query.adm4.as_deref(), None)?;
    let report = service.weather_report(&target.adm4).await?;

    Ok(Json(json!({
        "success": true,
        "data": report,
        "message": format!("Data cuaca berhasil diambil untuk ADM4: {}", target.adm4),
        "timestamp": state.clock.now(),
    })))
}

/// Village-name query
#[derive(Debug, Deserialize, Validate)]
pub struct VillageNameQuery {
    #[serde(default)]
    #[validate(length(min = 2, message = "Search query must be at least 2 characters"))]
    pub q: String,
}

/// Forecast for the best-matching village name
pub async fn search_weather(
    State(state): State<AppState>,
    Query(query): Query<VillageNameQuery>,
) -> AppResult<Json<Value>> {
    query.validate()?;

    let service = weather_service(&state);
    let target = service.resolve_target(None, Some(query.q.as_str()))?;
    let report = service.weather_report(&target.adm4).await?;

    let message = match &target.village {
        Some(found) => format!(
            "Ditemukan {} desa, menampilkan cuaca untuk: {}",
            found.total_found, found.village.nama_desa
        ),
        None => format!("Data cuaca berhasil diambil untuk ADM4: {}", target.adm4),
    };

    Ok(Json(json!({
        "success": true,
        "village": target.village,
        "data": report,
        "message": message,
        "timestamp": state.clock.now(),
    })))
}

/// Either an ADM4 code or a village name
#[derive(Debug, Deserialize)]
pub struct TargetQuery {
    pub adm4: Option<String>,
    pub q: Option<String>,
}

/// Flat 3-hourly forecast listing
pub async fn hourly_weather(
    State(state): State<AppState>,
    Query(query): Query<TargetQuery>,
) -> AppResult<Json<Value>> {
    let service = weather_service(&state);
    let target = service.resolve_target(query.adm4.as_deref(), query.q.as_deref())?;
    let report = service.hourly(&target).await?;

    let search_info = target.village.as_ref().map(|found| {
        json!({
            "query": query.q,
            "found_villages": found.total_found,
            "selected_village": found.village.nama_desa,
        })
    });
    let message = format!(
        "Prakiraan {} slot per 3 jam untuk {}",
        report.data_summary.total_forecasts, report.location.desa
    );

    Ok(Json(json!({
        "success": true,
        "data": {
            "location": report.location,
            "data_summary": report.data_summary,
            "hourly_forecast": report.hourly_forecast,
            "current_weather": report.current_weather,
            "search_info": search_info,
        },
        "message": message,
        "timestamp": state.clock.now(),
    })))
}

/// Hazard alerts for the next 24 hours
pub async fn weather_alerts(
    State(state): State<AppState>,
    Query(query): Query<TargetQuery>,
) -> AppResult<Json<Value>> {
    let service = weather_service(&state);
    let target = service.resolve_target(query.adm4.as_deref(), query.q.as_deref())?;
    let report = service.alerts(&target.adm4).await?;

    Ok(Json(json!({
        "success": true,
        "village": target.village,
        "data": report,
        "timestamp": state.clock.now(),
    })))
}

/// Connectivity check plus a sample fetch
pub async fn test_bmkg(State(state): State<AppState>) -> Json<Value> {
    let service = weather_service(&state);
    let connected = service.test_connection().await;

    let sample = match service.weather_report(SAMPLE_ADM4).await {
        Ok(report) => json!({
            "success": true,
            "adm4": SAMPLE_ADM4,
            "location": report.summary.location,
            "days": report.summary.total_days,
        }),
        Err(e) => json!({
            "success": false,
            "adm4": SAMPLE_ADM4,
            "error": e.to_string(),
        }),
    };

    Json(json!({
        "success": connected,
        "test_connection": connected,
        "bmkg_api": {
            "base_url": state.bmkg.base_url(),
            "timeout": format!("{}ms", state.bmkg.timeout().as_millis()),
        },
        "test_result": sample,
        "available_endpoints": [
            "GET /api/weather?adm4=",
            "GET /api/weather/search?q=",
            "GET /api/weather/hourly?adm4=|q=",
            "GET /api/weather/alerts?adm4=",
        ],
        "timestamp": state.clock.now(),
    }))
}

/// Static description of the weather API
pub async fn weather_info() -> Json<Value> {
    Json(json!({
        "service": "CuacaMap Weather API",
        "version": env!("CARGO_PKG_VERSION"),
        "features": [
            "Prakiraan cuaca 3 harian per desa (ADM4)",
            "Pencarian cuaca berdasarkan nama desa",
            "Prakiraan per 3 jam",
            "Peringatan dini bencana hidrometeorologi",
        ],
        "adm4_format": "XX.XX.XX.XXXX",
        "dataSource": "BMKG (Badan Meteorologi, Klimatologi, dan Geofisika)",
    }))
}
