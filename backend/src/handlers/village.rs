//! HTTP handlers for the village directory

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::types::Pagination;
use validator::Validate;

use crate::error::AppResult;
use crate::services::village::{VillageFilter, DEFAULT_LIST_LIMIT, DEFAULT_PROVINSI_LIMIT};
use crate::services::weather::DEFAULT_SEARCH_WITH_WEATHER_LIMIT;
use crate::services::WeatherService;
use crate::AppState;

/// Default number of results for `/api/search-desa`
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Service overview with dataset statistics
pub async fn api_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service": "CuacaMap Desa API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Pencarian desa dan prakiraan cuaca BMKG untuk seluruh Indonesia",
        "statistics": state.villages.statistics(),
        "endpoints": {
            "desa": "GET /api/desa?provinsi=&kabupaten=&limit=&offset=",
            "search": "GET /api/search-desa?q=",
            "provinsi": "GET /api/desa/provinsi/:provinsi",
            "search_with_weather": "GET /api/search-with-weather?q=",
            "weather": "GET /api/weather?adm4=",
            "weather_search": "GET /api/weather/search?q=",
            "weather_hourly": "GET /api/weather/hourly?adm4=|q=",
            "weather_alerts": "GET /api/weather/alerts?adm4=",
        },
        "dataSource": "BMKG (Badan Meteorologi, Klimatologi, dan Geofisika)",
    }))
}

/// Query parameters for listing villages
#[derive(Debug, Deserialize, Validate)]
pub struct ListVillagesQuery {
    pub provinsi: Option<String>,
    pub kabupaten: Option<String>,
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// List villages with optional province/regency filters
pub async fn list_villages(
    State(state): State<AppState>,
    Query(query): Query<ListVillagesQuery>,
) -> AppResult<Json<Value>> {
    query.validate()?;

    let filter = VillageFilter {
        provinsi: query.provinsi,
        kabupaten: query.kabupaten,
    };
    let pagination = Pagination::new(
        query.offset.unwrap_or(0),
        query.limit.unwrap_or(DEFAULT_LIST_LIMIT),
    );
    let page = state.villages.list(&filter, pagination)?;

    Ok(Json(json!({
        "success": true,
        "data": page.data,
        "pagination": page.pagination,
    })))
}

/// Free-text search parameters
#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    #[serde(default)]
    #[validate(length(min = 2, message = "Search query must be at least 2 characters"))]
    pub q: String,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

/// Search villages by name, district, regency, province or ADM4 code
pub async fn search_villages(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Value>> {
    query.validate()?;

    let results = state.villages.search(&query.q)?;
    let total_found = results.len();
    let shown: Vec<_> = results
        .into_iter()
        .take(query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT))
        .map(|v| v.summary())
        .collect();

    Ok(Json(json!({
        "success": true,
        "query": query.q,
        "totalFound": total_found,
        "totalShown": shown.len(),
        "data": shown,
    })))
}

/// Paging parameters
#[derive(Debug, Deserialize, Validate)]
pub struct PageQuery {
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Villages within a province
pub async fn villages_by_provinsi(
    State(state): State<AppState>,
    Path(provinsi): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Value>> {
    query.validate()?;

    let pagination = Pagination::new(
        query.offset.unwrap_or(0),
        query.limit.unwrap_or(DEFAULT_PROVINSI_LIMIT),
    );
    let page = state.villages.by_provinsi(&provinsi, pagination)?;

    Ok(Json(json!({
        "success": true,
        "provinsi": provinsi,
        "data": page.data,
        "pagination": page.pagination,
    })))
}

/// Search villages and attach the current forecast to the top matches
pub async fn search_with_weather(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Value>> {
    query.validate()?;

    let service = WeatherService::new(state.bmkg, state.villages, state.clock);
    let limit = query.limit.unwrap_or(DEFAULT_SEARCH_WITH_WEATHER_LIMIT);
    let found = service.search_with_weather(&query.q, limit).await?;

    Ok(Json(json!({
        "success": true,
        "query": query.q,
        "totalFound": found.total_found,
        "totalShown": found.results.len(),
        "results": found.results,
    })))
}
