//! Weather service: village resolution, BMKG report building and alerts

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::alerts::{self, Clock, RainfallAnalysis, FORECAST_HORIZON_HOURS};
use shared::models::{
    celsius_to_fahrenheit, normalize, Alert, BmkgLocation, BmkgPayload, BmkgSlot, VillageSummary,
};
use shared::validation::validate_adm4_code;

use crate::error::{AppError, AppResult};
use crate::external::BmkgClient;
use crate::services::village::{VillageDirectory, VillageMatch};

/// Default number of villages fetched by `search_with_weather`
pub const DEFAULT_SEARCH_WITH_WEATHER_LIMIT: usize = 5;

const NOT_AVAILABLE: &str = "N/A";
const DEFAULT_TIMEZONE: &str = "Asia/Jakarta";

/// Weather service
#[derive(Clone)]
pub struct WeatherService {
    bmkg: BmkgClient,
    villages: Arc<VillageDirectory>,
    clock: Arc<dyn Clock>,
}

/// The ADM4 code a request resolved to
#[derive(Debug, Clone)]
pub struct WeatherTarget {
    pub adm4: String,
    /// Set when the code came from a village-name query
    pub village: Option<VillageMatch>,
}

// ============================================================================
// Report types
// ============================================================================

/// Display form of a BMKG forecast
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub adm4: String,
    pub timestamp: DateTime<Utc>,
    pub lokasi: Option<ReportLocation>,
    pub forecast: Vec<DayForecast>,
    pub current_weather: Option<ProcessedForecast>,
    pub summary: ReportSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportLocation {
    pub desa: String,
    pub kecamatan: String,
    pub kotkab: String,
    pub provinsi: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub timezone: String,
    pub adm1: Option<String>,
    pub adm2: Option<String>,
    pub adm3: Option<String>,
    pub adm4: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayForecast {
    pub day: usize,
    pub date: Option<String>,
    pub forecasts: Vec<ProcessedForecast>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessedForecast {
    pub datetime: Option<String>,
    pub local_datetime: Option<String>,
    pub utc_datetime: Option<String>,
    pub temperature: Temperature,
    pub weather: WeatherCondition,
    pub wind: Wind,
    pub humidity: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub precipitation: f64,
    pub visibility: Visibility,
    pub time_index: Option<String>,
    pub analysis_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Temperature {
    pub celsius: Option<f64>,
    pub fahrenheit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeatherCondition {
    pub code: Option<i64>,
    pub description: String,
    pub description_en: String,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Wind {
    pub speed: f64,
    pub direction: String,
    pub direction_deg: Option<f64>,
    pub direction_to: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Visibility {
    pub value: Option<f64>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub current_temp: String,
    pub current_weather: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_humidity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_wind: Option<String>,
    pub today_forecast_count: usize,
    pub total_days: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// One row of the flat 3-hourly listing
#[derive(Debug, Clone, Serialize)]
pub struct HourlyForecast {
    pub day: usize,
    pub slot: usize,
    pub date: Option<String>,
    pub time: Option<String>,
    pub hour: Option<u32>,
    #[serde(flatten)]
    pub forecast: ProcessedForecast,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourlyLocation {
    pub adm4: String,
    pub desa: String,
    pub kecamatan: String,
    pub kabupaten: String,
    pub provinsi: String,
    pub coordinates: Coordinates,
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Coordinates {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourlyDataSummary {
    pub total_forecasts: usize,
    pub forecast_days: usize,
    pub interval: String,
    pub coverage: String,
    pub first_forecast: Option<String>,
    pub last_forecast: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourlyReport {
    pub location: HourlyLocation,
    pub data_summary: HourlyDataSummary,
    pub hourly_forecast: Vec<HourlyForecast>,
    pub current_weather: Option<ProcessedForecast>,
}

/// Alerts for one village at one instant
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertReport {
    pub adm4: String,
    pub generated_at: DateTime<Utc>,
    pub horizon_hours: i64,
    pub rainfall: RainfallAnalysis,
    pub alerts: Vec<Alert>,
    /// Highest-priority alert, if severe enough for the banner
    pub banner: Option<Alert>,
}

/// Per-village outcome of a search-with-weather request
#[derive(Debug, Clone, Serialize)]
pub struct VillageWeather {
    pub village: VillageSummary,
    pub weather: Option<WeatherReport>,
    pub status: FetchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    Success,
    WeatherFailed,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchWithWeather {
    pub total_found: usize,
    pub results: Vec<VillageWeather>,
}

// ============================================================================
// Service
// ============================================================================

impl WeatherService {
    pub fn new(bmkg: BmkgClient, villages: Arc<VillageDirectory>, clock: Arc<dyn Clock>) -> Self {
        Self {
            bmkg,
            villages,
            clock,
        }
    }

    /// Pick the ADM4 code for a request. An explicit code wins over a name query.
    pub fn resolve_target(&self, adm4: Option<&str>, query: Option<&str>) -> AppResult<WeatherTarget> {
        if let Some(code) = adm4.map(str::trim).filter(|c| !c.is_empty()) {
            check_adm4(code)?;
            return Ok(WeatherTarget {
                adm4: code.to_string(),
                village: None,
            });
        }

        let Some(query) = query.filter(|q| !q.trim().is_empty()) else {
            return Err(AppError::invalid_input(
                "adm4",
                "Provide an ADM4 code or a village name",
                "Silakan masukkan kode wilayah ADM4 atau nama desa",
            ));
        };

        let found = self.villages.resolve(query)?;
        tracing::info!(
            "Resolved \"{}\" to {} ({})",
            query,
            found.village.nama_desa,
            found.village.adm4_code
        );

        Ok(WeatherTarget {
            adm4: found.village.adm4_code.clone(),
            village: Some(found),
        })
    }

    async fn fetch(&self, adm4: &str) -> AppResult<BmkgPayload> {
        check_adm4(adm4)?;
        let payload = self.bmkg.fetch_forecast(adm4).await?;
        if !payload.has_forecast() {
            return Err(AppError::NotFound(format!("Forecast data for {}", adm4)));
        }
        Ok(payload)
    }

    /// Fetch and build the display report for an ADM4 code
    pub async fn weather_report(&self, adm4: &str) -> AppResult<WeatherReport> {
        let payload = self.fetch(adm4).await?;
        Ok(build_report(&payload, adm4, self.clock.now()))
    }

    /// Flat 3-hourly listing for a resolved target
    pub async fn hourly(&self, target: &WeatherTarget) -> AppResult<HourlyReport> {
        let payload = self.fetch(&target.adm4).await?;
        let report = build_report(&payload, &target.adm4, self.clock.now());
        Ok(build_hourly(&report, target))
    }

    /// Run the alert engine over the current forecast
    pub async fn alerts(&self, adm4: &str) -> AppResult<AlertReport> {
        let payload = self.fetch(adm4).await?;
        let now = self.clock.now();

        let alerts::Assessment { analysis, alerts } = alerts::assess(&normalize(&payload), now);
        let banner = alerts::banner_alert(&alerts).cloned();

        tracing::info!(adm4, count = alerts.len(), "Generated weather alerts");

        Ok(AlertReport {
            adm4: adm4.to_string(),
            generated_at: now,
            horizon_hours: FORECAST_HORIZON_HOURS,
            rainfall: analysis,
            alerts,
            banner,
        })
    }

    /// Search villages and fetch weather for the first `limit` of them.
    ///
    /// Villages are fetched one after another; a failed fetch is reported on
    /// that village instead of failing the request.
    pub async fn search_with_weather(&self, query: &str, limit: usize) -> AppResult<SearchWithWeather> {
        let matches: Vec<VillageSummary> = self
            .villages
            .search(query)?
            .into_iter()
            .map(|v| v.summary())
            .collect();
        let total_found = matches.len();

        let mut results = Vec::with_capacity(limit.min(total_found));
        for village in matches.into_iter().take(limit) {
            let outcome = match self.weather_report(&village.adm4_code).await {
                Ok(report) => VillageWeather {
                    village,
                    weather: Some(report),
                    status: FetchStatus::Success,
                    error: None,
                },
                Err(e) => {
                    tracing::warn!("Weather failed for {}: {}", village.nama_desa, e);
                    VillageWeather {
                        village,
                        weather: None,
                        status: FetchStatus::WeatherFailed,
                        error: Some(e.to_string()),
                    }
                }
            };
            results.push(outcome);
        }

        Ok(SearchWithWeather {
            total_found,
            results,
        })
    }

    pub async fn test_connection(&self) -> bool {
        self.bmkg.test_connection().await
    }
}

fn check_adm4(code: &str) -> AppResult<()> {
    validate_adm4_code(code).map_err(|msg| {
        AppError::invalid_input("adm4", msg, "Format kode ADM4 harus: XX.XX.XX.XXXX")
    })
}

// ============================================================================
// Report building
// ============================================================================

/// Build the display report from a raw payload
pub fn build_report(payload: &BmkgPayload, adm4: &str, generated_at: DateTime<Utc>) -> WeatherReport {
    let lokasi = payload.location().map(|l| report_location(l, adm4));

    let forecast: Vec<DayForecast> = payload
        .days()
        .iter()
        .enumerate()
        .map(|(index, slots)| DayForecast {
            day: index + 1,
            date: slots
                .iter()
                .find_map(|s| s.local_datetime.as_deref())
                .and_then(|dt| split_local_datetime(dt).0),
            forecasts: slots.iter().map(process_slot).collect(),
        })
        .collect();

    let current_weather = forecast
        .iter()
        .find_map(|day| day.forecasts.first())
        .cloned();

    let summary = build_summary(&forecast, current_weather.as_ref(), lokasi.as_ref());

    WeatherReport {
        adm4: adm4.to_string(),
        timestamp: generated_at,
        lokasi,
        forecast,
        current_weather,
        summary,
    }
}

fn report_location(l: &BmkgLocation, adm4: &str) -> ReportLocation {
    ReportLocation {
        desa: or_na(l.desa.as_deref()),
        kecamatan: or_na(l.kecamatan.as_deref()),
        kotkab: or_na(l.kotkab.as_deref()),
        provinsi: or_na(l.provinsi.as_deref()),
        lat: l.lat,
        lon: l.lon,
        timezone: l
            .timezone
            .clone()
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
        adm1: l.adm1.clone(),
        adm2: l.adm2.clone(),
        adm3: l.adm3.clone(),
        adm4: l.adm4.clone().unwrap_or_else(|| adm4.to_string()),
    }
}

/// Convert one provider slot to its display form
pub fn process_slot(slot: &BmkgSlot) -> ProcessedForecast {
    ProcessedForecast {
        datetime: slot.datetime.clone(),
        local_datetime: slot.local_datetime.clone(),
        utc_datetime: slot.utc_datetime.clone(),
        temperature: Temperature {
            celsius: slot.t,
            fahrenheit: slot.t.map(celsius_to_fahrenheit),
        },
        weather: WeatherCondition {
            code: slot.weather.map(|c| c.round() as i64),
            description: or_na(slot.weather_desc.as_deref()),
            description_en: or_na(slot.weather_desc_en.as_deref()),
            icon_url: slot.image.clone(),
        },
        wind: Wind {
            speed: slot.ws.unwrap_or(0.0),
            direction: or_na(slot.wd.as_deref()),
            direction_deg: slot.wd_deg,
            direction_to: or_na(slot.wd_to.as_deref()),
        },
        humidity: slot.hu,
        cloud_cover: slot.tcc,
        precipitation: slot.tp.unwrap_or(0.0),
        visibility: Visibility {
            value: slot.vs,
            text: or_na(slot.vs_text.as_deref()),
        },
        time_index: slot.time_index.clone(),
        analysis_date: slot.analysis_date.clone(),
    }
}

fn build_summary(
    forecast: &[DayForecast],
    current: Option<&ProcessedForecast>,
    lokasi: Option<&ReportLocation>,
) -> ReportSummary {
    let total_days = forecast.len();
    let Some(current) = current else {
        return ReportSummary {
            current_temp: NOT_AVAILABLE.to_string(),
            current_weather: NOT_AVAILABLE.to_string(),
            current_humidity: None,
            current_wind: None,
            today_forecast_count: 0,
            total_days,
            location: None,
        };
    };

    ReportSummary {
        current_temp: current
            .temperature
            .celsius
            .map(|c| format!("{}°C", c))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        current_weather: current.weather.description.clone(),
        current_humidity: current.humidity.map(|h| format!("{}%", h)),
        current_wind: Some(format!("{} km/h {}", current.wind.speed, current.wind.direction)),
        today_forecast_count: forecast.first().map(|d| d.forecasts.len()).unwrap_or(0),
        total_days,
        location: Some(
            lokasi
                .map(|l| format!("{}, {}, {}", l.desa, l.kecamatan, l.kotkab))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
    }
}

/// Flatten a report into 3-hourly rows
pub fn build_hourly(report: &WeatherReport, target: &WeatherTarget) -> HourlyReport {
    let hourly_forecast: Vec<HourlyForecast> = report
        .forecast
        .iter()
        .flat_map(|day| {
            day.forecasts.iter().enumerate().map(move |(index, f)| {
                let (date, time) = f
                    .local_datetime
                    .as_deref()
                    .map(split_local_datetime)
                    .unwrap_or((None, None));
                let hour = time
                    .as_deref()
                    .and_then(|t| t.split(':').next())
                    .and_then(|h| h.parse().ok());
                HourlyForecast {
                    day: day.day,
                    slot: index + 1,
                    date,
                    time,
                    hour,
                    forecast: f.clone(),
                }
            })
        })
        .collect();

    let village = target.village.as_ref().map(|m| &m.village);
    let pick = |from_bmkg: Option<&str>, from_village: Option<&str>| {
        from_bmkg
            .filter(|v| *v != NOT_AVAILABLE)
            .or(from_village)
            .unwrap_or(NOT_AVAILABLE)
            .to_string()
    };
    let lokasi = report.lokasi.as_ref();

    let location = HourlyLocation {
        adm4: target.adm4.clone(),
        desa: pick(lokasi.map(|l| l.desa.as_str()), village.map(|v| v.nama_desa.as_str())),
        kecamatan: pick(lokasi.map(|l| l.kecamatan.as_str()), village.map(|v| v.kecamatan.as_str())),
        kabupaten: pick(lokasi.map(|l| l.kotkab.as_str()), village.map(|v| v.kabupaten.as_str())),
        provinsi: pick(lokasi.map(|l| l.provinsi.as_str()), village.map(|v| v.provinsi.as_str())),
        coordinates: Coordinates {
            lat: lokasi.and_then(|l| l.lat),
            lon: lokasi.and_then(|l| l.lon),
        },
        timezone: lokasi
            .map(|l| l.timezone.clone())
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
    };

    let data_summary = HourlyDataSummary {
        total_forecasts: hourly_forecast.len(),
        forecast_days: report.forecast.len(),
        interval: "3 hours".to_string(),
        coverage: format!("{} hours total", hourly_forecast.len() * 3),
        first_forecast: hourly_forecast
            .first()
            .and_then(|h| h.forecast.local_datetime.clone()),
        last_forecast: hourly_forecast
            .last()
            .and_then(|h| h.forecast.local_datetime.clone()),
    };

    HourlyReport {
        location,
        data_summary,
        current_weather: report.current_weather.clone(),
        hourly_forecast,
    }
}

/// Split `YYYY-MM-DD HH:MM:SS` into its date and time halves
fn split_local_datetime(value: &str) -> (Option<String>, Option<String>) {
    let mut parts = value.split_whitespace();
    let date = parts.next().map(str::to_string);
    let time = parts.next().map(str::to_string);
    (date, time)
}

fn or_na(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BmkgConfig;
    use crate::services::village::tests::sample_directory;
    use chrono::TimeZone;
    use shared::alerts::FixedClock;
    use shared::models::parse_payload;

    fn payload() -> BmkgPayload {
        parse_payload(
            r#"{
                "lokasi": {"adm4": "31.71.01.1001", "desa": "Gambir", "kecamatan": "Gambir",
                           "kotkab": "Kota Adm. Jakarta Pusat", "provinsi": "DKI Jakarta",
                           "lat": -6.1766, "lon": 106.8231, "timezone": "Asia/Jakarta"},
                "data": [{"cuaca": [
                    [
                        {"local_datetime": "2024-01-15 14:00:00", "utc_datetime": "2024-01-15 07:00:00",
                         "t": 30, "tp": 2.5, "ws": 12.4, "wd": "W", "wd_deg": 270, "wd_to": "E",
                         "hu": 70, "tcc": 80, "vs": 9000, "vs_text": "> 9 km", "weather": 61,
                         "weather_desc": "Hujan Ringan", "weather_desc_en": "Light Rain"},
                        {"local_datetime": "2024-01-15 17:00:00", "t": 28, "tp": 0, "ws": 8, "wd": "SW",
                         "hu": 80, "weather_desc": "Berawan"}
                    ],
                    [
                        {"local_datetime": "2024-01-16 02:00:00", "t": 24, "tp": 0, "ws": 4, "wd": "S",
                         "hu": 90, "weather_desc": "Cerah"}
                    ]
                ]}]
            }"#,
        )
        .unwrap()
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 6, 0, 0).unwrap()
    }

    fn service() -> WeatherService {
        let bmkg = BmkgClient::new(&BmkgConfig {
            base_url: "http://127.0.0.1:9/unused".to_string(),
            ..BmkgConfig::default()
        })
        .unwrap();
        WeatherService::new(
            bmkg,
            Arc::new(sample_directory()),
            Arc::new(FixedClock(generated_at())),
        )
    }

    #[test]
    fn test_build_report() {
        let report = build_report(&payload(), "31.71.01.1001", generated_at());

        assert_eq!(report.forecast.len(), 2);
        assert_eq!(report.forecast[0].day, 1);
        assert_eq!(report.forecast[0].date.as_deref(), Some("2024-01-15"));
        assert_eq!(report.forecast[1].date.as_deref(), Some("2024-01-16"));

        let current = report.current_weather.as_ref().unwrap();
        assert_eq!(current.temperature.celsius, Some(30.0));
        assert_eq!(current.temperature.fahrenheit, Some(86));
        assert_eq!(current.weather.code, Some(61));
        assert_eq!(current.wind.direction_to, "E");

        assert_eq!(report.summary.current_temp, "30°C");
        assert_eq!(report.summary.current_wind.as_deref(), Some("12.4 km/h W"));
        assert_eq!(report.summary.today_forecast_count, 2);
        assert_eq!(
            report.summary.location.as_deref(),
            Some("Gambir, Gambir, Kota Adm. Jakarta Pusat")
        );
    }

    #[test]
    fn test_report_without_forecast() {
        let empty = parse_payload(r#"{"data": []}"#).unwrap();
        let report = build_report(&empty, "31.71.01.1001", generated_at());

        assert!(report.lokasi.is_none());
        assert!(report.current_weather.is_none());
        assert_eq!(report.summary.current_temp, "N/A");
        assert_eq!(report.summary.total_days, 0);
    }

    #[test]
    fn test_build_hourly() {
        let report = build_report(&payload(), "31.71.01.1001", generated_at());
        let target = WeatherTarget {
            adm4: "31.71.01.1001".to_string(),
            village: None,
        };
        let hourly = build_hourly(&report, &target);

        assert_eq!(hourly.hourly_forecast.len(), 3);
        let last = &hourly.hourly_forecast[2];
        assert_eq!(last.day, 2);
        assert_eq!(last.slot, 1);
        assert_eq!(last.date.as_deref(), Some("2024-01-16"));
        assert_eq!(last.time.as_deref(), Some("02:00:00"));
        assert_eq!(last.hour, Some(2));

        assert_eq!(hourly.data_summary.interval, "3 hours");
        assert_eq!(hourly.data_summary.coverage, "9 hours total");
        assert_eq!(hourly.location.kabupaten, "Kota Adm. Jakarta Pusat");
    }

    #[test]
    fn test_resolve_target_prefers_adm4() {
        let svc = service();

        let target = svc
            .resolve_target(Some("33.13.11.2005"), Some("gambir"))
            .unwrap();
        assert_eq!(target.adm4, "33.13.11.2005");
        assert!(target.village.is_none());

        let target = svc.resolve_target(None, Some("Ngringin")).unwrap();
        assert_eq!(target.adm4, "33.13.11.2005");
        assert_eq!(target.village.unwrap().village.nama_desa, "Ngringin");
    }

    #[test]
    fn test_resolve_target_rejects_bad_input() {
        let svc = service();

        assert!(matches!(
            svc.resolve_target(Some("31.71.1001"), None),
            Err(AppError::InvalidInput { .. })
        ));
        assert!(matches!(
            svc.resolve_target(None, None),
            Err(AppError::InvalidInput { .. })
        ));
        assert!(matches!(
            svc.resolve_target(Some(""), Some("   ")),
            Err(AppError::InvalidInput { .. })
        ));
        assert!(matches!(
            svc.resolve_target(None, Some("atlantis")),
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_adm4_rejected_before_fetch() {
        let svc = service();
        let err = svc.weather_report("not-a-code").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { .. }));
    }
}
