//! WebAssembly module for CuacaMap
//!
//! Runs the hazard alert engine in the browser on a BMKG payload the page
//! has already fetched. All structured values cross the boundary as JSON.

use chrono::{DateTime, Utc};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use shared::alerts;
use shared::models::{parse_payload, Alert, AlertLevel, DisasterType};
use shared::validation;

#[cfg(target_arch = "wasm32")]
fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

// console is only reachable from inside a browser
#[cfg(not(target_arch = "wasm32"))]
fn warn(_message: &str) {}

fn to_json<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| fallback.to_string())
}

fn from_millis(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(ms as i64)
}

fn parse_alerts(alerts_json: &str) -> Vec<Alert> {
    serde_json::from_str(alerts_json).unwrap_or_else(|e| {
        warn(&format!("CuacaMap: invalid alerts JSON: {}", e));
        Vec::new()
    })
}

/// Generate alerts for a raw BMKG payload using the browser clock
#[wasm_bindgen]
pub fn generate_alerts(payload_json: &str) -> String {
    generate_alerts_at(payload_json, js_sys::Date::now())
}

/// Generate alerts as of `now_ms` (milliseconds since the Unix epoch)
#[wasm_bindgen]
pub fn generate_alerts_at(payload_json: &str, now_ms: f64) -> String {
    let Some(payload) = parse_payload(payload_json) else {
        warn("CuacaMap: forecast payload is not valid BMKG JSON");
        return "[]".to_string();
    };
    let Some(now) = from_millis(now_ms) else {
        warn("CuacaMap: invalid timestamp for alert generation");
        return "[]".to_string();
    };

    let clock = alerts::FixedClock(now);
    let generated = alerts::generate_alerts(&payload, &clock);
    to_json(&generated, "[]")
}

/// The most severe alert in a JSON array, or `null`
#[wasm_bindgen]
pub fn highest_priority_alert(alerts_json: &str) -> String {
    let parsed = parse_alerts(alerts_json);
    to_json(&alerts::pick_highest(&parsed), "null")
}

/// The alert to show as a banner (SIAGA or above), or `null`
#[wasm_bindgen]
pub fn banner_alert(alerts_json: &str) -> String {
    let parsed = parse_alerts(alerts_json);
    to_json(&alerts::banner_alert(&parsed), "null")
}

/// Presentation config for a level label; unknown labels give NORMAL
#[wasm_bindgen]
pub fn alert_level_config(level: &str) -> String {
    to_json(AlertLevel::from_label(level).config(), "null")
}

/// Presentation config for a disaster-type tag
#[wasm_bindgen]
pub fn disaster_type_config(disaster_type: &str) -> String {
    to_json(DisasterType::config_for_tag(disaster_type), "null")
}

/// Indonesian "time left" text for an alert
#[wasm_bindgen]
pub fn format_time_remaining(valid_until_ms: f64, now_ms: f64) -> String {
    match (from_millis(valid_until_ms), from_millis(now_ms)) {
        (Some(valid_until), Some(now)) => alerts::format_time_remaining(valid_until, now),
        _ => "Berakhir".to_string(),
    }
}

/// Whether `code` has the `XX.XX.XX.XXXX` ADM4 shape
#[wasm_bindgen]
pub fn is_valid_adm4_code(code: &str) -> bool {
    validation::is_valid_adm4_code(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::Value;

    fn now_ms() -> f64 {
        // 2024-01-15 07:00 WIB
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0)
            .unwrap()
            .timestamp_millis() as f64
    }

    fn stormy_payload() -> String {
        serde_json::json!({
            "lokasi": {"desa": "Ngringo", "timezone": "Asia/Jakarta"},
            "data": [{"cuaca": [[
                {"local_datetime": "2024-01-15 10:00:00", "tp": 15, "ws": 45, "vs": 2000},
                {"local_datetime": "2024-01-15 13:00:00", "tp": 15, "ws": 10},
                {"local_datetime": "2024-01-15 16:00:00", "tp": 15, "ws": 10}
            ]]}]
        })
        .to_string()
    }

    #[test]
    fn test_generate_alerts_at() {
        let json = generate_alerts_at(&stormy_payload(), now_ms());
        let alerts: Vec<Alert> = serde_json::from_str(&json).unwrap();

        let types: Vec<DisasterType> = alerts.iter().map(|a| a.disaster_type).collect();
        assert!(types.contains(&DisasterType::PotensiBanjir));
        assert!(types.contains(&DisasterType::AnginKencang));
        assert!(types.contains(&DisasterType::VisibilityRendah));
    }

    #[test]
    fn test_malformed_payload_yields_empty_list() {
        assert_eq!(generate_alerts_at("{not json", now_ms()), "[]");
        assert_eq!(generate_alerts_at(&stormy_payload(), f64::NAN), "[]");
    }

    #[test]
    fn test_highest_and_banner() {
        let json = generate_alerts_at(&stormy_payload(), now_ms());

        let highest: Value = serde_json::from_str(&highest_priority_alert(&json)).unwrap();
        assert_eq!(highest["level"], "AWAS");
        assert_eq!(highest["type"], "ANGIN_KENCANG");

        let banner: Value = serde_json::from_str(&banner_alert(&json)).unwrap();
        assert_eq!(banner["level"], "AWAS");

        assert_eq!(highest_priority_alert("[]"), "null");
        assert_eq!(banner_alert("garbage"), "null");
    }

    #[test]
    fn test_config_lookups() {
        let siaga: Value = serde_json::from_str(&alert_level_config("siaga")).unwrap();
        assert_eq!(siaga["color"], "orange");
        assert_eq!(siaga["priority"], 2);

        let unknown: Value = serde_json::from_str(&alert_level_config("BADAI")).unwrap();
        assert_eq!(unknown["label"], "NORMAL");

        let flood: Value = serde_json::from_str(&disaster_type_config("BANJIR_BESAR")).unwrap();
        assert_eq!(flood["name"], "Banjir Besar");

        let other: Value = serde_json::from_str(&disaster_type_config("GEMPA")).unwrap();
        assert_eq!(other["name"], "Unknown");
    }

    #[test]
    fn test_format_time_remaining() {
        let hour_ms = 3_600_000.0;
        assert_eq!(
            format_time_remaining(now_ms() + 2.0 * hour_ms + 60_000.0 * 15.0, now_ms()),
            "2 jam 15 menit lagi"
        );
        assert_eq!(format_time_remaining(now_ms() - 1.0, now_ms()), "Berakhir");
        assert_eq!(format_time_remaining(f64::INFINITY, now_ms()), "Berakhir");
    }

    #[test]
    fn test_is_valid_adm4_code() {
        assert!(is_valid_adm4_code("33.13.11.2006"));
        assert!(!is_valid_adm4_code("33.13.11.206"));
        assert!(!is_valid_adm4_code("33-13-11-2006"));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_generate_alerts_with_browser_clock() {
        assert_eq!(generate_alerts(r#"{"data": []}"#), "[]");
    }
}
