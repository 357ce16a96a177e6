//! Hazard alert engine
//!
//! Turns a BMKG forecast into prioritized disaster alerts. The engine is pure
//! and total: missing or malformed forecast data yields no alerts, never an
//! error.

mod clock;
mod priority;
mod rainfall;
mod risk;
mod rules;
mod window;

pub use clock::{Clock, FixedClock, SystemClock};
pub use priority::{banner_alert, format_time_remaining, pick_highest, BANNER_MIN_LEVEL};
pub use rainfall::{analyze, is_significant_rain, RainfallAnalysis, SIGNIFICANT_RAIN_MM};
pub use risk::{flood_risk_points, score};
pub use rules::{evaluate, wind_level, Rule, RuleContext, RULES};
pub use window::{select_window, FORECAST_HORIZON_HOURS};

use chrono::{DateTime, Utc};

use crate::models::{normalize, Alert, BmkgPayload, ForecastSlot};

/// Generate alerts for a raw BMKG payload at the clock's current time
pub fn generate_alerts(payload: &BmkgPayload, clock: &dyn Clock) -> Vec<Alert> {
    generate_alerts_for_slots(&normalize(payload), clock.now())
}

/// Rainfall analysis of the forecast window together with the alerts it raised
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assessment {
    pub analysis: RainfallAnalysis,
    pub alerts: Vec<Alert>,
}

/// Select the window once, analyze it and run every rule over it
pub fn assess(slots: &[ForecastSlot], now: DateTime<Utc>) -> Assessment {
    let window = select_window(slots, now, FORECAST_HORIZON_HOURS);
    if window.is_empty() {
        return Assessment::default();
    }

    let analysis = analyze(&window);
    let alerts = evaluate(&RuleContext {
        window: &window,
        analysis: &analysis,
        now,
    });
    Assessment { analysis, alerts }
}

/// Generate alerts for already-normalized slots.
///
/// Slots outside the next 24 hours are ignored.
pub fn generate_alerts_for_slots(slots: &[ForecastSlot], now: DateTime<Utc>) -> Vec<Alert> {
    assess(slots, now).alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_payload;
    use chrono::TimeZone;

    #[test]
    fn test_generate_from_payload() {
        let body = r#"{"data": [{"cuaca": [[
            {"utc_datetime": "2024-01-15 03:00:00", "tp": 0, "ws": 48, "vs": 10000, "weather_desc": "Cerah"},
            {"utc_datetime": "2024-01-15 06:00:00", "tp": 1, "ws": 10, "vs": 10000, "weather_desc": "Berawan"}
        ]]}]}"#;
        let payload = parse_payload(body).unwrap();
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());

        let alerts = generate_alerts(&payload, &clock);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, "strong_wind");
        assert_eq!(alerts[0].level, crate::models::AlertLevel::Awas);
    }

    #[test]
    fn test_past_forecast_yields_nothing() {
        let body = r#"{"data": [{"cuaca": [[{"utc_datetime": "2024-01-14 03:00:00", "tp": 80, "ws": 80}]]}]}"#;
        let payload = parse_payload(body).unwrap();
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());

        assert!(generate_alerts(&payload, &clock).is_empty());
    }

    #[test]
    fn test_assess_matches_window_analysis() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let slots: Vec<ForecastSlot> = (0..10)
            .map(|i| ForecastSlot::new(now + chrono::Duration::hours(3 * i)).with_rainfall(12.0))
            .collect();

        let assessment = assess(&slots, now);
        let window = select_window(&slots, now, FORECAST_HORIZON_HOURS);

        // 9 slots fall inside [now, now + 24h]
        assert_eq!(window.len(), 9);
        assert_eq!(assessment.analysis, analyze(&window));
        assert_eq!(assessment.analysis.total_rainfall, 108.0);
        assert_eq!(assessment.alerts, generate_alerts_for_slots(&slots, now));
        assert!(!assessment.alerts.is_empty());
    }

    #[test]
    fn test_assess_empty_window() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(assess(&[], now), Assessment::default());
    }
}
