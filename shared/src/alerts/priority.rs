//! Alert prioritization and banner policy

use chrono::{DateTime, Utc};

use crate::models::{Alert, AlertLevel};

/// Lowest level shown in the banner
pub const BANNER_MIN_LEVEL: AlertLevel = AlertLevel::Siaga;

/// The alert with the highest level.
///
/// On ties the first one encountered wins.
pub fn pick_highest(alerts: &[Alert]) -> Option<&Alert> {
    alerts.iter().fold(None, |best: Option<&Alert>, alert| match best {
        Some(current) if current.priority() >= alert.priority() => Some(current),
        _ => Some(alert),
    })
}

/// The alert to show in the banner, if any is severe enough
pub fn banner_alert(alerts: &[Alert]) -> Option<&Alert> {
    pick_highest(alerts).filter(|alert| alert.level >= BANNER_MIN_LEVEL)
}

/// Human-readable time left until `valid_until`, in Indonesian
pub fn format_time_remaining(valid_until: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let remaining = valid_until - now;
    if remaining.num_milliseconds() <= 0 {
        return "Berakhir".to_string();
    }

    let hours = remaining.num_hours();
    let minutes = remaining.num_minutes() % 60;

    if hours > 0 {
        format!("{} jam {} menit lagi", hours, minutes)
    } else {
        format!("{} menit lagi", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DisasterType;
    use chrono::{Duration, TimeZone};

    fn alert(id: &str, level: AlertLevel) -> Alert {
        Alert {
            id: id.to_string(),
            level,
            disaster_type: DisasterType::HujanLebat,
            title: String::new(),
            message: String::new(),
            actions: vec![],
            areas: vec![],
            valid_until: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            prediction: None,
        }
    }

    #[test]
    fn test_pick_highest() {
        let alerts = vec![
            alert("a", AlertLevel::Waspada),
            alert("b", AlertLevel::Awas),
            alert("c", AlertLevel::Siaga),
        ];
        assert_eq!(pick_highest(&alerts).unwrap().id, "b");
        assert!(pick_highest(&[]).is_none());
    }

    #[test]
    fn test_ties_keep_first() {
        let alerts = vec![alert("first", AlertLevel::Siaga), alert("second", AlertLevel::Siaga)];
        assert_eq!(pick_highest(&alerts).unwrap().id, "first");
    }

    #[test]
    fn test_banner_needs_siaga() {
        let mild = vec![alert("a", AlertLevel::Waspada)];
        assert!(banner_alert(&mild).is_none());

        let serious = vec![alert("a", AlertLevel::Waspada), alert("b", AlertLevel::Siaga)];
        assert_eq!(banner_alert(&serious).unwrap().id, "b");
    }

    #[test]
    fn test_format_time_remaining() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();

        assert_eq!(format_time_remaining(now, now), "Berakhir");
        assert_eq!(format_time_remaining(now - Duration::minutes(5), now), "Berakhir");
        assert_eq!(
            format_time_remaining(now + Duration::minutes(125), now),
            "2 jam 5 menit lagi"
        );
        assert_eq!(format_time_remaining(now + Duration::seconds(59 * 60 + 30), now), "59 menit lagi");
        assert_eq!(format_time_remaining(now + Duration::seconds(30), now), "0 menit lagi");
    }
}
