//! Forecast window selection

use chrono::{DateTime, Duration, Utc};

use crate::models::ForecastSlot;

/// Default look-ahead for alert generation
pub const FORECAST_HORIZON_HOURS: i64 = 24;

/// Slots whose timestamp lies in `[now, now + horizon_hours]`, oldest first.
///
/// Both bounds are inclusive. Input order is not trusted; the result is
/// sorted because streak detection relies on chronological order.
pub fn select_window(
    slots: &[ForecastSlot],
    now: DateTime<Utc>,
    horizon_hours: i64,
) -> Vec<ForecastSlot> {
    let end = now + Duration::hours(horizon_hours);

    let mut window: Vec<ForecastSlot> = slots
        .iter()
        .filter(|slot| slot.timestamp >= now && slot.timestamp <= end)
        .cloned()
        .collect();

    window.sort_by_key(|slot| slot.timestamp);
    window
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let slots = vec![
            ForecastSlot::new(now() - Duration::seconds(1)),
            ForecastSlot::new(now()),
            ForecastSlot::new(now() + Duration::hours(24)),
            ForecastSlot::new(now() + Duration::hours(24) + Duration::seconds(1)),
        ];

        let window = select_window(&slots, now(), FORECAST_HORIZON_HOURS);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].timestamp, now());
        assert_eq!(window[1].timestamp, now() + Duration::hours(24));
    }

    #[test]
    fn test_out_of_order_input_is_sorted() {
        let slots: Vec<ForecastSlot> = [9, 3, 6, 0]
            .iter()
            .map(|h| ForecastSlot::new(now() + Duration::hours(*h)))
            .collect();

        let window = select_window(&slots, now(), FORECAST_HORIZON_HOURS);
        let hours: Vec<i64> = window
            .iter()
            .map(|s| (s.timestamp - now()).num_hours())
            .collect();
        assert_eq!(hours, vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_empty_input() {
        assert!(select_window(&[], now(), FORECAST_HORIZON_HOURS).is_empty());
    }
}
