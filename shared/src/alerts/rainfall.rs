//! Rainfall pattern analysis over a forecast window

use serde::{Deserialize, Serialize};

use crate::models::ForecastSlot;

/// A slot with more than this much rain (mm per slot) counts toward a streak
pub const SIGNIFICANT_RAIN_MM: f64 = 5.0;

/// Summary of rainfall across a forecast window
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RainfallAnalysis {
    /// Sum of rainfall, rounded to one decimal (mm)
    pub total_rainfall: f64,
    /// Longest run of contiguous significant-rain slots.
    ///
    /// Counts forecast slots, not wall-clock hours; the flood thresholds are
    /// tuned against slot counts of BMKG's 3-hourly cadence.
    pub consecutive_hours: usize,
    /// Mean rainfall per slot (mm), 0 for an empty window
    pub average_intensity: f64,
    /// Largest single-slot rainfall, rounded like the total (mm)
    pub peak_intensity: f64,
}

/// Whether a slot's rainfall is significant for streak detection
pub fn is_significant_rain(slot: &ForecastSlot) -> bool {
    slot.rainfall_mm > SIGNIFICANT_RAIN_MM
}

/// Analyze a chronologically ordered window
pub fn analyze(window: &[ForecastSlot]) -> RainfallAnalysis {
    if window.is_empty() {
        return RainfallAnalysis::default();
    }

    let mut total = 0.0;
    let mut peak: f64 = 0.0;
    let mut longest = 0;
    let mut streak = 0;

    for slot in window {
        total += slot.rainfall_mm;
        peak = peak.max(slot.rainfall_mm);

        if is_significant_rain(slot) {
            streak += 1;
            longest = longest.max(streak);
        } else {
            streak = 0;
        }
    }

    RainfallAnalysis {
        total_rainfall: round_one_decimal(total),
        consecutive_hours: longest,
        average_intensity: total / window.len() as f64,
        peak_intensity: round_one_decimal(peak),
    }
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
