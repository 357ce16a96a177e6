//! Flood risk scoring

use crate::models::FloodRiskCategory;

use super::rainfall::RainfallAnalysis;

/// Additive flood risk points for a rainfall analysis (0..=100)
pub fn flood_risk_points(analysis: &RainfallAnalysis) -> u32 {
    let duration = match analysis.consecutive_hours {
        n if n >= 6 => 40,
        n if n >= 4 => 25,
        n if n >= 2 => 15,
        _ => 0,
    };

    let total = match analysis.total_rainfall {
        t if t >= 80.0 => 40,
        t if t >= 50.0 => 30,
        t if t >= 30.0 => 20,
        _ => 0,
    };

    let intensity = match analysis.average_intensity {
        a if a >= 15.0 => 20,
        a if a >= 10.0 => 15,
        a if a >= 5.0 => 10,
        _ => 0,
    };

    duration + total + intensity
}

/// Map a rainfall analysis to a qualitative flood risk category
pub fn score(analysis: &RainfallAnalysis) -> FloodRiskCategory {
    match flood_risk_points(analysis) {
        p if p >= 80 => FloodRiskCategory::SangatTinggi,
        p if p >= 60 => FloodRiskCategory::Tinggi,
        p if p >= 40 => FloodRiskCategory::Sedang,
        p if p >= 20 => FloodRiskCategory::Rendah,
        _ => FloodRiskCategory::Minimal,
    }
}
