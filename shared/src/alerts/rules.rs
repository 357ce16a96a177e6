//! Hazard rules
//!
//! Each rule looks at the same forecast window and rainfall analysis and
//! yields at most one alert. [`RULES`] fixes the evaluation order, which is
//! also the order alerts are emitted in.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Alert, AlertLevel, DisasterType, FloodPrediction, ForecastSlot};

use super::rainfall::RainfallAnalysis;
use super::risk;

pub const HEAVY_RAIN_MM: f64 = 20.0;
pub const STRONG_WIND_KMH: f64 = 25.0;
pub const WIND_SIAGA_KMH: f64 = 35.0;
pub const WIND_AWAS_KMH: f64 = 40.0;
pub const LOW_VISIBILITY_M: f64 = 3000.0;
pub const EXTREME_RAIN_MM: f64 = 50.0;
pub const EXTREME_WIND_KMH: f64 = 50.0;

pub const FLOOD_MIN_SLOTS: usize = 3;
pub const FLOOD_MIN_TOTAL_MM: f64 = 30.0;
pub const SEVERE_FLOOD_MIN_SLOTS: usize = 6;
pub const SEVERE_FLOOD_MIN_TOTAL_MM: f64 = 60.0;

/// Inputs shared by every rule in one evaluation
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub window: &'a [ForecastSlot],
    pub analysis: &'a RainfallAnalysis,
    pub now: DateTime<Utc>,
}

pub type Rule = fn(&RuleContext<'_>) -> Option<Alert>;

/// Rules in evaluation order
pub static RULES: [(&str, Rule); 6] = [
    ("flood_risk", flood_risk as Rule),
    ("severe_flood", severe_flood as Rule),
    ("heavy_rain", heavy_rain as Rule),
    ("strong_wind", strong_wind as Rule),
    ("low_visibility", low_visibility as Rule),
    ("extreme_weather", extreme_weather as Rule),
];

/// Run every rule against the context
pub fn evaluate(ctx: &RuleContext<'_>) -> Vec<Alert> {
    RULES.iter().filter_map(|(_, rule)| rule(ctx)).collect()
}

struct AlertTemplate {
    level: AlertLevel,
    disaster_type: DisasterType,
    title: String,
    message: String,
    actions: &'static [&'static str],
    areas: &'static [&'static str],
    valid_for_hours: i64,
}

impl AlertTemplate {
    fn build(self, id: String, now: DateTime<Utc>) -> Alert {
        Alert {
            id,
            level: self.level,
            disaster_type: self.disaster_type,
            title: self.title,
            message: self.message,
            actions: to_strings(self.actions),
            areas: to_strings(self.areas),
            valid_until: now + Duration::hours(self.valid_for_hours),
            prediction: None,
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn flood_prediction(analysis: &RainfallAnalysis, estimated_time: &str) -> FloodPrediction {
    FloodPrediction {
        duration: format!("{} jam", analysis.consecutive_hours),
        total_rainfall: format!("{}mm", analysis.total_rainfall),
        flood_risk: risk::score(analysis),
        estimated_time: estimated_time.to_string(),
    }
}

// ============================================================================
// Flood class
// ============================================================================

pub fn flood_risk(ctx: &RuleContext<'_>) -> Option<Alert> {
    let a = ctx.analysis;
    if a.consecutive_hours < FLOOD_MIN_SLOTS || a.total_rainfall <= FLOOD_MIN_TOTAL_MM {
        return None;
    }

    let mut alert = AlertTemplate {
        level: AlertLevel::Siaga,
        disaster_type: DisasterType::PotensiBanjir,
        title: "Potensi Banjir dalam 6-12 Jam".to_string(),
        message: format!(
            "Prediksi hujan selama {} jam dengan total {}mm. Potensi banjir tinggi.",
            a.consecutive_hours, a.total_rainfall
        ),
        actions: &[
            "Siapkan tas darurat dan dokumen penting",
            "Pindahkan barang berharga ke tempat tinggi",
            "Pantau kondisi sungai/saluran air terdekat",
            "Siapkan jalur evakuasi alternatif",
            "Koordinasi dengan RT/RW setempat",
            "Siapkan makanan dan air untuk 72 jam",
        ],
        areas: &["Area rendah", "Dekat sungai", "Saluran air tersumbat"],
        valid_for_hours: 24,
    }
    .build(format!("flood_risk_{}", ctx.now.timestamp_millis()), ctx.now);

    alert.prediction = Some(flood_prediction(a, "6-12 jam dari sekarang"));
    Some(alert)
}

pub fn severe_flood(ctx: &RuleContext<'_>) -> Option<Alert> {
    let a = ctx.analysis;
    if a.consecutive_hours < SEVERE_FLOOD_MIN_SLOTS || a.total_rainfall <= SEVERE_FLOOD_MIN_TOTAL_MM
    {
        return None;
    }

    let mut alert = AlertTemplate {
        level: AlertLevel::Awas,
        disaster_type: DisasterType::BanjirBesar,
        title: "AWAS! Potensi Banjir Besar".to_string(),
        message: format!(
            "Hujan ekstrem {} jam dengan total {}mm. Banjir besar sangat mungkin terjadi!",
            a.consecutive_hours, a.total_rainfall
        ),
        actions: &[
            "SEGERA EVAKUASI ke tempat tinggi",
            "Hubungi RT/RW dan BPBD",
            "Matikan listrik dan gas",
            "Jangan berkendara di area berpotensi banjir",
            "Pantau info resmi dari BPBD",
            "Siaga di shelter/posko terdekat",
        ],
        areas: &["Seluruh area rendah", "Bantaran sungai", "Area langganan banjir"],
        valid_for_hours: 48,
    }
    .build(format!("severe_flood_{}", ctx.now.timestamp_millis()), ctx.now);

    alert.prediction = Some(flood_prediction(a, "3-6 jam dari sekarang"));
    Some(alert)
}

// ============================================================================
// Slot-level hazards
// ============================================================================

pub fn heavy_rain(ctx: &RuleContext<'_>) -> Option<Alert> {
    let triggered = ctx.window.iter().any(|slot| {
        slot.rainfall_mm > HEAVY_RAIN_MM
            || slot.description_contains("hujan lebat")
            || slot.description_contains("heavy rain")
    });
    if !triggered {
        return None;
    }

    Some(
        AlertTemplate {
            level: AlertLevel::Siaga,
            disaster_type: DisasterType::HujanLebat,
            title: "Potensi Hujan Lebat".to_string(),
            message: "Hujan lebat diprediksi dalam 24 jam ke depan. Waspada genangan dan banjir lokal."
                .to_string(),
            actions: &[
                "Siapkan tas darurat dan senter",
                "Cek dan bersihkan saluran air",
                "Hindari area rendah saat hujan",
                "Pantau informasi cuaca terkini",
            ],
            areas: &["Area rendah", "Dekat sungai", "Jalan utama"],
            valid_for_hours: 24,
        }
        .build("heavy_rain".to_string(), ctx.now),
    )
}

/// Level for the strongest wind in the window
pub fn wind_level(max_wind_kmh: f64) -> AlertLevel {
    if max_wind_kmh > WIND_AWAS_KMH {
        AlertLevel::Awas
    } else if max_wind_kmh > WIND_SIAGA_KMH {
        AlertLevel::Siaga
    } else {
        AlertLevel::Waspada
    }
}

pub fn strong_wind(ctx: &RuleContext<'_>) -> Option<Alert> {
    if !ctx.window.iter().any(|slot| slot.wind_kmh > STRONG_WIND_KMH) {
        return None;
    }
    let max_wind = ctx
        .window
        .iter()
        .map(|slot| slot.wind_kmh)
        .fold(0.0_f64, f64::max);

    Some(
        AlertTemplate {
            level: wind_level(max_wind),
            disaster_type: DisasterType::AnginKencang,
            title: format!("Angin Kencang {:.1} km/h", max_wind),
            message: format!(
                "Angin kencang hingga {:.1} km/h diprediksi. Waspada pohon tumbang dan benda terbang.",
                max_wind
            ),
            actions: &[
                "Hindari area pohon besar dan papan reklame",
                "Amankan barang yang mudah terbang",
                "Tutup rapat jendela dan pintu",
                "Hindari bangunan tinggi dan tidak stabil",
            ],
            areas: &["Area terbuka", "Dekat pohon besar", "Bangunan tinggi"],
            valid_for_hours: 12,
        }
        .build("strong_wind".to_string(), ctx.now),
    )
}

pub fn low_visibility(ctx: &RuleContext<'_>) -> Option<Alert> {
    // unknown visibility never triggers
    let triggered = ctx
        .window
        .iter()
        .filter_map(|slot| slot.visibility_m)
        .any(|vs| vs < LOW_VISIBILITY_M);
    if !triggered {
        return None;
    }

    Some(
        AlertTemplate {
            level: AlertLevel::Waspada,
            disaster_type: DisasterType::VisibilityRendah,
            title: "Jarak Pandang Rendah".to_string(),
            message: "Kabut tebal atau jarak pandang rendah. Hati-hati saat berkendara.".to_string(),
            actions: &[
                "Nyalakan lampu kendaraan",
                "Kurangi kecepatan berkendara",
                "Jaga jarak aman dengan kendaraan lain",
                "Gunakan klakson sebagai peringatan",
            ],
            areas: &["Jalan raya", "Area pegunungan", "Dekat sungai"],
            valid_for_hours: 6,
        }
        .build("low_visibility".to_string(), ctx.now),
    )
}

pub fn extreme_weather(ctx: &RuleContext<'_>) -> Option<Alert> {
    let triggered = ctx.window.iter().any(|slot| {
        slot.rainfall_mm > EXTREME_RAIN_MM
            || slot.wind_kmh > EXTREME_WIND_KMH
            || slot.description_contains("badai")
            || slot.description_contains("storm")
    });
    if !triggered {
        return None;
    }

    Some(
        AlertTemplate {
            level: AlertLevel::Awas,
            disaster_type: DisasterType::CuacaEkstrem,
            title: "Cuaca Ekstrem".to_string(),
            message: "Kondisi cuaca ekstrem terdeteksi! Tetap di dalam ruangan dan hindari aktivitas luar ruang."
                .to_string(),
            actions: &[
                "TETAP DI DALAM RUANGAN",
                "Siapkan makanan dan air untuk 24 jam",
                "Charge semua perangkat elektronik",
                "Hubungi keluarga untuk konfirmasi keselamatan",
                "Pantau informasi resmi dari BMKG/BPBD",
            ],
            areas: &["Seluruh wilayah"],
            valid_for_hours: 48,
        }
        .build("extreme_weather".to_string(), ctx.now),
    )
}
