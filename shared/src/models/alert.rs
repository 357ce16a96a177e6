//! Hazard alert models and their presentation lookup tables

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Indonesian disaster-management alert levels, ordered by severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertLevel {
    Normal,
    Waspada,
    Siaga,
    Awas,
}

/// Presentation metadata for an alert level
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct AlertLevelConfig {
    pub priority: u8,
    pub color: &'static str,
    pub icon: &'static str,
    pub label: &'static str,
}

const NORMAL_CONFIG: AlertLevelConfig = AlertLevelConfig {
    priority: 0,
    color: "green",
    icon: "✅",
    label: "NORMAL",
};

const WASPADA_CONFIG: AlertLevelConfig = AlertLevelConfig {
    priority: 1,
    color: "yellow",
    icon: "⚠️",
    label: "WASPADA",
};

const SIAGA_CONFIG: AlertLevelConfig = AlertLevelConfig {
    priority: 2,
    color: "orange",
    icon: "🟠",
    label: "SIAGA",
};

const AWAS_CONFIG: AlertLevelConfig = AlertLevelConfig {
    priority: 3,
    color: "red",
    icon: "🔴",
    label: "AWAS",
};

impl AlertLevel {
    pub const ALL: [AlertLevel; 4] = [
        AlertLevel::Normal,
        AlertLevel::Waspada,
        AlertLevel::Siaga,
        AlertLevel::Awas,
    ];

    pub fn config(self) -> &'static AlertLevelConfig {
        match self {
            AlertLevel::Normal => &NORMAL_CONFIG,
            AlertLevel::Waspada => &WASPADA_CONFIG,
            AlertLevel::Siaga => &SIAGA_CONFIG,
            AlertLevel::Awas => &AWAS_CONFIG,
        }
    }

    /// Severity ordinal, NORMAL = 0 through AWAS = 3
    pub fn priority(self) -> u8 {
        self.config().priority
    }

    /// Look up a level by label; unknown labels fall back to NORMAL
    pub fn from_label(label: &str) -> AlertLevel {
        match label.trim().to_uppercase().as_str() {
            "WASPADA" => AlertLevel::Waspada,
            "SIAGA" => AlertLevel::Siaga,
            "AWAS" => AlertLevel::Awas,
            _ => AlertLevel::Normal,
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.config().label)
    }
}

/// Hazard categories an alert can describe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisasterType {
    HujanLebat,
    AnginKencang,
    CuacaEkstrem,
    VisibilityRendah,
    PotensiBanjir,
    BanjirBesar,
}

/// Presentation metadata for a disaster type
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DisasterTypeConfig {
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

/// Returned for disaster-type tags this build does not know
pub const UNKNOWN_DISASTER_CONFIG: DisasterTypeConfig = DisasterTypeConfig {
    name: "Unknown",
    icon: "⚠️",
    description: "Kondisi cuaca memerlukan perhatian",
};

impl DisasterType {
    pub fn config(self) -> &'static DisasterTypeConfig {
        match self {
            DisasterType::HujanLebat => &DisasterTypeConfig {
                name: "Hujan Lebat",
                icon: "🌧️",
                description: "Potensi genangan dan banjir",
            },
            DisasterType::AnginKencang => &DisasterTypeConfig {
                name: "Angin Kencang",
                icon: "💨",
                description: "Bahaya pohon tumbang dan benda terbang",
            },
            DisasterType::CuacaEkstrem => &DisasterTypeConfig {
                name: "Cuaca Ekstrem",
                icon: "⛈️",
                description: "Kondisi cuaca sangat berbahaya",
            },
            DisasterType::VisibilityRendah => &DisasterTypeConfig {
                name: "Jarak Pandang Rendah",
                icon: "🌫️",
                description: "Kabut tebal, hati-hati berkendara",
            },
            DisasterType::PotensiBanjir => &DisasterTypeConfig {
                name: "Potensi Banjir",
                icon: "🌊",
                description: "Prediksi banjir berdasarkan pola hujan",
            },
            DisasterType::BanjirBesar => &DisasterTypeConfig {
                name: "Banjir Besar",
                icon: "🌊",
                description: "Potensi banjir besar dalam beberapa jam",
            },
        }
    }

    /// Parse a `SCREAMING_SNAKE_CASE` tag
    pub fn from_tag(tag: &str) -> Option<DisasterType> {
        match tag.trim() {
            "HUJAN_LEBAT" => Some(DisasterType::HujanLebat),
            "ANGIN_KENCANG" => Some(DisasterType::AnginKencang),
            "CUACA_EKSTREM" => Some(DisasterType::CuacaEkstrem),
            "VISIBILITY_RENDAH" => Some(DisasterType::VisibilityRendah),
            "POTENSI_BANJIR" => Some(DisasterType::PotensiBanjir),
            "BANJIR_BESAR" => Some(DisasterType::BanjirBesar),
            _ => None,
        }
    }

    /// Config for a raw tag, falling back to [`UNKNOWN_DISASTER_CONFIG`]
    pub fn config_for_tag(tag: &str) -> &'static DisasterTypeConfig {
        DisasterType::from_tag(tag)
            .map(DisasterType::config)
            .unwrap_or(&UNKNOWN_DISASTER_CONFIG)
    }
}

/// Qualitative flood risk derived from the rainfall pattern
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum FloodRiskCategory {
    #[serde(rename = "MINIMAL")]
    Minimal,
    #[serde(rename = "RENDAH")]
    Rendah,
    #[serde(rename = "SEDANG")]
    Sedang,
    #[serde(rename = "TINGGI")]
    Tinggi,
    #[serde(rename = "SANGAT TINGGI")]
    SangatTinggi,
}

impl std::fmt::Display for FloodRiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FloodRiskCategory::Minimal => write!(f, "MINIMAL"),
            FloodRiskCategory::Rendah => write!(f, "RENDAH"),
            FloodRiskCategory::Sedang => write!(f, "SEDANG"),
            FloodRiskCategory::Tinggi => write!(f, "TINGGI"),
            FloodRiskCategory::SangatTinggi => write!(f, "SANGAT TINGGI"),
        }
    }
}

/// Forecast details attached to flood-class alerts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FloodPrediction {
    pub duration: String,
    pub total_rainfall: String,
    pub flood_risk: FloodRiskCategory,
    pub estimated_time: String,
}

/// A hazard alert produced by one rule evaluation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub level: AlertLevel,
    #[serde(rename = "type")]
    pub disaster_type: DisasterType,
    pub title: String,
    pub message: String,
    pub actions: Vec<String>,
    pub areas: Vec<String>,
    pub valid_until: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub prediction: Option<FloodPrediction>,
}

impl Alert {
    pub fn priority(&self) -> u8 {
        self.level.priority()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_level_priorities_are_ordinal() {
        for (expected, level) in AlertLevel::ALL.iter().enumerate() {
            assert_eq!(level.priority() as usize, expected);
        }
        assert!(AlertLevel::Awas > AlertLevel::Siaga);
        assert!(AlertLevel::Waspada > AlertLevel::Normal);
    }

    #[test]
    fn test_unknown_label_falls_back_to_normal() {
        assert_eq!(AlertLevel::from_label("siaga"), AlertLevel::Siaga);
        assert_eq!(AlertLevel::from_label("BAHAYA"), AlertLevel::Normal);
    }

    #[test]
    fn test_unknown_disaster_tag() {
        assert_eq!(DisasterType::config_for_tag("BANJIR_BESAR").name, "Banjir Besar");
        assert_eq!(DisasterType::config_for_tag("GEMPA").name, "Unknown");
    }

    #[test]
    fn test_alert_serializes_with_wire_names() {
        let alert = Alert {
            id: "flood_risk_1".to_string(),
            level: AlertLevel::Siaga,
            disaster_type: DisasterType::PotensiBanjir,
            title: "t".to_string(),
            message: "m".to_string(),
            actions: vec![],
            areas: vec![],
            valid_until: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            prediction: Some(FloodPrediction {
                duration: "6 jam".to_string(),
                total_rainfall: "90mm".to_string(),
                flood_risk: FloodRiskCategory::SangatTinggi,
                estimated_time: "6-12 jam dari sekarang".to_string(),
            }),
        };

        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["level"], "SIAGA");
        assert_eq!(json["type"], "POTENSI_BANJIR");
        assert!(json.get("validUntil").is_some());
        assert_eq!(json["prediction"]["floodRisk"], "SANGAT TINGGI");
        assert_eq!(json["prediction"]["totalRainfall"], "90mm");
    }
}
