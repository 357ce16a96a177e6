//! Village (desa/kelurahan) records from the administrative-area dataset

use serde::{Deserialize, Serialize};

use crate::types::GpsCoordinates;

/// One row of `desa.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VillageRecord {
    pub nama_desa: String,
    pub kecamatan: String,
    pub kabupaten: String,
    pub provinsi: String,
    pub adm4_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

impl VillageRecord {
    /// "Desa, Kecamatan, Kabupaten"
    pub fn display_name(&self) -> String {
        format!("{}, {}, {}", self.nama_desa, self.kecamatan, self.kabupaten)
    }

    pub fn coordinates(&self) -> Option<GpsCoordinates> {
        GpsCoordinates::from_f64_pair(self.lat, self.lon)
    }

    /// Case-insensitive substring match over the administrative hierarchy.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.nama_desa.to_lowercase().contains(needle)
            || self.kecamatan.to_lowercase().contains(needle)
            || self.kabupaten.to_lowercase().contains(needle)
            || self.provinsi.to_lowercase().contains(needle)
            || self.adm4_code.contains(needle)
    }

    pub fn summary(&self) -> VillageSummary {
        VillageSummary {
            adm4_code: self.adm4_code.clone(),
            nama_desa: self.nama_desa.clone(),
            kecamatan: self.kecamatan.clone(),
            kabupaten: self.kabupaten.clone(),
            provinsi: self.provinsi.clone(),
            display_name: self.display_name(),
            coordinates: self.coordinates(),
        }
    }
}

/// Compact village view used in listings and search results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VillageSummary {
    pub adm4_code: String,
    pub nama_desa: String,
    pub kecamatan: String,
    pub kabupaten: String,
    pub provinsi: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<GpsCoordinates>,
}

/// Dataset coverage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VillageStatistics {
    pub total_desa: usize,
    pub total_provinsi: usize,
    pub total_kotkab: usize,
    pub total_kecamatan: usize,
}
