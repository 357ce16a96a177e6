//! Village directory backed by the `desa.json` administrative dataset

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use shared::models::{VillageRecord, VillageStatistics, VillageSummary};
use shared::types::{paginate, PaginatedResponse, Pagination};
use shared::validation::validate_search_query;

use crate::error::{AppError, AppResult};

/// Default page size for `/api/desa`
pub const DEFAULT_LIST_LIMIT: usize = 100;
/// Default page size for `/api/desa/provinsi/:provinsi`
pub const DEFAULT_PROVINSI_LIMIT: usize = 50;

/// Optional substring filters for listing villages
#[derive(Debug, Clone, Default)]
pub struct VillageFilter {
    pub provinsi: Option<String>,
    pub kabupaten: Option<String>,
}

impl VillageFilter {
    fn matches(&self, village: &VillageRecord) -> bool {
        contains_ci(&village.provinsi, self.provinsi.as_deref())
            && contains_ci(&village.kabupaten, self.kabupaten.as_deref())
    }
}

fn contains_ci(haystack: &str, needle: Option<&str>) -> bool {
    match needle.map(str::trim).filter(|n| !n.is_empty()) {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

/// The village chosen for a free-text query
#[derive(Debug, Clone, Serialize)]
pub struct VillageMatch {
    #[serde(flatten)]
    pub village: VillageSummary,
    #[serde(rename = "totalFound")]
    pub total_found: usize,
}

/// In-memory, read-only village directory
#[derive(Debug, Default)]
pub struct VillageDirectory {
    villages: Vec<VillageRecord>,
}

impl VillageDirectory {
    /// Load the dataset from a JSON file.
    ///
    /// A missing or malformed file yields an unavailable directory rather than
    /// an error so the server can still start.
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        tracing::info!("Loading village data from {}", path.display());

        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("Failed to read village data {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str::<Vec<VillageRecord>>(&raw) {
            Ok(villages) => {
                tracing::info!("Loaded {} villages", villages.len());
                Self::from_records(villages)
            }
            Err(e) => {
                tracing::error!("Failed to parse village data {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_records(villages: Vec<VillageRecord>) -> Self {
        Self { villages }
    }

    /// Whether any village data is loaded
    pub fn is_available(&self) -> bool {
        !self.villages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.villages.len()
    }

    fn records(&self) -> AppResult<&[VillageRecord]> {
        if self.villages.is_empty() {
            return Err(AppError::DataUnavailable);
        }
        Ok(&self.villages)
    }

    /// Case-insensitive search over the administrative hierarchy and ADM4 code.
    ///
    /// Exact village-name matches come first, the rest by village name.
    pub fn search(&self, text: &str) -> AppResult<Vec<&VillageRecord>> {
        validate_search_query(text).map_err(|msg| {
            AppError::invalid_input("q", msg, "Kata kunci pencarian minimal 2 karakter")
        })?;
        let records = self.records()?;

        let needle = text.trim().to_lowercase();
        let mut results: Vec<&VillageRecord> =
            records.iter().filter(|v| v.matches(&needle)).collect();

        results.sort_by_cached_key(|v| {
            let name = v.nama_desa.to_lowercase();
            (name != needle, name)
        });

        Ok(results)
    }

    /// The best-ranked village for a query
    pub fn resolve(&self, text: &str) -> AppResult<VillageMatch> {
        let results = self.search(text)?;
        let first = results
            .first()
            .ok_or_else(|| AppError::NotFound(format!("Desa \"{}\"", text.trim())))?;

        Ok(VillageMatch {
            village: first.summary(),
            total_found: results.len(),
        })
    }

    /// Page through the dataset, optionally filtered
    pub fn list(
        &self,
        filter: &VillageFilter,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<VillageRecord>> {
        let filtered: Vec<VillageRecord> = self
            .records()?
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();

        Ok(paginate(&filtered, pagination))
    }

    /// Villages whose province contains `provinsi`
    pub fn by_provinsi(
        &self,
        provinsi: &str,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<VillageRecord>> {
        if provinsi.trim().is_empty() {
            return Err(AppError::invalid_input(
                "provinsi",
                "Province name is required",
                "Parameter provinsi diperlukan",
            ));
        }

        let filter = VillageFilter {
            provinsi: Some(provinsi.to_string()),
            kabupaten: None,
        };
        let page = self.list(&filter, pagination)?;

        if page.pagination.total == 0 {
            return Err(AppError::NotFound(format!("Desa di provinsi \"{}\"", provinsi)));
        }
        Ok(page)
    }

    /// Distinct counts over the dataset; all zero when unavailable
    pub fn statistics(&self) -> VillageStatistics {
        let provinsi: HashSet<&str> = self.villages.iter().map(|v| v.provinsi.as_str()).collect();
        let kotkab: HashSet<&str> = self.villages.iter().map(|v| v.kabupaten.as_str()).collect();
        let kecamatan: HashSet<&str> = self.villages.iter().map(|v| v.kecamatan.as_str()).collect();

        VillageStatistics {
            total_desa: self.villages.len(),
            total_provinsi: provinsi.len(),
            total_kotkab: kotkab.len(),
            total_kecamatan: kecamatan.len(),
        }
    }
}
