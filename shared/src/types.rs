//! Common types used across the platform

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GpsCoordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl GpsCoordinates {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build coordinates from the floating point values providers send.
    ///
    /// Returns `None` unless both components are present and finite.
    pub fn from_f64_pair(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        let latitude = Decimal::from_f64_retain(latitude?)?;
        let longitude = Decimal::from_f64_retain(longitude?)?;
        Some(Self::new(latitude, longitude))
    }
}

/// Offset/limit pagination parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
}

impl Pagination {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 100,
        }
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(total: usize, pagination: Pagination) -> Self {
        Self {
            total,
            limit: pagination.limit,
            offset: pagination.offset,
            has_more: pagination.offset.saturating_add(pagination.limit) < total,
        }
    }
}

/// Slice a collection according to offset/limit pagination
pub fn paginate<T: Clone>(items: &[T], pagination: Pagination) -> PaginatedResponse<T> {
    let start = pagination.offset.min(items.len());
    let end = start.saturating_add(pagination.limit).min(items.len());

    PaginatedResponse {
        data: items[start..end].to_vec(),
        pagination: PaginationMeta::new(items.len(), pagination),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_middle_page() {
        let items: Vec<u32> = (0..10).collect();
        let page = paginate(&items, Pagination::new(4, 3));
        assert_eq!(page.data, vec![4, 5, 6]);
        assert_eq!(page.pagination.total, 10);
        assert!(page.pagination.has_more);
    }

    #[test]
    fn test_paginate_past_end() {
        let items: Vec<u32> = (0..3).collect();
        let page = paginate(&items, Pagination::new(10, 5));
        assert!(page.data.is_empty());
        assert!(!page.pagination.has_more);
    }

    #[test]
    fn test_coordinates_require_both_components() {
        assert!(GpsCoordinates::from_f64_pair(Some(-6.17), Some(106.82)).is_some());
        assert!(GpsCoordinates::from_f64_pair(Some(-6.17), None).is_none());
        assert!(GpsCoordinates::from_f64_pair(Some(f64::NAN), Some(106.82)).is_none());
    }
}
