//! Validation utilities for CuacaMap
//!
//! Input checks performed before any I/O: ADM4 village codes and search text.

/// Minimum length of a village search query, after trimming
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

/// Group widths of an ADM4 code: province, regency, district, village
const ADM4_GROUP_WIDTHS: [usize; 4] = [2, 2, 2, 4];

// ============================================================================
// Indonesian administrative codes
// ============================================================================

/// Validate an ADM4 (kelurahan/desa) code
/// Format: XX.XX.XX.XXXX (e.g., 31.71.01.1001)
pub fn validate_adm4_code(code: &str) -> Result<(), &'static str> {
    let parts: Vec<&str> = code.split('.').collect();

    if parts.len() != ADM4_GROUP_WIDTHS.len() {
        return Err("ADM4 code must be in format XX.XX.XX.XXXX");
    }

    for (part, width) in parts.iter().zip(ADM4_GROUP_WIDTHS) {
        if part.len() != width || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err("ADM4 code must be in format XX.XX.XX.XXXX");
        }
    }

    Ok(())
}

pub fn is_valid_adm4_code(code: &str) -> bool {
    validate_adm4_code(code).is_ok()
}

// ============================================================================
// Search
// ============================================================================

/// Validate a free-text village query
pub fn validate_search_query(query: &str) -> Result<(), &'static str> {
    if query.trim().chars().count() < MIN_SEARCH_QUERY_LEN {
        return Err("Search query must be at least 2 characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_adm4_code_valid() {
        assert!(validate_adm4_code("31.71.01.1001").is_ok());
        assert!(validate_adm4_code("33.13.11.2005").is_ok());
        assert!(is_valid_adm4_code("35.18.01.2001"));
    }

    #[test]
    fn test_validate_adm4_code_wrong_shape() {
        assert!(validate_adm4_code("").is_err());
        assert!(validate_adm4_code("31.71.01").is_err());
        assert!(validate_adm4_code("31.71.01.1001.5").is_err());
        assert!(validate_adm4_code("3171011001").is_err());
        assert!(validate_adm4_code("31-71-01-1001").is_err());
    }

    #[test]
    fn test_validate_adm4_code_wrong_widths() {
        assert!(validate_adm4_code("3.71.01.1001").is_err());
        assert!(validate_adm4_code("31.71.01.101").is_err());
        assert!(validate_adm4_code("31.71.001.1001").is_err());
    }

    #[test]
    fn test_validate_adm4_code_non_digits() {
        assert!(validate_adm4_code("3a.71.01.1001").is_err());
        assert!(validate_adm4_code("31.71.01.10O1").is_err());
        assert!(validate_adm4_code(" 31.71.01.1001").is_err());
        // full-width digits are not ASCII
        assert!(validate_adm4_code("３1.71.01.1001").is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert!(validate_search_query("ng").is_ok());
        assert!(validate_search_query("Gambir").is_ok());
        assert!(validate_search_query("a").is_err());
        assert!(validate_search_query("   a  ").is_err());
        assert!(validate_search_query("").is_err());
    }
}
