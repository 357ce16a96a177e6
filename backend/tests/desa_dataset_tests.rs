//! Village dataset tests
//!
//! Checks the bundled `data/desa.json` and the lookup rules applied to it:
//! - Every record carries a well-formed ADM4 code
//! - Codes are unique and nest inside their province prefix
//! - Search matching is case-insensitive

use proptest::prelude::*;
use shared::models::VillageRecord;
use shared::validation::{is_valid_adm4_code, validate_search_query};
use std::collections::HashSet;

fn load_dataset() -> Vec<VillageRecord> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/desa.json");
    let raw = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&raw).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_dataset_codes_are_valid() {
        let villages = load_dataset();
        assert!(!villages.is_empty());

        for village in &villages {
            assert!(
                is_valid_adm4_code(&village.adm4_code),
                "bad code for {}: {}",
                village.nama_desa,
                village.adm4_code
            );
        }
    }

    #[test]
    fn test_dataset_codes_are_unique() {
        let villages = load_dataset();
        let codes: HashSet<&str> = villages.iter().map(|v| v.adm4_code.as_str()).collect();
        assert_eq!(codes.len(), villages.len());
    }

    /// Villages in one province share the two-digit province prefix
    #[test]
    fn test_province_prefix_is_consistent() {
        let villages = load_dataset();
        for a in &villages {
            for b in &villages {
                if a.provinsi == b.provinsi {
                    assert_eq!(a.adm4_code[..2], b.adm4_code[..2], "{} vs {}", a.nama_desa, b.nama_desa);
                }
            }
        }
    }

    #[test]
    fn test_dataset_contains_sample_village() {
        let villages = load_dataset();
        assert!(villages
            .iter()
            .any(|v| v.adm4_code == "31.71.01.1001" && v.nama_desa == "Gambir"));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let villages = load_dataset();
        let needle = "KARANGANYAR".to_lowercase();
        let found: Vec<_> = villages.iter().filter(|v| v.matches(&needle)).collect();
        assert_eq!(found.len(), 2);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any four digit groups of width 2, 2, 2, 4 form a valid code
        #[test]
        fn prop_well_formed_codes_accepted(
            prov in 0u32..100,
            kab in 0u32..100,
            kec in 0u32..100,
            desa in 0u32..10000,
        ) {
            let code = format!("{:02}.{:02}.{:02}.{:04}", prov, kab, kec, desa);
            prop_assert!(is_valid_adm4_code(&code));
        }

        /// Dropping any character breaks the format
        #[test]
        fn prop_truncated_codes_rejected(desa in 0u32..10000, cut in 0usize..13) {
            let mut code = format!("31.71.01.{:04}", desa);
            code.remove(cut);
            prop_assert!(!is_valid_adm4_code(&code));
        }

        /// Queries shorter than two visible characters are rejected
        #[test]
        fn prop_short_queries_rejected(c in "[a-z]", pad in " {0,4}") {
            let query = format!("{}{}{}", pad, c, pad);
            prop_assert!(validate_search_query(&query).is_err());
        }

        /// A village always matches its own lowercased name
        #[test]
        fn prop_village_matches_own_name(name in "[A-Za-z]{2,12}") {
            let village = VillageRecord {
                nama_desa: name.clone(),
                kecamatan: "Kecamatan".to_string(),
                kabupaten: "Kabupaten".to_string(),
                provinsi: "Provinsi".to_string(),
                adm4_code: "31.71.01.1001".to_string(),
                lat: None,
                lon: None,
            };
            prop_assert!(village.matches(&name.to_lowercase()));
        }
    }
}
