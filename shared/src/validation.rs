//! Validation utilities for report filters
//!
//! Includes India-specific checks for GST rates and store codes.

use rust_decimal::Decimal;

use crate::types::DateRange;

// ============================================================================
// Filter Validations
// ============================================================================

/// Longest date range a single report may cover
pub const MAX_RANGE_DAYS: i64 = 366;

/// Validate that a date range is ordered and not excessively long
pub fn validate_date_range(range: &DateRange) -> Result<(), &'static str> {
    if range.start > range.end {
        return Err("Start date must not be after end date");
    }
    if (range.end - range.start).num_days() > MAX_RANGE_DAYS {
        return Err("Date range must not exceed one year");
    }
    Ok(())
}

/// Trim a search term; blank terms mean "no search"
pub fn normalize_search(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

// ============================================================================
// GST Validations
// ============================================================================

/// GST slabs notified for goods
pub const GST_SLABS: [u32; 6] = [0, 5, 12, 18, 28, 40];

/// Validate a GST percentage is within 0-100
pub fn validate_gst_rate(rate: Decimal) -> Result<(), &'static str> {
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        return Err("GST rate must be between 0 and 100%");
    }
    Ok(())
}

/// Check whether a rate matches a notified GST slab
pub fn is_standard_gst_slab(rate: Decimal) -> bool {
    GST_SLABS.iter().any(|slab| Decimal::from(*slab) == rate)
}

/// Validate a store identifier (1-64 chars, alphanumeric, `-` or `_`)
pub fn validate_store_id(id: &str) -> Result<(), &'static str> {
    if id.is_empty() {
        return Err("Store id must not be empty");
    }
    if id.len() > 64 {
        return Err("Store id must be at most 64 characters");
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err("Store id must be alphanumeric");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn range(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateRange {
        DateRange {
            start: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        }
    }

    #[test]
    fn test_validate_date_range_valid() {
        assert!(validate_date_range(&range((2024, 4, 1), (2024, 4, 30))).is_ok());
        assert!(validate_date_range(&range((2024, 4, 1), (2024, 4, 1))).is_ok());
    }

    #[test]
    fn test_validate_date_range_reversed() {
        assert!(validate_date_range(&range((2024, 4, 30), (2024, 4, 1))).is_err());
    }

    #[test]
    fn test_validate_date_range_too_long() {
        assert!(validate_date_range(&range((2022, 1, 1), (2024, 1, 1))).is_err());
    }

    #[test]
    fn test_normalize_search() {
        assert_eq!(normalize_search(Some("  ray ")), Some("ray".to_string()));
        assert_eq!(normalize_search(Some("   ")), None);
        assert_eq!(normalize_search(None), None);
    }

    #[test]
    fn test_gst_rate() {
        assert!(validate_gst_rate(Decimal::from(12)).is_ok());
        assert!(validate_gst_rate(Decimal::ZERO).is_ok());
        assert!(validate_gst_rate(Decimal::from(-1)).is_err());
        assert!(validate_gst_rate(Decimal::from(101)).is_err());
        assert!(is_standard_gst_slab(Decimal::from(18)));
        assert!(!is_standard_gst_slab(Decimal::from(13)));
    }

    #[test]
    fn test_store_id() {
        assert!(validate_store_id("64f1a2b3c4").is_ok());
        assert!(validate_store_id("store_01").is_ok());
        assert!(validate_store_id("").is_err());
        assert!(validate_store_id("bad id").is_err());
    }
}
