//! Report derivation tests
//!
//! Tests for row expansion and end-to-end derivation including:
//! - Property 1: Both named lines yield two rows, product first
//! - Property 2: Records without named lines yield no rows
//! - Property 7: Derivation is idempotent

use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use shared::{
    derive_report, expand_record, DerivationConfig, LinePresence, LineType, OrderRecord,
    ReportKind, ReportRows,
};
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn record(value: Value) -> OrderRecord {
    serde_json::from_value(value).unwrap()
}

fn line(name: Option<&str>, amount: u32, tax: u32) -> Value {
    json!({
        "sku": format!("SKU-{}", amount),
        "mrp": amount + 100,
        "perPieceDiscount": 100,
        "perPieceAmount": amount,
        "quantity": 1,
        "totalAmount": amount,
        "item": { "displayName": name, "perPieceTax": tax, "costPrice": amount / 2 }
    })
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Ray-Ban frame at 1000 with 100 tax: rate 900, 54 + 54 GST
    #[test]
    fn test_ray_ban_gst_scenario() {
        let records = vec![record(json!({
            "billNumber": 501,
            "store": { "name": "Bandra" },
            "sale": { "customerName": "Kiran" },
            "product": {
                "sku": "RB-3025",
                "perPieceAmount": 1000,
                "item": { "displayName": "Ray-Ban", "perPieceTax": 100 }
            }
        }))];

        let report = derive_report(ReportKind::Gst, &records, &DerivationConfig::default());
        let ReportRows::Gst(rows) = &report.rows else {
            panic!("expected GST rows");
        };

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].rate, dec("900"));
        assert_eq!(rows[0].cgst, dec("54.00"));
        assert_eq!(rows[0].sgst, dec("54.00"));
        assert_eq!(rows[0].narration, "Bandra-Kiran-501-RB-3025");

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["rows"][0]["cgst"], "54.00");
        assert_eq!(value["rows"][0]["sgst"], "54.00");
        assert_eq!(value["rows"][0]["rate"], "900.00");
    }

    /// Records with neither line named are counted as skipped
    #[test]
    fn test_skipped_records_counted() {
        let records = vec![
            record(json!({ "billNumber": 1 })),
            record(json!({ "billNumber": 2, "product": { "item": { "displayName": "" } } })),
            record(json!({ "billNumber": 3, "lens": line(Some("Essilor"), 800, 80) })),
        ];

        for kind in [ReportKind::Gst, ReportKind::ProfitLoss, ReportKind::Sales] {
            let report = derive_report(kind, &records, &DerivationConfig::default());
            assert_eq!(report.rows.len(), 1, "{}", kind);
            assert_eq!(report.skipped_records, 2, "{}", kind);
        }
    }

    /// Incentive rows need both lines; the other reports do not
    #[test]
    fn test_incentive_requires_both_lines() {
        let records = vec![
            record(json!({ "product": line(Some("Ray-Ban"), 1000, 100) })),
            record(json!({
                "product": line(Some("Oakley"), 2000, 200),
                "lens": line(Some("Zeiss"), 900, 90)
            })),
        ];

        let incentive = derive_report(ReportKind::Incentive, &records, &DerivationConfig::default());
        assert_eq!(incentive.rows.len(), 2);
        assert_eq!(incentive.skipped_records, 1);

        let gst = derive_report(ReportKind::Gst, &records, &DerivationConfig::default());
        assert_eq!(gst.rows.len(), 3);
        assert_eq!(gst.skipped_records, 0);
    }

    /// An unnamed lens still counts as present for incentive rows
    #[test]
    fn test_incentive_with_unnamed_lens() {
        let records = vec![record(json!({
            "product": line(Some("Ray-Ban"), 1000, 100),
            "lens": { "mrp": 500, "perPieceDiscount": 50, "incentiveAmount": 20 }
        }))];

        let report = derive_report(ReportKind::Incentive, &records, &DerivationConfig::default());
        let ReportRows::Incentive(rows) = &report.rows else {
            panic!("expected incentive rows");
        };

        assert_eq!(report.skipped_records, 0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].base.line_type, LineType::Lens);
        assert_eq!(rows[1].percentage, "10.00%");
        assert_eq!(report.totals.total_incentive, dec("20"));
    }

    /// Profit/loss treats a non-numeric amount as zero
    #[test]
    fn test_profit_loss_non_numeric_amount() {
        let records = vec![record(json!({
            "product": {
                "perPieceAmount": "abc",
                "item": { "displayName": "Frame", "costPrice": 450 }
            }
        }))];

        let report = derive_report(ReportKind::ProfitLoss, &records, &DerivationConfig::default());
        let ReportRows::ProfitLoss(rows) = &report.rows else {
            panic!("expected profit/loss rows");
        };
        assert_eq!(rows[0].profit_loss, dec("-450"));
    }

    /// Missing text fields fall back to N/A
    #[test]
    fn test_missing_fields_fall_back() {
        let records = vec![record(json!({ "lens": { "item": { "displayName": "Hoya" } } }))];
        let report = derive_report(ReportKind::Sales, &records, &DerivationConfig::default());
        let ReportRows::Sales(rows) = &report.rows else {
            panic!("expected sales rows");
        };

        assert_eq!(rows[0].base.line_type, LineType::Lens);
        assert_eq!(rows[0].base.bill_number, "N/A");
        assert_eq!(rows[0].base.sku, "N/A");
        assert_eq!(rows[0].customer_name, "N/A");
        assert_eq!(rows[0].discount_percentage, "");
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn arb_name() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[A-Z][a-z]{2,10}".prop_map(Some),
    ]
}

fn arb_record() -> impl Strategy<Value = OrderRecord> {
    (arb_name(), arb_name(), 1u32..100_000, 0u32..5_000, 1u32..100_000).prop_map(
        |(product, lens, amount, tax, lens_amount)| {
            record(json!({
                "billNumber": amount,
                "product": line(product.as_deref(), amount, tax),
                "lens": line(lens.as_deref(), lens_amount, tax),
                "sale": {
                    "receivedAmount": [
                        { "method": "cash", "amount": amount },
                        { "method": "cheque", "amount": 10 }
                    ]
                }
            }))
        },
    )
}

fn is_named(name: &Option<String>) -> bool {
    name.as_deref().map(|n| !n.is_empty()).unwrap_or(false)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 1: Both named lines yield exactly two rows, product first
    #[test]
    fn property_1_both_lines_two_rows(
        product in "[A-Z][a-z]{2,10}",
        lens in "[A-Z][a-z]{2,10}",
        amount in 1u32..100_000,
    ) {
        let rec = record(json!({
            "product": line(Some(&product), amount, 0),
            "lens": line(Some(&lens), amount, 0)
        }));

        let lines = expand_record(&rec, LinePresence::Any);
        prop_assert_eq!(lines.len(), 2);
        prop_assert_eq!(lines[0].line_type, LineType::Product);
        prop_assert_eq!(lines[1].line_type, LineType::Lens);
    }

    /// Property 2: No named line means no rows
    #[test]
    fn property_2_unnamed_lines_no_rows(
        product_blank in any::<bool>(),
        lens_blank in any::<bool>(),
    ) {
        let name = |blank: bool| if blank { Some("") } else { None };
        let rec = record(json!({
            "product": line(name(product_blank), 100, 0),
            "lens": line(name(lens_blank), 100, 0)
        }));

        prop_assert!(expand_record(&rec, LinePresence::Any).is_empty());
    }

    /// Incentive rows depend on both lines existing, whatever their names
    #[test]
    fn property_incentive_needs_both_lines_present(
        product in arb_name(),
        lens in arb_name(),
        has_product in any::<bool>(),
        has_lens in any::<bool>(),
    ) {
        let mut value = json!({});
        if has_product {
            value["product"] = line(product.as_deref(), 100, 0);
        }
        if has_lens {
            value["lens"] = line(lens.as_deref(), 100, 0);
        }
        let rec = record(value);

        let expected = if has_product && has_lens { 2 } else { 0 };
        prop_assert_eq!(expand_record(&rec, LinePresence::Both).len(), expected);
    }

    /// Row count equals the number of named lines
    #[test]
    fn property_row_count_matches_named_lines(
        product in arb_name(),
        lens in arb_name(),
    ) {
        let rec = record(json!({
            "product": line(product.as_deref(), 100, 0),
            "lens": line(lens.as_deref(), 100, 0)
        }));

        let expected = is_named(&product) as usize + is_named(&lens) as usize;
        prop_assert_eq!(expand_record(&rec, LinePresence::Any).len(), expected);
    }

    /// Property 7: Deriving the same records twice gives identical output
    #[test]
    fn property_7_derivation_idempotent(records in prop::collection::vec(arb_record(), 0..20)) {
        let config = DerivationConfig::default();
        for kind in ReportKind::ALL {
            let first = derive_report(kind, &records, &config);
            let second = derive_report(kind, &records, &config);
            prop_assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap()
            );
        }
    }

    /// Every record either produces rows or is counted as skipped
    #[test]
    fn property_rows_or_skipped(records in prop::collection::vec(arb_record(), 0..20)) {
        let report = derive_report(ReportKind::Gst, &records, &DerivationConfig::default());
        let producing = records
            .iter()
            .filter(|r| !expand_record(r, LinePresence::Any).is_empty())
            .count();
        prop_assert_eq!(producing + report.skipped_records, records.len());
    }
}
