//! Report derivation engine
//!
//! Turns fetched order records into typed report rows and totals. Every
//! function here is pure: the same records always produce the same report.

mod aggregate;
mod expand;
mod export;
mod fields;

pub use aggregate::*;
pub use expand::*;
pub use export::*;
pub use fields::*;

use crate::models::{DerivedReport, OrderRecord, ReportKind, ReportRows};

/// Expand and derive the rows of one report kind
pub fn derive_rows(
    kind: ReportKind,
    records: &[OrderRecord],
    config: &DerivationConfig,
) -> (ReportRows, usize) {
    let expansion = expand_records(records, kind.line_presence());
    let lines = expansion.lines.iter();

    let rows = match kind {
        ReportKind::Gst => ReportRows::Gst(lines.map(|l| gst_row(l, config)).collect()),
        ReportKind::ProfitLoss => ReportRows::ProfitLoss(lines.map(profit_loss_row).collect()),
        ReportKind::Incentive => ReportRows::Incentive(lines.map(incentive_row).collect()),
        ReportKind::Sales => ReportRows::Sales(lines.map(sales_row).collect()),
    };

    (rows, expansion.skipped)
}

/// Derive rows and totals together
pub fn derive_report(
    kind: ReportKind,
    records: &[OrderRecord],
    config: &DerivationConfig,
) -> DerivedReport {
    let (rows, skipped_records) = derive_rows(kind, records, config);
    let totals = rows.totals();

    DerivedReport {
        kind,
        rows,
        totals,
        skipped_records,
    }
}
