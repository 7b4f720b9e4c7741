//! Report totals

use rust_decimal::Decimal;

use crate::models::{
    BaseRow, GstRow, IncentiveRow, ProfitLossRow, ReportRows, ReportTotals, SalesRow,
};
use crate::numeric::{mul_or_zero, round_money};

/// Per-row contributions to report totals
pub trait RowMetrics {
    fn base(&self) -> &BaseRow;

    /// Tax for the whole row (per-piece tax times quantity)
    fn tax(&self) -> Decimal {
        mul_or_zero(self.base().per_piece_tax, self.base().quantity)
    }

    fn profit(&self) -> Decimal {
        Decimal::ZERO
    }

    fn incentive(&self) -> Decimal {
        Decimal::ZERO
    }
}

impl RowMetrics for GstRow {
    fn base(&self) -> &BaseRow {
        &self.base
    }

    fn tax(&self) -> Decimal {
        mul_or_zero(self.cgst.saturating_add(self.sgst), self.base.quantity)
    }
}

impl RowMetrics for ProfitLossRow {
    fn base(&self) -> &BaseRow {
        &self.base
    }

    fn profit(&self) -> Decimal {
        mul_or_zero(self.profit_loss, self.base.quantity)
    }
}

impl RowMetrics for IncentiveRow {
    fn base(&self) -> &BaseRow {
        &self.base
    }

    fn incentive(&self) -> Decimal {
        self.incentive_amount
    }
}

impl RowMetrics for SalesRow {
    fn base(&self) -> &BaseRow {
        &self.base
    }
}

/// Sum rows into totals; empty input yields zeros
pub fn aggregate<R: RowMetrics>(rows: &[R]) -> ReportTotals {
    let mut totals = rows.iter().fold(ReportTotals::default(), |mut acc, row| {
        acc.total_quantity = acc.total_quantity.saturating_add(row.base().quantity);
        acc.total_amount = acc.total_amount.saturating_add(row.base().total_amount);
        acc.total_tax = acc.total_tax.saturating_add(row.tax());
        acc.total_profit = acc.total_profit.saturating_add(row.profit());
        acc.total_incentive = acc.total_incentive.saturating_add(row.incentive());
        acc
    });

    totals.row_count = rows.len();
    totals.total_amount = round_money(totals.total_amount);
    totals.total_tax = round_money(totals.total_tax);
    totals.total_profit = round_money(totals.total_profit);
    totals.total_incentive = round_money(totals.total_incentive);
    totals
}

impl ReportRows {
    pub fn totals(&self) -> ReportTotals {
        match self {
            ReportRows::Gst(rows) => aggregate(rows),
            ReportRows::ProfitLoss(rows) => aggregate(rows),
            ReportRows::Incentive(rows) => aggregate(rows),
            ReportRows::Sales(rows) => aggregate(rows),
        }
    }
}
