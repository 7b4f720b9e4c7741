//! Report row models derived from order records

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Report families offered by the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    Gst,
    ProfitLoss,
    Incentive,
    Sales,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Gst,
        ReportKind::ProfitLoss,
        ReportKind::Incentive,
        ReportKind::Sales,
    ];

    /// Which order lines must be present for a record to produce rows
    pub fn line_presence(&self) -> LinePresence {
        match self {
            ReportKind::Incentive => LinePresence::Both,
            ReportKind::Gst | ReportKind::ProfitLoss | ReportKind::Sales => LinePresence::Any,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            ReportKind::Gst => "gst",
            ReportKind::ProfitLoss => "profit-loss",
            ReportKind::Incentive => "incentive",
            ReportKind::Sales => "sales",
        }
    }

    /// Sheet name used when the rows are exported
    pub fn sheet_name(&self) -> &'static str {
        match self {
            ReportKind::Gst => "GST Report",
            ReportKind::ProfitLoss => "Profit Loss Report",
            ReportKind::Incentive => "Incentive Report",
            ReportKind::Sales => "Sales Report",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl std::str::FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gst" => Ok(ReportKind::Gst),
            "profit-loss" | "profit_loss" | "profitloss" | "pl" => Ok(ReportKind::ProfitLoss),
            "incentive" => Ok(ReportKind::Incentive),
            "sales" | "sale" => Ok(ReportKind::Sales),
            other => Err(ReportError::UnknownReportKind(other.to_string())),
        }
    }
}

/// Line-presence rule applied by the row expander
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LinePresence {
    /// Every named line produces its own row
    Any,
    /// Rows are produced only when the record carries both a product and a lens line
    Both,
}

/// Which order line a row came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LineType {
    Product,
    Lens,
}

impl std::fmt::Display for LineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineType::Product => write!(f, "Product"),
            LineType::Lens => write!(f, "Lens"),
        }
    }
}

/// Fields shared by every report row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BaseRow {
    #[serde(rename = "type")]
    pub line_type: LineType,
    pub date: Option<NaiveDate>,
    pub bill_number: String,
    pub sku: String,
    pub brand: String,
    pub mrp: Decimal,
    pub discount: Decimal,
    pub net_amount: Decimal,
    pub quantity: Decimal,
    pub total_amount: Decimal,
    pub per_piece_amount: Decimal,
    pub per_piece_tax: Decimal,
}

/// Cash / UPI / card subtotals of a sale's payments
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaymentSummary {
    pub cash: Decimal,
    pub upi: Decimal,
    pub card: Decimal,
}

impl PaymentSummary {
    pub fn total(&self) -> Decimal {
        self.cash.saturating_add(self.upi).saturating_add(self.card)
    }
}

/// GST register row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GstRow {
    #[serde(flatten)]
    pub base: BaseRow,
    /// Net-of-tax unit rate
    pub rate: Decimal,
    /// GST percentage applied to `rate`
    pub tax_rate: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub narration: String,
    #[serde(flatten)]
    pub payments: PaymentSummary,
}

/// Profit/loss row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfitLossRow {
    #[serde(flatten)]
    pub base: BaseRow,
    pub cost_price: Decimal,
    pub profit_loss: Decimal,
}

/// Staff incentive row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IncentiveRow {
    #[serde(flatten)]
    pub base: BaseRow,
    /// Discount as a share of MRP, e.g. `"15.00%"`; empty when MRP is zero
    pub percentage: String,
    pub incentive_amount: Decimal,
}

/// Sales register row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesRow {
    #[serde(flatten)]
    pub base: BaseRow,
    pub customer_name: String,
    pub store_name: String,
    pub discount_percentage: String,
}

/// Rows of one report, typed by report kind
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ReportRows {
    Gst(Vec<GstRow>),
    ProfitLoss(Vec<ProfitLossRow>),
    Incentive(Vec<IncentiveRow>),
    Sales(Vec<SalesRow>),
}

impl ReportRows {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportRows::Gst(_) => ReportKind::Gst,
            ReportRows::ProfitLoss(_) => ReportKind::ProfitLoss,
            ReportRows::Incentive(_) => ReportKind::Incentive,
            ReportRows::Sales(_) => ReportKind::Sales,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ReportRows::Gst(rows) => rows.len(),
            ReportRows::ProfitLoss(rows) => rows.len(),
            ReportRows::Incentive(rows) => rows.len(),
            ReportRows::Sales(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows `offset..offset + limit`, clamped to the available range
    pub fn window(&self, offset: usize, limit: usize) -> ReportRows {
        fn slice<T: Clone>(rows: &[T], offset: usize, limit: usize) -> Vec<T> {
            rows.iter().skip(offset).take(limit).cloned().collect()
        }

        match self {
            ReportRows::Gst(rows) => ReportRows::Gst(slice(rows, offset, limit)),
            ReportRows::ProfitLoss(rows) => ReportRows::ProfitLoss(slice(rows, offset, limit)),
            ReportRows::Incentive(rows) => ReportRows::Incentive(slice(rows, offset, limit)),
            ReportRows::Sales(rows) => ReportRows::Sales(slice(rows, offset, limit)),
        }
    }
}

/// Report-level totals
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    pub total_quantity: Decimal,
    pub total_amount: Decimal,
    pub total_tax: Decimal,
    pub total_profit: Decimal,
    pub total_incentive: Decimal,
    pub row_count: usize,
}

/// Rows and totals of one report, always delivered together
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DerivedReport {
    pub kind: ReportKind,
    pub rows: ReportRows,
    pub totals: ReportTotals,
    /// Records that produced no rows under the report's line-presence rule
    pub skipped_records: usize,
}
