//! Per-row field derivation: tax splits, profit/loss, incentive share, payments

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::expand::ExpandedLine;
use crate::models::{
    BaseRow, GstRow, IncentiveRow, OrderRecord, PaymentSummary, ProfitLossRow, ReceivedAmount,
    SalesRow,
};
use crate::numeric::{div_or_zero, mul_or_zero, round_money, sub_or_zero};

const NOT_AVAILABLE: &str = "N/A";

/// Knobs for field derivation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DerivationConfig {
    /// GST percentage used when a line item carries no rate of its own
    pub default_gst_rate: Decimal,
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            default_gst_rate: Decimal::from(12),
        }
    }
}

fn or_na(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

/// Fields every report row carries
pub fn base_row(expanded: &ExpandedLine<'_>) -> BaseRow {
    let line = expanded.line;
    BaseRow {
        line_type: expanded.line_type,
        date: expanded.record.created_at.map(|at| at.date_naive()),
        bill_number: or_na(expanded.record.bill_number.as_deref()),
        sku: or_na(line.sku.as_deref()),
        brand: or_na(line.brand()),
        mrp: line.mrp,
        discount: line.per_piece_discount,
        net_amount: line.net_amount,
        quantity: line.quantity,
        total_amount: line.total_amount,
        per_piece_amount: line.per_piece_amount,
        per_piece_tax: line.per_piece_tax(),
    }
}

/// Net-of-tax unit rate
pub fn net_rate(per_piece_amount: Decimal, per_piece_tax: Decimal) -> Decimal {
    sub_or_zero(per_piece_amount, per_piece_tax)
}

/// Split GST on `rate` into equal central and state halves
///
/// `gst_rate` is a percentage; 12 yields 6% CGST and 6% SGST.
pub fn tax_split(rate: Decimal, gst_rate: Decimal) -> (Decimal, Decimal) {
    let half = mul_or_zero(rate, div_or_zero(gst_rate, Decimal::from(200)));
    (half, half)
}

/// `"{store}-{customer}-{bill}-{sku}"` with `N/A` for missing parts
pub fn narration(record: &OrderRecord, sku: &str) -> String {
    format!(
        "{}-{}-{}-{}",
        record.store_name().unwrap_or(NOT_AVAILABLE),
        record.customer_name().unwrap_or(NOT_AVAILABLE),
        record.bill_number.as_deref().unwrap_or(NOT_AVAILABLE),
        sku
    )
}

/// Bucket payments into cash, UPI (`bank`) and card; other methods are ignored
pub fn summarize_payments(payments: &[ReceivedAmount]) -> PaymentSummary {
    payments
        .iter()
        .fold(PaymentSummary::default(), |mut summary, payment| {
            let method = payment
                .method
                .as_deref()
                .map(|m| m.trim().to_lowercase())
                .unwrap_or_default();
            match method.as_str() {
                "cash" => summary.cash = summary.cash.saturating_add(payment.amount),
                "bank" => summary.upi = summary.upi.saturating_add(payment.amount),
                "card" => summary.card = summary.card.saturating_add(payment.amount),
                _ => {}
            }
            summary
        })
}

/// Selling price minus cost price, per piece
pub fn profit_loss(per_piece_amount: Decimal, cost_price: Decimal) -> Decimal {
    sub_or_zero(per_piece_amount, cost_price)
}

/// Discount as a share of MRP formatted as `"15.00%"`, empty when MRP is zero
pub fn discount_percentage(discount: Decimal, mrp: Decimal) -> String {
    if mrp.is_zero() {
        return String::new();
    }
    let share = round_money(mul_or_zero(div_or_zero(discount, mrp), Decimal::ONE_HUNDRED));
    format!("{:.2}%", share)
}

pub fn gst_row(expanded: &ExpandedLine<'_>, config: &DerivationConfig) -> GstRow {
    let base = base_row(expanded);
    let rate = net_rate(base.per_piece_amount, base.per_piece_tax);
    let tax_rate = expanded
        .line
        .tax_rate()
        .unwrap_or(config.default_gst_rate);
    let (cgst, sgst) = tax_split(rate, tax_rate);
    let narration = narration(expanded.record, &base.sku);

    GstRow {
        rate: round_money(rate),
        tax_rate,
        cgst: round_money(cgst),
        sgst: round_money(sgst),
        narration,
        payments: summarize_payments(expanded.record.received_amounts()),
        base,
    }
}

pub fn profit_loss_row(expanded: &ExpandedLine<'_>) -> ProfitLossRow {
    let base = base_row(expanded);
    let cost_price = expanded.line.cost_price();

    ProfitLossRow {
        profit_loss: round_money(profit_loss(base.per_piece_amount, cost_price)),
        cost_price,
        base,
    }
}

pub fn incentive_row(expanded: &ExpandedLine<'_>) -> IncentiveRow {
    let base = base_row(expanded);

    IncentiveRow {
        percentage: discount_percentage(base.discount, base.mrp),
        incentive_amount: expanded.line.incentive_amount,
        base,
    }
}

pub fn sales_row(expanded: &ExpandedLine<'_>) -> SalesRow {
    let base = base_row(expanded);

    SalesRow {
        customer_name: or_na(expanded.record.customer_name()),
        store_name: or_na(expanded.record.store_name()),
        discount_percentage: discount_percentage(base.discount, base.mrp),
        base,
    }
}
