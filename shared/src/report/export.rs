//! Flat sheet representation handed to spreadsheet / CSV writers

use serde::Serialize;

use crate::models::{BaseRow, GstRow, IncentiveRow, ProfitLossRow, ReportRows, SalesRow};
use crate::numeric::format_money;

const DATE_FORMAT: &str = "%d-%m-%Y";

/// A named sheet of string cells with literal column headers
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExportSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A row that knows its export columns. `SRNO` is prepended by the sheet builder.
pub trait ExportRow {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

fn date_cell(base: &BaseRow) -> String {
    base.date
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

impl ExportRow for GstRow {
    const HEADERS: &'static [&'static str] = &[
        "Date",
        "Order_No",
        "Type",
        "SKU",
        "Brand",
        "Qty",
        "Rate",
        "GST_Rate",
        "CGST",
        "SGST",
        "Amount",
        "Narration",
        "Cash",
        "UPI",
        "Card",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            date_cell(&self.base),
            self.base.bill_number.clone(),
            self.base.line_type.to_string(),
            self.base.sku.clone(),
            self.base.brand.clone(),
            self.base.quantity.to_string(),
            format_money(self.rate),
            self.tax_rate.to_string(),
            format_money(self.cgst),
            format_money(self.sgst),
            format_money(self.base.total_amount),
            self.narration.clone(),
            format_money(self.payments.cash),
            format_money(self.payments.upi),
            format_money(self.payments.card),
        ]
    }
}

impl ExportRow for ProfitLossRow {
    const HEADERS: &'static [&'static str] = &[
        "Date",
        "Order_No",
        "Type",
        "SKU",
        "Brand",
        "Qty",
        "MRP",
        "Discount",
        "Sale_Price",
        "Cost_Price",
        "Profit_Loss",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            date_cell(&self.base),
            self.base.bill_number.clone(),
            self.base.line_type.to_string(),
            self.base.sku.clone(),
            self.base.brand.clone(),
            self.base.quantity.to_string(),
            format_money(self.base.mrp),
            format_money(self.base.discount),
            format_money(self.base.per_piece_amount),
            format_money(self.cost_price),
            format_money(self.profit_loss),
        ]
    }
}

impl ExportRow for IncentiveRow {
    const HEADERS: &'static [&'static str] = &[
        "Date",
        "Order_No",
        "Type",
        "SKU",
        "Brand",
        "MRP",
        "Discount",
        "Percentage",
        "Incentive_Amount",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            date_cell(&self.base),
            self.base.bill_number.clone(),
            self.base.line_type.to_string(),
            self.base.sku.clone(),
            self.base.brand.clone(),
            format_money(self.base.mrp),
            format_money(self.base.discount),
            self.percentage.clone(),
            format_money(self.incentive_amount),
        ]
    }
}

impl ExportRow for SalesRow {
    const HEADERS: &'static [&'static str] = &[
        "Date",
        "Order_No",
        "Customer",
        "Store",
        "Type",
        "SKU",
        "Brand",
        "MRP",
        "Discount",
        "Discount_Percentage",
        "Net_Amount",
        "Qty",
        "Total_Amount",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            date_cell(&self.base),
            self.base.bill_number.clone(),
            self.customer_name.clone(),
            self.store_name.clone(),
            self.base.line_type.to_string(),
            self.base.sku.clone(),
            self.base.brand.clone(),
            format_money(self.base.mrp),
            format_money(self.base.discount),
            self.discount_percentage.clone(),
            format_money(self.base.net_amount),
            self.base.quantity.to_string(),
            format_money(self.base.total_amount),
        ]
    }
}

fn build_sheet<R: ExportRow>(name: &str, rows: &[R]) -> ExportSheet {
    let headers = std::iter::once("SRNO")
        .chain(R::HEADERS.iter().copied())
        .map(str::to_string)
        .collect();

    let rows = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let mut cells = Vec::with_capacity(R::HEADERS.len() + 1);
            cells.push((index + 1).to_string());
            cells.extend(row.cells());
            cells
        })
        .collect();

    ExportSheet {
        name: name.to_string(),
        headers,
        rows,
    }
}

impl ReportRows {
    /// Flatten rows into a sheet named after the report kind
    pub fn to_sheet(&self) -> ExportSheet {
        let name = self.kind().sheet_name();
        match self {
            ReportRows::Gst(rows) => build_sheet(name, rows),
            ReportRows::ProfitLoss(rows) => build_sheet(name, rows),
            ReportRows::Incentive(rows) => build_sheet(name, rows),
            ReportRows::Sales(rows) => build_sheet(name, rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LineType, PaymentSummary};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn gst_row() -> GstRow {
        GstRow {
            base: BaseRow {
                line_type: LineType::Lens,
                date: NaiveDate::from_ymd_opt(2024, 3, 5),
                bill_number: "1042".to_string(),
                sku: "ESS-1".to_string(),
                brand: "Essilor".to_string(),
                mrp: Decimal::from(2000),
                discount: Decimal::ZERO,
                net_amount: Decimal::from(1000),
                quantity: Decimal::from(1),
                total_amount: Decimal::from(1000),
                per_piece_amount: Decimal::from(1000),
                per_piece_tax: Decimal::from(100),
            },
            rate: Decimal::from(900),
            tax_rate: Decimal::from(12),
            cgst: Decimal::from(54),
            sgst: Decimal::from(54),
            narration: "Andheri-Asha-1042-ESS-1".to_string(),
            payments: PaymentSummary::default(),
        }
    }

    #[test]
    fn test_gst_sheet_headers_and_cells() {
        let sheet = ReportRows::Gst(vec![gst_row()]).to_sheet();
        assert_eq!(sheet.name, "GST Report");
        assert_eq!(sheet.headers[0], "SRNO");
        assert_eq!(sheet.headers[1], "Date");
        assert_eq!(sheet.headers[2], "Order_No");
        assert!(sheet.headers.contains(&"CGST".to_string()));
        assert!(sheet.headers.contains(&"SGST".to_string()));

        let row = &sheet.rows[0];
        assert_eq!(row.len(), sheet.headers.len());
        assert_eq!(row[0], "1");
        assert_eq!(row[1], "05-03-2024");
        assert_eq!(row[3], "Lens");
        assert_eq!(row[9], "54.00");
    }

    #[test]
    fn test_every_kind_has_matching_widths() {
        assert_eq!(ReportRows::ProfitLoss(vec![]).to_sheet().headers.len(), 12);
        assert_eq!(ReportRows::Incentive(vec![]).to_sheet().headers.len(), 10);
        assert_eq!(ReportRows::Sales(vec![]).to_sheet().headers.len(), 14);
    }
}
