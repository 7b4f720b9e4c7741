//! Reporting service for GST, profit/loss, incentive and sales reports
//! Fetches orders from the ERP, derives rows and totals, and exports sheets

use serde::Serialize;
use shared::{
    derive_report, DerivationConfig, DerivedReport, ExportSheet, OrderQuery, Pagination,
    PaginationMeta, ReportKind, ReportRows, ReportTotals,
};

use crate::error::{AppError, AppResult};
use crate::external::ErpClient;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    erp: ErpClient,
    derivation: DerivationConfig,
}

/// One page of report rows plus totals over the whole filtered set
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPage {
    pub kind: ReportKind,
    pub rows: ReportRows,
    pub totals: ReportTotals,
    pub skipped_records: usize,
    pub pagination: PaginationMeta,
    /// Upstream page limit cut the record set short
    pub truncated: bool,
}

impl ReportPage {
    /// Slice a derived report down to the requested page; totals stay report-wide
    pub fn from_report(report: DerivedReport, pagination: &Pagination, truncated: bool) -> Self {
        let meta = PaginationMeta::new(pagination, report.rows.len() as u64);
        let rows = report
            .rows
            .window(pagination.offset(), meta.per_page as usize);

        Self {
            kind: report.kind,
            rows,
            totals: report.totals,
            skipped_records: report.skipped_records,
            pagination: meta,
            truncated,
        }
    }
}

impl ReportingService {
    pub fn new(erp: ErpClient, derivation: DerivationConfig) -> Self {
        Self { erp, derivation }
    }

    async fn derive(
        &self,
        kind: ReportKind,
        query: &OrderQuery,
        token: Option<&str>,
    ) -> AppResult<(DerivedReport, bool)> {
        let fetched = self.erp.fetch_all_orders(query, token).await?;
        let report = derive_report(kind, &fetched.records, &self.derivation);

        tracing::info!(
            report = %kind,
            records = fetched.records.len(),
            rows = report.rows.len(),
            skipped = report.skipped_records,
            "Derived report"
        );

        Ok((report, fetched.truncated))
    }

    /// Get one page of a report
    pub async fn get_report(
        &self,
        kind: ReportKind,
        query: &OrderQuery,
        pagination: &Pagination,
        token: Option<&str>,
    ) -> AppResult<ReportPage> {
        let (report, truncated) = self.derive(kind, query, token).await?;
        Ok(ReportPage::from_report(report, pagination, truncated))
    }

    /// Get every row of a report as an export sheet
    pub async fn get_report_sheet(
        &self,
        kind: ReportKind,
        query: &OrderQuery,
        token: Option<&str>,
    ) -> AppResult<ExportSheet> {
        let (report, _) = self.derive(kind, query, token).await?;
        Ok(report.rows.to_sheet())
    }

    /// Export a sheet as CSV
    pub fn export_to_csv(sheet: &ExportSheet) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record(&sheet.headers)
            .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        for row in &sheet.rows {
            wtr.write_record(row)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }

    /// File name offered for a downloaded export
    pub fn export_file_name(kind: ReportKind) -> String {
        format!("{}_report.csv", kind.slug().replace('-', "_"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::OrderRecord;

    fn records(count: usize) -> Vec<OrderRecord> {
        let docs: Vec<serde_json::Value> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "billNumber": i,
                    "product": {
                        "sku": format!("SKU-{}", i),
                        "quantity": 1,
                        "totalAmount": 100,
                        "item": { "displayName": "Frame" }
                    }
                })
            })
            .collect();
        serde_json::from_value(serde_json::Value::Array(docs)).unwrap()
    }

    #[test]
    fn test_page_keeps_report_wide_totals() {
        let report = derive_report(ReportKind::Sales, &records(45), &DerivationConfig::default());
        let page = ReportPage::from_report(report, &Pagination { page: 3, per_page: 20 }, false);

        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.pagination.total_items, 45);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.totals.row_count, 45);
        assert_eq!(page.totals.total_amount, rust_decimal::Decimal::from(4500));
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let report = derive_report(ReportKind::Sales, &records(3), &DerivationConfig::default());
        let page = ReportPage::from_report(report, &Pagination { page: 9, per_page: 20 }, false);
        assert!(page.rows.is_empty());
        assert_eq!(page.totals.row_count, 3);
    }

    #[test]
    fn test_export_to_csv() {
        let report = derive_report(ReportKind::Sales, &records(2), &DerivationConfig::default());
        let csv = ReportingService::export_to_csv(&report.rows.to_sheet()).unwrap();
        let mut lines = csv.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("SRNO,Date,Order_No"));
        assert!(lines.next().unwrap().starts_with("1,N/A,0,"));
        assert!(lines.next().unwrap().starts_with("2,N/A,1,"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(
            ReportingService::export_file_name(ReportKind::ProfitLoss),
            "profit_loss_report.csv"
        );
    }
}
