//! Common types used across the platform

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// Pagination parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    /// Zero-based offset of the first item on this page
    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.per_page as usize
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, total_items: u64) -> Self {
        let per_page = pagination.per_page.max(1);
        let total_pages = total_items.div_ceil(per_page as u64) as u32;
        Self {
            page: pagination.page.max(1),
            per_page,
            total_items,
            total_pages,
        }
    }
}

/// Date range for queries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Filter sent to the ERP `/orders` endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderQuery {
    pub date_range: Option<DateRange>,
    pub store_id: Option<String>,
    pub search: Option<String>,
}

impl OrderQuery {
    /// Query-string pairs for one upstream page
    pub fn to_params(&self, page: u32, limit: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(range) = &self.date_range {
            params.push(("startDate", range.start.format("%Y-%m-%d").to_string()));
            params.push(("endDate", range.end.format("%Y-%m-%d").to_string()));
        }
        if let Some(store) = &self.store_id {
            params.push(("store", store.clone()));
        }
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        params
    }
}

/// Response envelope used by every ERP endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, turning `success: false` into an error
    pub fn into_result(self) -> ReportResult<T> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (_, _) => Err(ReportError::Unsuccessful(
                self.message
                    .unwrap_or_else(|| "request was not successful".to_string()),
            )),
        }
    }
}

/// Paginated document list inside an envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsPage<T> {
    #[serde(default = "Vec::new")]
    pub docs: Vec<T>,
    #[serde(default)]
    pub total_docs: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub has_prev_page: bool,
}
