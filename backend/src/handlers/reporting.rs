//! Reporting handlers for report rows, totals and CSV export

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::{
    normalize_search, validate_date_range, validate_store_id, DateRange, OrderQuery, Pagination,
    ReportError, ReportKind,
};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::SessionToken;
use crate::services::ReportingService;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub store: Option<String>,
    #[validate(length(max = 100))]
    pub search: Option<String>,
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 500))]
    pub per_page: Option<u32>,
    pub format: Option<String>, // "json" or "csv"
}

impl ReportQuery {
    fn wants_csv(&self) -> bool {
        self.format
            .as_deref()
            .map(|f| f.eq_ignore_ascii_case("csv"))
            .unwrap_or(false)
    }

    fn pagination(&self, max_per_page: u32) -> Pagination {
        let defaults = Pagination::default();
        Pagination {
            page: self.page.unwrap_or(defaults.page),
            per_page: self
                .per_page
                .unwrap_or(defaults.per_page)
                .min(max_per_page.max(1)),
        }
    }

    /// Build the upstream filter, rejecting malformed dates and store ids
    fn order_query(&self) -> AppResult<OrderQuery> {
        let start = parse_date("start_date", self.start_date.as_deref())?;
        let end = parse_date("end_date", self.end_date.as_deref())?;

        let date_range = match (start, end) {
            (Some(start), Some(end)) => {
                let range = DateRange { start, end };
                validate_date_range(&range).map_err(ReportError::InvalidDateRange)?;
                Some(range)
            }
            (None, None) => None,
            _ => {
                return Err(AppError::Validation {
                    field: "date_range".to_string(),
                    message: "start_date and end_date must be given together".to_string(),
                })
            }
        };

        if let Some(store) = &self.store {
            validate_store_id(store).map_err(|msg| AppError::Validation {
                field: "store".to_string(),
                message: msg.to_string(),
            })?;
        }

        Ok(OrderQuery {
            date_range,
            store_id: self.store.clone(),
            search: normalize_search(self.search.as_deref()),
        })
    }
}

fn parse_date(field: &str, value: Option<&str>) -> AppResult<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::Validation {
                field: field.to_string(),
                message: format!("{} must be a YYYY-MM-DD date", field),
            }),
    }
}

/// Get a report page, or the full report as CSV with `format=csv`
pub async fn get_report(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    token: SessionToken,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    let kind: ReportKind = kind.parse()?;
    query.validate()?;
    let order_query = query.order_query()?;

    if query.wants_csv() {
        let sheet = state
            .reporting
            .get_report_sheet(kind, &order_query, token.as_deref())
            .await?;
        let csv = ReportingService::export_to_csv(&sheet)?;
        let disposition = format!(
            "attachment; filename=\"{}\"",
            ReportingService::export_file_name(kind)
        );
        return Ok((
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            csv,
        )
            .into_response());
    }

    let pagination = query.pagination(state.config.reports.max_per_page);
    let page = state
        .reporting
        .get_report(kind, &order_query, &pagination, token.as_deref())
        .await?;

    Ok(Json(page).into_response())
}

/// List the report kinds this service can derive
pub async fn list_reports() -> Json<Vec<&'static str>> {
    Json(ReportKind::ALL.iter().map(|k| k.slug()).collect())
}
