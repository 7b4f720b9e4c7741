//! ERP API client for fetching raw order records
//!
//! Talks to the optical ERP REST backend, which owns pricing, inventory and
//! invoicing. Only successful envelopes ever reach the derivation layer.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use shared::{ApiEnvelope, DocsPage, OrderQuery, OrderRecord};

use crate::config::ErpConfig;
use crate::error::{AppError, AppResult};

/// ERP API client
#[derive(Clone)]
pub struct ErpClient {
    client: Client,
    base_url: String,
    page_size: u32,
    max_pages: u32,
}

/// All documents collected for one query
#[derive(Debug, Default)]
pub struct FetchedOrders {
    pub records: Vec<OrderRecord>,
    pub total_docs: u64,
    pub pages_fetched: u32,
    /// True when `max_pages` stopped the walk before the last page
    pub truncated: bool,
}

impl ErpClient {
    /// Create a new ErpClient from configuration
    pub fn new(config: &ErpConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size.max(1),
            max_pages: config.max_pages.max(1),
        })
    }

    /// Create a new ErpClient with custom base URL (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            page_size: 100,
            max_pages: 50,
        }
    }

    fn orders_url(&self) -> String {
        format!("{}/orders", self.base_url)
    }

    /// Fetch one page of orders
    pub async fn fetch_orders_page(
        &self,
        query: &OrderQuery,
        page: u32,
        token: Option<&str>,
    ) -> AppResult<DocsPage<OrderRecord>> {
        let mut request = self
            .client
            .get(self.orders_url())
            .query(&query.to_params(page, self.page_size));

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("orders request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AppError::Unauthorized(
                "ERP rejected the session token".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, body = %body, "ERP orders request failed");
            return Err(AppError::UpstreamUnavailable(format!(
                "orders API returned {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("reading orders body: {}", e)))?;

        parse_orders_page(&body)
    }

    /// Walk pages until the upstream reports no next page or `max_pages` is hit
    pub async fn fetch_all_orders(
        &self,
        query: &OrderQuery,
        token: Option<&str>,
    ) -> AppResult<FetchedOrders> {
        let mut fetched = FetchedOrders::default();
        let mut page = 1;

        loop {
            let docs_page = self.fetch_orders_page(query, page, token).await?;
            fetched.pages_fetched += 1;
            fetched.total_docs = docs_page.total_docs;
            fetched.records.extend(docs_page.docs);

            if !docs_page.has_next_page {
                break;
            }
            if fetched.pages_fetched >= self.max_pages {
                fetched.truncated = true;
                tracing::warn!(
                    pages = fetched.pages_fetched,
                    total_docs = fetched.total_docs,
                    "Stopped walking order pages at the configured limit"
                );
                break;
            }
            page += 1;
        }

        tracing::debug!(
            records = fetched.records.len(),
            pages = fetched.pages_fetched,
            "Fetched orders"
        );

        Ok(fetched)
    }
}

/// Parse an `/orders` envelope body into its page of documents
pub fn parse_orders_page(body: &str) -> AppResult<DocsPage<OrderRecord>> {
    let envelope: ApiEnvelope<DocsPage<OrderRecord>> =
        serde_json::from_str(body).map_err(shared::ReportError::from)?;
    Ok(envelope.into_result()?)
}
