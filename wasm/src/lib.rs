//! WebAssembly module for the Optical Retail Reporting dashboard
//!
//! Provides client-side:
//! - Report derivation over fetched order pages
//! - Latest-filter-wins request tracking and search debouncing per report view
//! - The signed-in session shared by every view

use std::cell::RefCell;
use std::str::FromStr;

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

pub use shared::models::*;
pub use shared::types::*;

use shared::{
    derive_report, summarize_payments, ApiEnvelope, Debounce, DerivationConfig, DocsPage,
    ReportError, ReportResult, RequestGeneration, Session, SessionStore, Ticket,
};

thread_local! {
    static SESSION: RefCell<SessionStore> = RefCell::new(SessionStore::new());
}

fn to_js(err: ReportError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(target_arch = "wasm32")]
fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn log(_message: &str) {}

fn derivation_config(default_gst_rate: Option<f64>) -> DerivationConfig {
    match default_gst_rate.and_then(|rate| Decimal::try_from(rate).ok()) {
        Some(rate) if rate > Decimal::ZERO => DerivationConfig {
            default_gst_rate: rate,
        },
        _ => DerivationConfig::default(),
    }
}

fn derive_json(kind: &str, records_json: &str, config: &DerivationConfig) -> ReportResult<String> {
    let kind = ReportKind::from_str(kind)?;
    let records: Vec<OrderRecord> = serde_json::from_str(records_json)?;
    let report = derive_report(kind, &records, config);
    Ok(serde_json::to_string(&report)?)
}

fn sheet_json(kind: &str, records_json: &str, config: &DerivationConfig) -> ReportResult<String> {
    let kind = ReportKind::from_str(kind)?;
    let records: Vec<OrderRecord> = serde_json::from_str(records_json)?;
    let report = derive_report(kind, &records, config);
    Ok(serde_json::to_string(&report.rows.to_sheet())?)
}

fn summarize_payments_str(payments_json: &str) -> ReportResult<String> {
    let payments: Vec<ReceivedAmount> = serde_json::from_str(payments_json)?;
    Ok(serde_json::to_string(&summarize_payments(&payments))?)
}

/// Derive a report from a JSON array of order records
#[wasm_bindgen]
pub fn derive_report_json(kind: &str, records_json: &str) -> Result<String, JsValue> {
    derive_json(kind, records_json, &DerivationConfig::default()).map_err(to_js)
}

/// Derive a report using `default_gst_rate` for items that carry no rate
#[wasm_bindgen]
pub fn derive_report_with_rate(
    kind: &str,
    records_json: &str,
    default_gst_rate: f64,
) -> Result<String, JsValue> {
    derive_json(kind, records_json, &derivation_config(Some(default_gst_rate))).map_err(to_js)
}

/// Build the flat export sheet (headers + string cells) for a report
#[wasm_bindgen]
pub fn export_sheet_json(kind: &str, records_json: &str) -> Result<String, JsValue> {
    sheet_json(kind, records_json, &DerivationConfig::default()).map_err(to_js)
}

/// Bucket a sale's `receivedAmount` list into cash / UPI / card
#[wasm_bindgen]
pub fn summarize_payments_json(payments_json: &str) -> Result<String, JsValue> {
    summarize_payments_str(payments_json).map_err(to_js)
}

/// Discount share of MRP, `"15.00%"`, or empty when MRP is zero
#[wasm_bindgen]
pub fn incentive_percentage(discount: f64, mrp: f64) -> String {
    let discount = Decimal::try_from(discount).unwrap_or(Decimal::ZERO);
    let mrp = Decimal::try_from(mrp).unwrap_or(Decimal::ZERO);
    shared::discount_percentage(discount, mrp)
}

/// Report kinds the dashboard can show, as slugs
#[wasm_bindgen]
pub fn report_kinds() -> js_sys::Array {
    ReportKind::ALL
        .iter()
        .map(|kind| JsValue::from_str(kind.slug()))
        .collect()
}

/// State of one report widget: its in-flight request and pending search
#[wasm_bindgen]
pub struct ReportView {
    kind: ReportKind,
    config: DerivationConfig,
    requests: RequestGeneration,
    search: Debounce,
}

impl ReportView {
    fn create(kind: &str, debounce_ms: Option<u32>) -> ReportResult<ReportView> {
        let search = debounce_ms
            .map(|ms| Debounce::new(u64::from(ms)))
            .unwrap_or_default();
        Ok(ReportView {
            kind: ReportKind::from_str(kind)?,
            config: DerivationConfig::default(),
            requests: RequestGeneration::new(),
            search,
        })
    }

    /// Derive the page for `ticket`; `None` when a newer request superseded it
    fn accept(&self, ticket: u64, envelope_json: &str) -> ReportResult<Option<String>> {
        let ticket = Ticket::from_raw(ticket);
        if !self.requests.is_current(ticket) {
            log(&format!(
                "{}: dropping stale response for request {}",
                self.kind,
                ticket.value()
            ));
            return Ok(None);
        }

        let envelope: ApiEnvelope<DocsPage<OrderRecord>> = serde_json::from_str(envelope_json)?;
        let page = envelope.into_result()?;
        let report = derive_report(self.kind, &page.docs, &self.config);
        Ok(Some(serde_json::to_string(&report)?))
    }
}

#[wasm_bindgen]
impl ReportView {
    #[wasm_bindgen(constructor)]
    pub fn new(kind: &str, debounce_ms: Option<u32>) -> Result<ReportView, JsValue> {
        ReportView::create(kind, debounce_ms).map_err(to_js)
    }

    pub fn kind(&self) -> String {
        self.kind.slug().to_string()
    }

    /// Override the GST rate used for items without one
    pub fn set_default_gst_rate(&mut self, rate: f64) {
        self.config = derivation_config(Some(rate));
    }

    /// Issue a ticket for a new fetch; earlier tickets become stale
    pub fn begin_request(&self) -> u64 {
        self.requests.begin().value()
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.requests.is_current(Ticket::from_raw(ticket))
    }

    /// Hand in the API envelope for `ticket`; returns the derived report JSON,
    /// or `undefined` when the response is stale
    pub fn accept_response(
        &self,
        ticket: u64,
        envelope_json: &str,
    ) -> Result<Option<String>, JsValue> {
        self.accept(ticket, envelope_json).map_err(to_js)
    }

    /// Record a search keystroke at `now_ms`
    pub fn search_keystroke(&mut self, now_ms: f64) {
        self.search.touch(now_ms.max(0.0) as u64);
    }

    /// True exactly once when the search has been quiet for the debounce window
    pub fn search_ready(&mut self, now_ms: f64) -> bool {
        self.search.take_ready(now_ms.max(0.0) as u64)
    }

    pub fn search_pending(&self) -> bool {
        self.search.is_pending()
    }

    /// Drop the pending search and every in-flight response
    pub fn teardown(&mut self) {
        self.search.cancel();
        self.requests.invalidate();
    }
}

fn begin_session(session_json: &str) -> ReportResult<()> {
    let session: Session = serde_json::from_str(session_json)?;
    SESSION.with(|store| store.borrow_mut().begin(session));
    Ok(())
}

/// Install the signed-in user after login
#[wasm_bindgen]
pub fn session_begin(session_json: &str) -> Result<(), JsValue> {
    begin_session(session_json).map_err(to_js)
}

/// Clear the session (logout)
#[wasm_bindgen]
pub fn session_end() {
    SESSION.with(|store| store.borrow_mut().end());
}

#[wasm_bindgen]
pub fn session_token() -> Option<String> {
    SESSION.with(|store| store.borrow().token().map(str::to_string))
}

#[wasm_bindgen]
pub fn session_default_store_id() -> Option<String> {
    SESSION.with(|store| {
        store
            .borrow()
            .default_store()
            .and_then(|s| s.id.clone())
    })
}

/// Report an API status; returns true when it ended the session
#[wasm_bindgen]
pub fn session_observe_status(status: u16) -> bool {
    let ended = SESSION.with(|store| store.borrow_mut().observe_status(status));
    if ended {
        log("session expired, signing out");
    }
    ended
}
