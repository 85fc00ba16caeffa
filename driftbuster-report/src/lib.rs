//! # driftbuster-report
//!
//! Report Adapters: render detection, hunt, and diff payloads into JSON
//! lines and self-contained HTML summaries without leaking raw secrets.
//! Adapters never read filesystem state; they operate on pre-computed
//! payloads.

pub mod errors;
pub mod html;
pub mod payload;

pub use errors::ReportError;
pub use html::render_html_report;
pub use payload::{iter_detection_payloads, DetectionPayload, HuntContext, HuntPayload, HuntSummaryPayload};
