//! # driftbuster-orchestrator
//!
//! The Multi-Server Orchestrator: coordinates detection and diffing
//! across an arbitrary number of hosts, aggregates results into a
//! catalog of logical configs, and exposes per-config drilldowns.

pub mod baseline;
pub mod catalog_row;
pub mod config_id;
pub mod drilldown;
pub mod engine;
pub mod errors;
pub mod host_scan;
pub mod options;
pub mod prior_run;

pub use engine::MultiServerOrchestrator;
pub use errors::OrchestratorError;
pub use options::OrchestratorOptions;
pub use prior_run::{PriorRunEntry, PriorRunStore};

pub use driftbuster_core::types::server::{
    CatalogRow, Drilldown, Presence, ScanProgress, ScanResult, ScanState, Severity, ServerScanPlan,
};
