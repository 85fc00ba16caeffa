//! # driftbuster-hunt
//!
//! The Hunt Engine: rule-based discovery of dynamic/sensitive values
//! (hostnames, connection strings, credentials-shaped text) across a
//! scanned tree, plus planning of token substitutions and durable
//! storage of operator approvals for those substitutions.

pub mod approvals;
pub mod engine;
pub mod errors;
pub mod plan;
pub mod rule;

pub use approvals::{ApprovalStore, JsonApprovalStore, SqliteApprovalStore};
pub use engine::hunt_path;
pub use errors::HuntError;
pub use plan::{build_plan_transforms, collect_token_candidates, PlannedTransform, TokenCandidates};
pub use rule::HuntRule;
