//! Token approval storage. One trait, two implementations.

pub mod json_store;
pub mod sqlite_store;

use driftbuster_core::types::hunt::TokenApproval;

use crate::errors::HuntError;

/// Persists and retrieves `TokenApproval` records. Writes persist via
/// atomic rename (JSON backend) or a WAL-mode transaction (SQLite
/// backend); reads return the full current set, which persists across
/// runs.
pub trait ApprovalStore: Send + Sync {
    fn load_all(&self) -> Result<Vec<TokenApproval>, HuntError>;
    fn approve(&self, approval: TokenApproval) -> Result<(), HuntError>;
    fn revoke(&self, token_name: &str) -> Result<(), HuntError>;
}

pub use json_store::JsonApprovalStore;
pub use sqlite_store::SqliteApprovalStore;
