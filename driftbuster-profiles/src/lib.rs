//! # driftbuster-profiles
//!
//! The Profile Store: tag-activated expected-configuration registry
//!. Mutations are copy-on-write under a single-writer lock;
//! readers always see a consistent snapshot.

pub mod errors;
pub mod store;

pub use driftbuster_core::types::profile::{ConfigurationProfile, ProfileConfig};
pub use errors::ProfileError;
pub use store::{ProfileStore, ProfileSummary, SummaryDiff};
