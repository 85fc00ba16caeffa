//! # driftbuster-cache
//!
//! The Diff Cache: a content-addressed on-disk store for `DiffResult`s
//! with a `moka` LRU in-memory front.

pub mod errors;
pub mod store;

pub use errors::CacheError;
pub use store::{DiffCache, FsDiffCache};
