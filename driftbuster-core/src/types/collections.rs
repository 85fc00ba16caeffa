//! Fast, non-cryptographic hash collections used on hot paths, preferred
//! over `std::collections::HashMap` throughout the scanner and detection
//! engine.

pub type FxHashMap<K, V> = std::collections::HashMap<K, V, rustc_hash::FxBuildHasher>;
pub type FxHashSet<T> = std::collections::HashSet<T, rustc_hash::FxBuildHasher>;
