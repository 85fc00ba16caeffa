//! `FsDiffCache`: content-addressed persistent `DiffResult` storage with
//! a `moka` LRU in-memory front and fd-lock + temp-file-then-rename for
//! atomic `put`.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use driftbuster_core::config::CacheOptions;
use driftbuster_core::types::diff::{DiffCacheKey, DiffResult};
use moka::sync::Cache as MokaCache;
use serde::{Deserialize, Serialize};

use crate::errors::CacheError;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    key: DiffCacheKey,
    stored_at: u64,
    value: DiffResult,
}

/// Content-addressed `DiffResult` storage. `get` returns `Some` only when
/// every `DiffCacheKey` component matches exactly; a `key_hash` collision
/// with a different key is treated as a miss.
pub trait DiffCache: Send + Sync {
    fn get(&self, key: &DiffCacheKey) -> Option<DiffResult>;
    fn put(&self, key: &DiffCacheKey, value: &DiffResult) -> Result<(), CacheError>;
    fn invalidate_by_prefix(&self, host_id: &str) -> Result<(), CacheError>;
    fn clear(&self) -> Result<(), CacheError>;
}

/// Disk layout: `<root>/diffs/<host_id>/<config_id_hash>/<key_hash>.json`.
pub struct FsDiffCache {
    root: PathBuf,
    options: CacheOptions,
    memory: MokaCache<String, CacheEntry>,
}

impl FsDiffCache {
    pub fn open(root: impl Into<PathBuf>, options: CacheOptions) -> Self {
        let memory = MokaCache::new(options.memory_capacity);
        Self {
            root: root.into(),
            options,
            memory,
        }
    }

    fn entry_path(&self, key: &DiffCacheKey) -> PathBuf {
        self.root
            .join("diffs")
            .join(&key.host_id)
            .join(key.config_id_hash())
            .join(format!("{}.json", key.key_hash()))
    }

    fn host_dir(&self, host_id: &str) -> PathBuf {
        self.root.join("diffs").join(host_id)
    }

    fn is_expired(&self, stored_at: u64) -> bool {
        match self.options.ttl_secs {
            Some(ttl) => now_unix().saturating_sub(stored_at) > ttl,
            None => false,
        }
    }

    /// Sweep the on-disk store in mtime order, deleting the oldest
    /// entries until total size is back under `byte_budget`.
    fn enforce_byte_budget(&self) {
        let mut entries = Vec::new();
        collect_json_files(&self.root.join("diffs"), &mut entries);

        let total: u64 = entries.iter().map(|(_, size, _)| *size).sum();
        if total <= self.options.byte_budget {
            return;
        }

        entries.sort_by_key(|(_, _, mtime)| *mtime);
        let mut remaining = total;
        for (path, size, _) in entries {
            if remaining <= self.options.byte_budget {
                break;
            }
            if std::fs::remove_file(&path).is_ok() {
                remaining = remaining.saturating_sub(size);
            }
        }
    }
}

fn collect_json_files(dir: &Path, out: &mut Vec<(PathBuf, u64, SystemTime)>) {
    let Ok(read_dir) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in read_dir.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_json_files(&path, out);
        } else if path.extension().and_then(|e| e.to_str()) == Some("json") {
            if let Ok(meta) = entry.metadata() {
                let mtime = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                out.push((path, meta.len(), mtime));
            }
        }
    }
}

fn now_unix() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

impl DiffCache for FsDiffCache {
    fn get(&self, key: &DiffCacheKey) -> Option<DiffResult> {
        let cache_key = key.key_hash();

        if let Some(entry) = self.memory.get(&cache_key) {
            if &entry.key == key && !self.is_expired(entry.stored_at) {
                return Some(entry.value);
            }
            self.memory.invalidate(&cache_key);
        }

        let path = self.entry_path(key);
        let bytes = std::fs::read(&path).ok()?;
        let entry: CacheEntry = serde_json::from_slice(&bytes).ok()?;
        if &entry.key != key {
            return None;
        }
        if self.is_expired(entry.stored_at) {
            let _ = std::fs::remove_file(&path);
            return None;
        }

        self.memory.insert(cache_key, entry.clone());
        Some(entry.value)
    }

    fn put(&self, key: &DiffCacheKey, value: &DiffResult) -> Result<(), CacheError> {
        let entry = CacheEntry {
            key: key.clone(),
            stored_at: now_unix(),
            value: value.clone(),
        };

        let path = self.entry_path(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CacheError::WriteFailed { detail: e.to_string() })?;
        }

        let lock_path = path.with_extension("lock");
        let lock_file = std::fs::File::create(&lock_path).map_err(|e| CacheError::WriteFailed { detail: e.to_string() })?;
        let mut lock = fd_lock::RwLock::new(lock_file);
        let _guard = lock.write().map_err(|e| CacheError::WriteFailed { detail: e.to_string() })?;

        let json = serde_json::to_vec(&entry).map_err(|e| CacheError::WriteFailed { detail: e.to_string() })?;
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json).map_err(|e| CacheError::WriteFailed { detail: e.to_string() })?;
        std::fs::rename(&tmp_path, &path).map_err(|e| CacheError::WriteFailed { detail: e.to_string() })?;

        self.memory.insert(key.key_hash(), entry);
        self.enforce_byte_budget();
        Ok(())
    }

    fn invalidate_by_prefix(&self, host_id: &str) -> Result<(), CacheError> {
        let dir = self.host_dir(host_id);
        if dir.exists() {
            std::fs::remove_dir_all(&dir).map_err(|e| CacheError::WriteFailed { detail: e.to_string() })?;
        }
        let prefix = host_id.to_string();
        let _ = self.memory.invalidate_entries_if(move |_, entry| entry.key.host_id == prefix);
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        let dir = self.root.join("diffs");
        if dir.exists() {
            std::fs::remove_dir_all(&dir).map_err(|e| CacheError::WriteFailed { detail: e.to_string() })?;
        }
        self.memory.invalidate_all();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftbuster_core::types::diff::DiffStats;

    fn key(host: &str) -> DiffCacheKey {
        DiffCacheKey {
            host_id: host.to_string(),
            config_id: "app/appsettings.json".to_string(),
            root_sig: "root1".to_string(),
            input_hash_before: "a".to_string(),
            input_hash_after: "b".to_string(),
            redactor_fingerprint: "r1".to_string(),
        }
    }

    fn result() -> DiffResult {
        DiffResult {
            canonical_before: "before".to_string(),
            canonical_after: "after".to_string(),
            diff_text: "- before\n+ after\n".to_string(),
            stats: DiffStats {
                added: 1,
                removed: 1,
                changed: 0,
            },
            redactions: Vec::new(),
            masked_flag: false,
            canonicalisation_fallback: false,
        }
    }

    #[test]
    fn put_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FsDiffCache::open(dir.path(), CacheOptions::default());
        let key = key("host-a");
        cache.put(&key, &result()).unwrap();

        let fetched = cache.get(&key).unwrap();
        assert_eq!(fetched.diff_text, "- before\n+ after\n");
    }

    #[test]
    fn get_misses_on_distinct_key_even_with_same_hash_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FsDiffCache::open(dir.path(), CacheOptions::default());
        let key_a = key("host-a");
        cache.put(&key_a, &result()).unwrap();

        let mut key_b = key_a.clone();
        key_b.input_hash_after = "different".to_string();
        assert!(cache.get(&key_b).is_none());
    }

    #[test]
    fn invalidate_by_prefix_drops_only_that_host() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FsDiffCache::open(dir.path(), CacheOptions::default());
        cache.put(&key("host-a"), &result()).unwrap();
        cache.put(&key("host-b"), &result()).unwrap();

        cache.invalidate_by_prefix("host-a").unwrap();
        assert!(cache.get(&key("host-a")).is_none());
        assert!(cache.get(&key("host-b")).is_some());
    }

    #[test]
    fn clear_removes_everything() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FsDiffCache::open(dir.path(), CacheOptions::default());
        cache.put(&key("host-a"), &result()).unwrap();
        cache.clear().unwrap();
        assert!(cache.get(&key("host-a")).is_none());
    }

    #[test]
    fn ttl_expiry_evicts_stale_entries() {
        let dir = tempfile::tempdir().unwrap();
        let options = CacheOptions {
            ttl_secs: Some(0),
            ..CacheOptions::default()
        };
        let cache = FsDiffCache::open(dir.path(), options);
        let key = key("host-a");
        cache.put(&key, &result()).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert!(cache.get(&key).is_none());
    }
}
