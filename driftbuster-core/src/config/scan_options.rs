//! Detector Orchestrator configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SAMPLE_SIZE, MAX_SAMPLE_SIZE, MIN_SAMPLE_SIZE};
use crate::errors::ConfigError;

/// Configuration for one detector orchestrator scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanOptions {
    /// Maximum bytes read per file before clamping.
    pub sample_size: usize,
    /// Glob filter applied during the walk; `None` matches everything.
    pub glob: Option<String>,
    /// Follow symbolic links during the walk.
    pub follow_symlinks: bool,
    /// Additional ignore patterns beyond `.gitignore`/`.driftignore`.
    pub extra_ignore: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            glob: None,
            follow_symlinks: false,
            extra_ignore: Vec::new(),
        }
    }
}

impl ScanOptions {
    /// Validate and clamp `sample_size` into `[MIN_SAMPLE_SIZE,
    /// MAX_SAMPLE_SIZE]`, recording whether a clamp occurred. A
    /// `sample_size` of zero clamps to the minimum of 512 bytes.
    pub fn effective_sample_size(&self) -> (usize, bool) {
        let clamped = self.sample_size.clamp(MIN_SAMPLE_SIZE, MAX_SAMPLE_SIZE);
        (clamped, clamped != self.sample_size)
    }

    /// Fail fast at configuration time if the glob is malformed, the same
    /// way invalid sample sizes fail fast — the glob is the other
    /// configuration-time input to a scan.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(pattern) = &self.glob {
            glob::Pattern::new(pattern).map_err(|_| ConfigError::MalformedGlob {
                pattern: pattern.clone(),
            })?;
        }
        Ok(())
    }
}
