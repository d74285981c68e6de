// tfup-core/src/env.rs
use std::env;
use std::path::PathBuf;

use tfup_common::error::Result;
use tracing::info;

/// A described change to the process environment: put `dir` on PATH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathUpdate {
    pub dir: PathBuf,
}

/// Capability seam for environment mutation. Machine-wide PATH editing is
/// out of scope for tfup, so the shipped implementation only reports; the
/// seam exists so callers that do own environment mutation can plug in, and
/// so tests can substitute a recording fake.
pub trait EnvMutation: Send + Sync {
    /// Whether the change is already in effect.
    fn verify(&self, change: &PathUpdate) -> bool;

    /// Apply the change (or, for report-only implementations, describe it).
    fn apply(&self, change: &PathUpdate) -> Result<()>;
}

/// Report-only implementation: `verify` inspects the current process PATH,
/// `apply` logs the instruction an operator would follow. Mutates nothing.
pub struct PathHint;

impl EnvMutation for PathHint {
    fn verify(&self, change: &PathUpdate) -> bool {
        env::var_os("PATH")
            .map(|path| env::split_paths(&path).any(|entry| entry == change.dir))
            .unwrap_or(false)
    }

    fn apply(&self, change: &PathUpdate) -> Result<()> {
        info!(
            "Installed outside PATH. Add {} to your PATH to invoke the binary directly.",
            change.dir.display()
        );
        Ok(())
    }
}
