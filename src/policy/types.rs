use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LOCK_TIMEOUT_MS;

/// What `finish_write` does when the commit rename reports `EXDEV`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExdevPolicy {
    /// Propagate `EXDEV`; the staged file stays pending.
    #[default]
    Fail,
    /// Copy the staged bytes over the base file and remove the temp file. Not atomic.
    ///
    /// The copy writes into the base file in place: a failed copy can leave it truncated or
    /// partially written, and a failed temp removal is reported after the base was replaced.
    CopyFallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Durability {
    /// fsync the staged file before the rename. The parent directory is fsynced after every
    /// rename regardless of this flag.
    pub sync_on_commit: bool,
}

impl Default for Durability {
    fn default() -> Self {
        Self { sync_on_commit: true }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitFlow {
    pub exdev: ExdevPolicy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Locking {
    /// How long `start_write` waits for an installed `LockManager`.
    pub timeout_ms: u64,
}

impl Default for Locking {
    fn default() -> Self {
        Self { timeout_ms: DEFAULT_LOCK_TIMEOUT_MS }
    }
}
