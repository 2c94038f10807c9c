use serde::{Deserialize, Serialize};

use super::types::{CommitFlow, Durability, ExdevPolicy, Locking};
use crate::types::errors::{Error, Result};

/// Policy governs commit durability, cross-device behaviour and lock waits for an `AtomicFile`.
///
/// Grouped fields provide clearer ownership and ergonomics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub durability: Durability,
    pub commit: CommitFlow,
    pub locking: Locking,
}

impl Policy {
    /// Construct a Policy with every durability knob on and EXDEV treated as a hard failure.
    ///
    /// Equal to `Policy::default()`.
    ///
    /// # Example
    /// ```rust
    /// use stagefile::policy::{ExdevPolicy, Policy};
    ///
    /// let policy = Policy::durable_preset();
    /// assert!(policy.durability.sync_on_commit);
    /// assert_eq!(policy.commit.exdev, ExdevPolicy::Fail);
    /// ```
    #[must_use]
    pub fn durable_preset() -> Self {
        let mut p = Self::default();
        p.durability.sync_on_commit = true;
        p.commit.exdev = ExdevPolicy::Fail;
        p
    }

    /// Construct a Policy for scratch data: no fsync, and EXDEV degrades to copy + remove.
    #[must_use]
    pub fn relaxed_preset() -> Self {
        let mut p = Self::default();
        p.durability.sync_on_commit = false;
        p.commit.exdev = ExdevPolicy::CopyFallback;
        p
    }

    /// Parse a policy from JSON; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// `EINVAL` when the document does not match the policy schema.
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| {
            log::error!("invalid policy document: {e}");
            Error::from_errno(libc::EINVAL)
        })
    }
}
