//! Capability hook for serializing write cycles across `AtomicFile` instances.
//!
//! A guard is taken by `start_write` and held until the cycle ends in commit, rollback or
//! delete. Without a manager, callers own cross-instance ordering.
pub mod file;

use crate::types::errors::Result;

pub trait LockGuard: Send {}

pub trait LockManager: Send + Sync {
    /// Acquire the write lock with the specified timeout.
    /// # Errors
    /// Returns `EAGAIN` if the lock cannot be acquired within the timeout period.
    fn acquire(&self, timeout_ms: u64) -> Result<Box<dyn LockGuard>>;
}
