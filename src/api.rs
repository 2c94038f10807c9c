// Facade for API module; delegates to submodules under src/api/

use log::Level;
use serde_json::Value;

use crate::adapters::{LockGuard, LockManager};
use crate::logging::{AuditSink, EventBuilder, FactsEmitter, JsonlSink, Stage};
use crate::policy::Policy;
use crate::types::entity::AtomicFileEntity;
use crate::types::errors::Result;

#[path = "api/delete.rs"]
mod delete;
#[path = "api/read.rs"]
mod read;
#[path = "api/write.rs"]
mod write;

/// A file whose updates become visible all at once.
///
/// Writes are staged in a temp file created by [`start_write`](Self::start_write) and made
/// visible by [`finish_write`](Self::finish_write) (rename over the base file) or discarded by
/// [`fail_write`](Self::fail_write). Only one write cycle may be open per instance; a second
/// `start_write` fails with `EBUSY` instead of abandoning the first temp file.
///
/// Two instances over the same base path are not coordinated unless a [`LockManager`] is
/// installed with [`with_lock_manager`](Self::with_lock_manager).
pub struct AtomicFile<E: FactsEmitter = JsonlSink, A: AuditSink = JsonlSink> {
    entity: AtomicFileEntity,
    facts: E,
    audit: A,
    policy: Policy,
    lock: Option<Box<dyn LockManager>>,
    write_lock: Option<Box<dyn LockGuard>>, // held while a write cycle is open
    force_exdev: Option<bool>,
}

impl AtomicFile {
    /// Bind to `path`. No filesystem access happens here; the base file need not exist.
    ///
    /// # Errors
    ///
    /// Kept fallible for the binding contract (`ENOMEM` there); allocation failure aborts in Rust.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        Ok(Self::with_emitters(path, JsonlSink, JsonlSink))
    }
}

impl<E: FactsEmitter, A: AuditSink> AtomicFile<E, A> {
    pub fn with_emitters(path: impl Into<String>, facts: E, audit: A) -> Self {
        Self {
            entity: AtomicFileEntity::new(path),
            facts,
            audit,
            policy: Policy::default(),
            lock: None,
            write_lock: None,
            force_exdev: None,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_lock_manager(mut self, lock: Box<dyn LockManager>) -> Self {
        self.lock = Some(lock);
        self
    }

    /// Test knob: make the commit rename report `EXDEV` (`Some(true)`), never (`Some(false)`),
    /// or defer to the environment override (`None`).
    #[doc(hidden)]
    #[must_use]
    pub fn with_forced_exdev(mut self, force: Option<bool>) -> Self {
        self.force_exdev = force;
        self
    }

    /// The base path, verbatim. Empty after a successful [`delete`](Self::delete).
    #[must_use]
    pub fn get_path(&self) -> &str {
        self.entity.base_file_name()
    }

    #[must_use]
    pub fn entity(&self) -> &AtomicFileEntity {
        &self.entity
    }

    #[must_use]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    #[must_use]
    pub fn is_write_pending(&self) -> bool {
        self.entity.state().is_pending()
    }

    /// Emit the fact for `stage` and mirror failures to the audit sink.
    fn record<T>(&self, stage: Stage, res: &Result<T>, extra: Value) {
        self.record_at(stage, self.entity.base_file_name(), res, extra);
    }

    /// [`record`](Self::record) for a base path captured before the entity changed.
    fn record_at<T>(&self, stage: Stage, path: &str, res: &Result<T>, extra: Value) {
        let ev = EventBuilder::new(&self.facts, stage)
            .path(path)
            .field("details", extra);
        match res {
            Ok(_) => ev.emit_success(),
            Err(e) => {
                self.audit.log(
                    Level::Warn,
                    &format!("{} failed for {path}: {e}", stage.as_event()),
                );
                ev.error(e).emit_failure();
            }
        }
    }
}

impl<E: FactsEmitter, A: AuditSink> std::fmt::Debug for AtomicFile<E, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicFile")
            .field("entity", &self.entity)
            .field("policy", &self.policy)
            .field("locked", &self.write_lock.is_some())
            .finish_non_exhaustive()
    }
}
