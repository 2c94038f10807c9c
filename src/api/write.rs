use std::path::{Path, PathBuf};

use log::Level;
use serde_json::json;

use super::AtomicFile;
use crate::fs::{
    access_exists, commit_rename, create_unique_from_template, fsync_file, remove_file,
    CommitOutcome, WriteStream,
};
use crate::logging::{AuditSink, FactsEmitter, Stage};
use crate::policy::ExdevPolicy;
use crate::types::errors::{Error, Result};

impl<E: FactsEmitter, A: AuditSink> AtomicFile<E, A> {
    /// Create a fresh, empty temp file next to the base file and return its path.
    ///
    /// The returned path always starts with the base path and never equals it. The caller writes
    /// into it (or use [`start_write_stream`](Self::start_write_stream)) and then calls
    /// [`finish_write`](Self::finish_write) or [`fail_write`](Self::fail_write).
    ///
    /// # Errors
    ///
    /// - `EBUSY` if a write cycle is already open (state and temp file are left alone).
    /// - `EAGAIN` if an installed lock manager times out.
    /// - `ENOENT` if the parent directory is missing or the temp file cannot be created.
    pub fn start_write(&mut self) -> Result<String> {
        let res = self.start_write_inner();
        let details = match &res {
            Ok(temp) => json!({ "temp_path": temp }),
            Err(_) => json!({ "temp_path": self.entity.state().temp_path() }),
        };
        self.record(Stage::StartWrite, &res, details);
        res
    }

    fn start_write_inner(&mut self) -> Result<String> {
        if let Some(temp) = self.entity.state().temp_path() {
            log::error!("Write already in progress, tmp file:{temp}");
            return Err(Error::from_errno(libc::EBUSY));
        }
        let guard = match &self.lock {
            Some(mgr) => Some(mgr.acquire(self.policy.locking.timeout_ms)?),
            None => None,
        };
        let parent = self.entity.temp_parent();
        if let Err(e) = access_exists(&parent) {
            log::error!("Parent directory does not exist, err:{}", e.errno);
            return Err(Error::from_errno(libc::ENOENT));
        }
        let temp = create_unique_from_template(self.entity.new_file_name()).map_err(|e| {
            log::error!("Fail to create tmp file err:{}!", e.errno);
            Error::from_errno(libc::ENOENT)
        })?;
        self.entity.begin_write(temp.clone());
        self.write_lock = guard;
        Ok(temp)
    }

    /// [`start_write`](Self::start_write), then open the temp file for buffered writing.
    ///
    /// If the temp file cannot be opened the cycle stays pending; roll it back with
    /// [`fail_write`](Self::fail_write).
    ///
    /// # Errors
    ///
    /// Errors of `start_write`, or the errno of opening the temp file.
    pub fn start_write_stream(&mut self) -> Result<WriteStream> {
        let temp = self.start_write()?;
        WriteStream::create(Path::new(&temp)).inspect_err(|e| {
            log::error!("Failed to create write stream, err:{}", e.errno);
        })
    }

    /// Commit: rename the temp file over the base file.
    ///
    /// On failure the cycle stays pending with the temp path recorded, so the caller can retry
    /// or roll back.
    ///
    /// # Errors
    ///
    /// - `ENOENT` if no write cycle is open.
    /// - errno of the pre-commit fsync or of the rename; `EXDEV` unless the policy allows the
    ///   copy fallback.
    pub fn finish_write(&mut self) -> Result<()> {
        let res = self.finish_write_inner();
        let details = match &res {
            Ok(out) => json!({ "degraded": out.degraded, "fsync_ms": out.fsync_ms }),
            Err(_) => json!({ "temp_path": self.entity.state().temp_path() }),
        };
        self.record(Stage::FinishWrite, &res, details);
        if let Ok(out) = &res {
            if out.degraded {
                self.audit.log(
                    Level::Warn,
                    &format!("degraded commit (copy fallback) for {}", self.entity.base_file_name()),
                );
            }
        }
        res.map(|_| ())
    }

    fn finish_write_inner(&mut self) -> Result<CommitOutcome> {
        let temp = PathBuf::from(self.pending_temp()?);
        if self.policy.durability.sync_on_commit {
            fsync_file(&temp)?;
        }
        let allow_degraded = self.policy.commit.exdev == ExdevPolicy::CopyFallback;
        let outcome = commit_rename(&temp, self.entity.base_path(), allow_degraded, self.force_exdev)
            .inspect_err(|e| log::error!("Rename failed, err:{}", e.errno))?;
        self.end_cycle();
        Ok(outcome)
    }

    /// Rollback: remove the temp file; the base file is never touched.
    ///
    /// If removal reports `ENOENT` the temp file is already gone, so the cycle is closed but the
    /// error is still returned. Any other failure keeps the cycle pending.
    ///
    /// # Errors
    ///
    /// - `ENOENT` if no write cycle is open or the temp file had vanished.
    /// - errno of the removal.
    pub fn fail_write(&mut self) -> Result<()> {
        // Captured up front: a successful rollback forgets the temp path.
        let details = json!({ "temp_path": self.entity.state().temp_path() });
        let res = self.fail_write_inner();
        self.record(Stage::FailWrite, &res, details);
        res
    }

    fn fail_write_inner(&mut self) -> Result<()> {
        let temp = self.pending_temp()?;
        match remove_file(Path::new(&temp)) {
            Ok(()) => {
                self.end_cycle();
                Ok(())
            }
            Err(e) if e.is(libc::ENOENT) => {
                log::warn!("Tmp file already removed: {temp}");
                self.end_cycle();
                Err(e)
            }
            Err(e) => {
                log::warn!("Failed to remove file, err:{}", e.errno);
                Err(e)
            }
        }
    }

    fn pending_temp(&self) -> Result<String> {
        self.entity
            .state()
            .temp_path()
            .map(str::to_owned)
            .ok_or_else(|| {
                log::error!("No write in progress");
                Error::from_errno(libc::ENOENT)
            })
    }

    /// Back to committed: template restored, write lock released.
    fn end_cycle(&mut self) {
        self.entity.end_write();
        self.write_lock = None;
    }
}
