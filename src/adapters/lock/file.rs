use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use crate::constants::{LOCK_POLL_MS, LOCK_SUFFIX};
use crate::types::errors::{Error, Result};
use fs2::FileExt;

use super::{LockGuard, LockManager};

/// Advisory `flock` on a sidecar file, shared by every process that agrees on the path.
#[derive(Debug)]
pub struct FileLockManager {
    path: PathBuf,
}

impl FileLockManager {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Lock on `<base>.lock` next to the committed file.
    #[must_use]
    pub fn for_base(base: &Path) -> Self {
        let mut p = base.as_os_str().to_os_string();
        p.push(LOCK_SUFFIX);
        Self::new(PathBuf::from(p))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

struct FileGuard {
    file: File,
}

impl Drop for FileGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

impl LockGuard for FileGuard {}

/// Only a held conflicting lock is worth waiting for.
fn is_contention(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::WouldBlock
}

impl LockManager for FileLockManager {
    fn acquire(&self, timeout_ms: u64) -> Result<Box<dyn LockGuard>> {
        let t0 = Instant::now();
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&self.path)
            .map_err(Error::from)?;
        loop {
            match FileExt::try_lock_exclusive(&file) {
                Ok(()) => return Ok(Box::new(FileGuard { file })),
                Err(e) if !is_contention(&e) => {
                    log::error!("flock failed on {}: {e}", self.path.display());
                    return Err(e.into());
                }
                Err(_) => {
                    if t0.elapsed() >= Duration::from_millis(timeout_ms) {
                        log::warn!("timeout acquiring write lock {}", self.path.display());
                        return Err(Error::from_errno(libc::EAGAIN));
                    }
                    thread::sleep(Duration::from_millis(LOCK_POLL_MS));
                }
            }
        }
    }
}
