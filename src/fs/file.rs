//! `FsFile`: an open descriptor paired with the path it was resolved from.
use std::fs::File;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::types::errors::{Error, Result};

#[derive(Debug)]
pub struct FsFile {
    file: File,
    path: PathBuf,
}

impl FsFile {
    #[must_use]
    pub fn new(fd: OwnedFd, path: PathBuf) -> Self {
        Self {
            file: File::from(fd),
            path,
        }
    }

    /// Raw descriptor number, for handing to a binding layer. Ownership stays with `self`.
    #[must_use]
    pub fn fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.path.file_name().and_then(|s| s.to_str())
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// Block until an advisory lock is held.
    ///
    /// # Errors
    ///
    /// Propagates the errno reported by `flock`.
    pub fn lock(&self, exclusive: bool) -> Result<()> {
        let res = if exclusive {
            FileExt::lock_exclusive(&self.file)
        } else {
            FileExt::lock_shared(&self.file)
        };
        res.map_err(Error::from)
    }

    /// Non-blocking variant of [`FsFile::lock`].
    ///
    /// # Errors
    ///
    /// `EAGAIN`/`EWOULDBLOCK` when another holder has a conflicting lock.
    pub fn try_lock(&self, exclusive: bool) -> Result<()> {
        let res = if exclusive {
            FileExt::try_lock_exclusive(&self.file)
        } else {
            FileExt::try_lock_shared(&self.file)
        };
        res.map_err(Error::from)
    }

    /// # Errors
    ///
    /// Propagates the errno reported by `flock`.
    pub fn unlock(&self) -> Result<()> {
        FileExt::unlock(&self.file).map_err(Error::from)
    }

    #[must_use]
    pub fn as_file(&self) -> &File {
        &self.file
    }

    #[must_use]
    pub fn into_file(self) -> File {
        self.file
    }
}

impl AsFd for FsFile {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}
