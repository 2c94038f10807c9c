//! Low-level filesystem primitives used by the atomic-file core.
//!
//! Every helper returns `types::Error` so errno values reach the caller unchanged through the
//! shared table.
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use rustix::fd::OwnedFd;
use rustix::fs::{access, fstat, open, Access, Mode, OFlags};

use crate::types::errors::{Error, Result};

/// Resolve `path` to an absolute, symlink-free path (`realpath` semantics).
///
/// # Errors
///
/// Propagates the errno reported by the resolution (e.g. `ENOENT`).
pub fn realpath(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(Error::from)
}

/// Open `path` read-only with `O_CLOEXEC`.
///
/// # Errors
///
/// Propagates the errno reported by `open`.
pub fn open_read_only(path: &Path) -> Result<OwnedFd> {
    open(path, OFlags::RDONLY | OFlags::CLOEXEC, Mode::empty()).map_err(Error::from)
}

/// Size in bytes reported by `fstat`.
///
/// # Errors
///
/// Propagates the errno reported by `fstat`.
pub fn fstat_size(fd: &OwnedFd) -> Result<i64> {
    let st = fstat(fd)?;
    Ok(i64::from(st.st_size))
}

/// Check that `path` exists (`access(F_OK)`).
///
/// # Errors
///
/// Propagates the errno reported by `access`.
pub fn access_exists(path: &Path) -> Result<()> {
    access(path, Access::EXISTS).map_err(Error::from)
}

/// Whether anything (including a dangling symlink) is present at `path`.
///
/// # Errors
///
/// Any lookup failure other than `ENOENT` or `ENOTDIR` (a non-directory path component).
pub fn path_exists(path: &Path) -> Result<bool> {
    match std::fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound || e.raw_os_error() == Some(libc::ENOTDIR) => {
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Remove the file at `path`.
///
/// # Errors
///
/// Propagates the errno reported by `unlink`.
pub fn remove_file(path: &Path) -> Result<()> {
    std::fs::remove_file(path).map_err(Error::from)
}

/// Read up to `size` bytes from `file` into an exactly-sized buffer.
///
/// Hitting EOF early is a clean short read and the buffer is truncated; any read error is `EIO`.
///
/// # Errors
///
/// `ENOMEM` if the buffer cannot be reserved, `EIO` on read failure.
pub fn read_sized(file: &mut File, size: usize) -> Result<Vec<u8>> {
    let mut buf: Vec<u8> = Vec::new();
    buf.try_reserve_exact(size)
        .map_err(|_| Error::from_errno(libc::ENOMEM))?;
    buf.resize(size, 0);
    let mut filled = 0usize;
    while filled < size {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => {
                log::error!("Failed to read file, actual length is:{filled}, fileSize:{size}: {e}");
                return Err(Error::from_errno(libc::EIO));
            }
        }
    }
    buf.truncate(filled);
    Ok(buf)
}
