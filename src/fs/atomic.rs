//! Commit primitives: rename the staged temp file over the base file inside their shared
//! parent directory, then fsync the directory.
//!
//! Sequence: `open_parent_dir(base) -> renameat(tmp, base) -> fsync(dirfd)`.
//!
//! Test override knobs:
//! - `STAGEFILE_FORCE_EXDEV=1` (honoured only with `STAGEFILE_TEST_ALLOW_ENV_OVERRIDES=1`)
//!   simulates a cross-filesystem rename error to exercise the copy fallback.
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::time::Instant;

use rustix::fd::OwnedFd;
use rustix::fs::{openat, renameat, Mode, OFlags, CWD};
use rustix::io::Errno;

use crate::constants::{ENV_ALLOW_OVERRIDES, ENV_FORCE_EXDEV};
use crate::types::errors::{Error, Result};

/// Result of a successful commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommitOutcome {
    /// True when the EXDEV copy fallback was used instead of an atomic rename.
    pub degraded: bool,
    pub fsync_ms: u64,
}

fn parent_of(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Open a directory with `O_DIRECTORY` for `*at` operations.
///
/// Symlinked parents are followed, matching plain `rename(2)` on the full paths.
///
/// # Errors
///
/// Returns the errno if the directory cannot be opened.
pub fn open_dir(dir: &Path) -> Result<OwnedFd> {
    openat(
        CWD,
        dir,
        OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC,
        Mode::empty(),
    )
    .map_err(Error::from)
}

/// Flush a staged file's data to disk before it is made visible.
///
/// # Errors
///
/// Returns the errno if the file cannot be opened or synced.
pub fn fsync_file(path: &Path) -> Result<()> {
    let f = fs::File::open(path)?;
    f.sync_all()?;
    Ok(())
}

fn env_forces_exdev() -> bool {
    std::env::var_os(ENV_ALLOW_OVERRIDES) == Some(OsString::from("1"))
        && std::env::var_os(ENV_FORCE_EXDEV) == Some(OsString::from("1"))
}

/// Replace `base` with `temp`.
///
/// Both paths must share a parent directory (the temp name is derived from the base name).
/// With `allow_degraded`, an `EXDEV` rename falls back to copying the staged bytes over the
/// base file and removing the temp file; that path is not atomic and is reported via
/// `CommitOutcome::degraded`.
///
/// # Errors
///
/// Returns the rename errno (including `EXDEV` when the fallback is not allowed), or the
/// errno of the fallback copy/remove.
pub fn commit_rename(
    temp: &Path,
    base: &Path,
    allow_degraded: bool,
    force_exdev: Option<bool>,
) -> Result<CommitOutcome> {
    let temp_name = temp
        .file_name()
        .ok_or_else(|| Error::from_errno(libc::EINVAL))?;
    let base_name = base
        .file_name()
        .ok_or_else(|| Error::from_errno(libc::EINVAL))?;
    let dirfd = open_dir(parent_of(base))?;

    let t0 = Instant::now();
    // An injected EXDEV must leave both files untouched, so it replaces the rename outright.
    let inject_exdev = force_exdev.unwrap_or_else(env_forces_exdev);
    let rename_res = if inject_exdev {
        Err(Errno::XDEV)
    } else {
        renameat(&dirfd, temp_name, &dirfd, base_name)
    };
    match rename_res {
        Ok(()) => {
            let _ = rustix::fs::fsync(&dirfd);
            Ok(CommitOutcome {
                degraded: false,
                fsync_ms: elapsed_ms(t0),
            })
        }
        Err(e) if e == Errno::XDEV && allow_degraded => {
            log::warn!("cross-device rename, falling back to copy for {}", base.display());
            fs::copy(temp, base)?;
            fsync_file(base)?;
            fs::remove_file(temp)?;
            let _ = rustix::fs::fsync(&dirfd);
            Ok(CommitOutcome {
                degraded: true,
                fsync_ms: elapsed_ms(t0),
            })
        }
        Err(e) => Err(e.into()),
    }
}

fn elapsed_ms(t0: Instant) -> u64 {
    u64::try_from(t0.elapsed().as_millis()).unwrap_or(u64::MAX)
}
