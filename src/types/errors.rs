//! Error taxonomy shared by every stagefile operation.
//!
//! Native errno values are translated into a stable `(code, message)` pair. The code is the
//! file I/O module capability tag plus a per-errno suffix, so callers at the binding edge can
//! surface the same numbers regardless of platform errno values.
use thiserror::Error;

/// Capability tag of the file I/O module; every code is `FILEIO_SYS_CAP_TAG + suffix`.
pub const FILEIO_SYS_CAP_TAG: i32 = 13_900_000;

/// Pseudo-errno for failures that have no native errno.
pub const UNKNOWN_ERR: i32 = -1;

const UNKNOWN_SUFFIX: i32 = 42;
const UNKNOWN_MESSAGE: &str = "Unknown error";

// (errno, code suffix, message)
const ERRNO_TABLE: &[(i32, i32, &str)] = &[
    (libc::EPERM, 1, "Operation not permitted"),
    (libc::ENOENT, 2, "No such file or directory"),
    (libc::ESRCH, 3, "No such process"),
    (libc::EINTR, 4, "Interrupted system call"),
    (libc::EIO, 5, "I/O error"),
    (libc::ENXIO, 6, "No such device or address"),
    (libc::E2BIG, 7, "Arg list too long"),
    (libc::EBADF, 8, "Bad file descriptor"),
    (libc::ECHILD, 9, "No child processes"),
    (libc::EAGAIN, 10, "Try again"),
    (libc::ENOMEM, 11, "Out of memory"),
    (libc::EACCES, 12, "Permission denied"),
    (libc::EFAULT, 13, "Bad address"),
    (libc::EBUSY, 14, "Device or resource busy"),
    (libc::EEXIST, 15, "File exists"),
    (libc::EXDEV, 16, "Cross-device link"),
    (libc::ENODEV, 17, "No such device"),
    (libc::ENOTDIR, 18, "Not a directory"),
    (libc::EISDIR, 19, "Is a directory"),
    (libc::EINVAL, 20, "Invalid argument"),
    (libc::ENFILE, 21, "File table overflow"),
    (libc::EMFILE, 22, "Too many open files"),
    (libc::ETXTBSY, 23, "Text file busy"),
    (libc::EFBIG, 24, "File too large"),
    (libc::ENOSPC, 25, "No space left on device"),
    (libc::ESPIPE, 26, "Illegal seek"),
    (libc::EROFS, 27, "Read-only file system"),
    (libc::EMLINK, 28, "Too many links"),
    (libc::EDEADLK, 29, "Resource deadlock would occur"),
    (libc::ENAMETOOLONG, 30, "File name too long"),
    (libc::ENOSYS, 31, "Function not implemented"),
    (libc::ENOTEMPTY, 32, "Directory not empty"),
    (libc::ELOOP, 33, "Too many symbolic links encountered"),
    (libc::ENODATA, 37, "No data available"),
    (libc::EOVERFLOW, 38, "Value too large for defined data type"),
    (libc::EDQUOT, 41, "Quota exceeded"),
];

/// Structured error carrying the native errno and its translated `(code, message)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{message} (errno {errno}, code {code})")]
pub struct Error {
    pub errno: i32,
    pub code: i32,
    pub message: &'static str,
}

impl Error {
    /// Translate a native errno through the shared table.
    /// Unlisted values map to the unknown-error entry but keep their errno.
    #[must_use]
    pub fn from_errno(errno: i32) -> Self {
        ERRNO_TABLE
            .iter()
            .find(|(e, _, _)| *e == errno)
            .map_or(
                Self {
                    errno,
                    code: FILEIO_SYS_CAP_TAG + UNKNOWN_SUFFIX,
                    message: UNKNOWN_MESSAGE,
                },
                |&(errno, suffix, message)| Self {
                    errno,
                    code: FILEIO_SYS_CAP_TAG + suffix,
                    message,
                },
            )
    }

    #[must_use]
    pub fn unknown() -> Self {
        Self::from_errno(UNKNOWN_ERR)
    }

    /// True when this error was produced from `errno`.
    #[must_use]
    pub const fn is(&self, errno: i32) -> bool {
        self.errno == errno
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        e.raw_os_error().map_or_else(Self::unknown, Self::from_errno)
    }
}

impl From<rustix::io::Errno> for Error {
    fn from(e: rustix::io::Errno) -> Self {
        Self::from_errno(e.raw_os_error())
    }
}

/// Convenient alias for results returning a `types::Error`.
pub type Result<T> = std::result::Result<T, Error>;
