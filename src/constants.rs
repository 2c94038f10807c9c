//! Shared crate-wide constants for stagefile.
//!
//! Centralizes magic values used across modules.

/// Literal appended to the base path to form the temp-file template.
/// The trailing `XXXXXX` is instantiated with a unique suffix by `start_write`.
pub const TEMP_FILE_SUFFIX: &str = "_XXXXXX";

/// Placeholder that mkstemp-style instantiation replaces. Must be the tail of `TEMP_FILE_SUFFIX`.
pub const TEMPLATE_PLACEHOLDER: &str = "XXXXXX";

/// Characters used when instantiating the placeholder.
pub const TEMPLATE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Upper bound on name-collision retries while creating the unique temp file.
pub const MKSTEMP_ATTEMPTS: usize = 100;

/// Base paths at least this long are rejected by `get_base_file` before any syscall.
#[allow(clippy::cast_sign_loss)]
pub const PATH_MAX: usize = libc::PATH_MAX as usize;

/// Suffix of the sidecar lock file used by `FileLockManager::for_base`.
pub const LOCK_SUFFIX: &str = ".lock";

/// Poll interval in milliseconds for the file-backed lock manager (see `adapters/lock/file.rs`).
pub const LOCK_POLL_MS: u64 = 25;

/// Default lock timeout used by `Policy::default()`.
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5_000;

/// Subsystem label attached to every emitted fact.
pub const FACTS_SUBSYSTEM: &str = "stagefile";

/// Environment knobs for tests. Overrides are honoured only when
/// `ENV_ALLOW_OVERRIDES` is set to `1`.
pub const ENV_ALLOW_OVERRIDES: &str = "STAGEFILE_TEST_ALLOW_ENV_OVERRIDES";
pub const ENV_FORCE_EXDEV: &str = "STAGEFILE_FORCE_EXDEV";
