//! Unique temp-file creation from a `..._XXXXXX` template (POSIX `mkstemp` semantics).
use rustix::fs::{open, Mode, OFlags};
use rustix::io::Errno;
use uuid::Uuid;

use crate::constants::{MKSTEMP_ATTEMPTS, TEMPLATE_CHARSET, TEMPLATE_PLACEHOLDER};
use crate::types::errors::{Error, Result};

fn unique_suffix() -> String {
    Uuid::new_v4()
        .as_bytes()
        .iter()
        .take(TEMPLATE_PLACEHOLDER.len())
        .map(|b| char::from(TEMPLATE_CHARSET[usize::from(*b) % TEMPLATE_CHARSET.len()]))
        .collect()
}

/// Instantiate `template` by replacing its trailing `XXXXXX` and atomically create the file
/// (`O_CREAT | O_EXCL`, mode 0600). The descriptor is closed before returning; only the
/// instantiated name is handed back.
///
/// # Errors
///
/// `EINVAL` if the template lacks the placeholder, `EEXIST` if every attempt collided, or the
/// errno reported by `open`.
pub fn create_unique_from_template(template: &str) -> Result<String> {
    let prefix = template
        .strip_suffix(TEMPLATE_PLACEHOLDER)
        .ok_or_else(|| Error::from_errno(libc::EINVAL))?;
    for _ in 0..MKSTEMP_ATTEMPTS {
        let candidate = format!("{prefix}{}", unique_suffix());
        match open(
            candidate.as_str(),
            OFlags::CREATE | OFlags::EXCL | OFlags::RDWR | OFlags::CLOEXEC,
            Mode::RUSR | Mode::WUSR,
        ) {
            Ok(fd) => {
                drop(fd);
                return Ok(candidate);
            }
            Err(e) if e == Errno::EXIST => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(Error::from_errno(libc::EEXIST))
}
