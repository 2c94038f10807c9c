#![forbid(unsafe_code)]
//! stagefile: atomic file updates for the file I/O module.
//!
//! An [`AtomicFile`] stages writes in a uniquely named temp file next to the base file and
//! either commits them with a rename over the base file or rolls them back by removing the
//! temp file. Readers of the base path never observe a partial update.
//!
//! ```no_run
//! use std::io::Write;
//! use stagefile::AtomicFile;
//!
//! # fn main() -> Result<(), stagefile::types::Error> {
//! let mut file = AtomicFile::new("/data/settings.json")?;
//! let mut stream = file.start_write_stream()?;
//! if stream.write_all(b"{}").is_ok() && stream.close().is_ok() {
//!     file.finish_write()?;
//! } else {
//!     file.fail_write()?;
//! }
//! let bytes = file.read_fully()?;
//! # let _ = bytes;
//! # Ok(())
//! # }
//! ```
//!
//! Syscalls go through `rustix`; this crate forbids `unsafe`.

pub mod adapters;
pub mod api;
pub mod constants;
pub mod fs;
pub mod logging;
pub mod policy;
pub mod types;

pub use api::*;
