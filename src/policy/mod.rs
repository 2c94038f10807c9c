//! Policy configuration for atomic-file commits.
//!
//! Consumers construct a [`Policy`](crate::policy::Policy) via `Default` or a preset
//! (`durable_preset`, `relaxed_preset`) and customize fields before handing it to
//! [`AtomicFile::with_policy`](crate::AtomicFile::with_policy). The struct also deserializes
//! from JSON with missing fields taking their defaults.
//!
//! Submodules:
//! - `config`: policy struct and presets
//! - `types`: grouped knobs

pub mod config;
pub mod types;

pub use config::Policy;
pub use types::{CommitFlow, Durability, ExdevPolicy, Locking};
