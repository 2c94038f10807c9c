//! Persistent identity of an atomic file: committed path, temp path and write-cycle state.
use std::path::{Path, PathBuf};

use crate::constants::TEMP_FILE_SUFFIX;

/// Where the entity is in its write cycle.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum WriteState {
    /// No staged write; `new_file_name` holds the template form.
    #[default]
    Committed,
    /// `start_write` created `temp_path`; it stays recorded until commit or rollback
    /// confirms it is gone.
    WritePending { temp_path: String },
}

impl WriteState {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, WriteState::WritePending { .. })
    }

    #[must_use]
    pub fn temp_path(&self) -> Option<&str> {
        match self {
            WriteState::WritePending { temp_path } => Some(temp_path),
            WriteState::Committed => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtomicFileEntity {
    base_file_name: String,
    new_file_name: String,
    state: WriteState,
}

impl AtomicFileEntity {
    pub fn new(path: impl Into<String>) -> Self {
        let base_file_name = path.into();
        let new_file_name = template_for(&base_file_name);
        Self {
            base_file_name,
            new_file_name,
            state: WriteState::Committed,
        }
    }

    #[must_use]
    pub fn base_file_name(&self) -> &str {
        &self.base_file_name
    }

    /// Template form outside a write cycle, instantiated temp name inside one.
    #[must_use]
    pub fn new_file_name(&self) -> &str {
        &self.new_file_name
    }

    #[must_use]
    pub fn state(&self) -> &WriteState {
        &self.state
    }

    #[must_use]
    pub fn base_path(&self) -> &Path {
        Path::new(&self.base_file_name)
    }

    /// Parent directory of the temp template; a bare file name resolves to `.`.
    #[must_use]
    pub fn temp_parent(&self) -> PathBuf {
        match Path::new(&self.new_file_name).parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    pub(crate) fn begin_write(&mut self, temp_path: String) {
        self.new_file_name.clone_from(&temp_path);
        self.state = WriteState::WritePending { temp_path };
    }

    /// Back to `Committed` with the template restored.
    pub(crate) fn end_write(&mut self) {
        self.new_file_name = template_for(&self.base_file_name);
        self.state = WriteState::Committed;
    }

    pub(crate) fn clear(&mut self) {
        self.base_file_name.clear();
        self.new_file_name.clear();
        self.state = WriteState::Committed;
    }
}

/// `base + "_XXXXXX"`.
#[must_use]
pub fn template_for(base: &str) -> String {
    let mut s = String::with_capacity(base.len() + TEMP_FILE_SUFFIX.len());
    s.push_str(base);
    s.push_str(TEMP_FILE_SUFFIX);
    s
}
