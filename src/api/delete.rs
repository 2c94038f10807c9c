use std::path::Path;

use serde_json::json;

use super::AtomicFile;
use crate::fs::{path_exists, remove_file};
use crate::logging::{AuditSink, FactsEmitter, Stage};
use crate::types::errors::{Error, Result};

impl<E: FactsEmitter, A: AuditSink> AtomicFile<E, A> {
    /// Remove the temp file (if present) and the base file (if present).
    ///
    /// An open write cycle is discarded. On success both names are cleared to empty strings; on
    /// failure the entity is left as it was so the call can be repeated.
    ///
    /// # Errors
    ///
    /// errno of the last failed lookup or removal.
    pub fn delete(&mut self) -> Result<()> {
        // Captured up front: success clears both names before the fact is emitted.
        let base = self.entity.base_file_name().to_owned();
        let details = json!({
            "base_path": base,
            "temp_path": self.entity.new_file_name(),
        });
        let res = self.delete_inner();
        self.record_at(Stage::Delete, &base, &res, details);
        res
    }

    fn delete_inner(&mut self) -> Result<()> {
        let mut failure: Option<Error> = None;
        for target in [self.entity.new_file_name(), self.entity.base_file_name()] {
            let p = Path::new(target);
            let removed = path_exists(p).and_then(|exists| if exists { remove_file(p) } else { Ok(()) });
            if let Err(e) = removed {
                log::error!("Failed to remove file {target}, err:{}", e.errno);
                failure = Some(e);
            }
        }
        if let Some(e) = failure {
            return Err(e);
        }
        self.entity.clear();
        self.write_lock = None;
        Ok(())
    }
}
