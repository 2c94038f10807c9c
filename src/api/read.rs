use std::fs::File;
use std::path::Path;

use serde_json::json;

use super::AtomicFile;
use crate::constants::PATH_MAX;
use crate::fs::{fstat_size, open_read_only, read_sized, realpath, FsFile, ReadStream};
use crate::logging::{AuditSink, FactsEmitter, Stage};
use crate::types::buffer::BufferData;
use crate::types::errors::{Error, Result};

impl<E: FactsEmitter, A: AuditSink> AtomicFile<E, A> {
    /// Open the committed file read-only.
    ///
    /// # Errors
    ///
    /// `EPERM` when the base path is `PATH_MAX` bytes or longer (checked before any syscall);
    /// otherwise the errno of `realpath` or `open`.
    pub fn get_base_file(&self) -> Result<FsFile> {
        let res = self.get_base_file_inner();
        self.record(Stage::Read, &res, json!({ "op": "get_base_file" }));
        res
    }

    fn get_base_file_inner(&self) -> Result<FsFile> {
        let base = self.entity.base_file_name();
        if base.len() >= PATH_MAX {
            log::error!("Base file name is too long");
            return Err(Error::from_errno(libc::EPERM));
        }
        let resolved = resolve(base)?;
        let fd = open_read_only(&resolved).inspect_err(|e| {
            log::error!("Failed to open file, err:{}", e.errno);
        })?;
        Ok(FsFile::new(fd, resolved))
    }

    /// Read the whole committed file into an owned buffer.
    ///
    /// # Errors
    ///
    /// errno of `realpath`/`open`/`fstat`; `EIO` for an empty file or a failed read;
    /// `ENOMEM` if the buffer cannot be reserved.
    pub fn read_fully(&self) -> Result<BufferData> {
        let res = self.read_fully_inner();
        let details = match &res {
            Ok(buf) => json!({ "op": "read_fully", "length": buf.len() }),
            Err(_) => json!({ "op": "read_fully" }),
        };
        self.record(Stage::Read, &res, details);
        res
    }

    fn read_fully_inner(&self) -> Result<BufferData> {
        let resolved = resolve(self.entity.base_file_name())?;
        let fd = open_read_only(&resolved).inspect_err(|e| {
            log::error!("Failed to open file, err:{}", e.errno);
        })?;
        let size = fstat_size(&fd).inspect_err(|e| {
            log::error!("Failed to get file stats, err:{}", e.errno);
        })?;
        if size <= 0 {
            log::error!("Invalid file size");
            return Err(Error::from_errno(libc::EIO));
        }
        let size = usize::try_from(size).map_err(|_| Error::from_errno(libc::ENOMEM))?;
        let mut file = File::from(fd);
        let buf = read_sized(&mut file, size)?;
        Ok(BufferData::new(buf))
    }

    /// Buffered reader over the committed file.
    ///
    /// # Errors
    ///
    /// errno of `realpath` or `open`.
    pub fn open_read(&self) -> Result<ReadStream> {
        let res = resolve(self.entity.base_file_name()).and_then(|resolved| {
            let fd = open_read_only(&resolved)?;
            Ok(ReadStream::new(File::from(fd), resolved))
        });
        self.record(Stage::Read, &res, json!({ "op": "open_read" }));
        res
    }
}

fn resolve(base: &str) -> Result<std::path::PathBuf> {
    realpath(Path::new(base)).inspect_err(|e| {
        log::error!("Failed to resolve real path, err:{}", e.errno);
    })
}
