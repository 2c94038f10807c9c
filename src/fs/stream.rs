//! Buffered streams over the committed file (`open_read`) and the staged temp file
//! (`start_write_stream`).
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::types::errors::{Error, Result};

#[derive(Debug)]
pub struct ReadStream {
    reader: BufReader<File>,
    path: PathBuf,
}

impl ReadStream {
    pub(crate) fn new(file: File, path: PathBuf) -> Self {
        Self {
            reader: BufReader::new(file),
            path,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Read for ReadStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for ReadStream {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt);
    }
}

/// Writer over the staged temp file. Nothing becomes visible under the base name until
/// `finish_write` commits.
#[derive(Debug)]
pub struct WriteStream {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl WriteStream {
    /// Open `path` for writing, truncating whatever is there.
    ///
    /// # Errors
    ///
    /// Propagates the errno reported by `open`.
    pub(crate) fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(Error::from)?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush buffered bytes and close the descriptor.
    ///
    /// # Errors
    ///
    /// Propagates the errno of the final flush.
    pub fn close(mut self) -> Result<()> {
        self.writer.flush().map_err(Error::from)
    }
}

impl Write for WriteStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
