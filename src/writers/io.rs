//! Raw record writer over any byte stream

use crate::core::{Entry, LoggerError, Result, Writer};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes each record's bytes unchanged to an [`io::Write`] stream.
///
/// Records are written whole under a lock, so lines from concurrent
/// loggers never interleave.
pub struct IoWriter<W> {
    out: Mutex<W>,
    name: &'static str,
}

impl<W: Write + Send> IoWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            name: "io",
        }
    }

    /// Run `f` with exclusive access to the underlying stream.
    pub fn with_inner<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.out.lock())
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl IoWriter<io::Stderr> {
    pub fn stderr() -> Self {
        Self {
            out: Mutex::new(io::stderr()),
            name: "stderr",
        }
    }
}

impl IoWriter<io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: Mutex::new(io::stdout()),
            name: "stdout",
        }
    }
}

impl IoWriter<BufWriter<File>> {
    /// Append records to the file at `path`, creating it if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::io_operation("opening log file", path.display().to_string(), e)
            })?;

        Ok(Self {
            out: Mutex::new(BufWriter::new(file)),
            name: "file",
        })
    }
}

impl<W: Write + Send> Writer for IoWriter<W> {
    fn write_entry(&self, entry: &Entry<'_>) -> Result<usize> {
        let bytes = entry.bytes();
        self.out
            .lock()
            .write_all(bytes)
            .map_err(|e| LoggerError::io_operation("writing", self.name, e))?;
        Ok(bytes.len())
    }

    fn flush(&self) -> Result<()> {
        self.out
            .lock()
            .flush()
            .map_err(|e| LoggerError::io_operation("flushing", self.name, e))
    }

    fn name(&self) -> &str {
        self.name
    }
}
