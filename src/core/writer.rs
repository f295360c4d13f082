//! Sink trait for finished records

use super::{entry::Entry, error::Result};

/// Destination for finished entries.
///
/// `write_entry` receives the complete wire record (see [`Entry::bytes`]),
/// already terminated by `}\n`, and reports how many bytes it wrote. The
/// record's buffer goes back to the pool as soon as the call returns, so an
/// implementation must copy anything it wants to keep.
pub trait Writer: Send + Sync {
    fn write_entry(&self, entry: &Entry<'_>) -> Result<usize>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

impl<W: Writer + ?Sized> Writer for std::sync::Arc<W> {
    fn write_entry(&self, entry: &Entry<'_>) -> Result<usize> {
        (**self).write_entry(entry)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
