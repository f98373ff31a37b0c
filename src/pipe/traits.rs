/*!
 * Pipe Traits
 * The contract every pipe variant satisfies
 */

use super::handles::{PipelineReader, PipelineWriter};
use super::types::{Capabilities, Capacity, PipeKind, PipeResult, PipeStats};
use crate::core::types::{Line, Size};
use serde_json::Value;
use std::sync::Arc;

/// Read side of a pipe, shared by the pipe and its reader handle
pub(crate) trait ReadEnd: Send + Sync {
    /// Fail with `Closed` if reads are no longer accepted
    fn ensure_readable(&self) -> PipeResult<()>;

    /// Blocking read of one line; `None` at end-of-input
    fn read(&self) -> PipeResult<Option<Line>>;

    /// Return up to `max` lines without waiting
    fn non_blocking_read(&self, max: Size) -> PipeResult<Vec<Line>>;

    /// Next line without consuming it
    fn peek(&self) -> PipeResult<Option<Line>>;

    fn read_n(&self, count: Size) -> PipeResult<Vec<Line>> {
        self.ensure_readable()?;
        let mut lines = Vec::with_capacity(count.min(64));
        while lines.len() < count {
            match self.read()? {
                Some(line) => lines.push(line),
                None => break,
            }
        }
        Ok(lines)
    }

    fn read_to_end(&self) -> PipeResult<Vec<Line>> {
        self.ensure_readable()?;
        let mut lines = Vec::new();
        while let Some(line) = self.read()? {
            lines.push(line);
        }
        Ok(lines)
    }
}

/// Write side of a pipe, shared by the pipe and its writer handle
pub(crate) trait WriteEnd: Send + Sync {
    /// Fail with `Closed` if writes are no longer accepted
    fn ensure_writable(&self) -> PipeResult<()>;

    /// Blocking write of one already-rendered line
    fn write_line(&self, line: Line) -> PipeResult<()>;

    fn flush(&self) -> PipeResult<()>;
}

/// Pipe connecting two pipeline stages
///
/// Reads and writes default to the pipe's cached [`PipelineReader`] and
/// [`PipelineWriter`], so a stage holding only a handle observes exactly the
/// same behaviour as one holding the pipe.
pub trait Pipe: Send + Sync {
    fn kind(&self) -> PipeKind;

    /// The pipe's reader; the same instance on every call
    fn reader(&self) -> &Arc<PipelineReader>;

    /// The pipe's writer; the same instance on every call
    fn writer(&self) -> &Arc<PipelineWriter>;

    fn max_capacity(&self) -> Capacity;

    fn is_open(&self) -> bool;

    /// Number of buffered items
    fn count(&self) -> PipeResult<Size>;

    /// Mark the pipe ready for reading
    fn set_readable(&self);

    /// Mark the pipe ready for writing
    fn set_writable(&self);

    /// Close both directions; idempotent and does not flush
    fn close(&self);

    fn read_close(&self);

    fn write_close(&self);

    fn capabilities(&self) -> Capabilities {
        self.kind().capabilities()
    }

    fn read(&self) -> PipeResult<Option<Line>> {
        self.reader().read()
    }

    fn read_n(&self, count: Size) -> PipeResult<Vec<Line>> {
        self.reader().read_n(count)
    }

    fn read_to_end(&self) -> PipeResult<Vec<Line>> {
        self.reader().read_to_end()
    }

    /// Everything available right now, without waiting
    fn non_blocking_read(&self) -> PipeResult<Vec<Line>> {
        self.reader().non_blocking_read()
    }

    fn non_blocking_read_n(&self, max_requested: Size) -> PipeResult<Vec<Line>> {
        self.reader().non_blocking_read_n(max_requested)
    }

    fn peek(&self) -> PipeResult<Option<Line>> {
        self.reader().peek()
    }

    fn write(&self, item: &Value) -> PipeResult<()> {
        self.writer().write(item)
    }

    fn write_enumerate(&self, item: &Value, enumerate: bool) -> PipeResult<Size> {
        self.writer().write_enumerate(item, enumerate)
    }

    fn flush(&self) -> PipeResult<()> {
        self.writer().flush()
    }

    fn stats(&self) -> PipeStats {
        PipeStats {
            kind: self.kind(),
            capacity: self.max_capacity(),
            buffered: self.count().ok(),
            open: self.is_open(),
        }
    }
}
