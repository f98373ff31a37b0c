/*!
 * Pipeline Reader and Writer
 * Stage-facing handles onto one direction of a pipe
 */

use super::format::LineFormat;
use super::traits::{ReadEnd, WriteEnd};
use super::types::{PipeError, PipeResult};
use crate::core::types::{Line, Size};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Read handle given to the downstream stage
pub struct PipelineReader {
    end: Arc<dyn ReadEnd>,
}

impl PipelineReader {
    pub(crate) fn new(end: Arc<dyn ReadEnd>) -> Self {
        Self { end }
    }

    /// Blocking read of one line; `Ok(None)` signals end-of-input
    pub fn read(&self) -> PipeResult<Option<Line>> {
        self.end.read()
    }

    /// Blocking read of up to `count` lines, fewer only at end-of-input
    pub fn read_n(&self, count: Size) -> PipeResult<Vec<Line>> {
        self.end.read_n(count)
    }

    pub fn read_to_end(&self) -> PipeResult<Vec<Line>> {
        self.end.read_to_end()
    }

    pub fn non_blocking_read(&self) -> PipeResult<Vec<Line>> {
        self.end.non_blocking_read(Size::MAX)
    }

    pub fn non_blocking_read_n(&self, max_requested: Size) -> PipeResult<Vec<Line>> {
        self.end.non_blocking_read(max_requested)
    }

    pub fn peek(&self) -> PipeResult<Option<Line>> {
        self.end.peek()
    }

    /// Lazy sequence of the remaining lines
    ///
    /// Ends at end-of-input, or after yielding the first error.
    pub fn lines(&self) -> Lines<'_> {
        Lines {
            reader: self,
            done: false,
        }
    }
}

impl fmt::Debug for PipelineReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineReader").finish_non_exhaustive()
    }
}

/// Iterator returned by [`PipelineReader::lines`]
pub struct Lines<'a> {
    reader: &'a PipelineReader,
    done: bool,
}

impl Iterator for Lines<'_> {
    type Item = PipeResult<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for Lines<'_> {}

/// Write handle given to the upstream stage
pub struct PipelineWriter {
    end: Arc<dyn WriteEnd>,
    format: LineFormat,
}

impl PipelineWriter {
    pub(crate) fn new(end: Arc<dyn WriteEnd>, format: LineFormat) -> Self {
        Self { end, format }
    }

    pub fn format(&self) -> LineFormat {
        self.format
    }

    /// Write one item as one line
    pub fn write(&self, item: &Value) -> PipeResult<()> {
        self.end.ensure_writable()?;
        let line = self.format.render(item)?;
        trace!(line_len = line.len(), "pipe write");
        self.end.write_line(line)
    }

    /// Write `item`, one line per element when `enumerate` is set and `item` is an array
    ///
    /// Returns the number of lines written.
    pub fn write_enumerate(&self, item: &Value, enumerate: bool) -> PipeResult<Size> {
        match item {
            Value::Array(elements) if enumerate => {
                self.end.ensure_writable()?;
                for element in elements {
                    self.write(element)?;
                }
                Ok(elements.len())
            }
            _ => {
                self.write(item)?;
                Ok(1)
            }
        }
    }

    /// Serialize any value and write it as one line
    pub fn write_object<T: Serialize + ?Sized>(&self, object: &T) -> PipeResult<()> {
        let value = serde_json::to_value(object).map_err(PipeError::from)?;
        self.write(&value)
    }

    /// Write text as one line, verbatim unless it contains a line break
    pub fn write_str(&self, text: &str) -> PipeResult<()> {
        self.end.ensure_writable()?;
        let line = self.format.render_text(text)?;
        self.end.write_line(line)
    }

    pub fn flush(&self) -> PipeResult<()> {
        self.end.flush()
    }
}

impl fmt::Debug for PipelineWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineWriter")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}
