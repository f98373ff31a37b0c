/*!
 * Console Pipe
 * Pipe terminus over an interactive console or a redirected stream
 */

use super::format::LineFormat;
use super::handles::{PipelineReader, PipelineWriter};
use super::traits::{Pipe, ReadEnd, WriteEnd};
use super::types::{Capacity, PipeError, PipeKind, PipeResult};
use crate::console::ConsoleIo;
use crate::core::limits::LINE_TERMINATOR;
use crate::core::types::{Line, Size};
use parking_lot::Mutex;
use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Shared state behind a console pipe and its handles
///
/// Input and output are locked separately so a read blocked on the
/// console never holds up the writing stage.
struct ConsoleEnd {
    kind: PipeKind,
    input: Mutex<Box<dyn BufRead + Send>>,
    output: Mutex<Box<dyn Write + Send>>,
    closed: AtomicBool,
}

impl ConsoleEnd {
    fn ensure_open(&self) -> PipeResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(PipeError::Closed);
        }
        Ok(())
    }
}

impl ReadEnd for ConsoleEnd {
    fn ensure_readable(&self) -> PipeResult<()> {
        self.ensure_open()
    }

    fn read(&self) -> PipeResult<Option<Line>> {
        self.ensure_open()?;

        let mut line = Line::new();
        let read = self.input.lock().read_line(&mut line).map_err(|e| {
            warn!(kind = %self.kind, error = %e, "console read failed");
            PipeError::from(e)
        })?;

        if read == 0 {
            trace!(kind = %self.kind, "console end-of-input");
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    fn non_blocking_read(&self, _max: Size) -> PipeResult<Vec<Line>> {
        Err(PipeError::unsupported("non_blocking_read", self.kind))
    }

    fn peek(&self) -> PipeResult<Option<Line>> {
        Err(PipeError::unsupported("peek", self.kind))
    }
}

impl WriteEnd for ConsoleEnd {
    fn ensure_writable(&self) -> PipeResult<()> {
        self.ensure_open()
    }

    fn write_line(&self, line: Line) -> PipeResult<()> {
        self.ensure_open()?;

        let mut output = self.output.lock();
        output
            .write_all(line.as_bytes())
            .and_then(|_| output.write_all(LINE_TERMINATOR.as_bytes()))
            .map_err(|e| {
                warn!(kind = %self.kind, error = %e, "console write failed");
                PipeError::from(e)
            })
    }

    fn flush(&self) -> PipeResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Ok(());
        }
        self.output.lock().flush().map_err(PipeError::from)
    }
}

/// Pipe bound to a console or redirected stream
///
/// Strictly line-oriented with no buffering of its own: capacity is
/// unbounded and `count`, `peek` and both non-blocking reads are
/// unsupported. Half-close and readiness hints are no-ops because the
/// console has no directional shutdown and is always ready.
pub struct ConsolePipe {
    end: Arc<ConsoleEnd>,
    reader: Arc<PipelineReader>,
    writer: Arc<PipelineWriter>,
}

impl ConsolePipe {
    pub fn new(io: ConsoleIo) -> Self {
        let (input, output, output_redirected) = io.into_parts();
        let kind = if output_redirected {
            PipeKind::RedirectedStream
        } else {
            PipeKind::Console
        };

        let end = Arc::new(ConsoleEnd {
            kind,
            input: Mutex::new(input),
            output: Mutex::new(output),
            closed: AtomicBool::new(false),
        });

        debug!(%kind, "console pipe created");

        Self {
            reader: Arc::new(PipelineReader::new(end.clone())),
            writer: Arc::new(PipelineWriter::new(
                end.clone(),
                LineFormat::for_output(output_redirected),
            )),
            end,
        }
    }

    /// Console pipe over the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(ConsoleIo::stdio())
    }
}

impl std::fmt::Debug for ConsolePipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsolePipe")
            .field("kind", &self.end.kind)
            .field("open", &self.is_open())
            .finish()
    }
}

impl Pipe for ConsolePipe {
    fn kind(&self) -> PipeKind {
        self.end.kind
    }

    fn reader(&self) -> &Arc<PipelineReader> {
        &self.reader
    }

    fn writer(&self) -> &Arc<PipelineWriter> {
        &self.writer
    }

    fn max_capacity(&self) -> Capacity {
        Capacity::Unbounded
    }

    fn is_open(&self) -> bool {
        !self.end.closed.load(Ordering::Acquire)
    }

    fn count(&self) -> PipeResult<Size> {
        Err(PipeError::unsupported("count", self.end.kind))
    }

    fn set_readable(&self) {
        // Console streams are always readable.
    }

    fn set_writable(&self) {
        // Console streams are always writable.
    }

    fn close(&self) {
        if !self.end.closed.swap(true, Ordering::AcqRel) {
            debug!(kind = %self.end.kind, "console pipe closed");
        }
    }

    fn read_close(&self) {}

    fn write_close(&self) {}
}
