/*!
 * Buffered Pipe
 * Bounded in-memory queue connecting two pipeline stages
 */

use super::format::LineFormat;
use super::handles::{PipelineReader, PipelineWriter};
use super::traits::{Pipe, ReadEnd, WriteEnd};
use super::types::{Capacity, PipeError, PipeKind, PipeResult};
use crate::config::PipeConfig;
use crate::core::limits::DEFAULT_PIPE_CAPACITY;
use crate::core::types::{Line, Size};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Debug)]
struct QueueState {
    items: VecDeque<Line>,
    closed: bool,
    read_closed: bool,
    write_closed: bool,
    readable: bool,
    writable: bool,
}

impl QueueState {
    fn check_readable(&self) -> PipeResult<()> {
        if self.closed || self.read_closed {
            return Err(PipeError::Closed);
        }
        Ok(())
    }

    fn check_writable(&self) -> PipeResult<()> {
        if self.closed || self.read_closed || self.write_closed {
            return Err(PipeError::Closed);
        }
        Ok(())
    }
}

struct QueueEnd {
    capacity: Size,
    state: Mutex<QueueState>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl QueueEnd {
    fn wake_all(&self) {
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }
}

impl ReadEnd for QueueEnd {
    fn ensure_readable(&self) -> PipeResult<()> {
        self.state.lock().check_readable()
    }

    fn read(&self) -> PipeResult<Option<Line>> {
        let mut state = self.state.lock();
        loop {
            state.check_readable()?;
            if let Some(line) = state.items.pop_front() {
                self.not_full.notify_one();
                return Ok(Some(line));
            }
            if state.write_closed {
                return Ok(None);
            }
            self.not_empty.wait(&mut state);
        }
    }

    fn non_blocking_read(&self, max: Size) -> PipeResult<Vec<Line>> {
        let mut state = self.state.lock();
        state.check_readable()?;

        let take = max.min(state.items.len());
        let lines: Vec<Line> = state.items.drain(..take).collect();
        if !lines.is_empty() {
            self.not_full.notify_all();
        }
        Ok(lines)
    }

    /// Front item, or `None` when nothing is buffered; never waits
    fn peek(&self) -> PipeResult<Option<Line>> {
        let state = self.state.lock();
        state.check_readable()?;
        Ok(state.items.front().cloned())
    }
}

impl WriteEnd for QueueEnd {
    fn ensure_writable(&self) -> PipeResult<()> {
        self.state.lock().check_writable()
    }

    fn write_line(&self, line: Line) -> PipeResult<()> {
        let mut state = self.state.lock();
        loop {
            state.check_writable()?;
            if state.items.len() < self.capacity {
                state.items.push_back(line);
                trace!(buffered = state.items.len(), "buffered pipe write");
                self.not_empty.notify_one();
                return Ok(());
            }
            self.not_full.wait(&mut state);
        }
    }

    /// Items are visible to the reader as soon as they are written
    fn flush(&self) -> PipeResult<()> {
        Ok(())
    }
}

/// In-memory pipe with a bounded item queue
///
/// Writers block while the queue is full, readers block while it is
/// empty. `write_close` lets the reader drain what is left and then see
/// end-of-input; `read_close` makes further writes fail with
/// [`PipeError::Closed`]; `close` shuts both directions at once.
pub struct BufferedPipe {
    end: Arc<QueueEnd>,
    reader: Arc<PipelineReader>,
    writer: Arc<PipelineWriter>,
}

impl BufferedPipe {
    pub fn new(capacity: Size) -> PipeResult<Self> {
        let capacity = Capacity::validate(capacity)?.as_usize();
        Ok(Self::with_valid_capacity(capacity))
    }

    pub fn with_config(config: &PipeConfig) -> PipeResult<Self> {
        Self::new(config.capacity)
    }

    fn with_valid_capacity(capacity: Size) -> Self {
        let end = Arc::new(QueueEnd {
            capacity,
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity.min(1024)),
                closed: false,
                read_closed: false,
                write_closed: false,
                readable: true,
                writable: true,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        });

        debug!(capacity, "buffered pipe created");

        Self {
            reader: Arc::new(PipelineReader::new(end.clone())),
            writer: Arc::new(PipelineWriter::new(end.clone(), LineFormat::Redirected)),
            end,
        }
    }

    /// Whether wiring has marked the pipe ready for reading
    ///
    /// Always false once the read end (or the whole pipe) is closed.
    pub fn is_readable(&self) -> bool {
        let state = self.end.state.lock();
        state.readable && state.check_readable().is_ok()
    }

    /// Whether wiring has marked the pipe ready for writing
    ///
    /// Always false once either end (or the whole pipe) is closed.
    pub fn is_writable(&self) -> bool {
        let state = self.end.state.lock();
        state.writable && state.check_writable().is_ok()
    }
}

impl Default for BufferedPipe {
    fn default() -> Self {
        Self::with_valid_capacity(DEFAULT_PIPE_CAPACITY)
    }
}

impl std::fmt::Debug for BufferedPipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.end.state.lock();
        f.debug_struct("BufferedPipe")
            .field("capacity", &self.end.capacity)
            .field("buffered", &state.items.len())
            .field("closed", &state.closed)
            .field("read_closed", &state.read_closed)
            .field("write_closed", &state.write_closed)
            .finish()
    }
}

impl Pipe for BufferedPipe {
    fn kind(&self) -> PipeKind {
        PipeKind::Buffered
    }

    fn reader(&self) -> &Arc<PipelineReader> {
        &self.reader
    }

    fn writer(&self) -> &Arc<PipelineWriter> {
        &self.writer
    }

    fn max_capacity(&self) -> Capacity {
        Capacity::Bounded(self.end.capacity)
    }

    fn is_open(&self) -> bool {
        !self.end.state.lock().closed
    }

    fn count(&self) -> PipeResult<Size> {
        Ok(self.end.state.lock().items.len())
    }

    fn set_readable(&self) {
        let mut state = self.end.state.lock();
        if state.check_readable().is_err() {
            trace!("readable hint ignored on closed read end");
            return;
        }
        state.readable = true;
    }

    fn set_writable(&self) {
        let mut state = self.end.state.lock();
        if state.check_writable().is_err() {
            trace!("writable hint ignored on closed write end");
            return;
        }
        state.writable = true;
    }

    fn close(&self) {
        let mut state = self.end.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        debug!(dropped = state.items.len(), "buffered pipe closed");
        drop(state);
        self.end.wake_all();
    }

    fn read_close(&self) {
        let mut state = self.end.state.lock();
        state.read_closed = true;
        state.readable = false;
        drop(state);
        debug!("buffered pipe read end closed");
        self.end.wake_all();
    }

    fn write_close(&self) {
        let mut state = self.end.state.lock();
        state.write_closed = true;
        state.writable = false;
        drop(state);
        debug!("buffered pipe write end closed");
        self.end.wake_all();
    }
}
