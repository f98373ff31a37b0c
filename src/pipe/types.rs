/*!
 * Pipe Types
 * Common types, capabilities, and errors for pipes
 */

use crate::core::limits::{MAX_PIPE_CAPACITY, MIN_PIPE_CAPACITY};
use crate::core::types::Size;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Pipe operation result
pub type PipeResult<T> = Result<T, PipeError>;

/// Pipe error types
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum PipeError {
    /// The pipe variant structurally cannot provide this operation
    #[error("Operation '{operation}' is not supported by {kind} pipes")]
    #[diagnostic(
        code(pipe::unsupported),
        help("Query Pipe::capabilities() before calling optional operations.")
    )]
    Unsupported { operation: String, kind: PipeKind },

    /// Read or write attempted after the pipe (or that direction) was closed
    #[error("Pipe closed")]
    #[diagnostic(
        code(pipe::closed),
        help("The pipe has been closed and can no longer be read from or written to.")
    )]
    Closed,

    /// Failure reported by the underlying console or stream
    #[error("Pipe I/O failed: {0}")]
    #[diagnostic(
        code(pipe::io),
        help("The console or redirected stream reported an error. The operation was not retried.")
    )]
    Io(String),

    /// An object could not be rendered to its line representation
    #[error("Failed to serialize item: {0}")]
    #[diagnostic(code(pipe::serialization))]
    Serialization(String),

    /// Buffered pipe capacity outside the accepted range
    #[error("Invalid capacity: requested {requested}, allowed {min}..={max}")]
    #[diagnostic(
        code(pipe::invalid_capacity),
        help("Choose a capacity between 1 and the maximum pipe capacity.")
    )]
    InvalidCapacity {
        requested: Size,
        min: Size,
        max: Size,
    },
}

impl PipeError {
    pub(crate) fn unsupported(operation: &str, kind: PipeKind) -> Self {
        PipeError::Unsupported {
            operation: operation.to_string(),
            kind,
        }
    }

    /// Whether this error means the capability is absent rather than a failure
    pub fn is_unsupported(&self) -> bool {
        matches!(self, PipeError::Unsupported { .. })
    }
}

impl From<std::io::Error> for PipeError {
    fn from(err: std::io::Error) -> Self {
        PipeError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PipeError {
    fn from(err: serde_json::Error) -> Self {
        PipeError::Serialization(err.to_string())
    }
}

/// Concrete pipe variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipeKind {
    /// In-memory bounded queue between two stages
    Buffered,
    /// Terminus bound to an interactive terminal
    Console,
    /// Terminus bound to a redirected process stream
    RedirectedStream,
}

impl PipeKind {
    /// Capabilities every pipe of this kind provides
    pub const fn capabilities(self) -> Capabilities {
        match self {
            PipeKind::Buffered => Capabilities {
                count: true,
                peek: true,
                non_blocking_read: true,
                half_close: true,
            },
            PipeKind::Console | PipeKind::RedirectedStream => Capabilities {
                count: false,
                peek: false,
                non_blocking_read: false,
                half_close: false,
            },
        }
    }
}

impl fmt::Display for PipeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipeKind::Buffered => "buffered",
            PipeKind::Console => "console",
            PipeKind::RedirectedStream => "redirected-stream",
        };
        f.write_str(name)
    }
}

/// Optional operations a pipe variant supports
///
/// A `false` flag means the matching operation always fails with
/// [`PipeError::Unsupported`]. For `count` this doubles as the "unknown"
/// sentinel: callers must not treat an unbuffered pipe as holding zero items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub count: bool,
    pub peek: bool,
    pub non_blocking_read: bool,
    /// Whether `read_close`/`write_close` have an effect (no-ops otherwise)
    pub half_close: bool,
}

/// Bound on the number of items a pipe can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "items")]
pub enum Capacity {
    Bounded(Size),
    /// No internal buffer; limited only by the underlying stream
    Unbounded,
}

impl Capacity {
    /// Numeric form, `usize::MAX` for unbounded pipes
    pub const fn as_usize(self) -> Size {
        match self {
            Capacity::Bounded(n) => n,
            Capacity::Unbounded => Size::MAX,
        }
    }

    pub(crate) fn validate(requested: Size) -> PipeResult<Self> {
        if !(MIN_PIPE_CAPACITY..=MAX_PIPE_CAPACITY).contains(&requested) {
            return Err(PipeError::InvalidCapacity {
                requested,
                min: MIN_PIPE_CAPACITY,
                max: MAX_PIPE_CAPACITY,
            });
        }
        Ok(Capacity::Bounded(requested))
    }
}

/// Pipe statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PipeStats {
    pub kind: PipeKind,
    pub capacity: Capacity,
    /// `None` when the pipe cannot report how many items it holds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffered: Option<Size>,
    pub open: bool,
}
