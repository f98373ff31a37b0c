/*!
 * Shell Pipe Library
 * Pipes connecting the stages of a command pipeline: an in-memory
 * buffered queue and console-backed termini
 */

pub mod config;
pub mod console;
pub mod core;
pub mod logging;
pub mod pipe;

// Re-exports
pub use config::{EnvOverrideError, PipeConfig};
pub use console::ConsoleIo;
pub use logging::init_tracing;
pub use pipe::{
    BufferedPipe, Capabilities, Capacity, ConsolePipe, LineFormat, Pipe, PipeError, PipeKind,
    PipeResult, PipeStats, PipelineReader, PipelineWriter,
};
