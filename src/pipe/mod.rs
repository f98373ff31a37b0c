/*!
 * Pipe Module
 * Line-oriented pipes connecting pipeline stages
 */

pub mod buffered;
pub mod console;
pub mod format;
pub mod handles;
pub mod traits;
pub mod types;

// Re-export public API
pub use buffered::BufferedPipe;
pub use console::ConsolePipe;
pub use format::LineFormat;
pub use handles::{Lines, PipelineReader, PipelineWriter};
pub use traits::Pipe;
pub use types::{Capabilities, Capacity, PipeError, PipeKind, PipeResult, PipeStats};
