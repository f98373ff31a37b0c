/*!
 * Core Module
 * Fundamental types and limits shared by every pipe variant
 */

pub mod limits;
pub mod types;

// Re-export for convenience
pub use types::*;
