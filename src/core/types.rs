/*!
 * Core Types
 * Common types used across pipe implementations
 */

/// Size type for capacities and item counts
pub type Size = usize;

/// A single unit of text transported through a line-oriented pipe
pub type Line = String;
