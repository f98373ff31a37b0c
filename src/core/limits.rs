/*!
 * Pipe Limits and Constants
 *
 * Centralized location for pipe capacity bounds and line-protocol constants.
 *
 * ## Design Philosophy
 * - Capacities are counted in items (lines), not bytes
 * - Console-backed pipes do not buffer, so none of these apply to them
 */

// =============================================================================
// BUFFERED PIPE LIMITS
// =============================================================================

/// Default buffered pipe capacity (1024 items)
/// Enough for a stage to run ahead of its consumer without unbounded memory
pub const DEFAULT_PIPE_CAPACITY: usize = 1024;

/// Maximum buffered pipe capacity (1M items)
/// Prevents a single pipe from holding an entire upstream result set
pub const MAX_PIPE_CAPACITY: usize = 1024 * 1024;

/// Minimum buffered pipe capacity
/// A zero-capacity queue could never accept a write
pub const MIN_PIPE_CAPACITY: usize = 1;

// =============================================================================
// LINE PROTOCOL
// =============================================================================

/// Line terminator appended to every written item
pub const LINE_TERMINATOR: &str = "\n";

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Overrides the buffered pipe capacity
pub const ENV_PIPE_CAPACITY: &str = "SHELL_PIPE_CAPACITY";

/// Enables JSON-formatted tracing output when set to `1` or `true`
pub const ENV_TRACE_JSON: &str = "SHELL_PIPE_TRACE_JSON";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_hierarchy() {
        assert!(MIN_PIPE_CAPACITY <= DEFAULT_PIPE_CAPACITY);
        assert!(DEFAULT_PIPE_CAPACITY < MAX_PIPE_CAPACITY);
    }
}
