/*!
 * Config Tests
 * Environment overrides for pipe configuration
 */

use pretty_assertions::assert_eq;
use serial_test::serial;
use shell_pipe::core::limits::{DEFAULT_PIPE_CAPACITY, ENV_PIPE_CAPACITY, ENV_TRACE_JSON};
use shell_pipe::{init_tracing, BufferedPipe, Pipe, PipeConfig};

fn clear_env() {
    std::env::remove_var(ENV_PIPE_CAPACITY);
    std::env::remove_var(ENV_TRACE_JSON);
}

#[test]
#[serial]
fn test_defaults_without_env() {
    clear_env();
    assert_eq!(PipeConfig::from_env(), PipeConfig::default());
    assert_eq!(PipeConfig::default().capacity, DEFAULT_PIPE_CAPACITY);
}

#[test]
#[serial]
fn test_env_overrides() {
    clear_env();
    std::env::set_var(ENV_PIPE_CAPACITY, "32");
    std::env::set_var(ENV_TRACE_JSON, "true");

    let config = PipeConfig::from_env();
    assert_eq!(config.capacity, 32);
    assert!(config.trace_json);

    let pipe = BufferedPipe::with_config(&config).unwrap();
    assert_eq!(pipe.max_capacity().as_usize(), 32);
    clear_env();
}

#[test]
#[serial]
fn test_invalid_capacity_is_ignored() {
    clear_env();
    std::env::set_var(ENV_PIPE_CAPACITY, "lots");

    assert_eq!(PipeConfig::from_env().capacity, DEFAULT_PIPE_CAPACITY);
    clear_env();
}

#[test]
#[serial]
fn test_invalid_capacity_is_reported() {
    clear_env();
    std::env::set_var(ENV_PIPE_CAPACITY, "lots");
    std::env::set_var(ENV_TRACE_JSON, "1");

    let (config, issues) = PipeConfig::from_env_checked();
    assert_eq!(config.capacity, DEFAULT_PIPE_CAPACITY);
    assert!(config.trace_json);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].variable, ENV_PIPE_CAPACITY);
    assert_eq!(issues[0].value, "lots");
    assert!(issues[0]
        .to_string()
        .starts_with("ignoring invalid SHELL_PIPE_CAPACITY=\"lots\""));
    clear_env();
}

#[test]
#[serial]
fn test_valid_env_reports_no_issues() {
    clear_env();
    std::env::set_var(ENV_PIPE_CAPACITY, " 64 ");

    let (config, issues) = PipeConfig::from_env_checked();
    assert_eq!(config.capacity, 64);
    assert!(issues.is_empty());
    clear_env();
}

#[test]
fn test_init_tracing_twice_is_harmless() {
    let config = PipeConfig::default();
    init_tracing(&config);
    init_tracing(&config);
}
