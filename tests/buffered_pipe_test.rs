/*!
 * Buffered Pipe Tests
 * Tests for the in-memory queue pipe between two stages
 */

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;
use shell_pipe::{BufferedPipe, Capacity, Pipe, PipeConfig, PipeError, PipeKind};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_basic_pipe_create() {
    let pipe = BufferedPipe::new(16).unwrap();

    assert_eq!(pipe.kind(), PipeKind::Buffered);
    assert_eq!(pipe.max_capacity(), Capacity::Bounded(16));
    assert_eq!(pipe.count().unwrap(), 0);
    assert!(pipe.is_open());
    assert!(pipe.capabilities().count);
}

#[test]
fn test_reader_and_writer_are_cached() {
    let pipe = BufferedPipe::default();

    assert!(Arc::ptr_eq(pipe.reader(), pipe.reader()));
    assert!(Arc::ptr_eq(pipe.writer(), pipe.writer()));
}

#[test]
fn test_pipe_write_read_to_end() {
    let pipe = BufferedPipe::new(8).unwrap();

    pipe.write(&json!("chunk1")).unwrap();
    pipe.write(&json!("chunk2")).unwrap();
    pipe.write(&json!({"chunk": 3})).unwrap();
    assert_eq!(pipe.count().unwrap(), 3);

    pipe.write_close();
    assert_eq!(
        pipe.read_to_end().unwrap(),
        vec!["chunk1", "chunk2", r#"{"chunk":3}"#]
    );
    assert_eq!(pipe.read().unwrap(), None);
}

#[test]
fn test_write_enumerate_counts() {
    let pipe = BufferedPipe::new(8).unwrap();
    let items = json!([1, 2, 3]);

    assert_eq!(pipe.write_enumerate(&items, true).unwrap(), 3);
    assert_eq!(pipe.write_enumerate(&items, false).unwrap(), 1);
    assert_eq!(pipe.non_blocking_read().unwrap(), vec!["1", "2", "3", "[1,2,3]"]);
}

#[test]
fn test_blocking_read_waits_for_writer() {
    let pipe = Arc::new(BufferedPipe::new(4).unwrap());

    let reader = {
        let pipe = pipe.clone();
        thread::spawn(move || pipe.read())
    };

    thread::sleep(Duration::from_millis(50));
    pipe.write(&json!("late")).unwrap();

    assert_eq!(reader.join().unwrap().unwrap(), Some("late".to_string()));
}

#[test]
fn test_pipe_capacity_backpressure() {
    let pipe = Arc::new(BufferedPipe::new(2).unwrap());
    pipe.write(&json!("a")).unwrap();
    pipe.write(&json!("b")).unwrap();

    let writer = {
        let pipe = pipe.clone();
        thread::spawn(move || pipe.write(&json!("c")))
    };

    thread::sleep(Duration::from_millis(50));
    assert!(!writer.is_finished());
    assert_eq!(pipe.count().unwrap(), 2);

    assert_eq!(pipe.read().unwrap(), Some("a".to_string()));
    writer.join().unwrap().unwrap();

    pipe.write_close();
    assert_eq!(pipe.read_to_end().unwrap(), vec!["b", "c"]);
}

#[test]
fn test_write_close_drains_then_ends() {
    let pipe = BufferedPipe::new(4).unwrap();
    pipe.write(&json!("left")).unwrap();
    pipe.write_close();

    assert!(pipe.is_open());
    assert_eq!(pipe.write(&json!("more")), Err(PipeError::Closed));
    assert_eq!(pipe.read().unwrap(), Some("left".to_string()));
    assert_eq!(pipe.read().unwrap(), None);
}

#[test]
fn test_read_close_unblocks_writer() {
    let pipe = Arc::new(BufferedPipe::new(1).unwrap());
    pipe.write(&json!("full")).unwrap();

    let writer = {
        let pipe = pipe.clone();
        thread::spawn(move || pipe.write(&json!("blocked")))
    };

    thread::sleep(Duration::from_millis(50));
    pipe.read_close();

    assert_eq!(writer.join().unwrap(), Err(PipeError::Closed));
    assert_eq!(pipe.read(), Err(PipeError::Closed));
}

#[test]
fn test_close_unblocks_reader() {
    let pipe = Arc::new(BufferedPipe::new(1).unwrap());

    let reader = {
        let pipe = pipe.clone();
        thread::spawn(move || pipe.read())
    };

    thread::sleep(Duration::from_millis(50));
    pipe.close();

    assert_eq!(reader.join().unwrap(), Err(PipeError::Closed));
}

#[test]
fn test_close_is_idempotent_and_final() {
    let pipe = BufferedPipe::new(4).unwrap();
    pipe.write(&json!("x")).unwrap();

    pipe.close();
    pipe.close();

    assert!(!pipe.is_open());
    assert_eq!(pipe.read(), Err(PipeError::Closed));
    assert_eq!(pipe.peek(), Err(PipeError::Closed));
    assert_eq!(pipe.non_blocking_read(), Err(PipeError::Closed));
    assert_eq!(pipe.write(&json!("y")), Err(PipeError::Closed));
    assert_eq!(pipe.flush(), Ok(()));
}

#[test]
fn test_reader_handle_outlives_pipe() {
    let pipe = BufferedPipe::new(4).unwrap();
    let reader = pipe.reader().clone();
    pipe.write(&json!("kept")).unwrap();
    pipe.write_close();
    drop(pipe);

    assert_eq!(reader.read_to_end().unwrap(), vec!["kept"]);
}

#[test]
fn test_with_config_rejects_invalid_capacity() {
    let config = PipeConfig {
        capacity: 0,
        ..PipeConfig::default()
    };
    assert!(matches!(
        BufferedPipe::with_config(&config),
        Err(PipeError::InvalidCapacity { .. })
    ));
}

#[test]
fn test_stats_report_buffered_items() {
    let pipe = BufferedPipe::new(4).unwrap();
    pipe.write(&json!("one")).unwrap();

    let stats = pipe.stats();
    assert_eq!(stats.buffered, Some(1));
    assert_eq!(stats.capacity, Capacity::Bounded(4));
}

#[test]
fn test_streaming_between_threads() {
    let pipe = Arc::new(BufferedPipe::new(3).unwrap());
    let expected: Vec<String> = (0..200).map(|i| format!("line-{}", i)).collect();

    let producer = {
        let pipe = pipe.clone();
        let lines = expected.clone();
        thread::spawn(move || {
            for line in &lines {
                pipe.writer().write_str(line).unwrap();
            }
            pipe.write_close();
        })
    };

    let received: Vec<String> = pipe.reader().lines().map(Result::unwrap).collect();
    producer.join().unwrap();

    assert_eq!(received, expected);
}

proptest! {
    #[test]
    fn prop_read_to_end_preserves_write_order(lines in prop::collection::vec("[a-z0-9 ]{0,12}", 0..64)) {
        let pipe = BufferedPipe::new(64).unwrap();
        for line in &lines {
            pipe.write(&json!(line)).unwrap();
        }
        pipe.write_close();

        prop_assert_eq!(pipe.read_to_end().unwrap(), lines);
    }
}
