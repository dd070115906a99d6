// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatch pipeline behavior against a real sink file.
//!
//! The engine is process-wide state, so every test serializes on one guard
//! mutex and tears the engine down before releasing it.

use std::collections::HashSet;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use fanlog::{Level, LogCallback, LogConfig, MessageBuffer};

static TEST_GUARD: Mutex<()> = Mutex::new(());

fn no_timestamp(_: &mut MessageBuffer) {}

/// A config whose output is byte-for-byte predictable: no banners, no
/// timestamp, no thread prefix, no color.
fn quiet_config() -> LogConfig {
    LogConfig {
        write_intro: false,
        write_outro: false,
        colored_console: false,
        thread_names: false,
        timestamp_writer: Some(no_timestamp),
        ..LogConfig::default()
    }
}

#[test]
fn test_level_filtering() {
    let _guard = TEST_GUARD.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("filter.log");

    let debug_hits = Arc::new(AtomicUsize::new(0));
    let log_hits = Arc::new(AtomicUsize::new(0));

    fanlog::initialize(
        &path,
        LogConfig {
            log_level: Level::Log,
            ..quiet_config()
        },
    )
    .unwrap();

    let debug_hits_cb = debug_hits.clone();
    let log_hits_cb = log_hits.clone();
    fanlog::callback_add(
        LogCallback::new(1)
            .on(Level::Debug, move |_| {
                debug_hits_cb.fetch_add(1, Ordering::Relaxed);
            })
            .on(Level::Log, move |_| {
                log_hits_cb.fetch_add(1, Ordering::Relaxed);
            }),
    )
    .unwrap();

    fanlog::log!(Level::Debug, "dropped");
    fanlog::log!(Level::Log, "kept");
    fanlog::deinitialize();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(!contents.contains("dropped"));
    assert!(contents.contains("kept"));
    // a filtered message fires no callback either
    assert_eq!(debug_hits.load(Ordering::Relaxed), 0);
    assert_eq!(log_hits.load(Ordering::Relaxed), 1);
}

#[test]
fn test_nesting_prefix_round_trip() {
    let _guard = TEST_GUARD.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nesting.log");

    fanlog::initialize(&path, quiet_config()).unwrap();
    fanlog::callstack_push_proc("A->").unwrap();
    fanlog::callstack_push_proc("B->").unwrap();
    fanlog::log!(Level::Log, "msg");
    fanlog::callstack_pop_proc();
    fanlog::callstack_pop_proc();
    fanlog::deinitialize();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    // labels concatenate in push order, nothing added between them
    assert_eq!(lines[0], "A->B->msg");
}

#[test]
fn test_scope_exit_marker() {
    let _guard = TEST_GUARD.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scope.log");

    fanlog::initialize(&path, quiet_config()).unwrap();

    fanlog::callstack_push_proc("A->").unwrap();
    fanlog::log!(Level::Log, "inside");
    fanlog::callstack_pop_proc();

    // a silent scope leaves no trace
    fanlog::callstack_push_proc("B->").unwrap();
    fanlog::callstack_pop_proc();

    fanlog::deinitialize();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines, vec!["A->inside", "A-><-"]);
}

#[test]
fn test_oversized_message_is_truncated_not_fatal() {
    let _guard = TEST_GUARD.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncate.log");

    fanlog::initialize(&path, quiet_config()).unwrap();
    let huge = "x".repeat(fanlog::MESSAGE_CAPACITY + 2000);
    fanlog::log!(Level::Log, "{huge}");
    fanlog::deinitialize();

    let contents = fs::read_to_string(&path).unwrap();
    let line = contents.lines().next().unwrap();
    assert_eq!(line.len(), fanlog::MESSAGE_CAPACITY);
    assert!(huge.starts_with(line));
}

#[test]
fn test_console_gap_still_reaches_sink_and_callbacks() {
    let _guard = TEST_GUARD.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gap.log");

    let hits = Arc::new(AtomicUsize::new(0));
    fanlog::initialize(
        &path,
        LogConfig {
            log_level: Level::Debug,
            log_level_print_to_console: Level::Warning,
            ..quiet_config()
        },
    )
    .unwrap();
    let hits_cb = hits.clone();
    fanlog::callback_add(LogCallback::new(2).on(Level::Log, move |_| {
        hits_cb.fetch_add(1, Ordering::Relaxed);
    }))
    .unwrap();

    // below the console threshold but at the sink threshold
    fanlog::log!(Level::Log, "sink only");
    fanlog::deinitialize();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("sink only"));
    assert_eq!(hits.load(Ordering::Relaxed), 1);
}

#[test]
fn test_concurrent_lines_are_atomic() {
    let _guard = TEST_GUARD.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("concurrent.log");

    const PER_THREAD: usize = 200;
    let padding = "0123456789abcdef".repeat(8);

    fanlog::initialize(&path, quiet_config()).unwrap();

    let spawn_logger = |tag: &'static str, padding: String| {
        thread::spawn(move || {
            for i in 0..PER_THREAD {
                fanlog::log!(Level::Log, "{tag} #{i:04} {padding} end");
            }
        })
    };
    let a = spawn_logger("thread-a", padding.clone());
    let b = spawn_logger("thread-b", padding.clone());
    a.join().expect("thread should complete");
    b.join().expect("thread should complete");

    fanlog::deinitialize();

    let mut expected = HashSet::new();
    for tag in ["thread-a", "thread-b"] {
        for i in 0..PER_THREAD {
            expected.insert(format!("{tag} #{i:04} {padding} end"));
        }
    }

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2 * PER_THREAD);
    for line in lines {
        // every persisted line is exactly one message, never a splice of two
        assert!(expected.contains(line), "corrupted line: {line:?}");
    }
}

#[test]
fn test_callback_gets_user_message_only() {
    let _guard = TEST_GUARD.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strip.log");

    let seen = Arc::new(Mutex::new(Vec::<String>::new()));
    // real timestamp and a scope prefix this time; both must be stripped
    fanlog::initialize(
        &path,
        LogConfig {
            write_intro: false,
            write_outro: false,
            ..LogConfig::default()
        },
    )
    .unwrap();
    let seen_cb = seen.clone();
    fanlog::callback_add(LogCallback::new(3).on(Level::Warning, move |message| {
        seen_cb.lock().unwrap().push(message.to_string());
    }))
    .unwrap();

    fanlog::callstack_push_proc("S->").unwrap();
    fanlog::log!(Level::Warning, "payload {}", 11);
    fanlog::callstack_pop_proc();
    fanlog::deinitialize();

    assert_eq!(seen.lock().unwrap().as_slice(), ["payload 11"]);
}

#[test]
fn test_callback_isolation_removal_and_reuse() {
    let _guard = TEST_GUARD.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("callbacks.log");

    let hits = Arc::new(AtomicUsize::new(0));
    fanlog::initialize(&path, quiet_config()).unwrap();

    let hits_cb = hits.clone();
    fanlog::callback_add(LogCallback::new(42).on(Level::Warning, move |_| {
        hits_cb.fetch_add(1, Ordering::Relaxed);
    }))
    .unwrap();

    // registered for Warning only
    fanlog::log!(Level::Log, "not for the callback");
    assert_eq!(hits.load(Ordering::Relaxed), 0);
    fanlog::log!(Level::Warning, "for the callback");
    assert_eq!(hits.load(Ordering::Relaxed), 1);

    // removal stops invocation immediately
    fanlog::callback_remove(42);
    fanlog::log!(Level::Warning, "after removal");
    assert_eq!(hits.load(Ordering::Relaxed), 1);

    // the freed slot is reusable
    let hits_cb = hits.clone();
    fanlog::callback_add(LogCallback::new(42).on(Level::Warning, move |_| {
        hits_cb.fetch_add(1, Ordering::Relaxed);
    }))
    .unwrap();
    fanlog::log!(Level::Warning, "after re-add");
    assert_eq!(hits.load(Ordering::Relaxed), 2);

    fanlog::deinitialize();
}

#[test]
fn test_callback_registry_bounded() {
    let _guard = TEST_GUARD.lock().unwrap();

    for i in 0..fanlog::MAX_CALLBACKS as u64 {
        fanlog::callback_add(LogCallback::new(1000 + i).on(Level::FatalError, |_| {})).unwrap();
    }
    assert!(matches!(
        fanlog::callback_add(LogCallback::new(9999).on(Level::FatalError, |_| {})),
        Err(fanlog::Error::CallbackRegistryFull)
    ));

    // removing one entry frees a slot for a new registration
    fanlog::callback_remove(1000);
    fanlog::callback_add(LogCallback::new(9999).on(Level::FatalError, |_| {})).unwrap();

    fanlog::callback_remove(9999);
    for i in 1..fanlog::MAX_CALLBACKS as u64 {
        fanlog::callback_remove(1000 + i);
    }
}

#[test]
fn test_raw_bypasses_filter_and_formatting() {
    let _guard = TEST_GUARD.lock().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raw.log");

    let hits = Arc::new(AtomicUsize::new(0));
    fanlog::initialize(
        &path,
        LogConfig {
            log_level: Level::Warning,
            ..quiet_config()
        },
    )
    .unwrap();
    let hits_cb = hits.clone();
    fanlog::callback_add(LogCallback::new(5).on(Level::Debug, move |_| {
        hits_cb.fetch_add(1, Ordering::Relaxed);
    }))
    .unwrap();

    fanlog::callstack_push_proc("ignored->").unwrap();
    fanlog::log!(Level::Debug, "filtered out");
    fanlog::log_raw!(Level::Debug, "raw goes through");
    fanlog::callstack_pop_proc();
    fanlog::deinitialize();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    // no timestamp, no nesting prefix, and the sink threshold did not apply
    assert_eq!(lines, vec!["raw goes through"]);
    // fan-out to callbacks is the same as for log
    assert_eq!(hits.load(Ordering::Relaxed), 1);
}

#[test]
fn test_logging_without_sink_reaches_callbacks() {
    let _guard = TEST_GUARD.lock().unwrap();

    let hits = Arc::new(AtomicUsize::new(0));
    let hits_cb = hits.clone();
    fanlog::callback_add(LogCallback::new(6).on(Level::FatalError, move |_| {
        hits_cb.fetch_add(1, Ordering::Relaxed);
    }))
    .unwrap();

    // no initialize: the sink write is skipped, the rest of the pipeline runs
    fanlog::log!(Level::FatalError, "no sink open");
    assert_eq!(hits.load(Ordering::Relaxed), 1);

    fanlog::callback_remove(6);
}
