// SPDX-License-Identifier: MIT OR Apache-2.0

//! Global engine state and the dispatch pipeline.
//!
//! # Architecture
//!
//! The engine is process-wide state behind a controlled lifecycle:
//!
//! - the persistent sink handle and console sequencing live behind one
//!   [`parking_lot::Mutex`], the exclusion lock that serializes every
//!   thread's dispatch;
//! - the active [`LogConfig`] snapshot lives behind an `RwLock<Arc<_>>`, so a
//!   logging thread takes a reference-count bump, never a copy;
//! - an `AtomicU8` mirrors the sink threshold for the lock-free fast-reject
//!   path;
//! - the callback registry is a bounded `Vec` behind its own `RwLock`.
//!
//! Message formatting happens *before* the exclusion lock is taken, so the
//! lock only covers the sink write and console print. Callbacks are invoked
//! *after* the lock is released: they may interleave with other threads'
//! dispatch and are not mutually exclusive with each other. That trade is
//! deliberate and part of the contract.
//!
//! # Lifecycle
//!
//! [`initialize`] and [`deinitialize`] are not safe to call concurrently with
//! logging calls or with each other; the caller serializes them, typically at
//! program start and end on one thread. Everything else here is callable from
//! any number of threads at once.

use std::fmt;
use std::fs::File;
use std::io::Write as _;
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::{Mutex, RwLock};

use crate::Level;
use crate::buffer::{self, MessageBuffer};
use crate::callback::{CallbackFn, LogCallback, MAX_CALLBACKS};
use crate::config::LogConfig;
use crate::context;
use crate::error::Error;
use crate::sink;

/// Mirror of the active config's `log_level`, for rejecting filtered
/// messages without a lock or any formatting.
static SINK_LEVEL: AtomicU8 = AtomicU8::new(Level::Debug as u8);

/// The persistent sink handle. The mutex doubles as the exclusion lock that
/// serializes sink writes and console prints across threads.
static SINK: Mutex<Option<File>> = Mutex::new(None);

/// Registered callbacks, bounded to [`MAX_CALLBACKS`]. Removal compacts by
/// swapping with the last entry, so registration order is not preserved.
static CALLBACKS: RwLock<Vec<LogCallback>> = RwLock::new(Vec::new());

/// The active config snapshot. Lazily holds the documented defaults until the
/// first `initialize`, which is what lets pre-init logging still reach the
/// console and callbacks.
static CONFIG: OnceLock<RwLock<Arc<LogConfig>>> = OnceLock::new();

fn config_cell() -> &'static RwLock<Arc<LogConfig>> {
    CONFIG.get_or_init(|| RwLock::new(Arc::new(LogConfig::default())))
}

fn config() -> Arc<LogConfig> {
    config_cell().read().clone()
}

fn replace_config(new: LogConfig) {
    SINK_LEVEL.store(new.log_level as u8, Ordering::Relaxed);
    *config_cell().write() = Arc::new(new);
}

/// Opens `path` as the persistent sink and installs `config` as the active
/// snapshot.
///
/// The calling thread is named `config.main_thread_name`. When
/// `config.html_log` is set, the HTML intro block is written first; when
/// `config.write_intro` is set, two banner lines are logged at [`Level::Log`].
/// If the engine was already initialized, the previous instance is torn down
/// first, so re-initialization never leaks a sink handle.
///
/// Not safe to call concurrently with logging calls or with itself.
///
/// # Errors
///
/// [`Error::SinkOpen`] when the file cannot be created; no global state is
/// mutated beyond the teardown of any previous instance.
///
/// # Examples
///
/// ```no_run
/// use fanlog::{Level, LogConfig};
///
/// fanlog::initialize("engine.log", LogConfig::default()).expect("sink should open");
/// fanlog::log!(Level::Log, "hello from {}", "fanlog");
/// fanlog::deinitialize();
/// ```
pub fn initialize(path: impl AsRef<Path>, config: LogConfig) -> Result<(), Error> {
    initialize_impl(path.as_ref(), config)
}

fn initialize_impl(path: &Path, new_config: LogConfig) -> Result<(), Error> {
    deinitialize();

    let mut file = File::create(path).map_err(|source| Error::SinkOpen {
        path: path.to_path_buf(),
        source,
    })?;

    context::thread_name_set(&new_config.main_thread_name);

    if new_config.html_log {
        sink::write_html_intro(&mut file, &new_config);
    }
    let write_intro = new_config.write_intro;
    replace_config(new_config);
    *SINK.lock() = Some(file);

    if write_intro {
        log(Level::Log, format_args!("fanlog: initializing ..."));
        log(Level::Log, format_args!("fanlog: log file: {}", path.display()));
    }
    Ok(())
}

/// Tears the engine down: logs the outro banner (when configured), writes the
/// HTML closing block (when configured), flushes and closes the sink, clears
/// the callback registry, and resets the config to defaults.
///
/// A no-op when the engine is not initialized, so calling it twice is safe.
/// Not safe to call concurrently with logging calls or with [`initialize`].
pub fn deinitialize() {
    if SINK.lock().is_none() {
        return;
    }

    let active = config();
    if active.write_outro {
        log(Level::Log, format_args!("fanlog: deinitializing..."));
    }

    if let Some(mut file) = SINK.lock().take() {
        if active.html_log {
            sink::write_html_outro(&mut file, &active);
        }
        let _ = file.flush();
    }
    CALLBACKS.write().clear();
    replace_config(LogConfig::default());
}

/// Logs a formatted message at `level`.
///
/// The message is dropped immediately, with no lock taken and no formatting
/// performed, when `level` is below the configured sink threshold. Otherwise
/// it is rendered once into a bounded buffer (timestamp, nesting prefix, user
/// message) and fanned out: persistent sink, console when `level` reaches the
/// console threshold, then callbacks. Rendering that exceeds the buffer
/// capacity is silently truncated.
///
/// Callable before `initialize`: the sink write is skipped but console
/// printing and callback invocation still happen.
///
/// Most callers go through the [`log!`](crate::log!) macro rather than
/// building `fmt::Arguments` by hand.
pub fn log(level: Level, args: fmt::Arguments<'_>) {
    if (level as u8) < SINK_LEVEL.load(Ordering::Relaxed) {
        return;
    }

    let active = config();
    let mut buffer = MessageBuffer::new();
    match active.timestamp_writer {
        Some(write_timestamp) => write_timestamp(&mut buffer),
        None => buffer::write_timestamp(&mut buffer),
    }
    context::write_nesting_prefix(&mut buffer);
    let body_start = buffer.len();
    {
        use std::fmt::Write;
        let _ = buffer.write_fmt(args);
    }

    dispatch(level, &active, &buffer, body_start, false);
}

/// Logs a preformatted message at `level`, bypassing the timestamp and
/// nesting prefix.
///
/// Raw messages are **not** filtered by the sink threshold: whenever a sink is
/// open, they are written to it. Console printing is gated by the
/// [`raw_console`](LogConfig::raw_console) toggle instead of the console
/// threshold. Callback fan-out is identical to [`log`].
pub fn log_raw(level: Level, args: fmt::Arguments<'_>) {
    let active = config();
    let mut buffer = MessageBuffer::new();
    {
        use std::fmt::Write;
        let _ = buffer.write_fmt(args);
    }

    dispatch(level, &active, &buffer, 0, true);
}

/// The fan-out tail shared by `log` and `log_raw`. `body_start` is the byte
/// offset where the user message begins inside `buffer`.
fn dispatch(level: Level, config: &LogConfig, buffer: &MessageBuffer, body_start: usize, raw: bool) {
    let who = context::identity();

    {
        let mut guard = SINK.lock();
        // serialized with other threads' sink writes; drives the scope exit
        // marker on this thread
        context::mark_logged();

        if let Some(file) = guard.as_mut() {
            sink::write_line(file, config, level, &who, buffer.as_str());
        }

        let to_console = if raw {
            config.raw_console
        } else {
            level >= config.log_level_print_to_console
        };
        if to_console {
            sink::print_console(config, level, &who, buffer.as_str());
        }
    }

    // invoked outside the lock; callbacks may interleave with other threads
    let handlers: Vec<CallbackFn> = CALLBACKS
        .read()
        .iter()
        .filter_map(|callback| callback.slot(level))
        .collect();
    if handlers.is_empty() {
        return;
    }
    let message = &buffer.as_str()[body_start..];
    for handler in handlers {
        handler(message);
    }
}

/// Registers a callback.
///
/// # Errors
///
/// [`Error::CallbackRegistryFull`] when [`MAX_CALLBACKS`] registrations are
/// already present; the registry is unchanged.
pub fn callback_add(callback: LogCallback) -> Result<(), Error> {
    let mut callbacks = CALLBACKS.write();
    if callbacks.len() == MAX_CALLBACKS {
        return Err(Error::CallbackRegistryFull);
    }
    callbacks.push(callback);
    Ok(())
}

/// Removes the registration whose key equals `key`, if any.
///
/// The vacated slot is compacted by swapping the last entry into it, so the
/// relative order of the remaining registrations may change; registration
/// order was never an API guarantee.
pub fn callback_remove(key: u64) {
    let mut callbacks = CALLBACKS.write();
    if let Some(i) = callbacks.iter().position(|callback| callback.key() == key) {
        callbacks.swap_remove(i);
    }
}
