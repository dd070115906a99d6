// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine configuration.
//!
//! A [`LogConfig`] is handed to [`initialize`](crate::initialize) and held as
//! an immutable snapshot until [`deinitialize`](crate::deinitialize). Logging
//! threads read the snapshot through a cheap `Arc` clone; nothing mutates it
//! in place, which is what makes the lock-free fast-reject path sound.

use crate::Level;
use crate::buffer::MessageBuffer;

/// A pluggable timestamp renderer.
///
/// When set, the engine calls this instead of the built-in `HH:MM:SS.mmm`
/// renderer at the start of every (non-raw) message. The function writes into
/// the bounded buffer; anything past the buffer's capacity is silently
/// dropped, so implementations need no length checks of their own.
pub type TimestampWriter = fn(&mut MessageBuffer);

/**
Configuration snapshot for the logging engine.

All fields are public; construct one with struct-update syntax over
[`Default`]:

```rust
use fanlog::{Level, LogConfig};

let config = LogConfig {
    log_level: Level::Paranoid,
    colored_console: false,
    ..LogConfig::default()
};
```
*/
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Everything at or above this level is written to the persistent sink.
    pub log_level: Level,
    /// Everything at or above this level is printed to the console.
    ///
    /// Setting this *below* [`log_level`](Self::log_level) is legal and is not
    /// clamped: messages in the gap appear on the console but never in the
    /// sink.
    pub log_level_print_to_console: Level,
    /// Flush the sink after every write.
    pub force_flush: bool,
    /// Log two banner lines from `initialize`.
    pub write_intro: bool,
    /// Log a banner line from `deinitialize`.
    pub write_outro: bool,
    /// Apply colors to console output.
    pub colored_console: bool,
    /// Write the sink as an HTML document instead of plain text.
    pub html_log: bool,
    /// Whether `log_raw` messages are also printed to the console.
    ///
    /// Raw console printing is gated by this toggle alone, never by
    /// [`log_level_print_to_console`](Self::log_level_print_to_console).
    pub raw_console: bool,
    /// Prefix sink and console lines with `(threadName):` or `(threadId):`.
    pub thread_names: bool,
    /// Title of the generated HTML page.
    pub html_page_title: String,
    /// Overrides the built-in HTML intro block verbatim when set.
    pub html_page_header: Option<String>,
    /// Overrides the built-in HTML closing block verbatim when set.
    pub html_page_footer: Option<String>,
    /// Name assigned to the thread that calls `initialize`.
    pub main_thread_name: String,
    /// Custom timestamp renderer; `None` selects the built-in one.
    pub timestamp_writer: Option<TimestampWriter>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: Level::Debug,
            log_level_print_to_console: Level::Log,
            force_flush: true,
            write_intro: true,
            write_outro: true,
            colored_console: true,
            html_log: false,
            raw_console: false,
            thread_names: true,
            html_page_title: "fanlog".to_string(),
            html_page_header: None,
            html_page_footer: None,
            main_thread_name: "MainThread".to_string(),
            timestamp_writer: None,
        }
    }
}

/*
Boilerplate notes for LogConfig:

IMPLEMENTED:
- Debug: Derived - fn pointers and Strings all print fine
- Clone: Derived - the engine clones the caller's value into its snapshot
- Default: Implemented - the documented out-of-the-box configuration

NOT IMPLEMENTED:
- PartialEq/Eq: fn pointer comparison is meaningless, so equality would lie
- Hash: requires Eq
- Copy: owns Strings
- Display: a config dump is Debug's job
*/
