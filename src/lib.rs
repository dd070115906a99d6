//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# fanlog

fanlog is a small, embeddable logging core for Rust.

# The problem

Most logging crates are built around a pluggable facade: the application picks
a backend, the backend picks a format, and by the time a message lands
somewhere you have three crates of indirection between `info!` and a file
handle. That is the right trade for large applications. It is the wrong trade
for an engine or tool that wants one log file, an optional colored console,
and a handful of in-process subscribers, with behavior it can reason about
line by line.

fanlog is the second thing. One `log` call formats the message exactly once
into a bounded stack buffer, then fans it out synchronously:

* a **persistent sink** (plain text or a self-contained HTML page),
* an optional **colored console**, gated by its own level threshold,
* any number of registered **callbacks**, each subscribed per level.

A single exclusion lock serializes the sink write and console print, so lines
are never interleaved; formatting happens before the lock, so contention stays
low; callbacks run after the lock is released.

# Scopes

fanlog tracks a per-thread call stack of procedure labels. Push a scope and
every message logged on that thread is prefixed with the nested labels; pop it
and, if anything was logged inside, an exit marker line is emitted
automatically. [`CallstackScope`] (or the [`scope!`] macro) does the push/pop
as an RAII guard.

```rust
use fanlog::Level;

fn decode_frame(index: usize) {
    let _scope = fanlog::scope!("decode_frame({index})->");
    fanlog::log!(Level::Debug, "got {} macroblocks", 1200);
}
# decode_frame(3);
```

# Lifecycle

Call [`initialize`] once at startup with a sink path and a [`LogConfig`];
call [`deinitialize`] at shutdown. Both are deliberately unsynchronized with
logging calls, the same way opening and closing your log file mid-frame would
be: serialize them yourself. Every other entry point is callable from any
thread at any time, including before `initialize` (messages then skip the sink
but still reach the console and callbacks).

# Bounded by construction

Each call renders into a fixed 8 KiB buffer. An over-long message is
truncated at a character boundary, never an error, never an overflow. Scope
labels are bounded at 256 bytes the same way.
*/

mod buffer;
mod callback;
mod config;
mod context;
mod engine;
mod error;
mod level;
mod macros;
mod sink;

pub use buffer::{BoundedBuffer, MESSAGE_CAPACITY, MessageBuffer};
pub use callback::{CallbackFn, LogCallback, MAX_CALLBACKS};
pub use config::{LogConfig, TimestampWriter};
pub use context::{
    CallstackScope, MAX_NESTING, callstack_num_procs, callstack_pop_proc, callstack_proc,
    callstack_push_proc, thread_name_get, thread_name_set,
};
pub use engine::{callback_add, callback_remove, deinitialize, initialize, log, log_raw};
pub use error::Error;
pub use level::Level;

extern crate self as fanlog;
