// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-thread log context: stable identity, display name, and the bounded
//! call-stack of procedure scopes that drives nesting prefixes and automatic
//! exit markers.
//!
//! # Ownership
//!
//! The context is exclusively owned by its thread. No lock protects it and
//! none is needed: another thread reading this thread's name or call stack is
//! not a supported operation. The only interaction with shared state is the
//! "logged" flag, whose *write* is serialized by the engine's dispatch lock so
//! it cannot tear against another thread's sink write.
//!
//! # The call-stack state machine
//!
//! Depth ranges over `[0, MAX_NESTING]`. [`callstack_push_proc`] rejects a
//! push on a full stack and reports [`Error::CallstackOverflow`]; the stack is
//! unchanged. [`callstack_pop_proc`] below depth zero is a programmer error:
//! it trips a `debug_assert!` in debug builds and is ignored in release
//! builds. When the top frame has logged anything, popping it first emits one
//! synthetic `Debug`-level line containing the exit marker `<-`.

use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::Level;
use crate::buffer::{LabelBuffer, MessageBuffer};
use crate::error::Error;

/// Maximum per-thread scope nesting depth.
pub const MAX_NESTING: usize = 128;

/// Source of stable per-thread identifiers, assigned on first access.
static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

struct Frame {
    label: String,
    logged: bool,
}

struct ThreadLogContext {
    thread_id: u64,
    thread_name: Option<String>,
    frames: Vec<Frame>,
}

thread_local! {
    static CONTEXT: RefCell<ThreadLogContext> = RefCell::new(ThreadLogContext {
        thread_id: NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed),
        thread_name: None,
        frames: Vec::new(),
    });
}

/// How a thread presents itself on sink and console lines.
#[derive(Debug, Clone)]
pub(crate) struct ThreadIdentity {
    pub(crate) id: u64,
    pub(crate) name: Option<String>,
}

impl fmt::Display for ThreadIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "({name}):"),
            None => write!(f, "({}):", self.id),
        }
    }
}

pub(crate) fn identity() -> ThreadIdentity {
    CONTEXT.with_borrow(|ctx| ThreadIdentity {
        id: ctx.thread_id,
        name: ctx.thread_name.clone(),
    })
}

/// Sets the calling thread's display name. Last write wins.
pub fn thread_name_set(name: &str) {
    CONTEXT.with_borrow_mut(|ctx| ctx.thread_name = Some(name.to_string()));
}

/// Returns the calling thread's display name, if one was ever set.
pub fn thread_name_get() -> Option<String> {
    CONTEXT.with_borrow(|ctx| ctx.thread_name.clone())
}

/// Pushes a procedure label onto the calling thread's call stack.
///
/// The label appears verbatim in the nesting prefix of every subsequent
/// message on this thread, so callers conventionally end it with a separator
/// of their own, e.g. `"loadLevel()->"`.
///
/// # Errors
///
/// [`Error::CallstackOverflow`] when the stack already holds
/// [`MAX_NESTING`] frames; nothing is recorded in that case.
pub fn callstack_push_proc(label: &str) -> Result<(), Error> {
    CONTEXT.with_borrow_mut(|ctx| {
        if ctx.frames.len() == MAX_NESTING {
            return Err(Error::CallstackOverflow);
        }
        ctx.frames.push(Frame {
            label: label.to_string(),
            logged: false,
        });
        Ok(())
    })
}

/// Pops the top procedure label from the calling thread's call stack.
///
/// If anything was logged while the frame was on top, one synthetic
/// `Debug`-level line containing `<-` is emitted first, so the persisted log
/// shows where the nested scope ended. Popping an empty stack is a programmer
/// error: it panics in debug builds and does nothing in release builds.
pub fn callstack_pop_proc() {
    let logged = CONTEXT.with_borrow(|ctx| ctx.frames.last().map(|frame| frame.logged));
    debug_assert!(logged.is_some(), "callstack_pop_proc on an empty call stack");
    let Some(logged) = logged else {
        return;
    };
    if logged {
        // emitted before the frame is removed so the prefix still names it
        crate::engine::log(Level::Debug, format_args!("<-"));
    }
    CONTEXT.with_borrow_mut(|ctx| {
        ctx.frames.pop();
    });
}

/// Current scope nesting depth of the calling thread.
pub fn callstack_num_procs() -> usize {
    CONTEXT.with_borrow(|ctx| ctx.frames.len())
}

/// Returns the label at stack position `i` (push order), if it exists.
pub fn callstack_proc(i: usize) -> Option<String> {
    CONTEXT.with_borrow(|ctx| ctx.frames.get(i).map(|frame| frame.label.clone()))
}

/// Appends the calling thread's scope labels, in push order, to the message
/// buffer. Labels that no longer fit are silently cut short.
pub(crate) fn write_nesting_prefix(out: &mut MessageBuffer) {
    use std::fmt::Write;
    CONTEXT.with_borrow(|ctx| {
        for frame in &ctx.frames {
            let _ = out.write_str(&frame.label);
        }
    });
}

/// Marks the calling thread's top frame as having logged something.
///
/// Called by the engine while it holds the dispatch lock.
pub(crate) fn mark_logged() {
    CONTEXT.with_borrow_mut(|ctx| {
        if let Some(frame) = ctx.frames.last_mut() {
            frame.logged = true;
        }
    });
}

/**
Scoped-acquisition guard around [`callstack_push_proc`] and
[`callstack_pop_proc`].

Construction pushes the label; `Drop` pops it, so the stack stays balanced on
every exit path: normal return, early return, or propagated error. If the push
was rejected because the stack was full, `Drop` pops nothing.

```rust
use fanlog::{CallstackScope, Level};

fn load_assets() {
    let _scope = CallstackScope::new("load_assets()->");
    fanlog::log!(Level::Log, "loading {} assets", 17);
    // the scope pops here, emitting the exit marker
}
# load_assets();
```
*/
pub struct CallstackScope {
    pushed: bool,
}

impl CallstackScope {
    /// Pushes `label` for the lifetime of the returned guard.
    pub fn new(label: &str) -> Self {
        Self {
            pushed: callstack_push_proc(label).is_ok(),
        }
    }

    /// Renders a label from format arguments, bounded to 256 bytes, then
    /// pushes it. The [`scope!`](crate::scope) macro forwards here.
    pub fn with_args(args: fmt::Arguments<'_>) -> Self {
        use std::fmt::Write;
        let mut label = LabelBuffer::new();
        let _ = label.write_fmt(args);
        Self::new(label.as_str())
    }
}

impl Drop for CallstackScope {
    fn drop(&mut self) {
        if self.pushed {
            callstack_pop_proc();
        }
    }
}

/*
Boilerplate notes for CallstackScope:

IMPLEMENTED:
- Drop: the entire point of the type

NOT IMPLEMENTED:
- Clone/Copy: a guard that pops twice would corrupt the stack
- Debug: holds nothing worth printing; the stack itself is queryable via
  callstack_num_procs/callstack_proc
- Default/PartialEq/Eq/Hash/Display: no sensible meaning for a guard
- Send: irrelevant in practice; the guard only makes sense on the thread
  whose stack it guards (moving it elsewhere would pop the wrong stack)
*/
