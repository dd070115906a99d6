// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-registered callback fan-out.
//!
//! A [`LogCallback`] is a level-indexed table of optional handlers plus an
//! identity key. The engine stores registered callbacks by value in a bounded
//! collection and, after releasing the dispatch lock, invokes every handler
//! whose slot matches the message's level. Handlers receive only the user
//! message, with the timestamp and nesting prefix stripped.

use std::fmt;
use std::sync::Arc;

use crate::Level;

/// Maximum number of simultaneously registered callbacks.
pub const MAX_CALLBACKS: usize = 128;

/// A shareable handler invoked with the user-message portion of a log line.
pub type CallbackFn = Arc<dyn Fn(&str) + Send + Sync>;

/**
A level-indexed callback registration.

Each level has an independent, optional slot; a registration only fires for
levels whose slot is filled. The `key` identifies the registration for
[`callback_remove`](crate::callback_remove) and carries whatever meaning the
caller gives it.

```rust
use fanlog::{Level, LogCallback};

let on_warning = LogCallback::new(7)
    .on(Level::Warning, |message| eprintln!("WARN: {message}"))
    .on(Level::FatalError, |message| eprintln!("FATAL: {message}"));
# let _ = on_warning;
```
*/
#[derive(Clone)]
pub struct LogCallback {
    funcs: [Option<CallbackFn>; Level::COUNT],
    key: u64,
}

impl LogCallback {
    /// An empty registration identified by `key`.
    pub fn new(key: u64) -> Self {
        Self {
            funcs: [const { None }; Level::COUNT],
            key,
        }
    }

    /// Fills the slot for `level`, replacing any previous handler there.
    pub fn on(mut self, level: Level, func: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.funcs[level as usize] = Some(Arc::new(func));
        self
    }

    /// The identity key used by removal.
    pub fn key(&self) -> u64 {
        self.key
    }

    pub(crate) fn slot(&self, level: Level) -> Option<CallbackFn> {
        self.funcs[level as usize].clone()
    }
}

impl fmt::Debug for LogCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filled: Vec<usize> = self
            .funcs
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| i))
            .collect();
        f.debug_struct("LogCallback")
            .field("key", &self.key)
            .field("levels", &filled)
            .finish()
    }
}

/*
Boilerplate notes for LogCallback:

IMPLEMENTED:
- Clone: Derived - Arc slots make it a cheap reference-count bump, and the
  engine stores registrations by value
- Debug: Manual - dyn Fn has no Debug, so we print the key and filled slots

NOT IMPLEMENTED:
- PartialEq/Eq/Hash: handler identity vs data equality is ambiguous; the key
  field already serves as the identity the API needs
- Default: a keyless registration would silently collide on key 0
- Copy/Display/From/Into: no sensible meaning

AUTOMATIC:
- Send/Sync: required of the handlers, so the table inherits them
*/
