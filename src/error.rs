// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error type for the fallible fanlog operations.
//!
//! Only three things can fail: opening the persistent sink, pushing a scope
//! label onto a full call stack, and registering a callback into a full
//! registry. Every failure leaves the global state untouched. Buffer
//! truncation is deliberately not represented here; log lines are best-effort
//! diagnostics and an over-long one is silently shortened.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The persistent sink could not be created or opened.
    #[error("cannot open log sink {path:?}")]
    SinkOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A scope push would exceed the per-thread nesting limit.
    #[error("call stack nesting exceeds {} levels", crate::MAX_NESTING)]
    CallstackOverflow,

    /// The callback registry already holds the maximum number of entries.
    #[error("callback registry is full ({} entries)", crate::MAX_CALLBACKS)]
    CallbackRegistryFull,
}
