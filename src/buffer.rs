// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded message formatting for the fanlog logging system.
//!
//! This module defines [`BoundedBuffer`], the fixed-capacity write target every
//! log call renders into before any lock is taken. One buffer lives on the
//! caller's stack per call; it is never persisted or shared between threads.
//!
//! # Design Philosophy
//!
//! Formatting a log message must never be able to write past the end of the
//! buffer, and an over-long message must never be an error. The buffer
//! implements [`std::fmt::Write`] so the standard formatting machinery can
//! target it directly, but `write_str` copies at most the remaining capacity,
//! cutting at a `char` boundary. Truncation is observable only as a shortened
//! message.
//!
//! # Usage Pattern
//!
//! 1. Create a [`MessageBuffer`] on the stack.
//! 2. Render the timestamp, the nesting prefix, and the user message into it.
//! 3. Hand `as_str()` to the sinks; drop the buffer when the call returns.
//!
//! # Example
//!
//! ```rust
//! use fanlog::MessageBuffer;
//! use std::fmt::Write;
//!
//! let mut buffer = MessageBuffer::new();
//! write!(buffer, "job #{} finished", 42).unwrap();
//! assert_eq!(buffer.as_str(), "job #42 finished");
//! ```

use std::fmt;

use chrono::Timelike;

/// Capacity of the per-call message buffer, in bytes.
pub const MESSAGE_CAPACITY: usize = 8192;

/// Capacity of the scope-label buffer used by
/// [`CallstackScope`](crate::CallstackScope).
pub(crate) const LABEL_CAPACITY: usize = 256;

/**
A fixed-capacity, stack-allocated string buffer that truncates instead of
growing or failing.

Writes past the end are silently dropped; a multi-byte character that would
straddle the boundary is dropped whole, so the contents are always valid
UTF-8.
*/
pub struct BoundedBuffer<const CAP: usize> {
    buf: [u8; CAP],
    len: usize,
}

/// The buffer type every `log` call renders into.
pub type MessageBuffer = BoundedBuffer<MESSAGE_CAPACITY>;

pub(crate) type LabelBuffer = BoundedBuffer<LABEL_CAPACITY>;

impl<const CAP: usize> BoundedBuffer<CAP> {
    pub fn new() -> Self {
        Self {
            buf: [0; CAP],
            len: 0,
        }
    }

    /// The rendered contents so far.
    pub fn as_str(&self) -> &str {
        //safety: write_str only ever copies whole UTF-8 characters
        unsafe { std::str::from_utf8_unchecked(&self.buf[..self.len]) }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn capacity(&self) -> usize {
        CAP
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl<const CAP: usize> fmt::Write for BoundedBuffer<CAP> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let available = CAP - self.len;
        let take = if s.len() <= available {
            s.len()
        } else {
            // back up to a char boundary so we never split a code point
            let mut at = available;
            while at > 0 && !s.is_char_boundary(at) {
                at -= 1;
            }
            at
        };
        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

impl<const CAP: usize> Default for BoundedBuffer<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> fmt::Debug for BoundedBuffer<CAP> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedBuffer")
            .field("len", &self.len)
            .field("capacity", &CAP)
            .field("contents", &self.as_str())
            .finish()
    }
}

impl<const CAP: usize> fmt::Display for BoundedBuffer<CAP> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/*
Boilerplate notes for BoundedBuffer:

IMPLEMENTED:
- Debug: Manual - shows length/capacity plus contents, [u8; CAP] has no useful derive
- Default: Implemented - obvious zero-value (empty buffer)
- Display: Implemented - the rendered message is the natural representation

NOT IMPLEMENTED:
- Clone/Copy: 8KB memcpy per clone is exactly the cost this type exists to avoid
- PartialEq/Eq/Hash: scratch buffers are not values to compare or key on
- From/Into, AsRef<str>: as_str() is explicit about what you get

AUTOMATIC:
- Send: the buffer owns plain bytes
- Sync: likewise, though buffers are stack-scoped and never shared in practice
*/

/// Writes the built-in `HH:MM:SS.mmm` wall-clock timestamp, followed by the
/// column gap the plain-text format uses.
pub(crate) fn write_timestamp(out: &mut MessageBuffer) {
    use std::fmt::Write;
    let now = chrono::Local::now();
    let _ = write!(
        out,
        "{:02}:{:02}:{:02}.{:03}   ",
        now.hour(),
        now.minute(),
        now.second(),
        now.timestamp_subsec_millis()
    );
}
