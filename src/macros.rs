// SPDX-License-Identifier: MIT OR Apache-2.0

//! Forwarding macros: the `printf`-shaped front door to the engine.
//!
//! These expand to a single call into [`log`](crate::log),
//! [`log_raw`](crate::log_raw), or [`CallstackScope`](crate::CallstackScope);
//! all formatting goes through `format_args!`, so arguments are only
//! evaluated when the call is actually made and rendering stays bounded by
//! the message buffer.

/// Logs a formatted message at the given level.
///
/// ```rust
/// use fanlog::Level;
///
/// fanlog::log!(Level::Warning, "only {} slots left", 2);
/// ```
#[macro_export]
macro_rules! log {
    ($level:expr, $($arg:tt)*) => {
        $crate::log($level, ::core::format_args!($($arg)*))
    };
}

/// Logs a formatted message without timestamp or nesting prefix, bypassing
/// the sink level filter.
///
/// ```rust
/// use fanlog::Level;
///
/// fanlog::log_raw!(Level::Paranoid, "raw dump: {:?}", [1, 2, 3]);
/// ```
#[macro_export]
macro_rules! log_raw {
    ($level:expr, $($arg:tt)*) => {
        $crate::log_raw($level, ::core::format_args!($($arg)*))
    };
}

/// Pushes a formatted procedure label for the enclosing scope.
///
/// Binds to a local so the scope pops where the binding drops:
///
/// ```rust
/// use fanlog::Level;
///
/// fn resize(width: u32, height: u32) {
///     let _scope = fanlog::scope!("resize({width}x{height})->");
///     fanlog::log!(Level::Log, "reallocating buffers");
/// }
/// # resize(640, 480);
/// ```
#[macro_export]
macro_rules! scope {
    ($($arg:tt)*) => {
        $crate::CallstackScope::with_args(::core::format_args!($($arg)*))
    };
}
