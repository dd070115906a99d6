// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fan-out targets: persistent sink formatting (plain text and HTML) and
//! the colored console.
//!
//! Sink write failures are swallowed: once the sink is open, logging is
//! best-effort and a full disk must not take the process down with it.

use std::fs::File;
use std::io::{self, Write};

use colored::Colorize;

use crate::Level;
use crate::config::LogConfig;
use crate::context::ThreadIdentity;

/// Writes one rendered line to the persistent sink, in plain or HTML form.
pub(crate) fn write_line(
    file: &mut File,
    config: &LogConfig,
    level: Level,
    who: &ThreadIdentity,
    line: &str,
) {
    if config.html_log {
        let _ = write_html_line(file, config, level, who, line);
    } else {
        let _ = write_plain_line(file, config, who, line);
    }
    if config.force_flush {
        let _ = file.flush();
    }
}

fn write_plain_line(
    file: &mut File,
    config: &LogConfig,
    who: &ThreadIdentity,
    line: &str,
) -> io::Result<()> {
    if config.thread_names {
        write!(file, "{who}")?;
    }
    writeln!(file, "{line}")
}

fn write_html_line(
    file: &mut File,
    config: &LogConfig,
    level: Level,
    who: &ThreadIdentity,
    line: &str,
) -> io::Result<()> {
    // one style per level, doubled: even classes for the main thread, odd for
    // everyone else
    let class = 2 * (level as u8) + u8::from(is_secondary(config, who));
    write!(file, "<div class=\"l{class}\">")?;
    if config.thread_names {
        write_escaped(file, &who.to_string())?;
    }
    write_escaped(file, line)?;
    writeln!(file, "</div>")
}

/// A thread is "secondary" when its name differs from the configured main
/// thread name; unnamed threads count as secondary.
fn is_secondary(config: &LogConfig, who: &ThreadIdentity) -> bool {
    who.name.as_deref() != Some(config.main_thread_name.as_str())
}

fn write_escaped(file: &mut File, text: &str) -> io::Result<()> {
    let mut rest = text;
    while let Some(i) = rest.find(['&', '<', '>']) {
        file.write_all(rest[..i].as_bytes())?;
        file.write_all(match rest.as_bytes()[i] {
            b'&' => b"&amp;".as_slice(),
            b'<' => b"&lt;".as_slice(),
            _ => b"&gt;".as_slice(),
        })?;
        rest = &rest[i + 1..];
    }
    file.write_all(rest.as_bytes())
}

/// Prints one rendered line to the console, bracketing it in color codes when
/// configured.
pub(crate) fn print_console(config: &LogConfig, level: Level, who: &ThreadIdentity, line: &str) {
    let full = if config.thread_names {
        format!("{who}{line}")
    } else {
        line.to_string()
    };
    let styled = if config.colored_console {
        match level {
            Level::Warning | Level::FatalError => full.as_str().bright_red(),
            Level::Log => full.as_str().bold(),
            _ => full.as_str().normal(),
        }
    } else {
        full.as_str().normal()
    };
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "{styled}");
}

/// The built-in HTML intro, written once at `initialize` unless the config
/// overrides it. Classes `l0`..`l9` pair up as `2 * level + secondary`.
fn builtin_html_header(title: &str) -> String {
    format!(
        "<!doctype html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <style>\n\
         body {{ background-color: #141414; color: #dcdcdc; font-family: monospace; }}\n\
         div {{ white-space: pre-wrap; }}\n\
         .l0 {{ color: #6e6e6e; }} .l1 {{ color: #6e6e6e; background-color: #1e1e1e; }}\n\
         .l2 {{ color: #a0a0a0; }} .l3 {{ color: #a0a0a0; background-color: #1e1e1e; }}\n\
         .l4 {{ color: #ffffff; }} .l5 {{ color: #ffffff; background-color: #1e1e1e; }}\n\
         .l6 {{ color: #ffd866; }} .l7 {{ color: #ffd866; background-color: #1e1e1e; }}\n\
         .l8 {{ color: #ff6188; }} .l9 {{ color: #ff6188; background-color: #1e1e1e; }}\n\
         </style>\n\
         </head>\n\
         <body>\n"
    )
}

const BUILTIN_HTML_FOOTER: &str = "</body>\n</html>\n";

pub(crate) fn write_html_intro(file: &mut File, config: &LogConfig) {
    let _ = match &config.html_page_header {
        Some(header) => file.write_all(header.as_bytes()),
        None => file.write_all(builtin_html_header(&config.html_page_title).as_bytes()),
    };
}

pub(crate) fn write_html_outro(file: &mut File, config: &LogConfig) {
    let _ = match &config.html_page_footer {
        Some(footer) => file.write_all(footer.as_bytes()),
        None => file.write_all(BUILTIN_HTML_FOOTER.as_bytes()),
    };
}
