#![allow(clippy::module_name_repetitions)]
//! Small utilities: shell quoting, line checks, compact ids, command templates.

pub mod id;
pub mod template;

pub use template::{CommandLine, Placeholder, Template};

/// True when `s` would break the one-command-per-line layout of a script.
pub fn has_line_break(s: &str) -> bool {
    s.contains('\n') || s.contains('\r') || s.contains('\0')
}

/// POSIX single-quote escaping; safe words are returned bare.
pub fn shell_escape(s: &str) -> String {
    if s.is_empty() {
        "''".to_string()
    } else if s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_=./:@+,".contains(c))
    {
        s.to_string()
    } else {
        let escaped = s.replace('\'', "'\"'\"'");
        format!("'{}'", escaped)
    }
}
