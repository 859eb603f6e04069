//! A single log record as seen by encoders and hooks.

use chrono::{DateTime, Local};
use std::fmt;
use std::panic::Location;
use teelog_types::Level;

/// Source location that produced an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Source file path as reported by the compiler
    pub file: String,
    /// Line number
    pub line: u32,
}

impl Caller {
    /// Create a caller from a file and line.
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Caller of the function annotated with `#[track_caller]`.
    pub fn from_location(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }

    /// `dir/file.rs:line`, trimmed to the last two path components.
    pub fn short(&self) -> String {
        let normalized = self.file.replace('\\', "/");
        let mut parts = normalized.rsplitn(3, '/');
        let file = parts.next().unwrap_or_default();
        match parts.next() {
            Some(dir) => format!("{}/{}:{}", dir, file, self.line),
            None => format!("{}:{}", file, self.line),
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short())
    }
}

/// Metadata of a log record; fields travel separately.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Severity
    pub level: Level,
    /// When the entry was created
    pub time: DateTime<Local>,
    /// Name of the logger, if any
    pub logger_name: Option<String>,
    /// Message
    pub message: String,
    /// Call site, when caller annotation is on
    pub caller: Option<Caller>,
    /// Captured stack trace, when enabled for this level
    pub stack: Option<String>,
}

impl Entry {
    /// Entry stamped with the current time and no annotations.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            time: Local::now(),
            logger_name: None,
            message: message.into(),
            caller: None,
            stack: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_short() {
        let caller = Caller::new("/home/dev/app/src/server/listener.rs", 42);
        assert_eq!(caller.short(), "server/listener.rs:42");
        assert_eq!(Caller::new("main.rs", 7).to_string(), "main.rs:7");
        assert_eq!(Caller::new("src\\lib.rs", 1).short(), "src/lib.rs:1");
    }

    #[test]
    fn test_from_location() {
        let caller = Caller::from_location(Location::caller());
        assert!(caller.file.ends_with("entry.rs"));
        assert!(caller.line > 0);
    }
}
