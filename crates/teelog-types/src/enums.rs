//! Common enumerations used throughout teelog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{LogError, Result};

/// Severity of a log entry, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Verbose diagnostics, usually disabled in production
    Debug,
    /// Routine operational messages
    Info,
    /// Something unexpected that does not need attention yet
    Warn,
    /// Failures that need attention
    Error,
    /// Panics in development mode, logs like `Error` otherwise
    #[serde(rename = "dpanic")]
    DPanic,
    /// Logs the entry, then panics
    Panic,
    /// Logs the entry, then exits the process
    Fatal,
}

impl Level {
    /// All levels in ascending severity.
    pub const ALL: [Level; 7] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::DPanic,
        Level::Panic,
        Level::Fatal,
    ];

    /// Lowercase name of the level.
    pub fn as_lowercase(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::DPanic => "dpanic",
            Level::Panic => "panic",
            Level::Fatal => "fatal",
        }
    }

    /// Capitalized name of the level.
    pub fn as_capital(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::DPanic => "DPANIC",
            Level::Panic => "PANIC",
            Level::Fatal => "FATAL",
        }
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            "DPANIC" => Ok(Level::DPanic),
            "PANIC" => Ok(Level::Panic),
            "FATAL" => Ok(Level::Fatal),
            _ => Err(LogError::Validation(format!("Invalid log level: {}", s))),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_capital())
    }
}

/// Text encoding of a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Human-readable, tab-separated columns
    Console,
}

impl FromStr for TextFormat {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(TextFormat::Json),
            "console" => Ok(TextFormat::Console),
            _ => Err(LogError::Validation(format!("Invalid text format: {}", s))),
        }
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextFormat::Json => write!(f, "json"),
            TextFormat::Console => write!(f, "console"),
        }
    }
}

/// Precision of the timestamp written with each entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePrecision {
    /// `2006-01-02T15:04:05`
    Second,
    /// `2006-01-02T15:04:05.000`
    Millisecond,
}

impl FromStr for TimePrecision {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "second" => Ok(TimePrecision::Second),
            "millisecond" => Ok(TimePrecision::Millisecond),
            _ => Err(LogError::Validation(format!("Invalid time precision: {}", s))),
        }
    }
}

/// How the level is rendered by an encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelEncoding {
    /// `INFO`
    #[default]
    Capital,
    /// `INFO` wrapped in terminal color codes
    CapitalColor,
    /// `info`
    Lowercase,
}

/// Period of a time-based rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationPeriod {
    /// New file every minute
    Minutely,
    /// New file every hour
    Hourly,
    /// New file every day
    Daily,
    /// A single file that never rolls
    Never,
}
