//! Error types for teelog operations.

use thiserror::Error;

/// The main error type for teelog operations.
///
/// Covers configuration mistakes caught before a logger is built as well as
/// failures of the writers and hooks a built logger drives.
#[derive(Error, Debug)]
pub enum LogError {
    /// Configuration-related error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Log file rotation error
    #[error("Rotation error: {0}")]
    Rotation(String),

    /// Hook execution error
    #[error("Hook error: {0}")]
    Hook(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal bug - should never happen in production
    #[error("Bug detected: {0} (this is an internal error)")]
    Bug(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl LogError {
    /// Convert into an `io::Error`, keeping I/O errors intact.
    ///
    /// Writers speak `io::Result`, so errors raised by rotation or hooks are
    /// folded into `io::ErrorKind::Other` there.
    pub fn into_io(self) -> std::io::Error {
        match self {
            LogError::Io(e) => e,
            other => std::io::Error::new(std::io::ErrorKind::Other, other.to_string()),
        }
    }
}

/// A specialized Result type for teelog operations.
pub type Result<T> = std::result::Result<T, LogError>;

/// Helper macro to create and return a LogError::Bug
///
/// This should be used for conditions that should never occur
/// in normal operation and indicate a bug in teelog itself.
///
/// # Example
///
/// ```ignore
/// if sinks.len() != encoders.len() {
///     bug!("sink/encoder mismatch: {} vs {}", sinks.len(), encoders.len());
/// }
/// ```
#[macro_export]
macro_rules! bug {
    ($msg:expr) => {
        return Err($crate::LogError::Bug($msg.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::LogError::Bug(format!($fmt, $($arg)*)))
    };
}

/// Helper macro to bail out with a LogError
///
/// This is used for expected error conditions.
///
/// # Example
///
/// ```ignore
/// if config.sinks.is_empty() {
///     bail!(Validation, "at least one sink is required");
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($variant:ident, $msg:expr) => {
        return Err($crate::LogError::$variant($msg.to_string()))
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::LogError::$variant(format!($fmt, $($arg)*)))
    };
    ($msg:expr) => {
        return Err($crate::LogError::Other($msg.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::LogError::Other(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(sinks: usize) -> Result<usize> {
        if sinks == 0 {
            bail!(Validation, "at least one sink is required");
        }
        Ok(sinks)
    }

    #[test]
    fn test_bail_variant() {
        let err = validate(0).unwrap_err();
        assert!(matches!(err, LogError::Validation(_)));
        assert_eq!(err.to_string(), "Validation error: at least one sink is required");
        assert_eq!(validate(2).unwrap(), 2);
    }

    #[test]
    fn test_into_io_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(LogError::Io(io).into_io().kind(), std::io::ErrorKind::NotFound);

        let folded = LogError::Rotation("write too large".into()).into_io();
        assert_eq!(folded.kind(), std::io::ErrorKind::Other);
        assert!(folded.to_string().contains("write too large"));
    }
}
