//! # Teelog Core
//!
//! Structured logging that fans every entry out to several sinks at once.
//!
//! This crate provides:
//!
//! - **Logger**: leveled, structured logging with caller and stack trace annotation
//! - **Tee**: one logger writing to many sinks, each with its own level filter and encoding
//! - **Rotation**: size-based rotation with retention and compression, or time-based rolling
//! - **Global default**: a process-wide logger that can be swapped atomically
//! - **Hooks**: callbacks observing every written entry
//! - **Tracing bridge**: a `tracing` layer feeding events into the default logger
//!
//! ## Example
//!
//! ```no_run
//! use teelog_core::{field, log, new_tee_with_rotate, LoggerOptions, TeeOption};
//! use teelog_types::{Level, LevelRange, TextFormat};
//!
//! let logger = new_tee_with_rotate(
//!     vec![
//!         TeeOption::file("logs/all.log").level(LevelRange::at_least(Level::Info)),
//!         TeeOption::stderr()
//!             .format(TextFormat::Console)
//!             .level(LevelRange::at_least(Level::Warn)),
//!     ],
//!     LoggerOptions::new().with_caller(true),
//! )?;
//! log::reset_default(logger);
//!
//! log::info("ready", &[field::int("port", 8080)]);
//! # Ok::<(), teelog_types::LogError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bridge;
pub mod config;
pub mod encoder;
pub mod entry;
pub mod field;
pub mod hook;
pub mod log;
pub mod logger;
pub mod rotate;
pub mod sink;
pub mod tee;
pub mod term;
pub mod time;
pub mod util;
pub mod writer;

// Re-export commonly used items
pub use config::TeeConfigExt;
pub use entry::{Caller, Entry};
pub use field::Field;
pub use hook::Hook;
pub use logger::{new, Logger, LoggerOptions};
pub use tee::{new_tee_with_rotate, Target, TeeOption};
pub use teelog_types::{LogError, Result};

/// Teelog version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Serializes tests that touch the default logger or the environment.
#[cfg(test)]
pub(crate) static ENV_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());
