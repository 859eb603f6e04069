//! # teelog Types
//!
//! Levels, formats, configuration types and errors shared by the teelog crates.
//!
//! This crate provides the vocabulary the tee engine is configured with:
//!
//! - Ordered severity levels and the encodings a sink may use
//! - The `LevelEnabler` trait that filters what each sink accepts
//! - Declarative sink and rotation configuration
//! - Error types and result aliases
//!
//! ## Example
//!
//! ```
//! use teelog_types::{Level, LevelEnabler, LevelRange};
//!
//! // Thresholds accept their own level and everything above it
//! assert!(Level::Warn.enabled(Level::Error));
//! assert!(!Level::Warn.enabled(Level::Info));
//!
//! // Ranges are inclusive on both ends
//! let band = LevelRange::between(Level::Info, Level::Error);
//! assert!(band.enabled(Level::Info));
//! assert!(!band.enabled(Level::Fatal));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod enums;
pub mod traits;
pub mod config;

// Re-export common types for convenience
pub use errors::{LogError, Result};
pub use enums::{Level, LevelEncoding, RotationPeriod, TextFormat, TimePrecision};
pub use traits::LevelEnabler;
pub use config::{ConsoleStream, LevelRange, RotateOptions, Rotation, SinkConfig, TeeConfig};
