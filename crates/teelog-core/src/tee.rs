//! Building a multi-sink logger from per-sink options.
//!
//! ## Example
//!
//! ```no_run
//! use teelog_core::tee::{new_tee_with_rotate, TeeOption};
//! use teelog_core::LoggerOptions;
//! use teelog_types::{Level, RotateOptions, Rotation, TextFormat};
//!
//! let logger = new_tee_with_rotate(
//!     vec![
//!         TeeOption::file("logs/all.log").level(Level::Info),
//!         TeeOption::file("logs/error.log")
//!             .format(TextFormat::Console)
//!             .rotate(Rotation::Size(RotateOptions { max_size: 10, ..Default::default() }))
//!             .enabled_when(|lvl| lvl > Level::Info),
//!     ],
//!     LoggerOptions::new().with_caller(true),
//! )?;
//! logger.info("ready", &[]);
//! # Ok::<(), teelog_types::LogError>(())
//! ```

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use teelog_types::{
    ConsoleStream, Level, LevelEnabler, LevelEncoding, Result, Rotation, TextFormat, TimePrecision,
};

use crate::encoder::{self, EncoderConfig};
use crate::logger::{Logger, LoggerOptions};
use crate::rotate;
use crate::sink::{Sink, Tee};
use crate::writer::{Console, WriteSyncer};

/// Where a sink writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A rotated log file
    File(PathBuf),
    /// Standard output
    Stdout,
    /// Standard error
    Stderr,
}

/// Configuration of one sink of a tee.
#[derive(Clone)]
pub struct TeeOption {
    /// Output target
    pub target: Target,
    /// Timestamp precision; `None` consults `CONF_LOG_TIME_FORMAT`
    pub time_precision: Option<TimePrecision>,
    /// Text encoding
    pub format: TextFormat,
    /// Level rendering
    pub level_encoding: LevelEncoding,
    /// Rotation policy, only used by file targets
    pub rotate: Rotation,
    /// Accepted levels
    pub enabler: Arc<dyn LevelEnabler>,
}

impl TeeOption {
    /// JSON file sink accepting every level with default rotation.
    ///
    /// Timestamps follow `CONF_LOG_TIME_FORMAT`, falling back to milliseconds.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::with_target(Target::File(path.into()))
    }

    /// Console sink on standard output.
    pub fn stdout() -> Self {
        Self::with_target(Target::Stdout).format(TextFormat::Console)
    }

    /// Console sink on standard error.
    pub fn stderr() -> Self {
        Self::with_target(Target::Stderr).format(TextFormat::Console)
    }

    fn with_target(target: Target) -> Self {
        Self {
            target,
            time_precision: None,
            format: TextFormat::Json,
            level_encoding: LevelEncoding::Capital,
            rotate: Rotation::default(),
            enabler: Arc::new(Level::Debug),
        }
    }

    /// Set the text encoding.
    pub fn format(mut self, format: TextFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the timestamp precision; `None` defers to the environment.
    pub fn time_precision(mut self, precision: Option<TimePrecision>) -> Self {
        self.time_precision = precision;
        self
    }

    /// Set the level rendering.
    pub fn level_encoding(mut self, encoding: LevelEncoding) -> Self {
        self.level_encoding = encoding;
        self
    }

    /// Set the rotation policy.
    pub fn rotate(mut self, rotation: Rotation) -> Self {
        self.rotate = rotation;
        self
    }

    /// Filter with any level enabler.
    pub fn level(mut self, enabler: impl LevelEnabler + 'static) -> Self {
        self.enabler = Arc::new(enabler);
        self
    }

    /// Filter with a predicate over levels.
    pub fn enabled_when<F>(self, predicate: F) -> Self
    where
        F: Fn(Level) -> bool + Send + Sync + 'static,
    {
        self.level(predicate)
    }

    /// Encoder configuration of this sink, with its own time formatter.
    pub fn encoder_config(&self) -> EncoderConfig {
        EncoderConfig::production(self.time_precision).with_level_encoding(self.level_encoding)
    }

    /// Open the writer for the target.
    pub fn open_writer(&self) -> Result<Box<dyn WriteSyncer>> {
        match &self.target {
            Target::File(path) => rotate::open(path, &self.rotate),
            Target::Stdout => Ok(Box::new(Console::new(ConsoleStream::Stdout))),
            Target::Stderr => Ok(Box::new(Console::new(ConsoleStream::Stderr))),
        }
    }

    /// Assemble the sink described by this option.
    pub fn build_sink(&self) -> Result<Sink> {
        let encoder = encoder::for_format(self.format, self.encoder_config());
        let writer = self.open_writer()?;
        Ok(Sink::new(encoder, writer, Arc::clone(&self.enabler)))
    }
}

impl fmt::Debug for TeeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeeOption")
            .field("target", &self.target)
            .field("time_precision", &self.time_precision)
            .field("format", &self.format)
            .field("level_encoding", &self.level_encoding)
            .field("rotate", &self.rotate)
            .finish_non_exhaustive()
    }
}

/// Build one logger that fans every entry out to a sink per option.
///
/// Sinks are created in order, each with its own encoder, time formatter,
/// writer and level filter. An empty list yields a logger that writes nothing.
pub fn new_tee_with_rotate(tops: Vec<TeeOption>, options: LoggerOptions) -> Result<Logger> {
    let sinks = tops
        .iter()
        .map(TeeOption::build_sink)
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(sinks = sinks.len(), "built tee logger");

    Ok(Logger::from_tee(Tee::new(sinks), options))
}
