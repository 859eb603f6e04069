//! Process-wide default logger.
//!
//! The default starts as a console logger on stdout (debug and up, caller
//! annotation, stack traces from error up) and can be swapped atomically at
//! any time with [`reset_default`]. The free functions in this module always
//! resolve the default at call time, so a swap is visible to every caller
//! immediately while calls already in flight finish on the logger they loaded.
//!
//! ## Example
//!
//! ```no_run
//! use teelog_core::{field, log, LoggerOptions};
//! use teelog_types::Level;
//!
//! log::production_default(
//!     LoggerOptions::new()
//!         .with_caller(true)
//!         .add_stacktrace(Level::Error)
//!         .hook(teelog_core::hook::stdout_hooker()),
//! )?;
//!
//! log::info("started", &[field::string("hello", "world")]);
//! teelog_core::infof!("listening on {}", 8080);
//! log::sync()?;
//! # Ok::<(), teelog_types::LogError>(())
//! ```

use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use std::sync::Arc;
use teelog_types::{Level, Result, TeeConfig};

use crate::config::TeeConfigExt;
use crate::field::Field;
use crate::logger::{self, Logger, LoggerOptions};
use crate::tee::new_tee_with_rotate;
use crate::util::fs::with_trailing_slash;

/// Environment variable naming the directory production logs go to.
pub const LOG_PATH_ENV: &str = "CONF_LOG_PATH";

/// Directory used when `CONF_LOG_PATH` is unset.
pub const DEFAULT_LOG_PATH: &str = "logs/";

static DEFAULT: Lazy<ArcSwap<Logger>> = Lazy::new(|| ArcSwap::from_pointee(initial()));

fn initial() -> Logger {
    logger::new(
        std::io::stdout(),
        Level::Debug,
        LoggerOptions::new()
            .with_caller(true)
            .add_stacktrace(Level::Error),
    )
}

/// The current default logger.
pub fn default() -> Arc<Logger> {
    DEFAULT.load_full()
}

/// Replace the default logger.
pub fn reset_default(logger: Logger) {
    replace_default(logger);
}

/// Replace the default logger, returning the one it replaced.
pub fn replace_default(logger: Logger) -> Arc<Logger> {
    let sinks = logger.core().len();
    let previous = DEFAULT.swap(Arc::new(logger));
    tracing::debug!(sinks, "default logger replaced");
    previous
}

/// Flush the default logger.
pub fn sync() -> Result<()> {
    DEFAULT.load().sync()
}

/// Directory for production log files: `CONF_LOG_PATH` with a trailing
/// slash, or `logs/`.
pub fn base_path() -> String {
    match std::env::var(LOG_PATH_ENV) {
        Ok(path) if !path.is_empty() => with_trailing_slash(&path),
        _ => DEFAULT_LOG_PATH.to_string(),
    }
}

/// Install the production tee as the default logger.
///
/// `all.log` receives info and up as JSON; `error.log` receives warnings and
/// up as console text. Both live under [`base_path`] and rotate by size.
pub fn production_default(options: LoggerOptions) -> Result<()> {
    let tops = TeeConfig::production().tee_options()?;
    let logger = new_tee_with_rotate(tops, options)?;
    reset_default(logger);
    Ok(())
}

/// Log at `debug` on the default logger.
#[track_caller]
pub fn debug(msg: &str, fields: &[Field]) {
    DEFAULT.load().debug(msg, fields);
}

/// Log at `info` on the default logger.
#[track_caller]
pub fn info(msg: &str, fields: &[Field]) {
    DEFAULT.load().info(msg, fields);
}

/// Log at `warn` on the default logger.
#[track_caller]
pub fn warn(msg: &str, fields: &[Field]) {
    DEFAULT.load().warn(msg, fields);
}

/// Log at `error` on the default logger.
#[track_caller]
pub fn error(msg: &str, fields: &[Field]) {
    DEFAULT.load().error(msg, fields);
}

/// Log at `dpanic` on the default logger.
#[track_caller]
pub fn dpanic(msg: &str, fields: &[Field]) {
    DEFAULT.load().dpanic(msg, fields);
}

/// Log at `panic` on the default logger, then panic.
#[track_caller]
pub fn panic(msg: &str, fields: &[Field]) {
    DEFAULT.load_full().panic(msg, fields);
}

/// Log at `fatal` on the default logger, then exit.
#[track_caller]
pub fn fatal(msg: &str, fields: &[Field]) {
    DEFAULT.load_full().fatal(msg, fields);
}

/// Log a formatted message at `debug` on the default logger.
#[macro_export]
macro_rules! debugf {
    ($($arg:tt)*) => {
        $crate::log::debug(&::std::format!($($arg)*), &[])
    };
}

/// Log a formatted message at `info` on the default logger.
#[macro_export]
macro_rules! infof {
    ($($arg:tt)*) => {
        $crate::log::info(&::std::format!($($arg)*), &[])
    };
}

/// Log a formatted message at `warn` on the default logger.
#[macro_export]
macro_rules! warnf {
    ($($arg:tt)*) => {
        $crate::log::warn(&::std::format!($($arg)*), &[])
    };
}

/// Log a formatted message at `error` on the default logger.
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)*) => {
        $crate::log::error(&::std::format!($($arg)*), &[])
    };
}

/// Log a formatted message at `dpanic` on the default logger.
#[macro_export]
macro_rules! dpanicf {
    ($($arg:tt)*) => {
        $crate::log::dpanic(&::std::format!($($arg)*), &[])
    };
}

/// Log a formatted message at `panic` on the default logger, then panic.
#[macro_export]
macro_rules! panicf {
    ($($arg:tt)*) => {
        $crate::log::panic(&::std::format!($($arg)*), &[])
    };
}

/// Log a formatted message at `fatal` on the default logger, then exit.
#[macro_export]
macro_rules! fatalf {
    ($($arg:tt)*) => {
        $crate::log::fatal(&::std::format!($($arg)*), &[])
    };
}
