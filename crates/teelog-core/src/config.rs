//! Loading tee configurations from YAML and turning them into loggers.
//!
//! ## Configuration file
//!
//! ```yaml
//! base_path: /var/log/app     # optional, defaults to CONF_LOG_PATH or logs/
//! caller: true
//! stacktrace: error
//! sinks:
//!   - file: all.log
//!     format: json
//!     time_precision: millisecond
//!     levels: { min: info, max: fatal }
//!     rotation:
//!       size: { max_size: 100, max_age: 30, max_backups: 100, compress: true }
//!   - console: stderr
//!     format: console
//!     levels: { min: warn }
//! ```
//!
//! Relative `file` entries resolve against the base path. A sink without
//! `time_precision` uses the pattern in `CONF_LOG_TIME_FORMAT`, if any.

use std::fs;
use std::path::{Path, PathBuf};
use teelog_types::{bug, ConsoleStream, LogError, Result, TeeConfig};

use crate::logger::{Logger, LoggerOptions};
use crate::tee::{new_tee_with_rotate, TeeOption};
use crate::util::fs::{expand_path, with_trailing_slash};

/// Loading and building for [`TeeConfig`].
pub trait TeeConfigExt: Sized {
    /// Read, parse and validate a YAML configuration file.
    fn load(path: impl AsRef<Path>) -> Result<Self>;

    /// Parse and validate a YAML configuration.
    fn from_yaml(content: &str) -> Result<Self>;

    /// Render as YAML.
    fn to_yaml(&self) -> Result<String>;

    /// Directory relative sink files resolve against.
    fn resolved_base_path(&self) -> String;

    /// Per-sink options for [`new_tee_with_rotate`].
    fn tee_options(&self) -> Result<Vec<TeeOption>>;

    /// Logger options described by the configuration.
    fn logger_options(&self) -> LoggerOptions;

    /// Build the configured logger.
    fn build(&self) -> Result<Logger>;
}

impl TeeConfigExt for TeeConfig {
    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LogError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    fn from_yaml(content: &str) -> Result<Self> {
        let config: TeeConfig = serde_yaml::from_str(content)
            .map_err(|e| LogError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn resolved_base_path(&self) -> String {
        match &self.base_path {
            Some(path) if !path.is_empty() => {
                with_trailing_slash(&expand_path(path).to_string_lossy())
            }
            _ => crate::log::base_path(),
        }
    }

    fn tee_options(&self) -> Result<Vec<TeeOption>> {
        self.validate()?;
        let base = PathBuf::from(self.resolved_base_path());

        self.sinks
            .iter()
            .map(|sink| {
                let option = match (&sink.file, sink.console) {
                    (Some(file), _) => TeeOption::file(base.join(expand_path(file))),
                    (None, Some(ConsoleStream::Stdout)) => TeeOption::stdout(),
                    (None, Some(ConsoleStream::Stderr)) => TeeOption::stderr(),
                    (None, None) => bug!("sink passed validation without a target"),
                };
                Ok(option
                    .format(sink.format)
                    .time_precision(sink.time_precision)
                    .rotate(sink.rotation.clone())
                    .level(sink.levels))
            })
            .collect()
    }

    fn logger_options(&self) -> LoggerOptions {
        let mut options = LoggerOptions::new()
            .with_caller(self.caller)
            .development(self.development);
        if let Some(level) = self.stacktrace {
            options = options.add_stacktrace(level);
        }
        if let Some(name) = &self.name {
            options = options.name(name.clone());
        }
        options
    }

    fn build(&self) -> Result<Logger> {
        new_tee_with_rotate(self.tee_options()?, self.logger_options())
    }
}
