//! Configuration types and structures.
//!
//! These are the declarative, serializable forms of a tee: each
//! [`SinkConfig`] becomes one sink of the composite logger.

use serde::{Deserialize, Serialize};
use crate::errors::{LogError, Result};
use crate::{Level, RotationPeriod, TextFormat, TimePrecision};

/// Size-based rotation settings for a log file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RotateOptions {
    /// Maximum size in megabytes before the file is rotated (0 means 100)
    #[serde(default)]
    pub max_size: u64,
    /// Days to retain rotated backups (0 disables age-based removal)
    #[serde(default)]
    pub max_age: u32,
    /// Number of rotated backups to keep (0 keeps all)
    #[serde(default)]
    pub max_backups: usize,
    /// Whether rotated backups are gzip-compressed
    #[serde(default)]
    pub compress: bool,
    /// Whether backup timestamps use local time instead of UTC
    #[serde(default)]
    pub local_time: bool,
}

impl RotateOptions {
    /// Default maximum file size in megabytes.
    pub const DEFAULT_MAX_SIZE_MB: u64 = 100;

    /// Maximum file size in bytes, applying the default when unset.
    pub fn max_bytes(&self) -> u64 {
        let mb = if self.max_size == 0 {
            Self::DEFAULT_MAX_SIZE_MB
        } else {
            self.max_size
        };
        mb.saturating_mul(1024 * 1024)
    }
}

/// How a file sink rolls over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    /// Rotate when the file grows past a size
    Size(RotateOptions),
    /// Roll to a new file every period
    Time {
        /// Rolling period
        period: RotationPeriod,
        /// Maximum number of files kept (all when unset)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_files: Option<usize>,
    },
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation::Size(RotateOptions::default())
    }
}

/// Inclusive band of accepted levels; an open end accepts everything on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelRange {
    /// Least severe accepted level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Level>,
    /// Most severe accepted level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Level>,
}

impl LevelRange {
    /// Range accepting `min..=max`.
    pub fn between(min: Level, max: Level) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Range accepting `min` and everything above it.
    pub fn at_least(min: Level) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Whether `level` falls in the range.
    pub fn contains(&self, level: Level) -> bool {
        self.min.map_or(true, |min| level >= min) && self.max.map_or(true, |max| level <= max)
    }
}

/// Console stream a sink may write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleStream {
    /// Standard output
    Stdout,
    /// Standard error
    Stderr,
}

/// One sink of a tee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Log file, relative paths resolve against the base path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Console stream, exclusive with `file`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub console: Option<ConsoleStream>,
    /// Text encoding
    #[serde(default)]
    pub format: TextFormat,
    /// Timestamp precision; unset defers to `CONF_LOG_TIME_FORMAT`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_precision: Option<TimePrecision>,
    /// Accepted levels
    #[serde(default)]
    pub levels: LevelRange,
    /// Rotation policy for file sinks
    #[serde(default, with = "serde_yaml::with::singleton_map")]
    pub rotation: Rotation,
}

impl SinkConfig {
    /// Check the sink names exactly one target and a sane level range.
    pub fn validate(&self) -> Result<()> {
        match (&self.file, &self.console) {
            (Some(_), Some(_)) => {
                return Err(LogError::Validation(
                    "sink cannot have both `file` and `console`".to_string(),
                ))
            }
            (None, None) => {
                return Err(LogError::Validation(
                    "sink needs either `file` or `console`".to_string(),
                ))
            }
            (Some(file), None) if file.trim().is_empty() => {
                return Err(LogError::Validation("sink `file` is empty".to_string()))
            }
            _ => {}
        }

        if let (Some(min), Some(max)) = (self.levels.min, self.levels.max) {
            if min > max {
                return Err(LogError::Validation(format!(
                    "level range is empty: min {} is above max {}",
                    min, max
                )));
            }
        }

        if let Rotation::Time { max_files: Some(0), .. } = self.rotation {
            return Err(LogError::Validation(
                "time rotation `max_files` must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Declarative configuration of a tee logger.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeeConfig {
    /// Directory for relative sink files; unset uses `CONF_LOG_PATH` or `logs/`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    /// Logger name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Annotate entries with the call site
    #[serde(default)]
    pub caller: bool,
    /// Capture stack traces at and above this level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<Level>,
    /// Development mode (DPanic panics)
    #[serde(default)]
    pub development: bool,
    /// Sinks of the tee
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,
}

impl TeeConfig {
    /// Validate every sink.
    pub fn validate(&self) -> Result<()> {
        if self.sinks.is_empty() {
            return Err(LogError::Validation(
                "at least one sink is required".to_string(),
            ));
        }
        for (idx, sink) in self.sinks.iter().enumerate() {
            sink.validate().map_err(|e| match e {
                LogError::Validation(msg) => {
                    LogError::Validation(format!("sink #{}: {}", idx, msg))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// The production layout: everything from info up as JSON in `all.log`,
    /// warnings and above as console text in `error.log`.
    pub fn production() -> Self {
        Self {
            base_path: None,
            name: None,
            caller: true,
            stacktrace: Some(Level::Error),
            development: false,
            sinks: vec![
                SinkConfig {
                    file: Some("all.log".to_string()),
                    console: None,
                    format: TextFormat::Json,
                    time_precision: Some(TimePrecision::Millisecond),
                    levels: LevelRange::between(Level::Info, Level::Fatal),
                    rotation: Rotation::Size(RotateOptions {
                        max_size: 100,
                        max_age: 30,
                        max_backups: 100,
                        compress: true,
                        local_time: false,
                    }),
                },
                SinkConfig {
                    file: Some("error.log".to_string()),
                    console: None,
                    format: TextFormat::Console,
                    time_precision: Some(TimePrecision::Millisecond),
                    levels: LevelRange::at_least(Level::Warn),
                    rotation: Rotation::Size(RotateOptions {
                        max_size: 10,
                        max_age: 7,
                        max_backups: 10,
                        compress: false,
                        local_time: false,
                    }),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_bytes_default() {
        assert_eq!(RotateOptions::default().max_bytes(), 100 * 1024 * 1024);
        let opts = RotateOptions {
            max_size: 10,
            ..Default::default()
        };
        assert_eq!(opts.max_bytes(), 10 * 1024 * 1024);

        let huge = RotateOptions {
            max_size: u64::MAX / 1024,
            ..Default::default()
        };
        assert_eq!(huge.max_bytes(), u64::MAX);
    }

    #[test]
    fn test_backup_times_default_to_utc() {
        assert!(!RotateOptions::default().local_time);
        let prod = TeeConfig::production();
        for sink in &prod.sinks {
            match &sink.rotation {
                Rotation::Size(opts) => assert!(!opts.local_time),
                other => panic!("unexpected rotation {:?}", other),
            }
        }
    }

    #[test]
    fn test_sink_from_yaml() {
        let yaml = r#"
file: all.log
format: console
time_precision: second
levels: { min: info, max: fatal }
rotation:
  size: { max_size: 5, max_backups: 3, compress: true }
"#;
        let sink: SinkConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(sink.format, TextFormat::Console);
        assert_eq!(sink.time_precision, Some(TimePrecision::Second));
        assert_eq!(sink.levels, LevelRange::between(Level::Info, Level::Fatal));
        match sink.rotation {
            Rotation::Size(opts) => {
                assert_eq!(opts.max_size, 5);
                assert_eq!(opts.max_backups, 3);
                assert!(opts.compress);
                assert!(!opts.local_time);
            }
            other => panic!("unexpected rotation {:?}", other),
        }
    }

    #[test]
    fn test_time_rotation_from_yaml() {
        let yaml = "console: stderr\nrotation:\n  time: { period: daily, max_files: 7 }\n";
        let sink: SinkConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(sink.console, Some(ConsoleStream::Stderr));
        assert_eq!(
            sink.rotation,
            Rotation::Time {
                period: RotationPeriod::Daily,
                max_files: Some(7)
            }
        );
    }

    #[test]
    fn test_sink_validation() {
        let mut sink = SinkConfig {
            file: None,
            console: None,
            format: TextFormat::Json,
            time_precision: None,
            levels: LevelRange::default(),
            rotation: Rotation::default(),
        };
        assert!(sink.validate().is_err());

        sink.console = Some(ConsoleStream::Stdout);
        assert!(sink.validate().is_ok());

        sink.file = Some("both.log".into());
        assert!(sink.validate().is_err());

        sink.file = None;
        sink.levels = LevelRange::between(Level::Error, Level::Info);
        assert!(sink.validate().is_err());
    }

    #[test]
    fn test_tee_requires_sinks() {
        let err = TeeConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("at least one sink"));
        assert!(TeeConfig::production().validate().is_ok());
    }

    #[test]
    fn test_production_filters() {
        let prod = TeeConfig::production();
        let all = prod.sinks[0].levels;
        let errors = prod.sinks[1].levels;

        assert!(!all.contains(Level::Debug));
        assert!(all.contains(Level::Info));
        assert!(all.contains(Level::Fatal));

        assert!(!errors.contains(Level::Info));
        assert!(errors.contains(Level::Warn));
        assert!(errors.contains(Level::Panic));
    }
}
