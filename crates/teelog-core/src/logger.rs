//! The leveled logger handed to application code.

use parking_lot::Mutex;
use std::backtrace::Backtrace;
use std::fmt;
use std::io::Write;
use std::panic::Location;
use std::sync::Arc;
use teelog_types::{Level, Result, TimePrecision};

use crate::encoder::{ConsoleEncoder, EncoderConfig};
use crate::entry::{Caller, Entry};
use crate::field::Field;
use crate::hook::Hook;
use crate::sink::{Sink, Tee};
use crate::writer::{AddSync, Console, WriteSyncer};

type SharedWriter = Arc<Mutex<Box<dyn WriteSyncer>>>;

/// Behaviour shared by every entry a logger writes.
#[derive(Clone, Default)]
pub struct LoggerOptions {
    caller: bool,
    stacktrace: Option<Level>,
    hooks: Vec<Hook>,
    development: bool,
    fields: Vec<Field>,
    name: Option<String>,
    error_output: Option<SharedWriter>,
}

impl LoggerOptions {
    /// Options with everything off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotate entries with the call site.
    pub fn with_caller(mut self, enabled: bool) -> Self {
        self.caller = enabled;
        self
    }

    /// Capture a stack trace for entries at or above `level`.
    pub fn add_stacktrace(mut self, level: Level) -> Self {
        self.stacktrace = Some(level);
        self
    }

    /// Run `hook` after each written entry.
    pub fn hook(mut self, hook: Hook) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Run every hook in `hooks` after each written entry.
    pub fn hooks(mut self, hooks: impl IntoIterator<Item = Hook>) -> Self {
        self.hooks.extend(hooks);
        self
    }

    /// Development mode: `dpanic` entries panic after being written.
    pub fn development(mut self, enabled: bool) -> Self {
        self.development = enabled;
        self
    }

    /// Context fields added to every entry.
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Logger name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Where write and hook failures are reported; standard error by default.
    pub fn error_output(mut self, writer: impl WriteSyncer + 'static) -> Self {
        self.error_output = Some(Arc::new(Mutex::new(Box::new(writer))));
        self
    }
}

impl fmt::Debug for LoggerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerOptions")
            .field("caller", &self.caller)
            .field("stacktrace", &self.stacktrace)
            .field("hooks", &self.hooks.len())
            .field("development", &self.development)
            .field("fields", &self.fields)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A structured, leveled logger over a tee of sinks.
///
/// Cloning is cheap; clones share the sinks.
#[derive(Clone)]
pub struct Logger {
    core: Arc<Tee>,
    options: LoggerOptions,
}

impl Logger {
    /// Logger over an assembled tee.
    pub fn from_tee(tee: Tee, options: LoggerOptions) -> Self {
        Self {
            core: Arc::new(tee),
            options,
        }
    }

    /// Logger that writes nothing.
    pub fn nop() -> Self {
        Self::from_tee(Tee::default(), LoggerOptions::default())
    }

    /// The sinks behind this logger.
    pub fn core(&self) -> &Tee {
        &self.core
    }

    /// Logger name, if any.
    pub fn name(&self) -> Option<&str> {
        self.options.name.as_deref()
    }

    /// Whether any sink accepts `level`.
    pub fn enabled(&self, level: Level) -> bool {
        self.core.enabled(level)
    }

    /// Child logger that adds `fields` to every entry.
    pub fn with(&self, fields: impl IntoIterator<Item = Field>) -> Logger {
        let mut child = self.clone();
        child.options.fields.extend(fields);
        child
    }

    /// Child logger with `name` appended to the current name, dot-separated.
    pub fn named(&self, name: &str) -> Logger {
        let mut child = self.clone();
        if name.is_empty() {
            return child;
        }
        child.options.name = Some(match &self.options.name {
            Some(parent) => format!("{}.{}", parent, name),
            None => name.to_string(),
        });
        child
    }

    /// Flush every sink.
    pub fn sync(&self) -> Result<()> {
        self.core.sync()
    }

    /// Log at `debug`.
    #[track_caller]
    pub fn debug(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Debug, msg, fields);
    }

    /// Log at `info`.
    #[track_caller]
    pub fn info(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Info, msg, fields);
    }

    /// Log at `warn`.
    #[track_caller]
    pub fn warn(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Warn, msg, fields);
    }

    /// Log at `error`.
    #[track_caller]
    pub fn error(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Error, msg, fields);
    }

    /// Log at `dpanic`; panics afterwards in development mode.
    #[track_caller]
    pub fn dpanic(&self, msg: &str, fields: &[Field]) {
        self.log(Level::DPanic, msg, fields);
    }

    /// Log at `panic`, then panic with the message.
    #[track_caller]
    pub fn panic(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Panic, msg, fields);
    }

    /// Log at `fatal`, flush, then exit the process with status 1.
    #[track_caller]
    pub fn fatal(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Fatal, msg, fields);
    }

    /// Log at any level.
    ///
    /// The panic and exit behaviour of `dpanic`, `panic` and `fatal` applies
    /// even when no sink accepts the entry.
    #[track_caller]
    pub fn log(&self, level: Level, msg: &str, fields: &[Field]) {
        let location = Location::caller();
        let caller = self.options.caller.then(|| Caller::from_location(location));
        self.write_entry(level, msg, caller, None, fields);
        self.after_write(level, msg);
    }

    /// Write an entry whose call site and name were resolved elsewhere.
    pub(crate) fn log_external(
        &self,
        level: Level,
        msg: &str,
        caller: Option<Caller>,
        name: Option<&str>,
        fields: &[Field],
    ) {
        let caller = if self.options.caller { caller } else { None };
        self.write_entry(level, msg, caller, name, fields);
    }

    fn write_entry(
        &self,
        level: Level,
        msg: &str,
        caller: Option<Caller>,
        name: Option<&str>,
        fields: &[Field],
    ) {
        if !self.core.enabled(level) {
            return;
        }

        let mut entry = Entry::new(level, msg);
        entry.logger_name = name.map(str::to_string).or_else(|| self.options.name.clone());
        entry.caller = caller;
        if self.options.stacktrace.map_or(false, |min| level >= min) {
            entry.stack = Some(Backtrace::force_capture().to_string());
        }

        let write_result = if self.options.fields.is_empty() {
            self.core.write(&entry, fields)
        } else {
            let mut all = self.options.fields.clone();
            all.extend_from_slice(fields);
            self.core.write(&entry, &all)
        };
        if let Err(e) = write_result {
            self.report(&format!("write error: {}", e));
        }

        for hook in &self.options.hooks {
            if let Err(e) = hook(&entry) {
                self.report(&format!("hook error: {}", e));
            }
        }
    }

    fn after_write(&self, level: Level, msg: &str) {
        match level {
            Level::DPanic if self.options.development => panic!("{}", msg),
            Level::Panic => panic!("{}", msg),
            Level::Fatal => {
                if let Err(e) = self.sync() {
                    self.report(&format!("sync error: {}", e));
                }
                std::process::exit(1);
            }
            _ => {}
        }
    }

    fn report(&self, message: &str) {
        let line = format!(
            "{} {}\n",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.9f UTC"),
            message
        );
        // Nowhere left to report a failing error output.
        let _ = match &self.options.error_output {
            Some(out) => {
                let mut out = out.lock();
                out.write_all(line.as_bytes()).and_then(|_| out.sync())
            }
            None => {
                let mut stderr = Console::stderr();
                stderr.write_all(line.as_bytes())
            }
        };
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("sinks", &self.core.len())
            .field("options", &self.options)
            .finish()
    }
}

/// Logger writing console-encoded entries at or above `level` to `writer`.
///
/// Timestamps have millisecond precision and levels are capitalized. The
/// writer is not rotated.
pub fn new<W>(writer: W, level: Level, options: LoggerOptions) -> Logger
where
    W: Write + Send + 'static,
{
    let sink = Sink::new(
        Box::new(ConsoleEncoder::new(EncoderConfig::production(Some(
            TimePrecision::Millisecond,
        )))),
        Box::new(AddSync(writer)),
        Arc::new(level),
    );
    Logger::from_tee(Tee::new(vec![sink]), options)
}
