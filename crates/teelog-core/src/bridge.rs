//! Bridge from `tracing` events into teelog loggers.
//!
//! Libraries that emit through `tracing` can be routed into the tee with
//! [`init_tracing`], which installs a [`TeeLayer`] following the default
//! logger. Event targets become logger names and the event's file and line
//! become the caller.

use std::cell::Cell;
use std::fmt;
use teelog_types::{Level, LogError, Result};
use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

use crate::entry::Caller;
use crate::field::{self, Field};
use crate::logger::Logger;

thread_local! {
    static IN_BRIDGE: Cell<bool> = Cell::new(false);
}

/// Marks the current thread as writing a bridged event until dropped.
struct BridgeGuard;

impl BridgeGuard {
    /// `None` when this thread is already inside the bridge.
    fn enter() -> Option<Self> {
        if IN_BRIDGE.with(|flag| flag.replace(true)) {
            None
        } else {
            Some(BridgeGuard)
        }
    }
}

impl Drop for BridgeGuard {
    fn drop(&mut self) {
        IN_BRIDGE.with(|flag| flag.set(false));
    }
}

/// Map a `tracing` level onto a teelog level. `TRACE` folds into `Debug`.
pub fn level_from_tracing(level: &tracing::Level) -> Level {
    match *level {
        tracing::Level::TRACE | tracing::Level::DEBUG => Level::Debug,
        tracing::Level::INFO => Level::Info,
        tracing::Level::WARN => Level::Warn,
        tracing::Level::ERROR => Level::Error,
    }
}

#[derive(Debug, Clone)]
enum Destination {
    Global,
    Fixed(Logger),
}

/// `tracing` layer writing every event to a teelog logger.
#[derive(Debug, Clone)]
pub struct TeeLayer {
    destination: Destination,
}

impl TeeLayer {
    /// Layer writing to whatever the default logger is at event time.
    pub fn global() -> Self {
        Self {
            destination: Destination::Global,
        }
    }

    /// Layer writing to one specific logger.
    pub fn to_logger(logger: Logger) -> Self {
        Self {
            destination: Destination::Fixed(logger),
        }
    }

    fn dispatch(&self, level: Level, visitor: EventVisitor, caller: Option<Caller>, name: &str) {
        let EventVisitor { message, fields } = visitor;
        match &self.destination {
            Destination::Global => {
                crate::log::default().log_external(level, &message, caller, Some(name), &fields)
            }
            Destination::Fixed(logger) => {
                logger.log_external(level, &message, caller, Some(name), &fields)
            }
        }
    }
}

impl<S: Subscriber> Layer<S> for TeeLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        // Events raised while an entry is being written (from a hook, say)
        // would otherwise loop back into the same logger.
        let Some(_guard) = BridgeGuard::enter() else {
            return;
        };

        let metadata = event.metadata();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let caller = metadata
            .file()
            .zip(metadata.line())
            .map(|(file, line)| Caller::new(file, line));

        self.dispatch(
            level_from_tracing(metadata.level()),
            visitor,
            caller,
            metadata.target(),
        );
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<Field>,
}

impl Visit for EventVisitor {
    fn record_str(&mut self, f: &TracingField, value: &str) {
        if f.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(field::string(f.name(), value));
        }
    }

    fn record_i64(&mut self, f: &TracingField, value: i64) {
        self.fields.push(field::int(f.name(), value));
    }

    fn record_u64(&mut self, f: &TracingField, value: u64) {
        self.fields.push(field::uint(f.name(), value));
    }

    fn record_f64(&mut self, f: &TracingField, value: f64) {
        self.fields.push(field::float(f.name(), value));
    }

    fn record_bool(&mut self, f: &TracingField, value: bool) {
        self.fields.push(field::boolean(f.name(), value));
    }

    fn record_error(&mut self, f: &TracingField, value: &(dyn std::error::Error + 'static)) {
        self.fields.push(field::named_error(f.name(), value));
    }

    fn record_debug(&mut self, f: &TracingField, value: &dyn fmt::Debug) {
        if f.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(field::string(f.name(), format!("{:?}", value)));
        }
    }
}

/// Install a global `tracing` subscriber that forwards every event to the
/// default logger.
///
/// Fails when a global subscriber is already set.
pub fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(TeeLayer::global())
        .try_init()
        .map_err(|e| LogError::Config(format!("Failed to install tracing bridge: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook;
    use crate::logger::{self, LoggerOptions};
    use crate::writer::Buffer;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn captured(level: Level, options: LoggerOptions) -> (Logger, Buffer) {
        let buffer = Buffer::new();
        (logger::new(buffer.clone(), level, options), buffer)
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(level_from_tracing(&tracing::Level::TRACE), Level::Debug);
        assert_eq!(level_from_tracing(&tracing::Level::DEBUG), Level::Debug);
        assert_eq!(level_from_tracing(&tracing::Level::INFO), Level::Info);
        assert_eq!(level_from_tracing(&tracing::Level::WARN), Level::Warn);
        assert_eq!(level_from_tracing(&tracing::Level::ERROR), Level::Error);
    }

    #[test]
    fn test_events_reach_logger() {
        let (logger, buffer) = captured(Level::Info, LoggerOptions::new().with_caller(true));
        let subscriber = tracing_subscriber::registry().with(TeeLayer::to_logger(logger));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "payments", user = "bob", attempts = 3, ok = true, "charged {}", 42);
            tracing::debug!("below threshold");
        });

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert!(line.contains("\tINFO\tpayments\t"));
        assert!(line.contains("bridge.rs:"));
        assert!(line.contains("\tcharged 42\t"));
        assert!(line.contains("\"user\":\"bob\""));
        assert!(line.contains("\"attempts\":3"));
        assert!(line.contains("\"ok\":true"));
    }

    #[test]
    fn test_caller_omitted_when_disabled() {
        let (logger, buffer) = captured(Level::Debug, LoggerOptions::new());
        let subscriber = tracing_subscriber::registry().with(TeeLayer::to_logger(logger));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "db", "slow query");
        });

        let line = buffer.contents();
        assert!(line.contains("\tWARN\tdb\tslow query"));
        assert!(!line.contains("bridge.rs"));
    }

    #[test]
    fn test_global_layer_follows_default() {
        let _guard = crate::ENV_LOCK.lock();
        let (logger, buffer) = captured(Level::Debug, LoggerOptions::new());
        let original = crate::log::replace_default(logger);
        let subscriber = tracing_subscriber::registry().with(TeeLayer::global());

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(target: "svc", code = 7, "boom");
        });
        crate::log::reset_default((*original).clone());

        let contents = buffer.contents();
        assert!(contents.contains("\tERROR\tsvc\tboom\t{\"code\":7}"));
    }

    #[test]
    fn test_events_from_hooks_are_dropped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let (logger, buffer) = captured(
            Level::Debug,
            LoggerOptions::new().hook(hook::from_fn(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
                tracing::info!("from hook");
                Ok(())
            })),
        );
        let subscriber = tracing_subscriber::registry().with(TeeLayer::to_logger(logger));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("outer");
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("outer"));
        assert!(!buffer.contents().contains("from hook"));
    }

    #[test]
    fn test_events_flow_after_panicking_hook() {
        let (logger, buffer) = captured(
            Level::Debug,
            LoggerOptions::new().hook(hook::from_fn(|entry| {
                if entry.message == "boom" {
                    panic!("hook failed");
                }
                Ok(())
            })),
        );
        let subscriber = tracing_subscriber::registry().with(TeeLayer::to_logger(logger));

        tracing::subscriber::with_default(subscriber, || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| tracing::info!("boom")));
            assert!(result.is_err());
            tracing::info!("after recovery");
        });

        let contents = buffer.contents();
        assert!(contents.contains("boom"));
        assert!(contents.contains("after recovery"));
    }
}
