//! Sinks and the tee that fans entries out to them.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use teelog_types::{Level, LevelEnabler, Result};

use crate::encoder::Encoder;
use crate::entry::Entry;
use crate::field::Field;
use crate::writer::WriteSyncer;

/// One output: an encoder, a writer and the levels it accepts.
pub struct Sink {
    encoder: Box<dyn Encoder>,
    writer: Mutex<Box<dyn WriteSyncer>>,
    enabler: Arc<dyn LevelEnabler>,
}

impl Sink {
    /// Assemble a sink.
    pub fn new(
        encoder: Box<dyn Encoder>,
        writer: Box<dyn WriteSyncer>,
        enabler: Arc<dyn LevelEnabler>,
    ) -> Self {
        Self {
            encoder,
            writer: Mutex::new(writer),
            enabler,
        }
    }

    /// Whether this sink accepts `level`.
    pub fn enabled(&self, level: Level) -> bool {
        self.enabler.enabled(level)
    }

    /// Encode and write an entry, if the sink accepts its level.
    ///
    /// Returns whether the entry was accepted.
    pub fn write(&self, entry: &Entry, fields: &[Field]) -> Result<bool> {
        if !self.enabled(entry.level) {
            return Ok(false);
        }
        let encoded = self.encoder.encode(entry, fields)?;
        self.writer.lock().write_all(&encoded)?;
        Ok(true)
    }

    /// Flush the writer.
    pub fn sync(&self) -> Result<()> {
        self.writer.lock().sync()?;
        Ok(())
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink").finish_non_exhaustive()
    }
}

/// Composite of sinks; every entry is offered to each of them.
#[derive(Debug, Default)]
pub struct Tee {
    sinks: Vec<Sink>,
}

impl Tee {
    /// Tee over `sinks`, in order.
    pub fn new(sinks: Vec<Sink>) -> Self {
        Self { sinks }
    }

    /// Number of sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether the tee has no sinks.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Whether any sink accepts `level`.
    pub fn enabled(&self, level: Level) -> bool {
        self.sinks.iter().any(|s| s.enabled(level))
    }

    /// Offer the entry to every sink.
    ///
    /// A failing sink does not stop delivery to the rest; the first error is
    /// returned once all sinks have been tried.
    pub fn write(&self, entry: &Entry, fields: &[Field]) -> Result<()> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.write(entry, fields) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Flush every sink, returning the first error.
    pub fn sync(&self) -> Result<()> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.sync() {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}
