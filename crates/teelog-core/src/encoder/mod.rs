//! Encoders turn an entry and its fields into bytes for a sink.
//!
//! Both encoders share one [`EncoderConfig`], so a JSON sink and a console
//! sink of the same tee agree on key names and level rendering while each
//! keeps its own time formatter.

mod console;
mod json;

pub use console::ConsoleEncoder;
pub use json::JsonEncoder;

use std::io::Write;
use teelog_types::{Level, LevelEncoding, Result, TextFormat, TimePrecision};

use crate::entry::Entry;
use crate::field::Field;
use crate::time::TimeFormatter;

/// Serializes entries for a sink.
pub trait Encoder: Send + Sync {
    /// Encode one entry, including the trailing newline.
    fn encode(&self, entry: &Entry, fields: &[Field]) -> Result<Vec<u8>>;
}

/// Keys and renderers shared by the encoders.
///
/// An empty key drops that part of the entry from the output.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Key of the timestamp
    pub time_key: String,
    /// Key of the level
    pub level_key: String,
    /// Key of the logger name
    pub name_key: String,
    /// Key of the call site
    pub caller_key: String,
    /// Key of the message
    pub message_key: String,
    /// Key of the stack trace
    pub stacktrace_key: String,
    /// Level rendering
    pub level_encoding: LevelEncoding,
    /// Timestamp rendering
    pub time: TimeFormatter,
}

impl EncoderConfig {
    /// Production layout: `created_at` timestamps and capital levels.
    pub fn production(precision: Option<TimePrecision>) -> Self {
        Self {
            time_key: "created_at".to_string(),
            level_key: "level".to_string(),
            name_key: "logger".to_string(),
            caller_key: "caller".to_string(),
            message_key: "msg".to_string(),
            stacktrace_key: "stacktrace".to_string(),
            level_encoding: LevelEncoding::Capital,
            time: TimeFormatter::for_precision(precision),
        }
    }

    /// Same layout with a different level rendering.
    pub fn with_level_encoding(mut self, encoding: LevelEncoding) -> Self {
        self.level_encoding = encoding;
        self
    }

    pub(crate) fn encode_level(&self, level: Level) -> String {
        match self.level_encoding {
            LevelEncoding::Capital => level.as_capital().to_string(),
            LevelEncoding::CapitalColor => crate::term::color_level(level),
            LevelEncoding::Lowercase => level.as_lowercase().to_string(),
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::production(Some(TimePrecision::Millisecond))
    }
}

/// Encoder for a text format.
pub fn for_format(format: TextFormat, config: EncoderConfig) -> Box<dyn Encoder> {
    match format {
        TextFormat::Json => Box::new(JsonEncoder::new(config)),
        TextFormat::Console => Box::new(ConsoleEncoder::new(config)),
    }
}

/// Write `"key":value` pairs without the surrounding braces, keeping field order.
pub(crate) fn write_json_pairs(
    buf: &mut Vec<u8>,
    fields: &[Field],
    mut needs_comma: bool,
) -> Result<()> {
    for field in fields {
        if needs_comma {
            buf.push(b',');
        }
        serde_json::to_writer(&mut *buf, &field.key)?;
        buf.push(b':');
        serde_json::to_writer(&mut *buf, &field.value.to_json())?;
        needs_comma = true;
    }
    Ok(())
}

/// Write a single `"key":"value"` string pair.
pub(crate) fn write_json_str(
    buf: &mut Vec<u8>,
    key: &str,
    value: &str,
    needs_comma: bool,
) -> Result<()> {
    if needs_comma {
        buf.push(b',');
    }
    serde_json::to_writer(&mut *buf, key)?;
    buf.push(b':');
    serde_json::to_writer(&mut *buf, value)?;
    Ok(())
}

pub(crate) fn write_line(buf: &mut Vec<u8>, text: &str) -> Result<()> {
    buf.write_all(text.as_bytes())?;
    buf.push(b'\n');
    Ok(())
}
