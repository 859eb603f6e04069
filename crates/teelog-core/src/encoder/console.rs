use teelog_types::Result;

use super::{write_json_pairs, write_line, Encoder, EncoderConfig};
use crate::entry::Entry;
use crate::field::Field;

/// Human-readable, tab-separated encoder.
///
/// Columns are time, level, logger, caller and message, followed by the
/// fields as a JSON object. Missing columns are left out entirely and the
/// stack trace, when present, goes on the following lines.
#[derive(Debug, Clone, Default)]
pub struct ConsoleEncoder {
    config: EncoderConfig,
}

impl ConsoleEncoder {
    /// Create a console encoder.
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }
}

impl Encoder for ConsoleEncoder {
    fn encode(&self, entry: &Entry, fields: &[Field]) -> Result<Vec<u8>> {
        let cfg = &self.config;
        let mut columns: Vec<String> = Vec::with_capacity(6);

        if !cfg.time_key.is_empty() {
            columns.push(cfg.time.format(&entry.time));
        }
        if !cfg.level_key.is_empty() {
            columns.push(cfg.encode_level(entry.level));
        }
        if let (false, Some(name)) = (cfg.name_key.is_empty(), &entry.logger_name) {
            columns.push(name.clone());
        }
        if let (false, Some(caller)) = (cfg.caller_key.is_empty(), &entry.caller) {
            columns.push(caller.short());
        }
        if !cfg.message_key.is_empty() {
            columns.push(entry.message.clone());
        }

        let mut buf = columns.join("\t").into_bytes();
        if !fields.is_empty() {
            buf.extend_from_slice(b"\t{");
            write_json_pairs(&mut buf, fields, false)?;
            buf.push(b'}');
        }
        buf.push(b'\n');

        if let (false, Some(stack)) = (cfg.stacktrace_key.is_empty(), &entry.stack) {
            write_line(&mut buf, stack.trim_end())?;
        }

        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Caller;
    use crate::field;
    use chrono::TimeZone;
    use teelog_types::{Level, LevelEncoding, TimePrecision};

    fn entry(level: Level) -> Entry {
        let mut entry = Entry::new(level, "output");
        entry.time = chrono::Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::milliseconds(7);
        entry
    }

    #[test]
    fn test_columns() {
        let encoder = ConsoleEncoder::new(EncoderConfig::production(Some(
            TimePrecision::Millisecond,
        )));
        let out = encoder
            .encode(&entry(Level::Warn), &[field::string("hello", "world")])
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "2024-01-02T03:04:05.007\tWARN\toutput\t{\"hello\":\"world\"}\n"
        );
    }

    #[test]
    fn test_caller_and_stack() {
        let encoder = ConsoleEncoder::new(
            EncoderConfig::production(Some(TimePrecision::Second))
                .with_level_encoding(LevelEncoding::Lowercase),
        );
        let mut entry = entry(Level::Error);
        entry.caller = Some(Caller::new("src/main.rs", 9));
        entry.stack = Some("0: main\n1: start\n".into());

        let text = String::from_utf8(encoder.encode(&entry, &[]).unwrap()).unwrap();
        assert_eq!(
            text,
            "2024-01-02T03:04:05\terror\tsrc/main.rs:9\toutput\n0: main\n1: start\n"
        );
    }
}
