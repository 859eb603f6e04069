use teelog_types::Result;

use super::{write_json_pairs, write_json_str, Encoder, EncoderConfig};
use crate::entry::Entry;
use crate::field::Field;

/// One JSON object per entry.
///
/// Keys come out as level, time, logger, caller, message, fields, stack trace.
#[derive(Debug, Clone, Default)]
pub struct JsonEncoder {
    config: EncoderConfig,
}

impl JsonEncoder {
    /// Create a JSON encoder.
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, entry: &Entry, fields: &[Field]) -> Result<Vec<u8>> {
        let cfg = &self.config;
        let mut buf = Vec::with_capacity(256);
        let mut comma = false;

        buf.push(b'{');
        if !cfg.level_key.is_empty() {
            write_json_str(&mut buf, &cfg.level_key, &cfg.encode_level(entry.level), comma)?;
            comma = true;
        }
        if !cfg.time_key.is_empty() {
            write_json_str(&mut buf, &cfg.time_key, &cfg.time.format(&entry.time), comma)?;
            comma = true;
        }
        if let (false, Some(name)) = (cfg.name_key.is_empty(), &entry.logger_name) {
            write_json_str(&mut buf, &cfg.name_key, name, comma)?;
            comma = true;
        }
        if let (false, Some(caller)) = (cfg.caller_key.is_empty(), &entry.caller) {
            write_json_str(&mut buf, &cfg.caller_key, &caller.short(), comma)?;
            comma = true;
        }
        if !cfg.message_key.is_empty() {
            write_json_str(&mut buf, &cfg.message_key, &entry.message, comma)?;
            comma = true;
        }
        write_json_pairs(&mut buf, fields, comma)?;
        comma = comma || !fields.is_empty();
        if let (false, Some(stack)) = (cfg.stacktrace_key.is_empty(), &entry.stack) {
            write_json_str(&mut buf, &cfg.stacktrace_key, stack, comma)?;
        }
        buf.extend_from_slice(b"}\n");

        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Caller;
    use crate::field;
    use chrono::TimeZone;
    use teelog_types::{Level, TimePrecision};

    fn entry() -> Entry {
        let mut entry = Entry::new(Level::Info, "user \"created\"");
        entry.time = chrono::Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        entry
    }

    fn encoder() -> JsonEncoder {
        JsonEncoder::new(EncoderConfig::production(Some(TimePrecision::Second)))
    }

    #[test]
    fn test_key_order_and_escaping() {
        let out = encoder()
            .encode(&entry(), &[field::string("hello", "world"), field::int("n", 3)])
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"level\":\"INFO\",\"created_at\":\"2024-01-02T03:04:05\",\"msg\":\"user \\\"created\\\"\",\"hello\":\"world\",\"n\":3}\n"
        );
    }

    #[test]
    fn test_optional_keys() {
        let mut entry = entry();
        entry.logger_name = Some("api".into());
        entry.caller = Some(Caller::new("src/server/mod.rs", 12));
        entry.stack = Some("frame 0".into());

        let out = encoder().encode(&entry, &[]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["logger"], "api");
        assert_eq!(value["caller"], "server/mod.rs:12");
        assert_eq!(value["stacktrace"], "frame 0");

        let text = String::from_utf8(out).unwrap();
        assert!(text.find("\"logger\"").unwrap() < text.find("\"caller\"").unwrap());
        assert!(text.find("\"msg\"").unwrap() < text.find("\"stacktrace\"").unwrap());
    }

    #[test]
    fn test_empty_key_is_skipped() {
        let mut config = EncoderConfig::production(Some(TimePrecision::Second));
        config.time_key.clear();
        let out = JsonEncoder::new(config).encode(&entry(), &[]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(value.get("created_at").is_none());
        assert_eq!(value["level"], "INFO");
    }
}
