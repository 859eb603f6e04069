//! Write a single entry through a configured tee.

use anyhow::{bail, Context, Result};
use std::path::Path;
use teelog_core::{field, log, Field, TeeConfigExt};
use teelog_types::{Level, TeeConfig};

pub fn execute(path: &Path, level: Level, raw_fields: &[String], message: &str) -> Result<()> {
    let fields = raw_fields
        .iter()
        .map(|raw| parse_field(raw))
        .collect::<Result<Vec<_>>>()?;

    let logger = TeeConfig::load(path)
        .and_then(|config| config.build())
        .with_context(|| format!("Failed to build logger from {}", path.display()))?;
    log::reset_default(logger);

    log::default().log(level, message, &fields);
    log::sync().context("Failed to flush log sinks")?;
    Ok(())
}

/// Parse `key=value`, typing the value as an integer, float or boolean when
/// it reads as one.
fn parse_field(raw: &str) -> Result<Field> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("field '{}' is not in key=value form", raw);
    };
    if key.is_empty() {
        bail!("field '{}' has an empty key", raw);
    }

    Ok(if let Ok(v) = value.parse::<i64>() {
        field::int(key, v)
    } else if let Ok(v) = value.parse::<f64>() {
        field::float(key, v)
    } else if let Ok(v) = value.parse::<bool>() {
        field::boolean(key, v)
    } else {
        field::string(key, value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use teelog_core::field::FieldValue;

    #[test]
    fn test_parse_field_types() {
        assert_eq!(parse_field("port=8080").unwrap().value, FieldValue::I64(8080));
        assert_eq!(parse_field("ratio=0.5").unwrap().value, FieldValue::F64(0.5));
        assert_eq!(parse_field("ok=true").unwrap().value, FieldValue::Bool(true));
        assert_eq!(
            parse_field("user=bob=admin").unwrap().value,
            FieldValue::Str("bob=admin".to_string())
        );
    }

    #[test]
    fn test_parse_field_rejects_malformed() {
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=value").is_err());
    }
}
