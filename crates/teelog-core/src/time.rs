//! Timestamp formatting for encoders.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use teelog_types::TimePrecision;

/// Environment variable holding the layout used when a sink sets no precision.
///
/// Accepts a reference layout such as `2006-01-02T15:04:05.000` or, when it
/// contains a `%`, a strftime pattern.
pub const TIME_FORMAT_ENV: &str = "CONF_LOG_TIME_FORMAT";

/// Second precision: `2006-01-02T15:04:05`.
pub const SECOND_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Millisecond precision: `2006-01-02T15:04:05.000`.
pub const MILLISECOND_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Formats entry timestamps with a validated strftime pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFormatter {
    pattern: String,
}

impl TimeFormatter {
    /// Formatter for a sink's precision.
    ///
    /// An explicit precision always wins. Without one the pattern comes from
    /// `CONF_LOG_TIME_FORMAT`, read now, falling back to millisecond precision
    /// when the variable is unset, empty or not a valid layout.
    pub fn for_precision(precision: Option<TimePrecision>) -> Self {
        match precision {
            Some(TimePrecision::Second) => Self::from_valid(SECOND_FORMAT),
            Some(TimePrecision::Millisecond) => Self::from_valid(MILLISECOND_FORMAT),
            None => std::env::var(TIME_FORMAT_ENV)
                .ok()
                .and_then(|layout| Self::custom(from_layout(&layout)))
                .unwrap_or_else(Self::millisecond),
        }
    }

    /// Millisecond precision formatter.
    pub fn millisecond() -> Self {
        Self::from_valid(MILLISECOND_FORMAT)
    }

    /// Formatter for a custom strftime pattern.
    ///
    /// `None` if the pattern is invalid or formats nothing but literal text.
    pub fn custom(pattern: impl Into<String>) -> Option<Self> {
        let pattern = pattern.into();
        if pattern.is_empty() || !is_valid_pattern(&pattern) {
            return None;
        }
        Some(Self { pattern })
    }

    fn from_valid(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
        }
    }

    /// The strftime pattern in use.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Render a timestamp.
    pub fn format(&self, time: &DateTime<Local>) -> String {
        time.format(&self.pattern).to_string()
    }
}

impl Default for TimeFormatter {
    fn default() -> Self {
        Self::millisecond()
    }
}

fn is_valid_pattern(pattern: &str) -> bool {
    let mut has_directive = false;
    for item in StrftimeItems::new(pattern) {
        match item {
            Item::Error => return false,
            Item::Literal(_) | Item::OwnedLiteral(_) | Item::Space(_) | Item::OwnedSpace(_) => {}
            _ => has_directive = true,
        }
    }
    has_directive
}

// Longest tokens first so `2006` wins over `2` and `01` over `1`.
const LAYOUT_TOKENS: &[(&str, &str)] = &[
    ("January", "%B"),
    ("Monday", "%A"),
    (".000000000", "%.9f"),
    (".999999999", "%.9f"),
    (".000000", "%.6f"),
    (".999999", "%.6f"),
    ("Z07:00", "%:z"),
    ("-07:00", "%:z"),
    ("-0700", "%z"),
    (".000", "%.3f"),
    (".999", "%.3f"),
    ("2006", "%Y"),
    ("Jan", "%b"),
    ("Mon", "%a"),
    ("MST", "%Z"),
    ("01", "%m"),
    ("02", "%d"),
    ("_2", "%e"),
    ("03", "%I"),
    ("04", "%M"),
    ("05", "%S"),
    ("06", "%y"),
    ("15", "%H"),
    ("PM", "%p"),
    ("pm", "%P"),
    ("1", "%-m"),
    ("2", "%-d"),
    ("3", "%-I"),
    ("4", "%-M"),
    ("5", "%-S"),
];

/// Translate a reference-time layout (`2006-01-02T15:04:05.000`) into a
/// strftime pattern. Anything containing `%` is taken as strftime already.
pub fn from_layout(layout: &str) -> String {
    if layout.contains('%') {
        return layout.to_string();
    }

    let mut pattern = String::with_capacity(layout.len() * 2);
    let mut rest = layout;
    'scan: while !rest.is_empty() {
        for (token, directive) in LAYOUT_TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                pattern.push_str(directive);
                rest = tail;
                continue 'scan;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            pattern.push(c);
        }
        rest = chars.as_str();
    }
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap() + chrono::Duration::milliseconds(45)
    }

    #[test]
    fn test_precisions() {
        let second = TimeFormatter::for_precision(Some(TimePrecision::Second));
        assert_eq!(second.format(&sample()), "2024-03-09T07:05:02");

        let milli = TimeFormatter::for_precision(Some(TimePrecision::Millisecond));
        assert_eq!(milli.format(&sample()), "2024-03-09T07:05:02.045");
    }

    #[test]
    fn test_env_pattern() {
        let _guard = crate::ENV_LOCK.lock();

        std::env::set_var(TIME_FORMAT_ENV, "%d/%m/%Y %H:%M");
        let custom = TimeFormatter::for_precision(None);
        assert_eq!(custom.format(&sample()), "09/03/2024 07:05");

        // explicit precision ignores the environment
        let second = TimeFormatter::for_precision(Some(TimePrecision::Second));
        assert_eq!(second.pattern(), SECOND_FORMAT);

        std::env::set_var(TIME_FORMAT_ENV, "%Q broken");
        assert_eq!(TimeFormatter::for_precision(None).pattern(), MILLISECOND_FORMAT);

        std::env::remove_var(TIME_FORMAT_ENV);
        assert_eq!(TimeFormatter::for_precision(None).pattern(), MILLISECOND_FORMAT);
    }

    #[test]
    fn test_custom_rejects_empty() {
        assert!(TimeFormatter::custom("").is_none());
        assert!(TimeFormatter::custom("%H:%M").is_some());
        assert!(TimeFormatter::custom("no directives here").is_none());
    }

    #[test]
    fn test_env_reference_layout() {
        let _guard = crate::ENV_LOCK.lock();

        std::env::set_var(TIME_FORMAT_ENV, "2006-01-02T15:04:05.000");
        let layout = TimeFormatter::for_precision(None);
        assert_eq!(layout.pattern(), MILLISECOND_FORMAT);
        assert_eq!(layout.format(&sample()), "2024-03-09T07:05:02.045");

        std::env::set_var(TIME_FORMAT_ENV, "2006/01/02 15:04");
        assert_eq!(
            TimeFormatter::for_precision(None).format(&sample()),
            "2024/03/09 07:05"
        );

        // a layout without any time element would stamp every entry the same
        std::env::set_var(TIME_FORMAT_ENV, "timestamp");
        assert_eq!(TimeFormatter::for_precision(None).pattern(), MILLISECOND_FORMAT);

        std::env::remove_var(TIME_FORMAT_ENV);
    }

    #[test]
    fn test_from_layout() {
        assert_eq!(from_layout("2006-01-02T15:04:05"), SECOND_FORMAT);
        assert_eq!(from_layout("Jan _2 03:04PM"), "%b %e %I:%M%p");
        assert_eq!(from_layout("2006-01-02T15:04:05Z07:00"), "%Y-%m-%dT%H:%M:%S%:z");
        assert_eq!(from_layout("%d/%m/%Y"), "%d/%m/%Y");
    }
}
