//! Terminal helpers for console output.

use colored::*;
use teelog_types::Level;

/// Capital level name wrapped in the color used for that severity.
pub fn color_level(level: Level) -> String {
    let name = level.as_capital();
    match level {
        Level::Debug => name.magenta().to_string(),
        Level::Info => name.blue().to_string(),
        Level::Warn => name.yellow().to_string(),
        Level::Error | Level::DPanic | Level::Panic | Level::Fatal => name.red().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_level_keeps_name() {
        colored::control::set_override(true);
        let rendered = color_level(Level::Warn);
        assert!(rendered.contains("WARN"));
        assert!(rendered.starts_with("\u{1b}["));
        colored::control::unset_override();
    }
}
