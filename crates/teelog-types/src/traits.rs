//! Core trait definitions for teelog abstractions.

use crate::config::LevelRange;
use crate::Level;

/// Decides whether a sink accepts entries of a given level.
///
/// Thresholds (`Level`), inclusive ranges (`LevelRange`) and plain closures
/// all implement it, so a sink can be filtered however its owner prefers.
pub trait LevelEnabler: Send + Sync {
    /// Whether entries at `level` should be written.
    fn enabled(&self, level: Level) -> bool;
}

/// A level used as a filter enables itself and everything more severe.
impl LevelEnabler for Level {
    fn enabled(&self, level: Level) -> bool {
        level >= *self
    }
}

impl LevelEnabler for LevelRange {
    fn enabled(&self, level: Level) -> bool {
        self.contains(level)
    }
}

impl<F> LevelEnabler for F
where
    F: Fn(Level) -> bool + Send + Sync,
{
    fn enabled(&self, level: Level) -> bool {
        self(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted(enabler: &dyn LevelEnabler) -> Vec<Level> {
        Level::ALL.into_iter().filter(|l| enabler.enabled(*l)).collect()
    }

    #[test]
    fn test_threshold() {
        assert_eq!(
            accepted(&Level::Panic),
            vec![Level::Panic, Level::Fatal]
        );
    }

    #[test]
    fn test_range() {
        let range = LevelRange {
            min: Some(Level::Info),
            max: Some(Level::Error),
        };
        assert_eq!(
            accepted(&range),
            vec![Level::Info, Level::Warn, Level::Error]
        );
    }

    #[test]
    fn test_closure() {
        let above_info = |lvl: Level| lvl > Level::Info;
        assert_eq!(accepted(&above_info)[0], Level::Warn);
        assert_eq!(accepted(&above_info).len(), 5);
    }
}
