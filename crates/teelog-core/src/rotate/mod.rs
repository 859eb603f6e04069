//! Rotating file writers.
//!
//! Size-based rotation is handled by [`RotatingFile`]; time-based rolling is
//! delegated to `tracing-appender`. Both are opened through [`open`], which
//! is what sinks call.

mod size;
mod time;

pub use size::RotatingFile;
pub use time::rolling_appender;

use std::path::Path;
use teelog_types::{Result, Rotation};

use crate::writer::{AddSync, WriteSyncer};

/// Open a writer for `path` that rotates according to `rotation`.
pub fn open(path: &Path, rotation: &Rotation) -> Result<Box<dyn WriteSyncer>> {
    match rotation {
        Rotation::Size(options) => Ok(Box::new(RotatingFile::open(path, options.clone())?)),
        Rotation::Time { period, max_files } => {
            Ok(Box::new(AddSync(rolling_appender(path, *period, *max_files)?)))
        }
    }
}
