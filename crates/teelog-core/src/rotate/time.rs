use std::path::{Path, PathBuf};
use teelog_types::{LogError, Result, RotationPeriod};
use tracing_appender::rolling::{self, RollingFileAppender};

/// Time-rolled appender for `path`.
///
/// `logs/app.log` rolled daily produces `logs/app.2024-01-02.log`. With
/// `max_files` set, the oldest files beyond that count are deleted on roll.
pub fn rolling_appender(
    path: &Path,
    period: RotationPeriod,
    max_files: Option<usize>,
) -> Result<RollingFileAppender> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let prefix = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| LogError::Rotation(format!("invalid log file name: {}", path.display())))?;

    let mut builder = RollingFileAppender::builder()
        .rotation(rotation(period))
        .filename_prefix(prefix);
    if let Some(ext) = path.extension() {
        builder = builder.filename_suffix(ext.to_string_lossy().into_owned());
    }
    if let Some(max) = max_files {
        builder = builder.max_log_files(max);
    }

    builder.build(&dir).map_err(|e| {
        LogError::Rotation(format!(
            "can't create rolling appender in {}: {}",
            dir.display(),
            e
        ))
    })
}

fn rotation(period: RotationPeriod) -> rolling::Rotation {
    match period {
        RotationPeriod::Minutely => rolling::Rotation::MINUTELY,
        RotationPeriod::Hourly => rolling::Rotation::HOURLY,
        RotationPeriod::Daily => rolling::Rotation::DAILY,
        RotationPeriod::Never => rolling::Rotation::NEVER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_daily_file_name() {
        let tmp = TempDir::new().unwrap();
        let mut appender =
            rolling_appender(&tmp.path().join("app.log"), RotationPeriod::Daily, Some(3)).unwrap();
        appender.write_all(b"rolled\n").unwrap();
        appender.flush().unwrap();

        let names: Vec<String> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("app.") && names[0].ends_with(".log"), "{:?}", names);
    }

    #[test]
    fn test_never_keeps_plain_name() {
        let tmp = TempDir::new().unwrap();
        let mut appender =
            rolling_appender(&tmp.path().join("app.log"), RotationPeriod::Never, None).unwrap();
        appender.write_all(b"static\n").unwrap();
        appender.flush().unwrap();
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("app.log")).unwrap(),
            "static\n"
        );
    }
}
