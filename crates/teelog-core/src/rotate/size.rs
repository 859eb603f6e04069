use chrono::{Duration, Local, NaiveDateTime, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use teelog_types::{bail, LogError, Result, RotateOptions};

use crate::writer::WriteSyncer;

const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const COMPRESS_SUFFIX: &str = ".gz";

/// A log file that rotates itself once it reaches a size limit.
///
/// Rotation renames the live file to `<stem>-<timestamp><ext>` next to it and
/// starts a fresh one. After each rotation the backups are pruned by count and
/// age and, if requested, gzip-compressed.
///
/// When that cleanup fails during a write, the entry is still written and the
/// cleanup error is returned by the same `write_all` (or the next `flush`), so
/// it reaches the owning logger's error output.
#[derive(Debug)]
pub struct RotatingFile {
    filename: PathBuf,
    options: RotateOptions,
    max_bytes: u64,
    file: Option<File>,
    size: u64,
    mill_error: Option<LogError>,
}

#[derive(Debug)]
struct Backup {
    name: String,
    timestamp: NaiveDateTime,
}

impl RotatingFile {
    /// Create a rotating file without touching the filesystem.
    ///
    /// An empty filename means `<temp dir>/<executable>-teelog.log`.
    pub fn new(filename: impl AsRef<Path>, options: RotateOptions) -> Self {
        let filename = filename.as_ref();
        let filename = if filename.as_os_str().is_empty() {
            default_filename()
        } else {
            filename.to_path_buf()
        };
        let max_bytes = options.max_bytes();

        Self {
            filename,
            options,
            max_bytes,
            file: None,
            size: 0,
            mill_error: None,
        }
    }

    /// Create a rotating file and open it right away, creating parent directories.
    pub fn open(filename: impl AsRef<Path>, options: RotateOptions) -> Result<Self> {
        let mut file = Self::new(filename, options);
        file.open_existing_or_new(0)?;
        Ok(file)
    }

    /// Path of the live file.
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// Bytes in the live file.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Close the live file; the next write reopens it.
    pub fn close(&mut self) {
        self.file = None;
    }

    /// Rotate now, then prune and compress backups.
    pub fn rotate(&mut self) -> Result<()> {
        self.close();
        self.open_new()?;
        self.mill()
    }

    #[cfg(test)]
    fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn write_entry(&mut self, buf: &[u8]) -> Result<()> {
        let len = buf.len() as u64;
        if len > self.max_bytes {
            bail!(
                Rotation,
                "write length {} exceeds maximum file size {}",
                len,
                self.max_bytes
            );
        }

        if self.file.is_none() {
            self.open_existing_or_new(len)?;
        }

        if self.size + len > self.max_bytes {
            self.close();
            self.open_new()?;
            // Reported once the entry itself is on disk.
            if let Err(e) = self.mill() {
                self.mill_error.get_or_insert(e);
            }
        }

        match self.file.as_mut() {
            Some(file) => file.write_all(buf)?,
            None => bail!(Rotation, "log file {} is not open", self.filename.display()),
        }
        self.size += len;
        Ok(())
    }

    fn take_mill_error(&mut self) -> io::Result<()> {
        match self.mill_error.take() {
            Some(e) => Err(e.into_io()),
            None => Ok(()),
        }
    }

    fn open_existing_or_new(&mut self, write_len: u64) -> Result<()> {
        let info = match fs::metadata(&self.filename) {
            Ok(info) => info,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return self.open_new(),
            Err(e) => bail!(Rotation, "error getting log file info: {}", e),
        };

        if info.len() + write_len >= self.max_bytes {
            return self.rotate();
        }

        match OpenOptions::new().append(true).open(&self.filename) {
            Ok(file) => {
                self.file = Some(file);
                self.size = info.len();
                Ok(())
            }
            // An unreadable old file is left alone in favour of a fresh one.
            Err(_) => self.open_new(),
        }
    }

    fn open_new(&mut self) -> Result<()> {
        fs::create_dir_all(self.dir()).map_err(|e| {
            LogError::Rotation(format!("can't make directories for new logfile: {}", e))
        })?;

        if self.filename.exists() {
            let backup = self.free_backup_name();
            fs::rename(&self.filename, &backup)
                .map_err(|e| LogError::Rotation(format!("can't rename log file: {}", e)))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.filename)
            .map_err(|e| LogError::Rotation(format!("can't open new logfile: {}", e)))?;
        self.file = Some(file);
        self.size = 0;
        Ok(())
    }

    /// Prune backups beyond `max_backups` or older than `max_age`, then compress.
    fn mill(&self) -> Result<()> {
        if self.options.max_backups == 0 && self.options.max_age == 0 && !self.options.compress {
            return Ok(());
        }

        let mut files = self.backups()?;
        let mut remove = Vec::new();

        if self.options.max_backups > 0 && self.options.max_backups < files.len() {
            let mut preserved = HashSet::new();
            let mut remaining = Vec::new();
            for backup in files {
                preserved.insert(backup.name.trim_end_matches(COMPRESS_SUFFIX).to_string());
                if preserved.len() > self.options.max_backups {
                    remove.push(backup);
                } else {
                    remaining.push(backup);
                }
            }
            files = remaining;
        }

        // A cutoff before the earliest representable time expires nothing.
        let cutoff = match self.options.max_age {
            0 => None,
            days => self
                .now()
                .checked_sub_signed(Duration::days(i64::from(days))),
        };
        if let Some(cutoff) = cutoff {
            let (expired, kept): (Vec<_>, Vec<_>) =
                files.into_iter().partition(|b| b.timestamp < cutoff);
            remove.extend(expired);
            files = kept;
        }

        let dir = self.dir();
        let mut first_err = None;

        for backup in &remove {
            if let Err(e) = fs::remove_file(dir.join(&backup.name)) {
                first_err.get_or_insert(LogError::Rotation(format!(
                    "can't remove backup {}: {}",
                    backup.name, e
                )));
            }
        }

        if self.options.compress {
            for backup in files.iter().filter(|b| !b.name.ends_with(COMPRESS_SUFFIX)) {
                let src = dir.join(&backup.name);
                let dst = dir.join(format!("{}{}", backup.name, COMPRESS_SUFFIX));
                if let Err(e) = compress_file(&src, &dst) {
                    first_err.get_or_insert(e);
                }
            }
        }

        first_err.map_or(Ok(()), Err)
    }

    /// Backups of this file, newest first.
    fn backups(&self) -> Result<Vec<Backup>> {
        let entries = fs::read_dir(self.dir())
            .map_err(|e| LogError::Rotation(format!("can't read log file directory: {}", e)))?;
        let (prefix, ext) = self.prefix_and_ext();
        let gz_ext = format!("{}{}", ext, COMPRESS_SUFFIX);

        let mut backups = Vec::new();
        for entry in entries.flatten() {
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let timestamp = timestamp_from_name(&name, &prefix, &ext)
                .or_else(|| timestamp_from_name(&name, &prefix, &gz_ext));
            if let Some(timestamp) = timestamp {
                backups.push(Backup { name, timestamp });
            }
        }

        backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(backups)
    }

    fn free_backup_name(&self) -> PathBuf {
        let (prefix, ext) = self.prefix_and_ext();
        let dir = self.dir();
        let mut stamp = self.now();
        loop {
            let candidate = dir.join(format!(
                "{}{}{}",
                prefix,
                stamp.format(BACKUP_TIME_FORMAT),
                ext
            ));
            let compressed = PathBuf::from(format!("{}{}", candidate.display(), COMPRESS_SUFFIX));
            if !candidate.exists() && !compressed.exists() {
                return candidate;
            }
            // two rotations in the same millisecond
            stamp += Duration::milliseconds(1);
        }
    }

    fn prefix_and_ext(&self) -> (String, String) {
        let name = self
            .filename
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = self
            .filename
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let stem = &name[..name.len() - ext.len()];
        (format!("{}-", stem), ext)
    }

    fn dir(&self) -> PathBuf {
        match self.filename.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn now(&self) -> NaiveDateTime {
        if self.options.local_time {
            Local::now().naive_local()
        } else {
            Utc::now().naive_utc()
        }
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_entry(buf).map_err(LogError::into_io)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        self.take_mill_error()
    }
}

impl WriteSyncer for RotatingFile {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.write_entry(buf).map_err(LogError::into_io)?;
        self.take_mill_error()
    }

    fn sync(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => {
                file.flush()?;
                file.sync_all()
            }
            None => Ok(()),
        }
    }
}

fn timestamp_from_name(name: &str, prefix: &str, ext: &str) -> Option<NaiveDateTime> {
    if name.len() <= prefix.len() + ext.len() || !name.starts_with(prefix) || !name.ends_with(ext) {
        return None;
    }
    let stamp = &name[prefix.len()..name.len() - ext.len()];
    NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT).ok()
}

fn compress_file(src: &Path, dst: &Path) -> Result<()> {
    let result = (|| -> io::Result<()> {
        let mut input = File::open(src)?;
        let mut encoder = GzEncoder::new(File::create(dst)?, Compression::default());
        io::copy(&mut input, &mut encoder)?;
        encoder.finish()?.sync_all()?;
        fs::remove_file(src)
    })();

    result.map_err(|e| {
        let _ = fs::remove_file(dst);
        LogError::Rotation(format!("can't compress {}: {}", src.display(), e))
    })
}

fn default_filename() -> PathBuf {
    let name = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "teelog".to_string());
    std::env::temp_dir().join(format!("{}-teelog.log", name))
}
