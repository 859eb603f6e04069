//! Destinations a sink writes encoded entries to.

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;
use teelog_types::ConsoleStream;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};

/// A byte sink that can be flushed to durable storage.
#[cfg_attr(test, mockall::automock)]
pub trait WriteSyncer: Send {
    /// Write a whole encoded entry.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Flush buffered data.
    fn sync(&mut self) -> io::Result<()>;
}

impl<T: WriteSyncer + ?Sized> WriteSyncer for Box<T> {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        (**self).write_all(buf)
    }

    fn sync(&mut self) -> io::Result<()> {
        (**self).sync()
    }
}

/// Adapts any `io::Write`; syncing flushes it.
#[derive(Debug)]
pub struct AddSync<W>(pub W);

impl<W: Write + Send> WriteSyncer for AddSync<W> {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.0.write_all(buf)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

/// Standard output or standard error.
///
/// Each write takes the stream lock, so lines from concurrent sinks never interleave.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    stream: ConsoleStream,
}

impl Console {
    /// Standard output.
    pub fn stdout() -> Self {
        Self::new(ConsoleStream::Stdout)
    }

    /// Standard error.
    pub fn stderr() -> Self {
        Self::new(ConsoleStream::Stderr)
    }

    /// Console writer for a stream.
    pub fn new(stream: ConsoleStream) -> Self {
        Self { stream }
    }
}

impl WriteSyncer for Console {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self.stream {
            ConsoleStream::Stdout => io::stdout().lock().write_all(buf),
            ConsoleStream::Stderr => io::stderr().lock().write_all(buf),
        }
    }

    fn sync(&mut self) -> io::Result<()> {
        match self.stream {
            ConsoleStream::Stdout => io::stdout().flush(),
            ConsoleStream::Stderr => io::stderr().flush(),
        }
    }
}

/// Move writes for `writer` onto a background thread.
///
/// Entries are queued and written by a dedicated worker; the returned guard
/// flushes the queue when dropped and must be kept alive as long as the sink.
pub fn non_blocking<W>(writer: W) -> (AddSync<NonBlocking>, WorkerGuard)
where
    W: Write + Send + 'static,
{
    let (nb, guard) = tracing_appender::non_blocking(writer);
    (AddSync(nb), guard)
}

/// In-memory writer whose clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl Buffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }

    /// Written lines.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Discard everything written so far.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl WriteSyncer for Buffer {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.lock().extend_from_slice(buf);
        Ok(())
    }

    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_clones_share() {
        let buffer = Buffer::new();
        let mut writer = buffer.clone();
        WriteSyncer::write_all(&mut writer, b"one\ntwo\n").unwrap();
        assert_eq!(buffer.lines(), vec!["one", "two"]);
        buffer.clear();
        assert!(buffer.contents().is_empty());
    }

    #[test]
    fn test_add_sync_flushes() {
        let mut writer = AddSync(io::BufWriter::new(Buffer::new()));
        WriteSyncer::write_all(&mut writer, b"pending").unwrap();
        assert!(writer.0.get_ref().contents().is_empty());
        writer.sync().unwrap();
        assert_eq!(writer.0.get_ref().contents(), "pending");
    }

    #[test]
    fn test_non_blocking_delivers_on_drop() {
        let buffer = Buffer::new();
        {
            let (mut writer, _guard) = non_blocking(buffer.clone());
            WriteSyncer::write_all(&mut writer, b"queued\n").unwrap();
        }
        assert_eq!(buffer.lines(), vec!["queued"]);
    }
}
