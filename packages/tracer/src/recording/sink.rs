// packages/tracer/src/recording/sink.rs
//! Byte sinks for qlog documents
//!
//! A sink is a `Write` with an explicit close. The tracer closes its sink
//! exactly once, at the end of a successful export.

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Destination of a qlog document
pub trait Sink: Write + Send + 'static {
    /// Flush and release the destination
    fn close(&mut self) -> io::Result<()>;
}

impl Sink for Box<dyn Sink> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Buffered file sink
pub struct FileSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl FileSink {
    /// Create (or truncate) the file at `path`
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        debug!("Opened qlog file {:?}", path);

        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl Sink for FileSink {
    fn close(&mut self) -> io::Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    data: Vec<u8>,
    closed: bool,
}

/// In-memory sink; contents stay reachable through a [`MemorySinkHandle`]
#[derive(Debug, Default)]
pub struct MemorySink {
    state: Arc<Mutex<MemoryState>>,
}

/// Read access to a [`MemorySink`] after it has been handed to a tracer
#[derive(Debug, Clone)]
pub struct MemorySinkHandle {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> MemorySinkHandle {
        MemorySinkHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl MemorySinkHandle {
    pub fn contents(&self) -> Vec<u8> {
        self.state.lock().data.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
        }
        state.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Sink for MemorySink {
    fn close(&mut self) -> io::Result<()> {
        self.state.lock().closed = true;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Sinks with scripted failures

    use super::*;

    /// Accepts `ok_writes` write calls, then fails every write
    pub struct FailingSink {
        pub inner: MemorySink,
        ok_writes: usize,
        writes: usize,
        fail_close: bool,
    }

    impl FailingSink {
        pub fn after(ok_writes: usize) -> Self {
            Self {
                inner: MemorySink::new(),
                ok_writes,
                writes: 0,
                fail_close: false,
            }
        }

        pub fn failing_close() -> Self {
            Self {
                fail_close: true,
                ..Self::after(usize::MAX)
            }
        }
    }

    impl Write for FailingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            if self.writes > self.ok_writes {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            self.inner.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Sink for FailingSink {
        fn close(&mut self) -> io::Result<()> {
            if self.fail_close {
                return Err(io::Error::new(io::ErrorKind::Other, "close failed"));
            }
            self.inner.close()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        let handle = sink.handle();

        sink.write_all(b"hello ").unwrap();
        sink.write_all(b"world").unwrap();
        assert_eq!(handle.contents(), b"hello world");
        assert!(!handle.is_closed());

        sink.close().unwrap();
        assert!(handle.is_closed());
        assert!(sink.write_all(b"!").is_err());
    }

    #[test]
    fn test_file_sink() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trace.qlog");

        let mut sink = FileSink::create(&path).unwrap();
        assert_eq!(sink.path(), path.as_path());
        sink.write_all(b"{\"a\":1}").unwrap();
        sink.close().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"{\"a\":1}");
    }

    #[test]
    fn test_boxed_sink_close() {
        let sink = MemorySink::new();
        let handle = sink.handle();

        let mut boxed: Box<dyn Sink> = Box::new(sink);
        boxed.write_all(b"x").unwrap();
        Sink::close(&mut boxed).unwrap();
        assert!(handle.is_closed());
    }
}
