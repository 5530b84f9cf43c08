//! Protocol-safe output sink.

use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::error::Error;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Line-oriented destination for the TAP stream.
///
/// Clones share the same underlying writer. Each line is written and flushed while holding
/// the writer's lock, so suites that share one sink never interleave partial lines.
#[derive(Clone)]
pub struct TapSink {
    writer: SharedWriter,
}

impl TapSink {
    /// Returns a sink writing to the process's standard output.
    pub fn stdout() -> Self {
        Self::from_writer(std::io::stdout())
    }

    /// Returns a sink wrapping the given writer.
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Returns a sink capturing into memory, along with a handle for reading back what was
    /// written.
    pub fn memory() -> (Self, MemoryBuffer) {
        let buffer = MemoryBuffer::default();
        (Self::from_writer(buffer.clone()), buffer)
    }

    /// Writes a single protocol line; a trailing newline is appended.
    pub fn write_line(&self, line: &str) -> Result<(), Error> {
        let mut writer = self.writer.lock().map_err(|_| Error::SinkPoisoned)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

impl Default for TapSink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl std::fmt::Debug for TapSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapSink").finish_non_exhaustive()
    }
}

/// In-memory capture target for a [`TapSink`].
#[derive(Clone, Debug, Default)]
pub struct MemoryBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl MemoryBuffer {
    /// Returns everything written so far.
    pub fn contents(&self) -> String {
        match self.bytes.lock() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }

    /// Returns the lines written so far, without their terminators.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(String::from).collect()
    }
}

impl Write for MemoryBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut bytes = self
            .bytes
            .lock()
            .map_err(|_| std::io::Error::other("memory buffer is poisoned"))?;
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
