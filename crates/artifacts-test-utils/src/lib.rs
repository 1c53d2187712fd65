//! Testing utilities for the artifacts workspace
//!
//! Shared fixtures: an in-memory log sink, a logger that writes into it, and
//! a stub artifact writer that records what it was asked to write.

#![allow(missing_docs)]

use artifacts_context::{ArtifactWriteError, ArtifactWriter, Logger};
use parking_lot::Mutex;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

/// Log sink shared between a subscriber and the test reading it
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }
}

pub struct CapturedWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl Write for CapturedWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CapturedWriter {
            buf: Arc::clone(&self.buf),
        }
    }
}

/// Logger recording every event at `TRACE` and above into the returned sink
pub fn captured_logger() -> (Logger, CapturedLogs) {
    let logs = CapturedLogs::new();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    (Logger::from_subscriber(subscriber), logs)
}

/// Artifact writer that keeps each write in memory and reports `root/name`
#[derive(Debug)]
pub struct RecordingWriter {
    root: PathBuf,
    writes: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn shared(root: impl Into<PathBuf>) -> Arc<Self> {
        Arc::new(Self::new(root))
    }

    pub fn writes(&self) -> Vec<(String, Vec<u8>)> {
        self.writes.lock().clone()
    }
}

impl ArtifactWriter for RecordingWriter {
    fn write_file(
        &self,
        name: &str,
        contents: &mut dyn Read,
    ) -> Result<PathBuf, ArtifactWriteError> {
        let path = self.root.join(name);
        let mut data = Vec::new();
        contents
            .read_to_end(&mut data)
            .map_err(ArtifactWriteError::io(&path))?;
        self.writes.lock().push((name.to_string(), data));
        Ok(path)
    }
}
