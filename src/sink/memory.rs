// In-Memory Output Sink
//
// Buffers stdout/stderr bytes and records flushes and the exit code instead of
// exiting. Hosts that display tool output in their own UI can drain it, and it
// gives tests a deterministic view of what the tool produced.

use super::{OutputSink, Stream};
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Buffers {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    flushes: usize,
    exit_code: Option<i32>,
}

impl Buffers {
    fn stream(&mut self, stream: Stream) -> &mut Vec<u8> {
        match stream {
            Stream::Stdout => &mut self.stdout,
            Stream::Stderr => &mut self.stderr,
        }
    }
}

/// Sink that keeps everything in memory and never exits the process
#[derive(Debug, Default)]
pub struct MemorySink {
    buffers: Mutex<Buffers>,
    temp_dir: Option<PathBuf>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `dir` as the scratch directory instead of the OS default
    pub fn with_temp_dir(dir: impl Into<PathBuf>) -> Self {
        MemorySink {
            buffers: Mutex::default(),
            temp_dir: Some(dir.into()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Buffers> {
        self.buffers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Buffered standard output, exactly as written
    pub fn stdout_bytes(&self) -> Vec<u8> {
        self.lock().stdout.clone()
    }

    pub fn stderr_bytes(&self) -> Vec<u8> {
        self.lock().stderr.clone()
    }

    /// Buffered standard output as text; invalid UTF-8 shows as U+FFFD
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.lock().stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.lock().stderr).into_owned()
    }

    /// Drain buffered standard output
    pub fn take_stdout(&self) -> String {
        let bytes = std::mem::take(&mut self.lock().stdout);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Drain buffered standard error
    pub fn take_stderr(&self) -> String {
        let bytes = std::mem::take(&mut self.lock().stderr);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn flush_count(&self) -> usize {
        self.lock().flushes
    }

    /// Exit code of the last `terminate`, if any
    pub fn exit_code(&self) -> Option<i32> {
        self.lock().exit_code
    }
}

impl OutputSink for MemorySink {
    fn write_formatted(&self, stream: Stream, args: fmt::Arguments<'_>) {
        // Writing into a Vec cannot fail
        let _ = self.lock().stream(stream).write_fmt(args);
    }

    fn write_bytes(&self, stream: Stream, bytes: &[u8]) {
        self.lock().stream(stream).extend_from_slice(bytes);
    }

    fn put_char(&self, stream: Stream, c: char) {
        let mut buf = [0u8; 4];
        self.write_bytes(stream, c.encode_utf8(&mut buf).as_bytes());
    }

    fn flush(&self, _stream: Stream) {
        self.lock().flushes += 1;
    }

    fn terminate(&self, code: i32) {
        self.lock().exit_code = Some(code);
    }

    fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
