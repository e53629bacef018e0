//! Output sink abstraction.
//!
//! Every console write, flush, process termination and scratch-directory
//! lookup the tag tool performs is routed through an [`OutputSink`]. The
//! sink is chosen once at startup and shared through a [`Console`] handle:
//!
//! - [`DirectSink`]: the real stdout/stderr and `std::process::exit`
//! - [`RedirectedSink`]: host-supplied functions registered via [`HostFunctions`]
//! - [`MemorySink`]: in-memory buffers, for hosts that collect output themselves
//!
//! Callers never touch raw OS handles, so switching modes needs no call-site changes.

mod direct;
pub mod global;
mod memory;
mod redirected;

pub use direct::DirectSink;
pub use memory::MemorySink;
pub use redirected::{HostFunctions, HostFunctionsBuilder, RedirectedSink};

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Opaque handle naming one of the two console destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The substitution point a host implements to embed the tool.
///
/// Implementations are best-effort: a failed write or flush is swallowed,
/// never reported. `terminate` may return to the caller (cooperative hosts),
/// so nothing that calls it may rely on it diverging.
pub trait OutputSink: Send + Sync {
    /// Write formatted text to `stream`
    fn write_formatted(&self, stream: Stream, args: fmt::Arguments<'_>);

    /// Write raw bytes to `stream` unchanged. Bytes need not be valid UTF-8
    /// and a multi-byte sequence may be split across calls.
    fn write_bytes(&self, stream: Stream, bytes: &[u8]);

    /// Write a single character to `stream`
    fn put_char(&self, stream: Stream, c: char) {
        self.write_formatted(stream, format_args!("{c}"));
    }

    fn flush(&self, stream: Stream);

    /// End the run with `code`
    fn terminate(&self, code: i32);

    /// Directory used by the wider tool for scratch files
    fn temp_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }
}

/// Marker returned by [`Console::terminate`].
///
/// Reaching the code after a terminate call is legal when the host continues
/// cooperatively, so callers hand this value back up the stack instead.
#[must_use = "the run is over; return this to the caller instead of continuing"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminated {
    pub code: i32,
}

/// Shared handle to the configured sink.
///
/// Clones share the sink and the terminated flag. Once [`Console::terminate`]
/// has been called, every later write or flush through any clone is dropped.
#[derive(Clone)]
pub struct Console {
    sink: Arc<dyn OutputSink>,
    terminated: Arc<AtomicBool>,
}

impl Console {
    pub fn new<S: OutputSink + 'static>(sink: S) -> Self {
        Self::from_arc(Arc::new(sink))
    }

    pub fn from_arc(sink: Arc<dyn OutputSink>) -> Self {
        Console {
            sink,
            terminated: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Console backed by the process's real standard streams
    pub fn direct() -> Self {
        Self::new(DirectSink)
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::Acquire)
    }

    pub fn write_formatted(&self, stream: Stream, args: fmt::Arguments<'_>) {
        if self.is_terminated() {
            return;
        }
        self.sink.write_formatted(stream, args);
    }

    pub fn write_bytes(&self, stream: Stream, bytes: &[u8]) {
        if self.is_terminated() || bytes.is_empty() {
            return;
        }
        self.sink.write_bytes(stream, bytes);
    }

    /// Formatted write to standard output
    pub fn print(&self, args: fmt::Arguments<'_>) {
        self.write_formatted(Stream::Stdout, args);
    }

    /// Formatted write to standard error
    pub fn eprint(&self, args: fmt::Arguments<'_>) {
        self.write_formatted(Stream::Stderr, args);
    }

    pub fn put_char(&self, c: char) {
        if self.is_terminated() {
            return;
        }
        self.sink.put_char(Stream::Stdout, c);
    }

    /// Write `text` followed by a newline to standard output
    pub fn puts(&self, text: &str) {
        self.print(format_args!("{text}\n"));
    }

    /// Flush standard output
    pub fn flush(&self) {
        self.flush_stream(Stream::Stdout);
    }

    pub fn flush_stream(&self, stream: Stream) {
        if self.is_terminated() {
            return;
        }
        self.sink.flush(stream);
    }

    pub fn stdout(&self) -> ConsoleStream {
        ConsoleStream {
            console: self.clone(),
            stream: Stream::Stdout,
        }
    }

    pub fn stderr(&self) -> ConsoleStream {
        ConsoleStream {
            console: self.clone(),
            stream: Stream::Stderr,
        }
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.sink.temp_dir()
    }

    /// Flush both streams, seal the console, then hand `code` to the sink.
    ///
    /// In direct mode this never returns. A redirected host may return, in
    /// which case the console stays sealed and the caller must unwind.
    pub fn terminate(&self, code: i32) -> Terminated {
        if self.terminated.load(Ordering::Acquire) {
            debug!("terminate({}) on an already terminated console", code);
            return Terminated { code };
        }
        self.sink.flush(Stream::Stdout);
        self.sink.flush(Stream::Stderr);
        self.terminated.store(true, Ordering::Release);
        debug!("terminating run with exit code {}", code);
        self.sink.terminate(code);
        Terminated { code }
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("terminated", &self.is_terminated())
            .finish_non_exhaustive()
    }
}

/// One console destination, usable with `write!` through either
/// [`std::io::Write`] or [`std::fmt::Write`]
#[derive(Debug, Clone)]
pub struct ConsoleStream {
    console: Console,
    stream: Stream,
}

impl ConsoleStream {
    pub fn stream(&self) -> Stream {
        self.stream
    }
}

impl io::Write for ConsoleStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.console.write_bytes(self.stream, buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.console.flush_stream(self.stream);
        Ok(())
    }
}

impl fmt::Write for ConsoleStream {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.console.write_formatted(self.stream, format_args!("{s}"));
        Ok(())
    }
}
