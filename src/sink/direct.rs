// Direct Output Sink
//
// Maps every sink operation 1:1 onto the process's standard streams and
// `std::process::exit`. This is the default when no host is embedding the tool.

use super::{OutputSink, Stream};
use std::fmt;
use std::io::{self, Write};
use tracing::debug;

/// Sink backed by the real stdout/stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectSink;

impl OutputSink for DirectSink {
    fn write_formatted(&self, stream: Stream, args: fmt::Arguments<'_>) {
        let result = match stream {
            Stream::Stdout => io::stdout().lock().write_fmt(args),
            Stream::Stderr => io::stderr().lock().write_fmt(args),
        };
        if let Err(e) = result {
            debug!("Dropped console write to {}: {}", stream, e);
        }
    }

    fn write_bytes(&self, stream: Stream, bytes: &[u8]) {
        let result = match stream {
            Stream::Stdout => io::stdout().lock().write_all(bytes),
            Stream::Stderr => io::stderr().lock().write_all(bytes),
        };
        if let Err(e) = result {
            debug!("Dropped {} raw bytes to {}: {}", bytes.len(), stream, e);
        }
    }

    fn flush(&self, stream: Stream) {
        let result = match stream {
            Stream::Stdout => io::stdout().flush(),
            Stream::Stderr => io::stderr().flush(),
        };
        if let Err(e) = result {
            debug!("Ignoring failed flush of {}: {}", stream, e);
        }
    }

    fn terminate(&self, code: i32) {
        self.flush(Stream::Stdout);
        self.flush(Stream::Stderr);
        std::process::exit(code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_write_and_flush_are_infallible() {
        let sink = DirectSink;
        sink.write_formatted(Stream::Stderr, format_args!(""));
        sink.flush(Stream::Stdout);
        sink.flush(Stream::Stderr);
    }

    #[test]
    fn test_direct_temp_dir_is_os_default() {
        assert_eq!(DirectSink.temp_dir(), std::env::temp_dir());
    }
}
