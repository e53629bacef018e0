// Redirected Output Sink
//
// Forwards every sink operation to functions registered by the embedding host.
// The host may buffer, log or display the text, and may decline to actually
// exit when asked to terminate.

use super::{OutputSink, Stream};
use crate::error::ConfigError;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

type WriteFn = Box<dyn Fn(Stream, &str) + Send + Sync>;
type WriteBytesFn = Box<dyn Fn(Stream, &[u8]) + Send + Sync>;
type PutCharFn = Box<dyn Fn(Stream, char) + Send + Sync>;
type FlushFn = Box<dyn Fn(Stream) + Send + Sync>;
type ExitFn = Box<dyn Fn(i32) + Send + Sync>;
type TempDirFn = Box<dyn Fn() -> PathBuf + Send + Sync>;

/// The set of host callbacks behind a [`RedirectedSink`].
///
/// `write`, `flush` and `exit` are required. Without `write_bytes`, raw
/// bytes are reassembled into UTF-8 text and go through `write`; without
/// `put_char`, single characters go through `write`; without `temp_dir`, the
/// OS default is used.
pub struct HostFunctions {
    write: WriteFn,
    write_bytes: Option<WriteBytesFn>,
    put_char: Option<PutCharFn>,
    flush: FlushFn,
    exit: ExitFn,
    temp_dir: Option<TempDirFn>,
}

impl HostFunctions {
    pub fn builder() -> HostFunctionsBuilder {
        HostFunctionsBuilder::default()
    }
}

impl fmt::Debug for HostFunctions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostFunctions")
            .field("write_bytes", &self.write_bytes.is_some())
            .field("put_char", &self.put_char.is_some())
            .field("temp_dir", &self.temp_dir.is_some())
            .finish_non_exhaustive()
    }
}

/// Registers host callbacks one at a time, then validates the set
#[derive(Default)]
pub struct HostFunctionsBuilder {
    write: Option<WriteFn>,
    write_bytes: Option<WriteBytesFn>,
    put_char: Option<PutCharFn>,
    flush: Option<FlushFn>,
    exit: Option<ExitFn>,
    temp_dir: Option<TempDirFn>,
}

impl HostFunctionsBuilder {
    pub fn write(mut self, f: impl Fn(Stream, &str) + Send + Sync + 'static) -> Self {
        self.write = Some(Box::new(f));
        self
    }

    /// Receive raw console bytes unchanged instead of reassembled text
    pub fn write_bytes(mut self, f: impl Fn(Stream, &[u8]) + Send + Sync + 'static) -> Self {
        self.write_bytes = Some(Box::new(f));
        self
    }

    pub fn put_char(mut self, f: impl Fn(Stream, char) + Send + Sync + 'static) -> Self {
        self.put_char = Some(Box::new(f));
        self
    }

    pub fn flush(mut self, f: impl Fn(Stream) + Send + Sync + 'static) -> Self {
        self.flush = Some(Box::new(f));
        self
    }

    pub fn exit(mut self, f: impl Fn(i32) + Send + Sync + 'static) -> Self {
        self.exit = Some(Box::new(f));
        self
    }

    pub fn temp_dir(mut self, f: impl Fn() -> PathBuf + Send + Sync + 'static) -> Self {
        self.temp_dir = Some(Box::new(f));
        self
    }

    pub fn build(self) -> Result<HostFunctions, ConfigError> {
        Ok(HostFunctions {
            write: self.write.ok_or(ConfigError::MissingHostFunction("write"))?,
            write_bytes: self.write_bytes,
            put_char: self.put_char,
            flush: self.flush.ok_or(ConfigError::MissingHostFunction("flush"))?,
            exit: self.exit.ok_or(ConfigError::MissingHostFunction("exit"))?,
            temp_dir: self.temp_dir,
        })
    }
}

/// Bytes held back per stream until they complete a UTF-8 sequence
#[derive(Debug, Default)]
struct PendingBytes {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl PendingBytes {
    fn stream(&mut self, stream: Stream) -> &mut Vec<u8> {
        match stream {
            Stream::Stdout => &mut self.stdout,
            Stream::Stderr => &mut self.stderr,
        }
    }
}

/// Split `pending` into text ready for the host, keeping an incomplete
/// trailing sequence. Invalid bytes become U+FFFD.
fn drain_complete_text(pending: &mut Vec<u8>) -> String {
    let mut text = String::new();
    let mut rest: &[u8] = pending;
    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                text.push_str(valid);
                rest = &[];
                break;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                // valid_up_to guarantees this prefix is UTF-8
                text.push_str(std::str::from_utf8(valid).unwrap_or_default());
                match e.error_len() {
                    Some(bad) => {
                        text.push(char::REPLACEMENT_CHARACTER);
                        rest = &after[bad..];
                    }
                    None => {
                        rest = after;
                        break;
                    }
                }
            }
        }
    }
    let kept = rest.to_vec();
    *pending = kept;
    text
}

/// Sink that hands everything to the embedding host
#[derive(Debug)]
pub struct RedirectedSink {
    host: HostFunctions,
    pending: Mutex<PendingBytes>,
}

impl RedirectedSink {
    pub fn new(host: HostFunctions) -> Self {
        RedirectedSink {
            host,
            pending: Mutex::default(),
        }
    }

    fn take_pending(&self, stream: Stream) -> Vec<u8> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(pending.stream(stream))
    }

    /// Hand any held-back partial sequence to the host as U+FFFD, so text
    /// written after it keeps its place in the stream
    fn release_pending(&self, stream: Stream) {
        let stale = self.take_pending(stream);
        if !stale.is_empty() {
            (self.host.write)(stream, &String::from_utf8_lossy(&stale));
        }
    }
}

impl OutputSink for RedirectedSink {
    fn write_formatted(&self, stream: Stream, args: fmt::Arguments<'_>) {
        if self.host.write_bytes.is_none() {
            self.release_pending(stream);
        }
        match args.as_str() {
            Some(text) => (self.host.write)(stream, text),
            None => (self.host.write)(stream, &args.to_string()),
        }
    }

    fn write_bytes(&self, stream: Stream, bytes: &[u8]) {
        if let Some(write_bytes) = &self.host.write_bytes {
            write_bytes(stream, bytes);
            return;
        }
        let text = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            let buffer = pending.stream(stream);
            buffer.extend_from_slice(bytes);
            drain_complete_text(buffer)
        };
        if !text.is_empty() {
            (self.host.write)(stream, &text);
        }
    }

    fn put_char(&self, stream: Stream, c: char) {
        if self.host.write_bytes.is_none() {
            self.release_pending(stream);
        }
        match &self.host.put_char {
            Some(put_char) => put_char(stream, c),
            None => {
                let mut buf = [0u8; 4];
                (self.host.write)(stream, c.encode_utf8(&mut buf));
            }
        }
    }

    fn flush(&self, stream: Stream) {
        (self.host.flush)(stream);
    }

    fn terminate(&self, code: i32) {
        self.release_pending(Stream::Stdout);
        self.release_pending(Stream::Stderr);
        debug!("Handing exit code {} to host", code);
        (self.host.exit)(code);
    }

    fn temp_dir(&self) -> PathBuf {
        match &self.host.temp_dir {
            Some(temp_dir) => temp_dir(),
            None => std::env::temp_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<(Stream, String)>>>;

    fn recording_host(log: &Log, exit_code: &Arc<AtomicI32>) -> HostFunctionsBuilder {
        let log = Arc::clone(log);
        let exit_code = Arc::clone(exit_code);
        HostFunctions::builder()
            .write(move |stream, text| log.lock().unwrap().push((stream, text.to_string())))
            .flush(|_| {})
            .exit(move |code| exit_code.store(code, Ordering::SeqCst))
    }

    #[test]
    fn test_host_receives_exact_formatted_text() {
        let log: Log = Arc::default();
        let exit_code = Arc::new(AtomicI32::new(-1));
        let sink = RedirectedSink::new(recording_host(&log, &exit_code).build().unwrap());

        let depth = 3;
        sink.write_formatted(Stream::Stdout, format_args!("<*++nesting:{}*>", depth));
        sink.write_formatted(Stream::Stderr, format_args!("plain"));

        let log = log.lock().unwrap();
        assert_eq!(log[0], (Stream::Stdout, format!("<*++nesting:{}*>", depth)));
        assert_eq!(log[1], (Stream::Stderr, "plain".to_string()));
    }

    #[test]
    fn test_split_utf8_bytes_reassembled_for_text_host() {
        let log: Log = Arc::default();
        let exit_code = Arc::new(AtomicI32::new(-1));
        let sink = RedirectedSink::new(recording_host(&log, &exit_code).build().unwrap());

        sink.write_bytes(Stream::Stdout, &[0xD0]);
        sink.flush(Stream::Stdout);
        assert!(log.lock().unwrap().is_empty());

        sink.write_bytes(Stream::Stdout, &[0x96, b'!']);
        assert_eq!(log.lock().unwrap()[0], (Stream::Stdout, "Ж!".to_string()));
    }

    #[test]
    fn test_invalid_bytes_become_replacement_characters() {
        let log: Log = Arc::default();
        let exit_code = Arc::new(AtomicI32::new(-1));
        let sink = RedirectedSink::new(recording_host(&log, &exit_code).build().unwrap());

        sink.write_bytes(Stream::Stderr, &[b'a', 0xFF, b'b', 0xE2, 0x82]);
        sink.write_formatted(Stream::Stderr, format_args!("c"));
        sink.write_bytes(Stream::Stderr, &[0xC3]);
        sink.terminate(0);

        let text: String = log.lock().unwrap().iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(text, "a\u{FFFD}b\u{FFFD}c\u{FFFD}");
    }

    #[test]
    fn test_raw_bytes_host_receives_bytes_unchanged() {
        let log: Log = Arc::default();
        let exit_code = Arc::new(AtomicI32::new(-1));
        let raw = Arc::new(Mutex::new(Vec::new()));
        let raw_log = Arc::clone(&raw);
        let sink = RedirectedSink::new(
            recording_host(&log, &exit_code)
                .write_bytes(move |_, bytes| raw_log.lock().unwrap().extend_from_slice(bytes))
                .build()
                .unwrap(),
        );

        sink.write_bytes(Stream::Stdout, &[0xD0]);
        sink.write_bytes(Stream::Stdout, &[0x96, 0xFF]);
        assert_eq!(*raw.lock().unwrap(), vec![0xD0, 0x96, 0xFF]);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_put_char_falls_back_to_write() {
        let log: Log = Arc::default();
        let exit_code = Arc::new(AtomicI32::new(-1));
        let sink = RedirectedSink::new(recording_host(&log, &exit_code).build().unwrap());

        sink.put_char(Stream::Stdout, 'é');
        assert_eq!(log.lock().unwrap()[0], (Stream::Stdout, "é".to_string()));
    }

    #[test]
    fn test_registered_put_char_is_used() {
        let log: Log = Arc::default();
        let exit_code = Arc::new(AtomicI32::new(-1));
        let chars = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&chars);
        let sink = RedirectedSink::new(
            recording_host(&log, &exit_code)
                .put_char(move |_, _| {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .build()
                .unwrap(),
        );

        sink.put_char(Stream::Stdout, 'x');
        assert_eq!(chars.load(Ordering::SeqCst), 1);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_terminate_returns_when_host_continues() {
        let log: Log = Arc::default();
        let exit_code = Arc::new(AtomicI32::new(-1));
        let sink = RedirectedSink::new(recording_host(&log, &exit_code).build().unwrap());

        sink.terminate(4);
        assert_eq!(exit_code.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_temp_dir_provider() {
        let log: Log = Arc::default();
        let exit_code = Arc::new(AtomicI32::new(-1));
        let sink = RedirectedSink::new(
            recording_host(&log, &exit_code)
                .temp_dir(|| PathBuf::from("/host/scratch"))
                .build()
                .unwrap(),
        );
        assert_eq!(sink.temp_dir(), PathBuf::from("/host/scratch"));

        let default = RedirectedSink::new(recording_host(&log, &exit_code).build().unwrap());
        assert_eq!(default.temp_dir(), std::env::temp_dir());
    }

    #[test]
    fn test_missing_required_functions() {
        let err = HostFunctions::builder()
            .flush(|_| {})
            .exit(|_| {})
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingHostFunction("write"));

        let err = HostFunctions::builder()
            .write(|_, _| {})
            .exit(|_| {})
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingHostFunction("flush"));

        let err = HostFunctions::builder()
            .write(|_, _| {})
            .flush(|_| {})
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingHostFunction("exit"));
    }
}
