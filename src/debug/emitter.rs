//! Trace emitter.
//!
//! [`Tracer`] gates each message on its [`DebugLevel`] and writes enabled
//! messages through the [`Console`], flushing after every message so trace
//! lines interleave correctly with anything else the host prints.

use super::level::{DebugLevel, DebugLevels};
use crate::config::TraceConfig;
use crate::sink::{Console, Stream};
use crate::tag::ExtensionFields;
use std::fmt;

/// Emit a formatted trace message at a level.
///
/// ```ignore
/// trace_at!(tracer, DebugLevel::Status, "OPENING {} as {} language file", path, lang);
/// ```
#[macro_export]
macro_rules! trace_at {
    ($tracer:expr, $level:expr, $($arg:tt)*) => {
        $tracer.emit($level, format_args!($($arg)*))
    };
}

/// One unit of scanner input as seen by the character tracer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanChar {
    /// End of input
    Eof,
    /// Placeholder standing in for a whole string literal
    StringLiteral,
    /// Placeholder standing in for a whole character literal
    CharLiteral,
    Char(char),
    /// A non-ASCII input byte, echoed as-is (usually part of a UTF-8 sequence)
    Byte(u8),
}

impl ScanChar {
    /// Raw scanner value for end of input
    pub const RAW_EOF: i32 = -1;
    /// Raw scanner value for the string literal placeholder
    pub const RAW_STRING_SYMBOL: i32 = b'S' as i32 + 0x80;
    /// Raw scanner value for the character literal placeholder
    pub const RAW_CHAR_SYMBOL: i32 = b'C' as i32 + 0x80;

    /// Classify a raw scanner value. Any negative value is end of input and
    /// the placeholder values win over the bytes they share.
    pub fn from_raw(c: i32) -> Self {
        match c {
            Self::RAW_STRING_SYMBOL => ScanChar::StringLiteral,
            Self::RAW_CHAR_SYMBOL => ScanChar::CharLiteral,
            c if c < 0 => ScanChar::Eof,
            0x80..=0xFF => ScanChar::Byte(c as u8),
            c => ScanChar::Char(char::from_u32(c as u32).unwrap_or(char::REPLACEMENT_CHARACTER)),
        }
    }
}

impl From<char> for ScanChar {
    fn from(c: char) -> Self {
        ScanChar::Char(c)
    }
}

/// Level-gated writer of diagnostic output.
///
/// A `Tracer` can only be built from a [`Console`], so nothing can be traced
/// before a sink has been selected. Its levels and field options are fixed
/// for its lifetime.
#[derive(Debug, Clone)]
pub struct Tracer {
    pub(crate) console: Console,
    pub(crate) levels: DebugLevels,
    pub(crate) fields: ExtensionFields,
}

impl Tracer {
    pub fn new(console: Console, levels: DebugLevels) -> Self {
        Tracer {
            console,
            levels,
            fields: ExtensionFields::default(),
        }
    }

    pub fn from_config(console: Console, config: &TraceConfig) -> Self {
        Tracer {
            console,
            levels: config.debug,
            fields: config.fields,
        }
    }

    pub fn with_fields(mut self, fields: ExtensionFields) -> Self {
        self.fields = fields;
        self
    }

    pub fn is_enabled(&self, level: DebugLevel) -> bool {
        self.levels.is_enabled(level)
    }

    pub fn levels(&self) -> DebugLevels {
        self.levels
    }

    pub fn fields(&self) -> &ExtensionFields {
        &self.fields
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Write `args` and flush if `level` is enabled. Disabled levels never
    /// format their arguments.
    pub fn emit(&self, level: DebugLevel, args: fmt::Arguments<'_>) {
        if !self.is_enabled(level) {
            return;
        }
        self.console.print(args);
        self.console.flush();
    }

    /// Echo one unit of scanner input. Literal placeholders render as
    /// `"string"` and `'c'`; end of input renders nothing.
    pub fn emit_char(&self, level: DebugLevel, c: impl Into<ScanChar>) {
        if !self.is_enabled(level) {
            return;
        }
        match c.into() {
            ScanChar::Eof => return,
            ScanChar::StringLiteral => self.console.print(format_args!("\"string\"")),
            ScanChar::CharLiteral => self.console.print(format_args!("'c'")),
            ScanChar::Char(c) => self.console.put_char(c),
            ScanChar::Byte(b) => self.console.write_bytes(Stream::Stdout, &[b]),
        }
        self.console.flush();
    }

    /// Parser nesting depth changed
    pub fn parse_nest(&self, increase: bool, depth: u32) {
        let sign = if increase { "++" } else { "--" };
        self.emit(
            DebugLevel::Parse,
            format_args!("<*{}nesting:{}*>", sign, depth),
        );
    }

    /// Entering or leaving a preprocessor conditional level
    pub fn cpp_nest(&self, begin: bool, depth: u32) {
        let edge = if begin { "begin" } else { "end" };
        self.emit(
            DebugLevel::Cpp,
            format_args!("<*cpp:{} level {}*>", edge, depth),
        );
    }

    /// Entering or leaving an ignored preprocessor branch
    pub fn cpp_ignore(&self, ignore: bool) {
        let edge = if ignore { "begin" } else { "end" };
        self.emit(DebugLevel::Cpp, format_args!("<*cpp:{} ignore*>", edge));
    }

    /// Does nothing. Parsers call this at line boundaries so a debugger
    /// breakpoint here stops once per line.
    #[inline(never)]
    pub fn line_break(&self) {}
}
