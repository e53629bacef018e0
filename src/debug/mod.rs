// Debug Tracing
//
// Level-gated diagnostic output about the scan in progress. All output goes
// through the configured console, never straight to the OS streams.

pub mod emitter;
pub mod level;

pub use emitter::{ScanChar, Tracer};
pub use level::{DebugLevel, DebugLevels};
