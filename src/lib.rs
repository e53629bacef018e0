// Tagtrace Core - debug tracing and host-redirectable console output
//
// The seam between a tag-extraction tool and a host that runs it in-process.
// Architecture: every console write and exit goes through one Console handle;
// tracing and tag formatting sit on top and never see the OS streams.

pub mod config;
pub mod debug;
pub mod error;
pub mod sink;
pub mod tag;

// PyO3 bindings layer (Python hosts)
#[cfg(feature = "python")]
pub mod bindings;

pub use config::TraceConfig;
pub use debug::{DebugLevel, DebugLevels, ScanChar, Tracer};
pub use error::{ConfigError, LifecycleError};
pub use sink::{
    Console, DirectSink, HostFunctions, MemorySink, OutputSink, RedirectedSink, Stream, Terminated,
};
pub use tag::{format_tag_entry, ExtensionFields, KindName, TagRecord};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Tagtrace Core Python module
///
/// Lets a Python host capture the tag tool's console output and drive its debug tracing.
#[cfg(feature = "python")]
#[pymodule]
fn tagtrace_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    // Add Python functions
    m.add_function(wrap_pyfunction!(bindings::redirect_output, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::use_direct_output, m)?)?;

    // Add Python classes
    m.add_class::<bindings::PyTracer>()?;

    Ok(())
}
