// PyTracer - PyO3 wrapper around the trace emitter
//
// Construction requires an installed output sink, so Python code cannot trace
// before it has chosen where output goes.

use crate::config::TraceConfig;
use crate::debug::{DebugLevel, ScanChar, Tracer};
use crate::sink::global;
use crate::tag::{KindName, TagRecord};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use std::path::Path;

fn parse_level(level: &str) -> PyResult<DebugLevel> {
    level
        .parse::<DebugLevel>()
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Python-accessible trace emitter
#[pyclass(name = "Tracer")]
pub struct PyTracer {
    inner: Tracer,
    config: TraceConfig,
}

#[pymethods]
impl PyTracer {
    /// Create a tracer on the installed output sink
    ///
    /// Args:
    ///     debug_levels (list[str]): Enabled levels (read, parse, status, option, cpp, raw)
    ///     fields (list[str]): Shown extension fields (inheritance, file-scope, access, implementation, type-reference)
    ///
    /// Raises:
    ///     RuntimeError: If no output sink is installed
    ///     ValueError: If a level or field name is unknown
    #[new]
    #[pyo3(signature = (debug_levels=Vec::new(), fields=Vec::new()))]
    fn new(debug_levels: Vec<String>, fields: Vec<String>) -> PyResult<Self> {
        let console = global::console().map_err(|e| PyRuntimeError::new_err(e.to_string()))?;

        let mut config = TraceConfig::new();
        for name in &debug_levels {
            config
                .set_debug_level(name, true)
                .map_err(|e| PyValueError::new_err(e.to_string()))?;
        }
        for name in &fields {
            config
                .set_extension_field(name, true)
                .map_err(|e| PyValueError::new_err(e.to_string()))?;
        }

        Ok(PyTracer {
            inner: Tracer::from_config(console, &config),
            config,
        })
    }

    fn is_enabled(&self, level: &str) -> PyResult<bool> {
        Ok(self.inner.is_enabled(parse_level(level)?))
    }

    fn emit(&self, level: &str, message: &str) -> PyResult<()> {
        self.inner.emit(parse_level(level)?, format_args!("{}", message));
        Ok(())
    }

    /// Echo a raw scanner value (-1 is end of input)
    fn emit_char(&self, level: &str, c: i32) -> PyResult<()> {
        self.inner.emit_char(parse_level(level)?, ScanChar::from_raw(c));
        Ok(())
    }

    fn parse_nest(&self, increase: bool, depth: u32) {
        self.inner.parse_nest(increase, depth);
    }

    fn cpp_nest(&self, begin: bool, depth: u32) {
        self.inner.cpp_nest(begin, depth);
    }

    fn cpp_ignore(&self, ignore: bool) {
        self.inner.cpp_ignore(ignore);
    }

    /// Trace a discovered tag
    ///
    /// Args:
    ///     name (str): Symbol name
    ///     kind_name (str): Symbol kind (function, variable, ...)
    ///     file_path (str): File being scanned, used to detect headers
    ///     file_scope (bool): Whether the symbol is file-local
    ///     scope (tuple[str, str] | None): (kind, name) of the enclosing construct
    ///     type_ref (tuple[str, str] | None): (kind, name) of the declared type
    #[pyo3(signature = (
        name,
        kind_name,
        file_path,
        file_scope=false,
        scope=None,
        inheritance=None,
        access=None,
        implementation=None,
        type_ref=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn tag_entry(
        &self,
        name: String,
        kind_name: String,
        file_path: &str,
        file_scope: bool,
        scope: Option<(String, String)>,
        inheritance: Option<String>,
        access: Option<String>,
        implementation: Option<String>,
        type_ref: Option<(String, String)>,
    ) {
        let tag = TagRecord {
            name,
            kind_name,
            file_scope,
            scope: scope.map(|(kind, name)| KindName::new(kind, name)),
            inheritance,
            access,
            implementation,
            type_ref: type_ref.map(|(kind, name)| KindName::new(kind, name)),
        };
        let is_header = self.config.is_header_file(Path::new(file_path));
        self.inner.emit_tag_entry(&tag, is_header);
    }
}
