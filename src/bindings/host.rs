// Host Sink Registration - PyO3-exposed functions for Python hosts
//
// Wraps Python callables as the redirected sink's host functions.

use crate::sink::{global, HostFunctions, RedirectedSink};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use std::path::PathBuf;
use tracing::debug;

fn report(what: &str, result: PyResult<Py<PyAny>>) {
    // Console output is best-effort; a raising host callable loses the text
    if let Err(e) = result {
        debug!("Python host {} callable raised: {}", what, e);
    }
}

/// Route all console output and exit requests to Python callables
///
/// Args:
///     write (Callable[[str, str], None]): Receives (stream, text); stream is "stdout" or "stderr"
///     flush (Callable[[str], None]): Receives the stream name
///     exit (Callable[[int], None]): Receives the exit code; may return to continue cooperatively
///     put_char (Callable[[str, str], None] | None): Single-character writes, defaults to write
///     write_bytes (Callable[[str, bytes], None] | None): Raw byte writes; without it bytes are
///         decoded as UTF-8 (partial sequences held back) and passed to write
///     temp_dir (Callable[[], str] | None): Scratch directory provider
///
/// Raises:
///     RuntimeError: If an output sink is already installed
#[pyfunction]
#[pyo3(signature = (write, flush, exit, put_char=None, temp_dir=None, write_bytes=None))]
pub fn redirect_output(
    write: Py<PyAny>,
    flush: Py<PyAny>,
    exit: Py<PyAny>,
    put_char: Option<Py<PyAny>>,
    temp_dir: Option<Py<PyAny>>,
    write_bytes: Option<Py<PyAny>>,
) -> PyResult<()> {
    let mut builder = HostFunctions::builder()
        .write(move |stream, text| {
            Python::attach(|py| report("write", write.call1(py, (stream.as_str(), text))))
        })
        .flush(move |stream| Python::attach(|py| report("flush", flush.call1(py, (stream.as_str(),)))))
        .exit(move |code| Python::attach(|py| report("exit", exit.call1(py, (code,)))));

    if let Some(put_char) = put_char {
        builder = builder.put_char(move |stream, c| {
            let mut buf = [0u8; 4];
            let text: &str = c.encode_utf8(&mut buf);
            Python::attach(|py| report("put_char", put_char.call1(py, (stream.as_str(), text))))
        });
    }

    if let Some(write_bytes) = write_bytes {
        builder = builder.write_bytes(move |stream, bytes| {
            Python::attach(|py| report("write_bytes", write_bytes.call1(py, (stream.as_str(), bytes))))
        });
    }

    if let Some(temp_dir) = temp_dir {
        builder = builder.temp_dir(move || {
            Python::attach(|py| {
                temp_dir
                    .call0(py)
                    .and_then(|dir| dir.bind(py).extract::<String>().map_err(Into::into))
                    .map(PathBuf::from)
                    .unwrap_or_else(|e| {
                        debug!("Python host temp_dir callable failed: {}", e);
                        std::env::temp_dir()
                    })
            })
        });
    }

    let host = builder
        .build()
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    global::install(RedirectedSink::new(host))
        .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
    Ok(())
}

/// Send console output to the real stdout/stderr
///
/// Raises:
///     RuntimeError: If an output sink is already installed
#[pyfunction]
pub fn use_direct_output() -> PyResult<()> {
    global::install_direct().map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
    Ok(())
}
