// Process-Wide Console
//
// The sink is selected exactly once, before any tracing begins, and shared by
// every caller for the rest of the process. Reconfiguring mid-run is refused.

use super::{Console, DirectSink, OutputSink};
use crate::error::LifecycleError;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{info, warn};

static CONSOLE: OnceCell<Console> = OnceCell::new();

/// Install `sink` as the process-wide output sink
pub fn install<S: OutputSink + 'static>(sink: S) -> Result<Console, LifecycleError> {
    install_arc(Arc::new(sink))
}

pub fn install_arc(sink: Arc<dyn OutputSink>) -> Result<Console, LifecycleError> {
    let console = Console::from_arc(sink);
    if CONSOLE.set(console.clone()).is_err() {
        warn!("Refusing to replace the installed output sink");
        return Err(LifecycleError::AlreadyInstalled);
    }
    info!("📤 Output sink installed");
    Ok(console)
}

/// Install the real stdout/stderr sink
pub fn install_direct() -> Result<Console, LifecycleError> {
    install(DirectSink)
}

/// The installed console, or `NotInstalled` if startup has not selected one yet
pub fn console() -> Result<Console, LifecycleError> {
    CONSOLE.get().cloned().ok_or(LifecycleError::NotInstalled)
}

pub fn is_installed() -> bool {
    CONSOLE.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    // The only test in the crate that touches the process-wide console
    #[test]
    fn test_single_installation_lifecycle() {
        assert!(!is_installed());
        assert_eq!(console().unwrap_err(), LifecycleError::NotInstalled);

        let sink = Arc::new(MemorySink::new());
        let installed = install_arc(sink.clone()).unwrap();
        assert!(is_installed());

        assert_eq!(
            install_direct().unwrap_err(),
            LifecycleError::AlreadyInstalled
        );

        let shared = console().unwrap();
        shared.print(format_args!("via global"));
        installed.flush();
        assert_eq!(sink.stdout(), "via global");
        assert_eq!(sink.flush_count(), 1);

        // Clones share the terminated flag
        let _ = shared.terminate(0);
        assert!(console().unwrap().is_terminated());
    }
}
