// Error Types
//
// Configuration and lifecycle errors surfaced to whoever sets up tracing.
// Sink write failures have no error type: console output is best-effort.

use thiserror::Error;

/// Rejected configuration input (unknown names, undefined bits, missing host functions)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown debug level: {0}")]
    UnknownDebugLevel(String),

    #[error("undefined debug level bits: {0:#x}")]
    UndefinedDebugBits(u32),

    #[error("unknown extension field: {0}")]
    UnknownExtensionField(String),

    #[error("unknown extension field letter: '{0}'")]
    UnknownFieldLetter(char),

    #[error("host function not registered: {0}")]
    MissingHostFunction(&'static str),
}

/// Misuse of the process-wide output sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("output sink has not been installed")]
    NotInstalled,

    #[error("output sink is already installed and cannot be replaced mid-run")]
    AlreadyInstalled,
}
