//! Trace configuration.
//!
//! Collects the debug levels, extension field options and header extensions
//! that the tracing code reads. Configuration is loaded once before tracing
//! starts; names that do not exist are rejected instead of ignored.
//!
//! # Document format
//!
//! ```json
//! {
//!     "debug": { "parse": true, "cpp": false },
//!     "fields": { "file-scope": true, "access": true },
//!     "header_extensions": ["h", "hpp"]
//! }
//! ```

use crate::debug::DebugLevels;
use crate::error::ConfigError;
use crate::tag::ExtensionFields;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Extensions treated as headers when none are configured
pub const DEFAULT_HEADER_EXTENSIONS: [&str; 8] =
    ["h", "H", "hh", "hpp", "hxx", "h++", "inc", "def"];

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigDocument {
    #[serde(default)]
    debug: BTreeMap<String, bool>,
    #[serde(default)]
    fields: BTreeMap<String, bool>,
    header_extensions: Option<Vec<String>>,
}

/// Everything the tracing code needs to know, fixed for the whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceConfig {
    pub debug: DebugLevels,
    pub fields: ExtensionFields,
    pub header_extensions: Vec<String>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            debug: DebugLevels::default(),
            fields: ExtensionFields::default(),
            header_extensions: DEFAULT_HEADER_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl TraceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_debug_level(&mut self, name: &str, enabled: bool) -> Result<(), ConfigError> {
        self.debug.set_by_name(name, enabled).inspect_err(|e| {
            warn!("Rejected debug level setting: {}", e);
        })
    }

    pub fn set_extension_field(&mut self, name: &str, shown: bool) -> Result<(), ConfigError> {
        self.fields.set_by_name(name, shown).inspect_err(|e| {
            warn!("Rejected extension field setting: {}", e);
        })
    }

    /// Parse a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: ConfigDocument =
            serde_json::from_str(json).context("Invalid trace configuration JSON")?;

        let mut config = TraceConfig::default();
        for (name, enabled) in &document.debug {
            config.set_debug_level(name, *enabled)?;
        }
        for (name, shown) in &document.fields {
            config.set_extension_field(name, *shown)?;
        }
        if let Some(extensions) = document.header_extensions {
            config.header_extensions = extensions;
        }

        debug!(
            "Loaded trace configuration: debug mask {:#x}, {} header extensions",
            config.debug.mask(),
            config.header_extensions.len()
        );
        Ok(config)
    }

    /// Read and parse a JSON configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read trace configuration {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to load trace configuration {}", path.display()))
    }

    /// Whether `path` names a header file, by extension (case-sensitive)
    pub fn is_header_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.header_extensions.iter().any(|h| h == ext))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::DebugLevel;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = TraceConfig::new();
        assert_eq!(config.debug.mask(), 0);
        assert_eq!(config.fields, ExtensionFields::default());
        assert!(config.is_header_file(Path::new("src/main.h")));
        assert!(config.is_header_file(Path::new("include/vec.hpp")));
        assert!(!config.is_header_file(Path::new("src/main.c")));
        assert!(!config.is_header_file(Path::new("Makefile")));
    }

    #[test]
    fn test_from_json_str() {
        let config = TraceConfig::from_json_str(
            r#"{
                "debug": {"parse": true, "cpp": true, "read": false},
                "fields": {"file-scope": true, "access": true},
                "header_extensions": ["hh"]
            }"#,
        )
        .unwrap();

        assert!(config.debug.is_enabled(DebugLevel::Parse));
        assert!(config.debug.is_enabled(DebugLevel::Cpp));
        assert!(!config.debug.is_enabled(DebugLevel::Read));
        assert!(config.fields.file_scope);
        assert!(config.fields.access);
        assert!(!config.fields.inheritance);
        assert!(config.is_header_file(Path::new("a.hh")));
        assert!(!config.is_header_file(Path::new("a.h")));
    }

    #[test]
    fn test_unknown_names_are_config_errors() {
        let err = TraceConfig::from_json_str(r#"{"debug": {"lexer": true}}"#).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::UnknownDebugLevel("lexer".to_string()))
        );

        let err = TraceConfig::from_json_str(r#"{"fields": {"signature": true}}"#).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::UnknownExtensionField("signature".to_string()))
        );
    }

    #[test]
    fn test_malformed_json() {
        assert!(TraceConfig::from_json_str("{not json").is_err());
        assert!(TraceConfig::from_json_str(r#"{"verbose": true}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("trace.json");
        fs::write(&path, r#"{"debug": {"status": true}}"#).unwrap();

        let config = TraceConfig::load(&path).unwrap();
        assert!(config.debug.is_enabled(DebugLevel::Status));
        assert_eq!(config.header_extensions.len(), DEFAULT_HEADER_EXTENSIONS.len());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = TraceConfig::load(&temp_dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read trace configuration"));
    }
}
