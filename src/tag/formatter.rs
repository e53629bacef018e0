//! Tag record formatter.
//!
//! Renders a [`TagRecord`] into the trace grammar:
//!
//! ```text
//! <#{fs}kind:name [scopeKind:scopeName] [inherits:x] [file:] [access:x] [imp:x] [typeKind:typeName]#>
//! ```
//!
//! Every bracketed segment is optional. Tooling greps for this exact syntax.

use super::fields::ExtensionFields;
use super::record::TagRecord;
use crate::debug::{DebugLevel, Tracer};
use std::fmt::Write;

/// Render one tag entry.
///
/// `is_header` says whether the file being scanned is a header; file-scoped
/// tags in headers never get the `[file:]` marker.
pub fn format_tag_entry(tag: &TagRecord, fields: &ExtensionFields, is_header: bool) -> String {
    let mut out = String::with_capacity(tag.name.len() + tag.kind_name.len() + 16);
    let fs = if tag.file_scope { "{fs}" } else { "" };

    // Writing into a String cannot fail
    let _ = write!(out, "<#{}{}:{}", fs, tag.kind_name, tag.name);

    if let Some(scope) = &tag.scope {
        let _ = write!(out, " [{}]", scope);
    }

    if fields.inheritance {
        if let Some(inheritance) = &tag.inheritance {
            let _ = write!(out, " [inherits:{}]", inheritance);
        }
    }

    if fields.file_scope && tag.file_scope && !is_header {
        out.push_str(" [file:]");
    }

    if fields.access {
        if let Some(access) = &tag.access {
            let _ = write!(out, " [access:{}]", access);
        }
    }

    if fields.implementation {
        if let Some(implementation) = &tag.implementation {
            let _ = write!(out, " [imp:{}]", implementation);
        }
    }

    if fields.type_ref {
        if let Some(type_ref) = &tag.type_ref {
            let _ = write!(out, " [{}]", type_ref);
        }
    }

    out.push_str("#>");
    out
}

impl Tracer {
    /// Trace a discovered tag at the `Parse` level.
    ///
    /// The level is checked once and the entry goes out in a single write,
    /// so a reader never sees a partial entry.
    pub fn emit_tag_entry(&self, tag: &TagRecord, is_header: bool) {
        if !self.is_enabled(DebugLevel::Parse) {
            return;
        }
        let entry = format_tag_entry(tag, &self.fields, is_header);
        self.console.print(format_args!("{}", entry));
        self.console.flush();
    }
}
