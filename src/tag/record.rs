// Tag Record Types
//
// A TagRecord is produced by a language scanner and only borrowed by the
// tracing code. Paired attributes (enclosing scope, type reference) use
// KindName so that one half can never be present without the other.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `(kind, name)` pair such as `("class", "Widget")`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KindName {
    pub kind: String,
    pub name: String,
}

impl KindName {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        KindName {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Pair up two independently optional halves; `None` unless both exist
    pub fn from_halves<K, N>(kind: Option<K>, name: Option<N>) -> Option<Self>
    where
        K: Into<String>,
        N: Into<String>,
    {
        Some(KindName::new(kind?, name?))
    }
}

impl fmt::Display for KindName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}

/// One discovered symbol
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TagRecord {
    /// Symbol name as it appears in code
    pub name: String,
    /// Short kind name (function, variable, macro, ...)
    pub kind_name: String,
    /// Visible only inside the defining file (e.g. C `static`)
    pub file_scope: bool,
    /// Enclosing construct
    pub scope: Option<KindName>,
    /// Base classes or interfaces
    pub inheritance: Option<String>,
    /// public, private, protected, ...
    pub access: Option<String>,
    /// abstract, virtual, pure virtual, ...
    pub implementation: Option<String>,
    /// Declared type
    pub type_ref: Option<KindName>,
}

impl TagRecord {
    pub fn new(kind_name: impl Into<String>, name: impl Into<String>) -> Self {
        TagRecord {
            name: name.into(),
            kind_name: kind_name.into(),
            ..Default::default()
        }
    }

    pub fn with_file_scope(mut self, file_scope: bool) -> Self {
        self.file_scope = file_scope;
        self
    }

    pub fn with_scope(mut self, kind: impl Into<String>, name: impl Into<String>) -> Self {
        self.scope = Some(KindName::new(kind, name));
        self
    }

    pub fn with_inheritance(mut self, inheritance: impl Into<String>) -> Self {
        self.inheritance = Some(inheritance.into());
        self
    }

    pub fn with_access(mut self, access: impl Into<String>) -> Self {
        self.access = Some(access.into());
        self
    }

    pub fn with_implementation(mut self, implementation: impl Into<String>) -> Self {
        self.implementation = Some(implementation.into());
        self
    }

    pub fn with_type_ref(mut self, kind: impl Into<String>, name: impl Into<String>) -> Self {
        self.type_ref = Some(KindName::new(kind, name));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_halves_requires_both() {
        assert_eq!(
            KindName::from_halves(Some("class"), Some("Widget")),
            Some(KindName::new("class", "Widget"))
        );
        assert_eq!(KindName::from_halves(Some("class"), None::<&str>), None);
        assert_eq!(KindName::from_halves(None::<&str>, Some("Widget")), None);
    }

    #[test]
    fn test_builder() {
        let tag = TagRecord::new("member", "size")
            .with_scope("struct", "Buffer")
            .with_access("private")
            .with_type_ref("typename", "size_t");

        assert_eq!(tag.name, "size");
        assert_eq!(tag.kind_name, "member");
        assert!(!tag.file_scope);
        assert_eq!(tag.scope.as_ref().map(|s| s.to_string()).as_deref(), Some("struct:Buffer"));
        assert_eq!(tag.access.as_deref(), Some("private"));
        assert_eq!(tag.inheritance, None);
    }

    #[test]
    fn test_deserialize_from_json() {
        let tag: TagRecord = serde_json::from_str(
            r#"{
                "name": "run",
                "kind_name": "method",
                "file_scope": false,
                "scope": {"kind": "class", "name": "Job"},
                "inheritance": null,
                "access": "public",
                "implementation": "virtual",
                "type_ref": null
            }"#,
        )
        .unwrap();

        assert_eq!(tag.scope, Some(KindName::new("class", "Job")));
        assert_eq!(tag.implementation.as_deref(), Some("virtual"));
    }
}
