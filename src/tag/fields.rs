// Extension Field Options
//
// Which optional tag attributes are shown. Owned by configuration and
// read-only once tracing starts.

use crate::error::ConfigError;
use tracing::debug;

/// Visibility switches for optional tag attributes, all hidden by default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtensionFields {
    pub inheritance: bool,
    pub file_scope: bool,
    pub access: bool,
    pub implementation: bool,
    pub type_ref: bool,
}

impl ExtensionFields {
    /// Field names accepted by [`ExtensionFields::set_by_name`]
    pub const NAMES: [&'static str; 5] = [
        "inheritance",
        "file-scope",
        "access",
        "implementation",
        "type-reference",
    ];

    // Letters of the tool's --fields option that exist but are not traced here
    const UNTRACED_LETTERS: &'static str = "kKlnsSz";

    pub fn new() -> Self {
        Self::default()
    }

    fn flag_mut(&mut self, name: &str) -> Option<&mut bool> {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "inheritance" | "inherits" => Some(&mut self.inheritance),
            "file-scope" | "file" => Some(&mut self.file_scope),
            "access" => Some(&mut self.access),
            "implementation" | "imp" => Some(&mut self.implementation),
            "type-reference" | "type-ref" | "typeref" => Some(&mut self.type_ref),
            _ => None,
        }
    }

    fn letter_mut(&mut self, letter: char) -> Option<&mut bool> {
        match letter {
            'i' => Some(&mut self.inheritance),
            'f' => Some(&mut self.file_scope),
            'a' => Some(&mut self.access),
            'm' => Some(&mut self.implementation),
            't' => Some(&mut self.type_ref),
            _ => None,
        }
    }

    pub fn set_by_name(&mut self, name: &str, shown: bool) -> Result<(), ConfigError> {
        let flag = self
            .flag_mut(name)
            .ok_or_else(|| ConfigError::UnknownExtensionField(name.to_string()))?;
        *flag = shown;
        Ok(())
    }

    /// Apply a `--fields` style letter list.
    ///
    /// `"+ia-f"` turns on inheritance and access and turns off file scope.
    /// A list that does not start with `+` or `-` replaces the current set.
    pub fn apply_letters(&mut self, letters: &str) -> Result<(), ConfigError> {
        if !letters.starts_with(|c: char| c == '+' || c == '-') {
            *self = ExtensionFields::default();
        }
        let mut shown = true;
        for letter in letters.chars() {
            match letter {
                '+' => shown = true,
                '-' => shown = false,
                letter => match self.letter_mut(letter) {
                    Some(flag) => *flag = shown,
                    None if Self::UNTRACED_LETTERS.contains(letter) => {
                        debug!("Field letter '{}' has no trace representation", letter);
                    }
                    None => return Err(ConfigError::UnknownFieldLetter(letter)),
                },
            }
        }
        Ok(())
    }
}
