//! Debug level registry.
//!
//! Each [`DebugLevel`] is an independent trace category. [`DebugLevels`] is the
//! set of enabled categories; it is filled in by configuration before tracing
//! starts and read-only afterwards.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A trace category, with its bit in the debug mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DebugLevel {
    /// Echo input as it is read
    Read = 0x01,
    /// Parser nesting and discovered tag entries
    Parse = 0x02,
    /// Per-file status messages
    Status = 0x04,
    /// Option processing
    Option = 0x08,
    /// Preprocessor conditional state
    Cpp = 0x10,
    /// Raw characters before any scanner translation
    Raw = 0x20,
}

impl DebugLevel {
    pub const ALL: [DebugLevel; 6] = [
        DebugLevel::Read,
        DebugLevel::Parse,
        DebugLevel::Status,
        DebugLevel::Option,
        DebugLevel::Cpp,
        DebugLevel::Raw,
    ];

    pub const fn bit(self) -> u32 {
        self as u32
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DebugLevel::Read => "read",
            DebugLevel::Parse => "parse",
            DebugLevel::Status => "status",
            DebugLevel::Option => "option",
            DebugLevel::Cpp => "cpp",
            DebugLevel::Raw => "raw",
        }
    }
}

impl fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DebugLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DebugLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownDebugLevel(s.to_string()))
    }
}

/// Set of enabled debug levels, all disabled by default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DebugLevels {
    mask: u32,
}

impl DebugLevels {
    const DEFINED: u32 = 0x3f;

    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a numeric mask, rejecting bits that name no level
    pub fn from_mask(mask: u32) -> Result<Self, ConfigError> {
        let undefined = mask & !Self::DEFINED;
        if undefined != 0 {
            return Err(ConfigError::UndefinedDebugBits(undefined));
        }
        Ok(DebugLevels { mask })
    }

    pub fn mask(&self) -> u32 {
        self.mask
    }

    pub fn is_enabled(&self, level: DebugLevel) -> bool {
        self.mask & level.bit() != 0
    }

    pub fn set_enabled(&mut self, level: DebugLevel, enabled: bool) {
        if enabled {
            self.mask |= level.bit();
        } else {
            self.mask &= !level.bit();
        }
    }

    pub fn set_by_name(&mut self, name: &str, enabled: bool) -> Result<(), ConfigError> {
        let level = name.parse::<DebugLevel>()?;
        self.set_enabled(level, enabled);
        Ok(())
    }

    pub fn with(mut self, level: DebugLevel) -> Self {
        self.set_enabled(level, true);
        self
    }

    /// Enabled levels, in mask order
    pub fn enabled(&self) -> impl Iterator<Item = DebugLevel> + '_ {
        DebugLevel::ALL
            .into_iter()
            .filter(move |level| self.is_enabled(*level))
    }
}

impl FromIterator<DebugLevel> for DebugLevels {
    fn from_iter<I: IntoIterator<Item = DebugLevel>>(iter: I) -> Self {
        iter.into_iter().fold(DebugLevels::new(), DebugLevels::with)
    }
}
