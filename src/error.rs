//! Errors surfaced outside the simulation
//!
//! The simulation itself never fails; only loading configuration can.

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum ConfigError {
    /// The settings file could not be read
    Io(io::Error),
    /// The settings file is not valid JSON for `Settings`
    Parse(serde_json::Error),
    /// A field parsed but holds an unusable value
    Invalid { field: &'static str, reason: String },
    /// Unknown difficulty name
    UnknownDifficulty(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "read settings: {e}"),
            Self::Parse(e) => write!(f, "parse settings: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid setting `{field}`: {reason}"),
            Self::UnknownDifficulty(name) => {
                write!(f, "unknown difficulty `{name}` (expected easy, medium or hard)")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } | Self::UnknownDifficulty(_) => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
