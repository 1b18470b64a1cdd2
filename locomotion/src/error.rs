use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while configuring locomotion. Per-frame processing never fails.
#[derive(Debug)]
pub enum LocomotionError {
    /// Reading a configuration file failed
    Io { path: PathBuf, source: io::Error },

    /// A configuration document could not be decoded
    Parse {
        context: String,
        source: serde_json::Error,
    },

    /// A configuration value is outside its allowed range
    InvalidConfig { field: &'static str, reason: String },

    /// A locomotion mode name did not match any mode
    UnknownMode(String),

    /// A hand name did not match `left` or `right`
    UnknownHandedness(String),
}

impl fmt::Display for LocomotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocomotionError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            LocomotionError::Parse { context, source } => {
                write!(f, "failed to parse {}: {}", context, source)
            }
            LocomotionError::InvalidConfig { field, reason } => {
                write!(f, "invalid config value for '{}': {}", field, reason)
            }
            LocomotionError::UnknownMode(name) => write!(
                f,
                "unknown locomotion mode '{}' (expected view_directed, hand_directed or teleport)",
                name
            ),
            LocomotionError::UnknownHandedness(name) => {
                write!(f, "unknown hand '{}' (expected left or right)", name)
            }
        }
    }
}

impl std::error::Error for LocomotionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LocomotionError::Io { source, .. } => Some(source),
            LocomotionError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl LocomotionError {
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        LocomotionError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LocomotionError>;
