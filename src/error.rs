//! Crate-level error types.

use std::fmt;

/// Errors produced by the viewanim crate.
#[derive(Debug)]
pub enum AnimatorError {
    /// An animator was built without a view to drive.
    MissingView,
    /// The view rejected a camera update.
    View(String),
    /// Failed to spawn the tick thread.
    ThreadSpawn(std::io::Error),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for AnimatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingView => {
                write!(f, "invalid argument: animator requires a view")
            }
            Self::View(msg) => write!(f, "view error: {msg}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for AnimatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AnimatorError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
