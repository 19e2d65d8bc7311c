//! Error type shared by every stage of a generation run.

use std::path::PathBuf;

use crate::emitters::EmitterKind;

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Fatal generation errors.
///
/// Recoverable conditions (a union member that cannot be represented, a referenced
/// module without declarations) never surface here; they are logged and generation
/// continues.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A resolution request named a target representation the resolver does not know.
    #[error("There is no type representation `{0}` (expected `typescript` or `graphql`)")]
    UnsupportedRepresentation(String),

    /// An emitter asked for a sibling emitter that was never registered.
    #[error("Emitter {0} is not registered")]
    EmitterNotRegistered(EmitterKind),

    /// The model document could not be parsed.
    #[error("Failed to parse model: {0}")]
    Model(#[from] serde_json::Error),

    /// The configuration could not be parsed or is inconsistent.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Reading or writing a file failed.
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl Error {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
