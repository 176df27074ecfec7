//! Defines the custom error type for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for the `core` module.
///
/// None of these are fatal to a traversal or an assembly. They are logged,
/// and the first one encountered is handed back next to the best-effort result.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An ignore-pattern source (or the built-in list) could not be compiled.
    #[error("Invalid ignore pattern in {path}: {message}")]
    Pattern { path: PathBuf, message: String },

    /// A directory could not be listed.
    #[error("Failed to read directory {1}: {0}")]
    Enumeration(#[source] std::io::Error, PathBuf),

    /// Metadata for an entry could not be read.
    #[error("Failed to stat {1}: {0}")]
    Stat(#[source] std::io::Error, PathBuf),

    /// A file's bytes could not be read.
    #[error("Failed to read {1}: {0}")]
    Read(#[source] std::io::Error, PathBuf),

    /// Represents a path that was expected to be a directory but was not.
    #[error("Path is not a valid directory: {0}")]
    NotADirectory(PathBuf),

    /// A selected path that does not live under the project root.
    #[error("Path is outside the project root: {0}")]
    OutsideRoot(PathBuf),
}
