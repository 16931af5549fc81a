use std::path::PathBuf;

use thiserror::Error;

/// Represents all errors that can occur while opening a program source.
///
/// The file's contents are never validated here; bytes the language does
/// not accept are reported by the tokenizer with their position.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file could not be read.
    #[error("failed to open file {}: {source}", .path.display())]
    Io {
        /// The path that was requested.
        path:   PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },
}
