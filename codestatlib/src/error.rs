//! Error types for codestatlib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while analyzing a project
#[derive(Error, Debug)]
pub enum CodestatError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid glob pattern
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// Path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// File bytes cannot be read as text
    #[error("cannot decode '{0}' as text")]
    Decode(PathBuf),

    /// Source could not be tokenized or parsed
    #[error("{language} syntax error: {message}")]
    Syntax { language: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
