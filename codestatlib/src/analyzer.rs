//! Per-file analysis: pick an analyzer for the file's language and run it.
//!
//! Python and Markdown have dedicated analyzers; every other language goes
//! through the generic marker classifier with its registered syntax.
//!
//! Decoding never fails a file: valid UTF-8 is used as is, other text is read
//! as Latin-1, and binary content (NUL bytes) or an unreadable file yields
//! metrics with every count at zero.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::classifier::classify_source;
use crate::error::CodestatError;
use crate::language::{self, MARKDOWN, PYTHON};
use crate::markdown::classify_markdown;
use crate::python::classify_python;
use crate::stats::{FileMetrics, LineCounts};
use crate::Result;

/// The analyzers a file can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Analyzer {
    /// Syntax-tree based, see [`crate::python`]
    Python,
    /// Document structure, see [`crate::markdown`]
    Markdown,
    /// Comment markers from the language registry
    Generic,
}

impl Analyzer {
    /// Analyzer for a language name.
    pub fn for_language(language: &str) -> Self {
        match language {
            PYTHON => Analyzer::Python,
            MARKDOWN => Analyzer::Markdown,
            _ => Analyzer::Generic,
        }
    }

    /// Run this analyzer over already decoded text.
    pub fn analyze(self, path: &Path, language: &str, source: &str) -> FileMetrics {
        match self {
            Analyzer::Python => classify_python(path, source),
            Analyzer::Markdown => classify_markdown(path, source),
            Analyzer::Generic => {
                let syntax = language::syntax_for(language);
                let counts = if syntax.has_comments() {
                    classify_source(source, &syntax)
                } else {
                    let total = source.lines().count() as u64;
                    let blank = source.lines().filter(|l| l.trim().is_empty()).count() as u64;
                    LineCounts::from_total(total, 0, blank)
                };
                FileMetrics::new(path, language, counts)
            }
        }
    }
}

/// Decode file bytes as text.
///
/// A leading UTF-8 byte order mark is dropped. Bytes that are not UTF-8 are
/// read as Latin-1 unless they contain NUL, which marks binary content.
pub fn decode_text(path: &Path, bytes: &[u8]) -> Result<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(_) if bytes.contains(&0) => Err(CodestatError::Decode(path.to_path_buf())),
        Err(_) => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

/// Analyze decoded text, resolving the language from the path.
pub fn analyze_source(path: impl AsRef<Path>, source: &str) -> FileMetrics {
    let path = path.as_ref();
    let language = language::language_for_path(path);
    Analyzer::for_language(&language).analyze(path, &language, source)
}

/// Analyze decoded text with an explicit language.
pub fn analyze_source_as(path: impl AsRef<Path>, language: &str, source: &str) -> FileMetrics {
    Analyzer::for_language(language).analyze(path.as_ref(), language, source)
}

/// Read, decode and analyze one file.
///
/// Failures are recovered locally: an unreadable or undecodable file yields
/// zero counts under its resolved language.
pub fn analyze_file(path: impl AsRef<Path>) -> FileMetrics {
    let path = path.as_ref();
    let language = language::language_for_path(path);

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(source) => {
            let err = CodestatError::FileRead {
                path: path.to_path_buf(),
                source,
            };
            warn!(error = %err, "skipping unreadable file");
            return FileMetrics::empty(path, language);
        }
    };

    let source = match decode_text(path, &bytes) {
        Ok(source) => source,
        Err(err) => {
            warn!(error = %err, "skipping undecodable file");
            return FileMetrics::empty(path, language);
        }
    };

    let metrics = analyze_source_as(path, &language, &source);
    debug!(
        path = %path.display(),
        language = %language,
        lines = metrics.total_lines(),
        "analyzed file"
    );
    metrics
}
