//! # codestatlib
//!
//! A multi-language line counter library that splits every file into code,
//! comment and blank lines and reports them over a directory tree.
//!
//! ## Overview
//!
//! Files are routed by extension to one of three analyzers:
//!
//! - **Python**: classified from a real syntax tree (tree-sitter), so trailing
//!   comments count and `#` inside strings does not. Also reports the module
//!   docstring and class/function counts.
//! - **Markdown**: no comments; reports headings per level, links, images,
//!   fenced code blocks and tables.
//! - **Everything else**: a single-pass heuristic driven by the language's
//!   comment markers from the [`language`] registry.
//!
//! Results are plain data: [`FileMetrics`] per file and a [`DirectoryNode`]
//! tree whose aggregates (totals, percentages, language summaries) are
//! computed on demand.
//!
//! ## Example
//!
//! ```rust
//! use codestatlib::{count_directory, count_file, CountOptions, FilterConfig};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! // Set up a temporary project
//! let dir = tempdir().unwrap();
//! let file_path = dir.path().join("app.py");
//! fs::write(&file_path, "\"\"\"App.\"\"\"\n\ndef main():\n    pass  # nothing yet\n").unwrap();
//!
//! // Count a single file
//! let metrics = count_file(&file_path);
//! assert_eq!(metrics.total_lines(), 4);
//! assert_eq!(metrics.comment_lines(), 1);
//! assert_eq!(metrics.blank_lines(), 1);
//! assert!(metrics.python().unwrap().has_docstring);
//!
//! // Count a whole directory
//! let tree = count_directory(dir.path(), &CountOptions::new()).unwrap();
//! assert_eq!(tree.file_count(), 1);
//!
//! // Count with filtering
//! let filter = FilterConfig::new().exclude("**/generated/**").unwrap();
//! let tree = count_directory(dir.path(), &CountOptions::new().filter(filter)).unwrap();
//! assert_eq!(tree.python_summary().function_count, 1);
//! ```

pub mod analyzer;
pub mod classifier;
pub mod counter;
pub mod error;
pub mod filter;
pub mod language;
pub mod markdown;
pub mod python;
pub mod stats;

pub use analyzer::{analyze_file, analyze_source, analyze_source_as, Analyzer};
pub use classifier::{classify_lines, classify_source, LineClassifier, LineKind};
pub use counter::{count_directory, count_file, CountOptions};
pub use error::CodestatError;
pub use filter::{FilterConfig, DEFAULT_IGNORED_DIRS};
pub use language::{
    extensions_by_language, is_supported_extension, language_for_path, register_language,
    resolve_language, supported_extensions, syntax_for, BlockDelimiter, LanguageRegistry,
    LanguageSyntax, UNKNOWN_LANGUAGE,
};
pub use markdown::classify_markdown;
pub use python::classify_python;
pub use stats::{
    DirectoryNode, FileMetrics, LanguageMetadata, LineCounts, MarkdownMetadata, MarkdownSummary,
    PythonMetadata, PythonSummary,
};

/// Result type for codestatlib operations
pub type Result<T> = std::result::Result<T, CodestatError>;
