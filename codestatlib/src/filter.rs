//! File filtering with extension sets and glob patterns.
//!
//! [`FilterConfig`] decides which files are analyzed; [`should_skip_dir`]
//! decides which directories are not descended into.

use std::collections::BTreeSet;
use std::path::Path;

use glob::Pattern;

use crate::error::CodestatError;
use crate::language::{self, normalize_extension};
use crate::Result;

/// Directory names never descended into unless the caller overrides the set.
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    // python environments and caches
    "venv",
    "env",
    ".venv",
    "__pycache__",
    ".eggs",
    "build",
    "dist",
    ".pytest_cache",
    ".tox",
    ".mypy_cache",
    // node
    "node_modules",
    ".npm",
    // version control
    ".git",
    ".svn",
    ".hg",
    ".bzr",
    // editors
    ".idea",
    ".vscode",
    ".vs",
    ".eclipse",
    ".settings",
    // build output
    "target",
    "out",
    "bin",
    "obj",
    // scratch
    ".cache",
    "tmp",
    "temp",
    "logs",
    "coverage",
];

/// The default ignore set as owned names.
pub fn default_ignored_dirs() -> BTreeSet<String> {
    DEFAULT_IGNORED_DIRS.iter().map(|s| s.to_string()).collect()
}

/// Whether a directory should be skipped during traversal.
pub fn should_skip_dir(name: &str, ignore: &BTreeSet<String>) -> bool {
    name.starts_with('.') || ignore.contains(name)
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| CodestatError::InvalidGlob {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Configuration for file filtering.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Glob patterns to include (if empty, include every accepted file)
    pub include: Vec<Pattern>,
    /// Glob patterns to exclude
    pub exclude: Vec<Pattern>,
    /// Accepted extensions, normalized; `None` means every registered one
    pub extensions: Option<BTreeSet<String>>,
}

impl FilterConfig {
    /// Create a filter accepting every file with a registered extension.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an include pattern.
    pub fn include(mut self, pattern: &str) -> Result<Self> {
        self.include.push(compile(pattern)?);
        Ok(self)
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: &str) -> Result<Self> {
        self.exclude.push(compile(pattern)?);
        Ok(self)
    }

    /// Add multiple include patterns.
    pub fn include_many(mut self, patterns: &[&str]) -> Result<Self> {
        for pattern in patterns {
            self = self.include(pattern)?;
        }
        Ok(self)
    }

    /// Add multiple exclude patterns.
    pub fn exclude_many(mut self, patterns: &[&str]) -> Result<Self> {
        for pattern in patterns {
            self = self.exclude(pattern)?;
        }
        Ok(self)
    }

    /// Restrict analysis to these extensions (`py`, `.rs`, `MD` all work).
    ///
    /// An empty list keeps the registry default. Extensions unknown to the
    /// registry when a file is checked match nothing.
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: BTreeSet<String> = extensions
            .into_iter()
            .map(|e| normalize_extension(e.as_ref()))
            .filter(|e| e != ".")
            .collect();
        self.extensions = if set.is_empty() { None } else { Some(set) };
        self
    }

    fn accepts_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        match &self.extensions {
            Some(set) => {
                set.contains(&normalize_extension(ext)) && language::is_supported_extension(ext)
            }
            None => language::is_supported_extension(ext),
        }
    }

    /// Check if a file path passes the filter.
    ///
    /// A path matches if:
    /// 1. Its file name is not hidden
    /// 2. Its extension is accepted
    /// 3. It doesn't match any exclude pattern
    /// 4. It matches at least one include pattern (or include is empty)
    pub fn matches(&self, path: &Path) -> bool {
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if hidden || !self.accepts_extension(path) {
            return false;
        }

        let path_str = path.to_string_lossy();

        if self.exclude.iter().any(|p| p.matches(&path_str)) {
            return false;
        }

        self.include.is_empty() || self.include.iter().any(|p| p.matches(&path_str))
    }
}
