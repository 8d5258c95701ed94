//! High-level counting API.
//!
//! [`count_directory`] walks a project one directory level at a time and
//! builds the [`DirectoryNode`] tree the reports are rendered from.
//! [`count_file`] analyzes a single file.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::analyzer::analyze_file;
use crate::error::CodestatError;
use crate::filter::{default_ignored_dirs, should_skip_dir, FilterConfig};
use crate::stats::{DirectoryNode, FileMetrics};
use crate::Result;

/// Options for counting a directory.
#[derive(Debug, Clone)]
pub struct CountOptions {
    /// File filter configuration
    pub file_filter: FilterConfig,
    /// Directory names never descended into
    pub ignore_dirs: BTreeSet<String>,
    /// Order files largest first once the tree is built
    pub sort_by_size: bool,
}

impl Default for CountOptions {
    fn default() -> Self {
        Self {
            file_filter: FilterConfig::default(),
            ignore_dirs: default_ignored_dirs(),
            sort_by_size: true,
        }
    }
}

impl CountOptions {
    /// Default options: registered extensions, default ignore set, sorted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set file filter.
    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.file_filter = filter;
        self
    }

    /// Restrict analysis to these extensions.
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.file_filter = self.file_filter.extensions(extensions);
        self
    }

    /// Add directory names to the ignore set.
    pub fn ignore_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_dirs.extend(names.into_iter().map(Into::into));
        self
    }

    /// Order files largest first (default) or keep directory listing order.
    pub fn sort_by_size(mut self, sort: bool) -> Self {
        self.sort_by_size = sort;
        self
    }
}

/// Count lines in every accepted file under a directory.
///
/// Only an invalid root is an error. Unreadable entries are logged and
/// skipped; unreadable or binary files are reported with zero counts.
///
/// # Example
///
/// ```rust,ignore
/// use codestatlib::{count_directory, CountOptions, FilterConfig};
///
/// // Everything the registry knows about
/// let tree = count_directory(".", &CountOptions::new())?;
///
/// // Python only, without the test suite
/// let filter = FilterConfig::new().exclude("**/tests/**")?;
/// let options = CountOptions::new().filter(filter).extensions(["py"]);
/// let tree = count_directory(".", &options)?;
/// ```
pub fn count_directory(path: impl AsRef<Path>, options: &CountOptions) -> Result<DirectoryNode> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CodestatError::PathNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(CodestatError::NotADirectory(path.to_path_buf()));
    }

    let root = fs::canonicalize(path)?;
    info!(root = %root.display(), "counting directory");

    let mut visited = HashSet::new();
    visited.insert(root.clone());

    let mut tree = walk_dir(&root, options, &mut visited);
    if options.sort_by_size {
        tree.sort_by_size();
    }

    debug!(
        files = tree.file_count(),
        lines = tree.total_lines(),
        "finished counting"
    );
    Ok(tree)
}

/// Build the node for one directory, recursing into accepted subdirectories.
fn walk_dir(dir: &Path, options: &CountOptions, visited: &mut HashSet<PathBuf>) -> DirectoryNode {
    let mut node = DirectoryNode::new(dir);

    let entries = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();

        if entry.file_type().is_dir() {
            let name = entry.file_name().to_string_lossy();
            if should_skip_dir(&name, &options.ignore_dirs) {
                debug!(dir = %path.display(), "skipping ignored directory");
                continue;
            }

            let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
            if !visited.insert(canonical) {
                debug!(dir = %path.display(), "skipping already visited directory");
                continue;
            }

            let child = walk_dir(path, options, visited);
            if !child.is_empty() {
                node.add_child(child);
            }
        } else if entry.file_type().is_file() && options.file_filter.matches(path) {
            node.add_file(analyze_file(path));
        }
    }

    node
}

/// Count lines in a single file.
///
/// # Example
///
/// ```rust,ignore
/// use codestatlib::count_file;
///
/// let metrics = count_file("src/app.py");
/// println!("Code: {}, Comments: {}", metrics.code_lines(), metrics.comment_lines());
/// ```
pub fn count_file(path: impl AsRef<Path>) -> FileMetrics {
    analyze_file(path)
}
