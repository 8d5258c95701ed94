//! Core data structures for line statistics.
//!
//! - [`LineCounts`]: code / comment / blank counts, with `total` derived so it
//!   always equals their sum
//! - [`FileMetrics`]: the immutable result of classifying one file
//! - [`DirectoryNode`]: a directory's files and subdirectories, with aggregate
//!   accessors computed over the whole subtree

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::path::{Path, PathBuf};

use crate::language::{MARKDOWN, PYTHON};

/// Percentage of `part` in `total`, 0.0 when `total` is zero.
fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Line counts for a file or a subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCounts {
    /// Lines holding code
    pub code: u64,
    /// Comment lines
    pub comment: u64,
    /// Blank lines (whitespace only)
    pub blank: u64,
}

impl LineCounts {
    pub fn new(code: u64, comment: u64, blank: u64) -> Self {
        Self {
            code,
            comment,
            blank,
        }
    }

    /// Build counts from a line total, deriving code lines.
    ///
    /// Code is `total - blank - comment`, clamped at zero.
    pub fn from_total(total: u64, comment: u64, blank: u64) -> Self {
        Self {
            code: total.saturating_sub(blank).saturating_sub(comment),
            comment,
            blank,
        }
    }

    /// Total lines (code + comment + blank).
    pub fn total(&self) -> u64 {
        self.code + self.comment + self.blank
    }

    pub fn code_percentage(&self) -> f64 {
        percentage(self.code, self.total())
    }

    pub fn comment_percentage(&self) -> f64 {
        percentage(self.comment, self.total())
    }

    pub fn blank_percentage(&self) -> f64 {
        percentage(self.blank, self.total())
    }
}

impl Add for LineCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            code: self.code + other.code,
            comment: self.comment + other.comment,
            blank: self.blank + other.blank,
        }
    }
}

impl AddAssign for LineCounts {
    fn add_assign(&mut self, other: Self) {
        self.code += other.code;
        self.comment += other.comment;
        self.blank += other.blank;
    }
}

/// Structural facts about a Python module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PythonMetadata {
    /// The module starts with a docstring
    pub has_docstring: bool,
    /// `class` definitions, nested ones included
    pub class_count: u64,
    /// Functions and methods, nested ones included
    pub function_count: u64,
}

/// Document structure of a Markdown file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownMetadata {
    /// Heading count per level, index 0 is `#`, index 5 is `######`
    pub headings_by_level: [u64; 6],
    pub heading_count: u64,
    /// Inline links, images excluded
    pub link_count: u64,
    pub image_count: u64,
    /// Fenced code blocks
    pub code_block_count: u64,
    pub table_count: u64,
}

/// Extra data attached to a file by a language-specific analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LanguageMetadata {
    Python(PythonMetadata),
    Markdown(MarkdownMetadata),
}

/// The result of classifying one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetrics {
    path: PathBuf,
    language: String,
    counts: LineCounts,
    metadata: Option<LanguageMetadata>,
}

impl FileMetrics {
    /// Create metrics without language-specific metadata.
    pub fn new(path: impl Into<PathBuf>, language: impl Into<String>, counts: LineCounts) -> Self {
        Self {
            path: path.into(),
            language: language.into(),
            counts,
            metadata: None,
        }
    }

    /// Metrics with every count at zero.
    pub fn empty(path: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self::new(path, language, LineCounts::default())
    }

    /// Attach language-specific metadata.
    pub fn with_metadata(mut self, metadata: LanguageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without its directory.
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn counts(&self) -> LineCounts {
        self.counts
    }

    pub fn total_lines(&self) -> u64 {
        self.counts.total()
    }

    pub fn code_lines(&self) -> u64 {
        self.counts.code
    }

    pub fn comment_lines(&self) -> u64 {
        self.counts.comment
    }

    pub fn blank_lines(&self) -> u64 {
        self.counts.blank
    }

    pub fn code_percentage(&self) -> f64 {
        self.counts.code_percentage()
    }

    pub fn comment_percentage(&self) -> f64 {
        self.counts.comment_percentage()
    }

    pub fn blank_percentage(&self) -> f64 {
        self.counts.blank_percentage()
    }

    pub fn metadata(&self) -> Option<&LanguageMetadata> {
        self.metadata.as_ref()
    }

    pub fn python(&self) -> Option<&PythonMetadata> {
        match &self.metadata {
            Some(LanguageMetadata::Python(meta)) => Some(meta),
            _ => None,
        }
    }

    pub fn markdown(&self) -> Option<&MarkdownMetadata> {
        match &self.metadata {
            Some(LanguageMetadata::Markdown(meta)) => Some(meta),
            _ => None,
        }
    }
}

impl fmt::Display for FileMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} lines ({} code, {} comments, {} blank)",
            self.filename(),
            self.total_lines(),
            self.code_lines(),
            self.comment_lines(),
            self.blank_lines()
        )
    }
}

/// Python totals over a subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PythonSummary {
    pub python_files: u64,
    pub class_count: u64,
    pub function_count: u64,
    pub files_with_docstring: u64,
}

impl AddAssign for PythonSummary {
    fn add_assign(&mut self, other: Self) {
        self.python_files += other.python_files;
        self.class_count += other.class_count;
        self.function_count += other.function_count;
        self.files_with_docstring += other.files_with_docstring;
    }
}

/// Markdown totals over a subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownSummary {
    pub markdown_files: u64,
    pub heading_count: u64,
    pub link_count: u64,
    pub image_count: u64,
    pub code_block_count: u64,
    pub table_count: u64,
}

impl AddAssign for MarkdownSummary {
    fn add_assign(&mut self, other: Self) {
        self.markdown_files += other.markdown_files;
        self.heading_count += other.heading_count;
        self.link_count += other.link_count;
        self.image_count += other.image_count;
        self.code_block_count += other.code_block_count;
        self.table_count += other.table_count;
    }
}

/// A directory in the report tree.
///
/// Owns the metrics of its direct files and its subdirectory nodes. Every
/// aggregate accessor walks the subtree on each call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryNode {
    path: PathBuf,
    files: Vec<FileMetrics>,
    children: Vec<DirectoryNode>,
}

impl DirectoryNode {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            files: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last path component, or the whole path for roots like `/`.
    pub fn name(&self) -> String {
        match self.path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.path.to_string_lossy().into_owned(),
        }
    }

    pub fn add_file(&mut self, file: FileMetrics) {
        self.files.push(file);
    }

    pub fn add_child(&mut self, child: DirectoryNode) {
        self.children.push(child);
    }

    /// Direct files, in their current order.
    pub fn files(&self) -> &[FileMetrics] {
        &self.files
    }

    /// Direct subdirectories.
    pub fn children(&self) -> &[DirectoryNode] {
        &self.children
    }

    /// No file anywhere in the subtree.
    pub fn is_empty(&self) -> bool {
        self.file_count() == 0
    }

    /// Files in the whole subtree.
    pub fn file_count(&self) -> u64 {
        self.files.len() as u64 + self.children.iter().map(Self::file_count).sum::<u64>()
    }

    /// Line counts summed over the whole subtree.
    pub fn totals(&self) -> LineCounts {
        let mut totals = LineCounts::default();
        for file in &self.files {
            totals += file.counts();
        }
        for child in &self.children {
            totals += child.totals();
        }
        totals
    }

    pub fn total_lines(&self) -> u64 {
        self.totals().total()
    }

    pub fn code_lines(&self) -> u64 {
        self.totals().code
    }

    pub fn comment_lines(&self) -> u64 {
        self.totals().comment
    }

    pub fn blank_lines(&self) -> u64 {
        self.totals().blank
    }

    pub fn code_percentage(&self) -> f64 {
        self.totals().code_percentage()
    }

    pub fn comment_percentage(&self) -> f64 {
        self.totals().comment_percentage()
    }

    pub fn blank_percentage(&self) -> f64 {
        self.totals().blank_percentage()
    }

    /// Python totals over the subtree, ignoring other languages.
    pub fn python_summary(&self) -> PythonSummary {
        let mut summary = PythonSummary::default();
        for file in self.files.iter().filter(|f| f.language() == PYTHON) {
            summary.python_files += 1;
            if let Some(meta) = file.python() {
                summary.class_count += meta.class_count;
                summary.function_count += meta.function_count;
                if meta.has_docstring {
                    summary.files_with_docstring += 1;
                }
            }
        }
        for child in &self.children {
            summary += child.python_summary();
        }
        summary
    }

    /// Markdown totals over the subtree, ignoring other languages.
    pub fn markdown_summary(&self) -> MarkdownSummary {
        let mut summary = MarkdownSummary::default();
        for file in self.files.iter().filter(|f| f.language() == MARKDOWN) {
            summary.markdown_files += 1;
            if let Some(meta) = file.markdown() {
                summary.heading_count += meta.heading_count;
                summary.link_count += meta.link_count;
                summary.image_count += meta.image_count;
                summary.code_block_count += meta.code_block_count;
                summary.table_count += meta.table_count;
            }
        }
        for child in &self.children {
            summary += child.markdown_summary();
        }
        summary
    }

    /// Order files by line count, largest first, in this node and every
    /// descendant. Equal sizes keep their relative order; the order of child
    /// nodes is left alone.
    pub fn sort_by_size(&mut self) {
        self.files.sort_by(|a, b| b.total_lines().cmp(&a.total_lines()));
        for child in &mut self.children {
            child.sort_by_size();
        }
    }
}

impl fmt::Display for DirectoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let totals = self.totals();
        write!(
            f,
            "{}: {} files, {} lines ({} code, {} comments, {} blank)",
            self.name(),
            self.file_count(),
            totals.total(),
            totals.code,
            totals.comment,
            totals.blank
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, code: u64, comment: u64, blank: u64) -> FileMetrics {
        FileMetrics::new(name, "Rust", LineCounts::new(code, comment, blank))
    }

    fn python_file(name: &str, classes: u64, functions: u64, doc: bool) -> FileMetrics {
        FileMetrics::new(name, PYTHON, LineCounts::new(10, 2, 1)).with_metadata(
            LanguageMetadata::Python(PythonMetadata {
                has_docstring: doc,
                class_count: classes,
                function_count: functions,
            }),
        )
    }

    #[test]
    fn test_line_counts_total() {
        let counts = LineCounts::new(70, 20, 10);
        assert_eq!(counts.total(), 100);
        assert_eq!(counts.code_percentage(), 70.0);
        assert_eq!(counts.comment_percentage(), 20.0);
        assert_eq!(counts.blank_percentage(), 10.0);
    }

    #[test]
    fn test_line_counts_from_total_clamps() {
        let counts = LineCounts::from_total(10, 3, 2);
        assert_eq!(counts.code, 5);
        assert_eq!(counts.total(), 10);

        let clamped = LineCounts::from_total(3, 4, 2);
        assert_eq!(clamped.code, 0);
        assert_eq!(clamped.total(), clamped.code + clamped.comment + clamped.blank);
    }

    #[test]
    fn test_percentages_zero_total() {
        let metrics = FileMetrics::empty("empty.rs", "Rust");
        assert_eq!(metrics.total_lines(), 0);
        assert_eq!(metrics.code_percentage(), 0.0);
        assert_eq!(metrics.comment_percentage(), 0.0);
        assert_eq!(metrics.blank_percentage(), 0.0);

        let node = DirectoryNode::new("empty");
        assert_eq!(node.code_percentage(), 0.0);
        assert_eq!(node.comment_percentage(), 0.0);
        assert_eq!(node.blank_percentage(), 0.0);
        assert!(node.is_empty());
    }

    #[test]
    fn test_line_counts_add() {
        let mut a = LineCounts::new(1, 2, 3);
        let b = LineCounts::new(10, 20, 30);
        assert_eq!(a + b, LineCounts::new(11, 22, 33));
        a += b;
        assert_eq!(a.total(), 66);
    }

    #[test]
    fn test_file_metrics_accessors() {
        let metrics = file("src/lib.rs", 8, 1, 1);
        assert_eq!(metrics.filename(), "lib.rs");
        assert_eq!(metrics.language(), "Rust");
        assert_eq!(metrics.total_lines(), 10);
        assert!(metrics.metadata().is_none());
        assert!(metrics.python().is_none());
        assert_eq!(
            metrics.to_string(),
            "lib.rs: 10 lines (8 code, 1 comments, 1 blank)"
        );
    }

    #[test]
    fn test_aggregates_recurse_to_any_depth() {
        let mut leaf = DirectoryNode::new("root/a/b/c");
        leaf.add_file(file("deep.rs", 5, 0, 0));

        let mut b = DirectoryNode::new("root/a/b");
        b.add_child(leaf);

        let mut a = DirectoryNode::new("root/a");
        a.add_file(file("mid.rs", 3, 2, 1));
        a.add_child(b);

        let mut root = DirectoryNode::new("root");
        root.add_file(file("top.rs", 10, 4, 2));
        root.add_child(a);

        assert_eq!(root.file_count(), 3);
        assert_eq!(root.total_lines(), 16 + 6 + 5);
        assert_eq!(root.code_lines(), 18);
        assert_eq!(root.comment_lines(), 6);
        assert_eq!(root.blank_lines(), 3);

        let direct: u64 = root.files().iter().map(FileMetrics::total_lines).sum();
        let nested: u64 = root.children().iter().map(DirectoryNode::total_lines).sum();
        assert_eq!(root.total_lines(), direct + nested);
    }

    #[test]
    fn test_directory_name() {
        assert_eq!(DirectoryNode::new("/projects/app").name(), "app");
        assert_eq!(DirectoryNode::new("/").name(), "/");
    }

    #[test]
    fn test_python_summary_ignores_other_languages() {
        let mut pkg = DirectoryNode::new("proj/pkg");
        pkg.add_file(python_file("models.py", 2, 5, true));
        pkg.add_file(file("helper.rs", 50, 0, 0));

        let mut root = DirectoryNode::new("proj");
        root.add_file(python_file("main.py", 1, 3, false));
        root.add_file(FileMetrics::new("setup.py", PYTHON, LineCounts::new(1, 0, 0)));
        root.add_child(pkg);

        let summary = root.python_summary();
        assert_eq!(summary.python_files, 3);
        assert_eq!(summary.class_count, 3);
        assert_eq!(summary.function_count, 8);
        assert_eq!(summary.files_with_docstring, 1);
    }

    #[test]
    fn test_markdown_summary() {
        let mut root = DirectoryNode::new("docs");
        root.add_file(
            FileMetrics::new("README.md", MARKDOWN, LineCounts::new(10, 0, 2)).with_metadata(
                LanguageMetadata::Markdown(MarkdownMetadata {
                    heading_count: 3,
                    link_count: 2,
                    ..Default::default()
                }),
            ),
        );
        root.add_file(file("x.rs", 1, 0, 0));

        let summary = root.markdown_summary();
        assert_eq!(summary.markdown_files, 1);
        assert_eq!(summary.heading_count, 3);
        assert_eq!(summary.link_count, 2);
    }

    #[test]
    fn test_sort_by_size_is_stable_and_recursive() {
        let mut child = DirectoryNode::new("root/sub");
        child.add_file(file("s1.rs", 1, 0, 0));
        child.add_file(file("s2.rs", 9, 0, 0));

        let mut other = DirectoryNode::new("root/other");
        other.add_file(file("o.rs", 100, 0, 0));

        let mut root = DirectoryNode::new("root");
        root.add_file(file("a.rs", 5, 0, 0));
        root.add_file(file("b.rs", 10, 0, 0));
        root.add_file(file("c.rs", 5, 0, 0));
        root.add_file(file("d.rs", 2, 3, 0));
        root.add_child(child);
        root.add_child(other);

        root.sort_by_size();

        let names: Vec<String> = root.files().iter().map(FileMetrics::filename).collect();
        assert_eq!(names, ["b.rs", "a.rs", "c.rs", "d.rs"]);

        let sub: Vec<String> = root.children()[0]
            .files()
            .iter()
            .map(FileMetrics::filename)
            .collect();
        assert_eq!(sub, ["s2.rs", "s1.rs"]);

        // child order is untouched
        assert_eq!(root.children()[0].name(), "sub");
        assert_eq!(root.children()[1].name(), "other");
    }

    #[test]
    fn test_directory_display() {
        let mut root = DirectoryNode::new("proj");
        root.add_file(file("a.rs", 3, 1, 1));
        assert_eq!(
            root.to_string(),
            "proj: 1 files, 5 lines (3 code, 1 comments, 1 blank)"
        );
    }
}
