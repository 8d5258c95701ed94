//! Template rendering for CLI output using outstanding

use codestatlib::{DirectoryNode, FileMetrics, LanguageMetadata, MarkdownSummary, PythonSummary};
use console::Style;
use outstanding::{render_auto, render_with_output, Theme};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Include templates at compile time
const REPORT_TEMPLATE: &str = include_str!("../templates/report.jinja");
const SUMMARY_TEMPLATE: &str = include_str!("../templates/summary.jinja");
const EXTENSIONS_TEMPLATE: &str = include_str!("../templates/extensions.jinja");
const NO_FILES_TEMPLATE: &str = include_str!("../templates/no_files.jinja");

/// Re-export OutputMode for callers
pub use outstanding::OutputMode;

type RenderResult = Result<String, Box<dyn std::error::Error>>;

const WIDE_RULE: usize = 60;
const NARROW_RULE: usize = 40;

/// Format a count with thousands separators (1234567 -> "1,234,567").
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a percentage with one decimal ("72.5%").
pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

/// Create the theme with styles
fn create_theme() -> Theme {
    Theme::new()
        .add("title", Style::new().bold())
        .add("dir", Style::new().bold().cyan())
        .add("detail", Style::new().dim())
        .add("language", Style::new().bold())
}

/// One line of a rendered tree.
#[derive(Debug, Serialize)]
struct TreeRow {
    /// Connectors and indentation drawn before the text
    prefix: String,
    text: String,
    /// `dir`, `file` or `detail`
    kind: &'static str,
    /// File and line totals, directories only
    info: Option<String>,
}

impl TreeRow {
    fn dir(prefix: String, node: &DirectoryNode) -> Self {
        Self {
            prefix,
            text: node.name(),
            kind: "dir",
            info: Some(format!(
                "{} files, {} lines",
                format_number(node.file_count()),
                format_number(node.total_lines())
            )),
        }
    }

    fn file(prefix: String, file: &FileMetrics) -> Self {
        Self {
            prefix,
            text: file.filename(),
            kind: "file",
            info: None,
        }
    }

    fn detail(prefix: String, text: String) -> Self {
        Self {
            prefix,
            text,
            kind: "detail",
            info: None,
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Detail lines shown under a file in the tree.
fn file_details(file: &FileMetrics) -> Vec<String> {
    let mut lines = vec![format!(
        "Lines: {} | Code: {} | Comments: {} | Blank: {}",
        format_number(file.total_lines()),
        format_number(file.code_lines()),
        format_number(file.comment_lines()),
        format_number(file.blank_lines())
    )];

    match file.metadata() {
        Some(LanguageMetadata::Python(meta)) => lines.push(format!(
            "Python: Classes: {} | Functions: {} | Docstring: {}",
            meta.class_count,
            meta.function_count,
            yes_no(meta.has_docstring)
        )),
        Some(LanguageMetadata::Markdown(meta)) => lines.push(format!(
            "Markdown: Headings: {} | Links: {} | Images: {} | Code blocks: {} | Tables: {}",
            meta.heading_count,
            meta.link_count,
            meta.image_count,
            meta.code_block_count,
            meta.table_count
        )),
        None => lines.push(format!("Language: {}", file.language())),
    }

    lines
}

/// Files first, then subdirectories, each level indented under its parent.
fn tree_rows(rows: &mut Vec<TreeRow>, node: &DirectoryNode, prefix: &str, with_files: bool) {
    let files: &[FileMetrics] = if with_files { node.files() } else { &[] };
    let entries = files.len() + node.children().len();
    let mut index = 0;

    for file in files {
        index += 1;
        let last = index == entries;
        let connector = if last { "└── " } else { "├── " };
        let nested = format!("{prefix}{}", if last { "    " } else { "│   " });

        rows.push(TreeRow::file(format!("{prefix}{connector}"), file));
        for detail in file_details(file) {
            rows.push(TreeRow::detail(format!("{nested}  "), detail));
        }
    }

    for child in node.children() {
        index += 1;
        let last = index == entries;
        let connector = if last { "└── " } else { "├── " };
        let nested = format!("{prefix}{}", if last { "    " } else { "│   " });

        rows.push(TreeRow::dir(format!("{prefix}{connector}"), child));
        tree_rows(rows, child, &nested, with_files);
    }
}

fn build_tree(tree: &DirectoryNode, with_files: bool) -> Vec<TreeRow> {
    let mut rows = vec![TreeRow::dir(String::new(), tree)];
    tree_rows(&mut rows, tree, "", with_files);
    rows
}

#[derive(Debug, Serialize)]
struct SummaryView {
    files: String,
    lines: String,
    code: String,
    comment: String,
    blank: String,
    code_pct: String,
    comment_pct: String,
    blank_pct: String,
}

#[derive(Debug, Serialize)]
struct PythonView {
    files: String,
    classes: String,
    functions: String,
    docstrings: String,
}

impl From<&PythonSummary> for PythonView {
    fn from(python: &PythonSummary) -> Self {
        Self {
            files: format_number(python.python_files),
            classes: format_number(python.class_count),
            functions: format_number(python.function_count),
            docstrings: format_number(python.files_with_docstring),
        }
    }
}

#[derive(Debug, Serialize)]
struct MarkdownView {
    files: String,
    headings: String,
    links: String,
    images: String,
    code_blocks: String,
    tables: String,
}

impl From<&MarkdownSummary> for MarkdownView {
    fn from(markdown: &MarkdownSummary) -> Self {
        Self {
            files: format_number(markdown.markdown_files),
            headings: format_number(markdown.heading_count),
            links: format_number(markdown.link_count),
            images: format_number(markdown.image_count),
            code_blocks: format_number(markdown.code_block_count),
            tables: format_number(markdown.table_count),
        }
    }
}

/// Context shared by the full report and the `--quiet` summary.
#[derive(Debug, Serialize)]
struct ReportContext {
    root: String,
    wide_rule: String,
    narrow_rule: String,
    tree: Vec<TreeRow>,
    dirs: Vec<TreeRow>,
    summary: SummaryView,
    /// Only present when the tree holds Python files
    python: Option<PythonView>,
    /// Only present when the tree holds Markdown files
    markdown: Option<MarkdownView>,
}

fn report_context(tree: &DirectoryNode, root: &Path, with_trees: bool) -> ReportContext {
    let totals = tree.totals();
    let python = tree.python_summary();
    let markdown = tree.markdown_summary();

    ReportContext {
        root: root.display().to_string(),
        wide_rule: "═".repeat(WIDE_RULE),
        narrow_rule: "─".repeat(NARROW_RULE),
        tree: if with_trees { build_tree(tree, true) } else { Vec::new() },
        dirs: if with_trees { build_tree(tree, false) } else { Vec::new() },
        summary: SummaryView {
            files: format_number(tree.file_count()),
            lines: format_number(totals.total()),
            code: format_number(totals.code),
            comment: format_number(totals.comment),
            blank: format_number(totals.blank),
            code_pct: format_percentage(totals.code_percentage()),
            comment_pct: format_percentage(totals.comment_percentage()),
            blank_pct: format_percentage(totals.blank_percentage()),
        },
        python: (python.python_files > 0).then(|| PythonView::from(&python)),
        markdown: (markdown.markdown_files > 0).then(|| MarkdownView::from(&markdown)),
    }
}

/// Totals block of the JSON report.
#[derive(Debug, Serialize)]
struct JsonSummary {
    files: u64,
    total_lines: u64,
    code_lines: u64,
    comment_lines: u64,
    blank_lines: u64,
    code_percentage: f64,
    comment_percentage: f64,
    blank_percentage: f64,
}

/// Shape of `--output json`.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    root: String,
    summary: JsonSummary,
    python: PythonSummary,
    markdown: MarkdownSummary,
    tree: &'a DirectoryNode,
}

fn json_report<'a>(tree: &'a DirectoryNode, root: &Path) -> JsonReport<'a> {
    let totals = tree.totals();
    JsonReport {
        root: root.display().to_string(),
        summary: JsonSummary {
            files: tree.file_count(),
            total_lines: totals.total(),
            code_lines: totals.code,
            comment_lines: totals.comment,
            blank_lines: totals.blank,
            code_percentage: totals.code_percentage(),
            comment_percentage: totals.comment_percentage(),
            blank_percentage: totals.blank_percentage(),
        },
        python: tree.python_summary(),
        markdown: tree.markdown_summary(),
        tree,
    }
}

/// Render the analysis of a project.
///
/// Structured modes serialize the whole tree; the others render the full
/// report, or only the quick summary when `quiet` is set.
pub fn render_report(
    tree: &DirectoryNode,
    root: &Path,
    quiet: bool,
    output_mode: OutputMode,
) -> RenderResult {
    let theme = create_theme();

    // For JSON mode, use outstanding's render_auto for serialization
    if output_mode.is_structured() {
        return Ok(render_auto(
            REPORT_TEMPLATE,
            &json_report(tree, root),
            &theme,
            output_mode,
        )?);
    }

    let template = if quiet { SUMMARY_TEMPLATE } else { REPORT_TEMPLATE };
    let context = report_context(tree, root, !quiet);
    Ok(render_with_output(template, &context, &theme, output_mode)?)
}

#[derive(Debug, Serialize)]
struct NoFilesContext {
    root: String,
}

/// Hints shown when nothing under `root` was analyzed.
pub fn render_no_files(root: &Path, output_mode: OutputMode) -> RenderResult {
    let context = NoFilesContext {
        root: root.display().to_string(),
    };
    Ok(render_with_output(
        NO_FILES_TEMPLATE,
        &context,
        &create_theme(),
        output_mode,
    )?)
}

#[derive(Debug, Serialize)]
struct ExtensionGroup {
    language: String,
    extensions: String,
}

#[derive(Debug, Serialize)]
struct ExtensionsContext {
    rule: String,
    groups: Vec<ExtensionGroup>,
    extension_count: usize,
    language_count: usize,
}

/// Known extensions, one line per language.
pub fn render_extensions(
    groups: &BTreeMap<String, Vec<String>>,
    output_mode: OutputMode,
) -> RenderResult {
    let theme = create_theme();

    if output_mode.is_structured() {
        return Ok(render_auto(EXTENSIONS_TEMPLATE, groups, &theme, output_mode)?);
    }

    let context = ExtensionsContext {
        rule: "═".repeat(NARROW_RULE),
        groups: groups
            .iter()
            .map(|(language, extensions)| ExtensionGroup {
                language: language.clone(),
                extensions: extensions.join(", "),
            })
            .collect(),
        extension_count: groups.values().map(Vec::len).sum(),
        language_count: groups.len(),
    };
    Ok(render_with_output(
        EXTENSIONS_TEMPLATE,
        &context,
        &theme,
        output_mode,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use codestatlib::{LineCounts, MarkdownMetadata, PythonMetadata};

    fn sample_tree() -> DirectoryNode {
        let mut root = DirectoryNode::new("/work/project");
        root.add_file(
            FileMetrics::new("/work/project/app.py", "Python", LineCounts::new(8, 1, 1))
                .with_metadata(LanguageMetadata::Python(PythonMetadata {
                    has_docstring: true,
                    class_count: 1,
                    function_count: 2,
                })),
        );

        let mut src = DirectoryNode::new("/work/project/src");
        src.add_file(FileMetrics::new(
            "/work/project/src/lib.rs",
            "Rust",
            LineCounts::new(1200, 30, 4),
        ));
        root.add_child(src);
        root
    }

    fn text_report(tree: &DirectoryNode) -> String {
        render_report(tree, Path::new("/work/project"), false, OutputMode::Text).unwrap()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.0), "0.0%");
        assert_eq!(format_percentage(72.46), "72.5%");
    }

    #[test]
    fn test_tree_rows_list_files_then_dirs() {
        let rows = build_tree(&sample_tree(), true);
        let line = |row: &TreeRow| format!("{}{}", row.prefix, row.text);

        assert_eq!(rows[0].kind, "dir");
        assert_eq!(rows[0].info.as_deref(), Some("2 files, 1,244 lines"));
        assert_eq!(line(&rows[1]), "├── app.py");
        assert_eq!(
            line(&rows[2]),
            "│     Lines: 10 | Code: 8 | Comments: 1 | Blank: 1"
        );
        assert!(rows[3].text.contains("Docstring: yes"));
        assert_eq!(line(&rows[4]), "└── src");
        assert_eq!(rows[4].info.as_deref(), Some("1 files, 1,234 lines"));
        assert_eq!(line(&rows[5]), "    └── lib.rs");
        assert_eq!(rows[7].text, "Language: Rust");
    }

    #[test]
    fn test_dirs_only_has_no_files() {
        let rows = build_tree(&sample_tree(), false);

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.kind == "dir"));
    }

    #[test]
    fn test_text_report() {
        let text = text_report(&sample_tree());

        assert!(text.contains("codestat - Project Analysis"));
        assert!(text.contains("Project: /work/project"));
        assert!(text.contains("project/ (2 files, 1,244 lines)"));
        assert!(text.contains("└── src/ (1 files, 1,234 lines)"));
        assert!(text.contains("    └── lib.rs"));
        assert!(text.contains("Total Files: 2"));
        assert!(text.contains("Total Lines: 1,244"));
        assert!(text.contains("Files with Docstring: 1"));
        assert!(!text.contains("Markdown"));
        // text mode drops the style tags
        assert!(!text.contains("[title]"));
        assert!(!text.contains("[dir]"));
    }

    #[test]
    fn test_markdown_section_only_with_markdown_files() {
        let mut tree = sample_tree();
        tree.add_file(
            FileMetrics::new("/work/project/README.md", "Markdown", LineCounts::new(3, 0, 1))
                .with_metadata(LanguageMetadata::Markdown(MarkdownMetadata {
                    heading_count: 2,
                    link_count: 1,
                    ..MarkdownMetadata::default()
                })),
        );

        let text = text_report(&tree);
        assert!(text.contains("Headings: 2"));
        assert!(text.contains("Code Blocks: 0"));
    }

    #[test]
    fn test_quiet_summary() {
        let text =
            render_report(&sample_tree(), Path::new("/work/project"), true, OutputMode::Text)
                .unwrap();

        assert!(text.contains("codestat - Quick Summary"));
        assert!(text.contains("Files: 2 | Lines: 1,244"));
        assert!(text.contains("Python: 1 files, 1 classes, 2 functions"));
        assert!(!text.contains("Markdown:"));
        assert!(!text.contains("lib.rs"));
    }

    #[test]
    fn test_json_report_shape() {
        let json =
            render_report(&sample_tree(), Path::new("/work/project"), false, OutputMode::Json)
                .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["root"], "/work/project");
        assert_eq!(value["summary"]["files"], 2);
        assert_eq!(value["summary"]["total_lines"], 1244);
        assert_eq!(value["python"]["function_count"], 2);
        assert_eq!(value["markdown"]["markdown_files"], 0);
        assert!(value["tree"]["children"].is_array());
    }

    #[test]
    fn test_extensions_listing() {
        let mut groups = BTreeMap::new();
        groups.insert("Python".to_string(), vec![".py".to_string(), ".pyi".to_string()]);
        groups.insert("Rust".to_string(), vec![".rs".to_string()]);

        let text = render_extensions(&groups, OutputMode::Text).unwrap();
        assert!(text.contains("Python: .py, .pyi"));
        assert!(text.contains("Rust: .rs"));
        assert!(text.contains("Total: 3 supported extensions across 2 languages"));

        let json = render_extensions(&groups, OutputMode::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["Rust"][0], ".rs");
    }

    #[test]
    fn test_no_files_notice() {
        let text = render_no_files(Path::new("/empty"), OutputMode::Text).unwrap();
        assert!(text.contains("No files analyzed in /empty."));
        assert!(text.contains("--list-extensions"));
    }
}
