//! Python classifier built on tree-sitter.
//!
//! Python is the one language classified from a real syntax tree instead of
//! the marker heuristic in [`crate::classifier`]:
//!
//! - a line is a comment when it holds at least one `comment` node, so
//!   trailing comments after code are found and `#` inside a string is not
//! - multi-line strings are string nodes, so an assigned triple-quoted string
//!   stays code even when it looks like a block of comments
//! - the same tree yields the module docstring flag and the class and
//!   function counts (methods and nested functions count as functions)
//!
//! Grammar errors keep the tree: comment rows still come from `comment`
//! nodes and only the metadata is reported as zero. A source that cannot
//! even be tokenized (an unterminated string) falls back to the heuristic
//! with `#` as the only marker.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, warn};
use tree_sitter::{Node, Parser, Tree};

use crate::classifier::classify_source;
use crate::error::CodestatError;
use crate::language::{LanguageSyntax, PYTHON};
use crate::stats::{FileMetrics, LanguageMetadata, LineCounts, PythonMetadata};
use crate::Result;

fn syntax_error(message: impl Into<String>) -> CodestatError {
    CodestatError::Syntax {
        language: PYTHON.to_string(),
        message: message.into(),
    }
}

/// Parse Python source into a tree, keeping error and missing nodes.
pub fn parse_tree(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
    parser
        .set_language(&language)
        .map_err(|e| syntax_error(e.to_string()))?;

    parser
        .parse(source, None)
        .ok_or_else(|| syntax_error("parser returned no tree"))
}

/// Parse Python source, failing when the tree holds any error node.
pub fn parse(source: &str) -> Result<Tree> {
    let tree = parse_tree(source)?;

    let root = tree.root_node();
    if root.has_error() {
        let line = first_error_line(root).unwrap_or(1);
        return Err(syntax_error(format!("invalid syntax near line {line}")));
    }

    Ok(tree)
}

/// 1-based line of the first error or missing node.
fn first_error_line(root: Node) -> Option<usize> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node.start_position().row + 1);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// Token-level damage: a string left open, which Python's own tokenizer
/// rejects before any grammar applies.
fn has_lexical_error(root: Node) -> bool {
    if !root.has_error() {
        return false;
    }

    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_missing() && node.kind() == "string_end" {
            return true;
        }
        if node.kind() == "string_start" && !string_is_closed(node) {
            return true;
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return false;
            }
        }
    }
}

/// Whether the string opened by `start` has a real closing token.
fn string_is_closed(start: Node) -> bool {
    let Some(string) = start.parent().filter(|p| p.kind() == "string") else {
        return false;
    };
    let mut cursor = string.walk();
    let closed = string
        .children(&mut cursor)
        .any(|child| child.kind() == "string_end" && !child.is_missing());
    closed
}

/// What one pass over the tree collects.
#[derive(Debug, Default)]
struct TreeScan {
    /// 0-based rows holding at least one comment
    comment_rows: HashSet<usize>,
    class_count: u64,
    function_count: u64,
}

fn scan_tree(tree: &Tree) -> TreeScan {
    let mut scan = TreeScan::default();
    let mut cursor = tree.walk();

    loop {
        let node = cursor.node();
        match node.kind() {
            "comment" => {
                scan.comment_rows.insert(node.start_position().row);
            }
            "class_definition" => scan.class_count += 1,
            "function_definition" => scan.function_count += 1,
            _ => {}
        }

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return scan;
            }
        }
    }
}

/// Whether the module body starts with a plain string expression.
fn has_module_docstring(root: Node, source: &[u8]) -> bool {
    let mut cursor = root.walk();
    let Some(first) = root
        .named_children(&mut cursor)
        .find(|n| n.kind() != "comment")
    else {
        return false;
    };
    if first.kind() != "expression_statement" || first.named_child_count() != 1 {
        return false;
    }

    let mut cursor = first.walk();
    let Some(mut expr) = first.named_children(&mut cursor).next() else {
        return false;
    };

    while expr.kind() == "parenthesized_expression" {
        let mut cursor = expr.walk();
        let inner = expr
            .named_children(&mut cursor)
            .find(|n| n.kind() != "comment");
        match inner {
            Some(inner) => expr = inner,
            None => return false,
        }
    }

    match expr.kind() {
        "string" => is_plain_string(expr, source),
        "concatenated_string" => {
            let mut cursor = expr.walk();
            let parts: Vec<Node> = expr.named_children(&mut cursor).collect();
            parts.iter().all(|part| is_plain_string(*part, source))
        }
        _ => false,
    }
}

/// A `str` literal: no f-string interpolation, no bytes prefix.
fn is_plain_string(node: Node, source: &[u8]) -> bool {
    if node.kind() != "string" {
        return false;
    }

    let mut cursor = node.walk();
    let mut children = node.children(&mut cursor).peekable();

    // prefix letters (b, f, r, u) are part of the opening token
    let prefix_ok = match children.peek() {
        Some(start) if start.kind() == "string_start" => start
            .utf8_text(source)
            .map(|text| !text.chars().any(|c| matches!(c, 'b' | 'B' | 'f' | 'F')))
            .unwrap_or(false),
        _ => true,
    };

    prefix_ok && !children.any(|child| child.kind() == "interpolation")
}

/// Classify a Python source file.
pub fn classify_python(path: impl Into<PathBuf>, source: &str) -> FileMetrics {
    let path = path.into();
    let total = source.lines().count() as u64;

    if total == 0 {
        return FileMetrics::empty(path, PYTHON)
            .with_metadata(LanguageMetadata::Python(PythonMetadata::default()));
    }

    let blank = source.lines().filter(|l| l.trim().is_empty()).count() as u64;

    let tree = match parse_tree(source) {
        Ok(tree) => tree,
        Err(err) => return heuristic(path, source, &err.to_string()),
    };
    let root = tree.root_node();

    if has_lexical_error(root) {
        let line = first_error_line(root).unwrap_or(1);
        return heuristic(path, source, &format!("unterminated token near line {line}"));
    }

    let scan = scan_tree(&tree);
    let counts = LineCounts::from_total(total, scan.comment_rows.len() as u64, blank);

    let metadata = if root.has_error() {
        let line = first_error_line(root).unwrap_or(1);
        warn!(path = %path.display(), line, "invalid syntax, python metadata left at zero");
        PythonMetadata::default()
    } else {
        PythonMetadata {
            has_docstring: has_module_docstring(root, source.as_bytes()),
            class_count: scan.class_count,
            function_count: scan.function_count,
        }
    };

    debug!(
        path = %path.display(),
        classes = metadata.class_count,
        functions = metadata.function_count,
        "parsed python module"
    );
    FileMetrics::new(path, PYTHON, counts).with_metadata(LanguageMetadata::Python(metadata))
}

/// `#`-only line heuristic, used when the source cannot be tokenized.
fn heuristic(path: PathBuf, source: &str, reason: &str) -> FileMetrics {
    warn!(path = %path.display(), reason, "falling back to line heuristic");
    let counts = classify_source(source, &LanguageSyntax::hash_style());
    FileMetrics::new(path, PYTHON, counts)
        .with_metadata(LanguageMetadata::Python(PythonMetadata::default()))
}
