//! Markdown analyzer.
//!
//! Markdown has no comments: every non-blank line counts as content (code).
//! The analyzer also records the document's structure: ATX headings per
//! level, inline links, images, fenced code blocks and pipe tables. Lines
//! inside fenced blocks are not inspected for structure.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::language::MARKDOWN;
use crate::stats::{FileMetrics, LanguageMetadata, LineCounts, MarkdownMetadata};

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(#{1,6})\s+").expect("valid heading pattern"));

static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]+\)").expect("valid image pattern"));

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]+\]\([^)]+\)").expect("valid link pattern"));

// `| --- | :---: |`, outer pipes optional
static TABLE_DIVIDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\|?\s*:?-+:?\s*(\|\s*:?-+:?\s*)+\|?\s*$").expect("valid divider pattern")
});

/// Links that are not the `[alt](src)` part of an image.
fn count_links(line: &str) -> u64 {
    LINK.find_iter(line)
        .filter(|m| !line[..m.start()].ends_with('!'))
        .count() as u64
}

/// Collect Markdown structure from a list of lines.
pub fn scan_markdown(lines: &[&str]) -> MarkdownMetadata {
    let mut meta = MarkdownMetadata::default();
    let mut in_fence = false;

    for (i, line) in lines.iter().enumerate() {
        if line.trim().starts_with("```") {
            if !in_fence {
                meta.code_block_count += 1;
            }
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        if let Some(caps) = HEADING.captures(line) {
            let level = caps[1].len();
            meta.headings_by_level[level - 1] += 1;
            meta.heading_count += 1;
        }

        meta.image_count += IMAGE.find_iter(line).count() as u64;
        meta.link_count += count_links(line);

        if line.contains('|') {
            if let Some(next) = lines.get(i + 1) {
                if TABLE_DIVIDER.is_match(next.trim()) {
                    meta.table_count += 1;
                }
            }
        }
    }

    meta
}

/// Analyze a Markdown document.
pub fn classify_markdown(path: impl Into<PathBuf>, source: &str) -> FileMetrics {
    let lines: Vec<&str> = source.lines().collect();
    let total = lines.len() as u64;
    let blank = lines.iter().filter(|l| l.trim().is_empty()).count() as u64;

    FileMetrics::new(path, MARKDOWN, LineCounts::from_total(total, 0, blank))
        .with_metadata(LanguageMetadata::Markdown(scan_markdown(&lines)))
}
