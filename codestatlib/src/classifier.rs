//! Generic line classifier.
//!
//! A single forward pass over a file's lines, driven only by the language's
//! comment markers ([`LanguageSyntax`]). Each line is blank, comment or code:
//!
//! - whitespace-only lines are blank, even inside a block comment
//! - inside a block comment every line is a comment; the block ends on the
//!   first line containing the active terminator
//! - otherwise the line is a comment when its trimmed text *starts* with a
//!   block start delimiter (tried first) or a single-line marker
//! - everything else is code
//!
//! Markers are only recognized at the start of a line, so a trailing comment
//! after code (`x = 1 // note`) leaves the line as code, and a marker inside a
//! string literal at the start of a line reads as a comment. Python gets an
//! exact classifier in [`crate::python`].

use crate::language::LanguageSyntax;
use crate::stats::LineCounts;

/// How a single line was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Code,
}

/// Line-by-line classifier state.
pub struct LineClassifier<'a> {
    syntax: &'a LanguageSyntax,
    /// Terminator of the block comment we are inside, if any
    active_terminator: Option<&'a str>,
    total: u64,
    comment: u64,
    blank: u64,
}

impl<'a> LineClassifier<'a> {
    pub fn new(syntax: &'a LanguageSyntax) -> Self {
        Self {
            syntax,
            active_terminator: None,
            total: 0,
            comment: 0,
            blank: 0,
        }
    }

    /// Whether the previous line left a block comment open.
    pub fn in_block_comment(&self) -> bool {
        self.active_terminator.is_some()
    }

    /// Classify the next line. The line may still carry its newline.
    pub fn visit_line(&mut self, line: &str) -> LineKind {
        self.total += 1;
        let kind = self.classify(line);
        match kind {
            LineKind::Blank => self.blank += 1,
            LineKind::Comment => self.comment += 1,
            LineKind::Code => {}
        }
        kind
    }

    fn classify(&mut self, line: &str) -> LineKind {
        if line.trim().is_empty() {
            return LineKind::Blank;
        }

        if let Some(terminator) = self.active_terminator {
            if line.contains(terminator) {
                self.active_terminator = None;
            }
            return LineKind::Comment;
        }

        let syntax = self.syntax;
        let trimmed = line.trim_start();

        for delimiter in syntax.block_delimiters() {
            if let Some(rest) = trimmed.strip_prefix(delimiter.start.as_str()) {
                if !rest.contains(delimiter.end.as_str()) {
                    self.active_terminator = Some(delimiter.end.as_str());
                }
                return LineKind::Comment;
            }
        }

        if syntax
            .single_line_markers()
            .iter()
            .any(|marker| trimmed.starts_with(marker.as_str()))
        {
            return LineKind::Comment;
        }

        LineKind::Code
    }

    /// Final counts; code is whatever is neither blank nor comment.
    pub fn finish(self) -> LineCounts {
        LineCounts::from_total(self.total, self.comment, self.blank)
    }
}

/// Classify a sequence of lines.
pub fn classify_lines<'l, I>(lines: I, syntax: &LanguageSyntax) -> LineCounts
where
    I: IntoIterator<Item = &'l str>,
{
    let mut classifier = LineClassifier::new(syntax);
    for line in lines {
        classifier.visit_line(line);
    }
    classifier.finish()
}

/// Classify a whole source text, split into lines with [`str::lines`].
pub fn classify_source(source: &str, syntax: &LanguageSyntax) -> LineCounts {
    classify_lines(source.lines(), syntax)
}
