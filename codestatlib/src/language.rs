//! Language registry.
//!
//! Maps file extensions to language names, and language names to the comment
//! grammar the generic classifier needs ([`LanguageSyntax`]).
//!
//! The process-wide registry starts from the built-in table and can be
//! extended at runtime with [`register_language`]. Readers take an
//! [`Arc`] snapshot of the syntax they classify with, so a registration never
//! changes the rules under a classification that is already running.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

/// Name reported for files whose extension is not registered.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// The reference language, classified by [`crate::python`].
pub const PYTHON: &str = "Python";

/// Markdown documents, analyzed by [`crate::markdown`].
pub const MARKDOWN: &str = "Markdown";

/// A start/end pair delimiting a block comment, e.g. `/*` and `*/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockDelimiter {
    pub start: String,
    pub end: String,
}

/// Comment grammar of one language.
///
/// Markers keep their registration order, which is also the order in which
/// the classifier tries them. Duplicates are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageSyntax {
    single_line: Vec<String>,
    blocks: Vec<BlockDelimiter>,
}

impl LanguageSyntax {
    /// A syntax without any comment markers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single-line comment marker.
    pub fn line(mut self, marker: impl Into<String>) -> Self {
        let marker = marker.into();
        if !marker.is_empty() && !self.single_line.contains(&marker) {
            self.single_line.push(marker);
        }
        self
    }

    /// Add a block comment delimiter pair.
    pub fn block(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        let delimiter = BlockDelimiter {
            start: start.into(),
            end: end.into(),
        };
        if !delimiter.start.is_empty()
            && !delimiter.end.is_empty()
            && !self.blocks.contains(&delimiter)
        {
            self.blocks.push(delimiter);
        }
        self
    }

    /// `//` and `/* */`
    pub fn c_style() -> Self {
        Self::new().line("//").block("/*", "*/")
    }

    /// `#`
    pub fn hash_style() -> Self {
        Self::new().line("#")
    }

    /// `--`
    pub fn dash_style() -> Self {
        Self::new().line("--")
    }

    /// `<!-- -->`
    pub fn markup_style() -> Self {
        Self::new().block("<!--", "-->")
    }

    /// `/* */` only
    pub fn css_style() -> Self {
        Self::new().block("/*", "*/")
    }

    pub fn single_line_markers(&self) -> &[String] {
        &self.single_line
    }

    pub fn block_delimiters(&self) -> &[BlockDelimiter] {
        &self.blocks
    }

    /// Whether the language has any comment syntax at all.
    pub fn has_comments(&self) -> bool {
        !self.single_line.is_empty() || !self.blocks.is_empty()
    }
}

static EMPTY_SYNTAX: LazyLock<Arc<LanguageSyntax>> =
    LazyLock::new(|| Arc::new(LanguageSyntax::new()));

/// Built-in extension table: (language, extensions).
const BUILTIN_EXTENSIONS: &[(&str, &[&str])] = &[
    ("JavaScript", &[".js", ".jsx", ".mjs", ".cjs"]),
    ("TypeScript", &[".ts", ".tsx"]),
    ("HTML", &[".html", ".htm"]),
    ("CSS", &[".css"]),
    ("SCSS", &[".scss"]),
    ("Sass", &[".sass"]),
    ("Less", &[".less"]),
    ("C", &[".c", ".h"]),
    ("C++", &[".cpp", ".cc", ".cxx", ".hpp", ".hh", ".hxx"]),
    ("C#", &[".cs"]),
    ("Java", &[".java"]),
    ("Kotlin", &[".kt", ".kts"]),
    ("Scala", &[".scala"]),
    ("Groovy", &[".groovy"]),
    ("Go", &[".go"]),
    ("Rust", &[".rs"]),
    ("Swift", &[".swift"]),
    ("Ruby", &[".rb"]),
    ("PHP", &[".php"]),
    ("Perl", &[".pl"]),
    ("Lua", &[".lua"]),
    ("Shell", &[".sh"]),
    ("Bash", &[".bash"]),
    ("Zsh", &[".zsh"]),
    ("Fish", &[".fish"]),
    ("SQL", &[".sql"]),
    ("JSON", &[".json"]),
    ("YAML", &[".yaml", ".yml"]),
    ("XML", &[".xml"]),
    ("TOML", &[".toml"]),
    ("R", &[".r"]),
    ("Objective-C", &[".m"]),
    ("Objective-C++", &[".mm"]),
    ("Dart", &[".dart"]),
    ("Elixir", &[".ex", ".exs"]),
    ("Erlang", &[".erl", ".hrl"]),
    ("Haskell", &[".hs", ".lhs"]),
    ("VimScript", &[".vim"]),
    ("EmacsLisp", &[".el"]),
    ("Clojure", &[".clj"]),
    ("ClojureScript", &[".cljs"]),
    ("CommonLisp", &[".lisp"]),
    ("Scheme", &[".scm"]),
    (PYTHON, &[".py", ".pyw", ".pyi"]),
    (MARKDOWN, &[".md", ".markdown"]),
];

/// Comment grammar for a built-in language.
fn builtin_syntax(language: &str) -> LanguageSyntax {
    match language {
        "JavaScript" | "TypeScript" | "C" | "C++" | "C#" | "Java" | "Kotlin" | "Scala"
        | "Go" | "Rust" | "Swift" | "Dart" | "PHP" | "Groovy" | "Objective-C"
        | "Objective-C++" => LanguageSyntax::c_style(),
        "Python" | "Ruby" | "Shell" | "Bash" | "Zsh" | "Fish" | "Perl" | "R" | "YAML"
        | "TOML" | "Elixir" => LanguageSyntax::hash_style(),
        "SQL" | "Lua" | "Haskell" => LanguageSyntax::dash_style(),
        "HTML" | "XML" => LanguageSyntax::markup_style(),
        "CSS" | "SCSS" | "Sass" | "Less" => LanguageSyntax::css_style(),
        "Erlang" => LanguageSyntax::new().line("%"),
        "VimScript" => LanguageSyntax::new().line("\""),
        "EmacsLisp" | "Clojure" | "ClojureScript" | "CommonLisp" | "Scheme" => {
            LanguageSyntax::new().line(";")
        }
        _ => LanguageSyntax::new(),
    }
}

/// Normalize an extension to the registry's key form: lower-case, leading dot.
pub fn normalize_extension(extension: &str) -> String {
    let lower = extension.trim().to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}

/// Extension → language and language → syntax tables.
#[derive(Debug, Clone, Default)]
pub struct LanguageRegistry {
    extensions: BTreeMap<String, String>,
    syntaxes: HashMap<String, Arc<LanguageSyntax>>,
}

impl LanguageRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in language table.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (language, extensions) in BUILTIN_EXTENSIONS {
            registry.register(extensions.iter().copied(), language, builtin_syntax(language));
        }
        registry
    }

    /// Register a language with its extensions and comment syntax.
    ///
    /// Re-registering a language replaces its syntax; extensions already
    /// mapped to another language are moved to this one.
    pub fn register<I, S>(&mut self, extensions: I, language: &str, syntax: LanguageSyntax)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for extension in extensions {
            self.extensions
                .insert(normalize_extension(extension.as_ref()), language.to_string());
        }
        self.syntaxes.insert(language.to_string(), Arc::new(syntax));
    }

    /// Language name for an extension, or [`UNKNOWN_LANGUAGE`].
    pub fn resolve_language(&self, extension: &str) -> &str {
        self.extensions
            .get(&normalize_extension(extension))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LANGUAGE)
    }

    /// Comment syntax for a language; empty for unknown languages.
    pub fn syntax_for(&self, language: &str) -> Arc<LanguageSyntax> {
        self.syntaxes
            .get(language)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&EMPTY_SYNTAX))
    }

    /// Whether an extension maps to a known language.
    pub fn is_supported(&self, extension: &str) -> bool {
        self.extensions.contains_key(&normalize_extension(extension))
    }

    /// All known extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<String> {
        self.extensions.keys().cloned().collect()
    }

    /// Known extensions grouped by language, both sorted.
    pub fn extensions_by_language(&self) -> BTreeMap<String, Vec<String>> {
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (extension, language) in &self.extensions {
            groups
                .entry(language.clone())
                .or_default()
                .push(extension.clone());
        }
        groups
    }
}

static REGISTRY: LazyLock<RwLock<LanguageRegistry>> =
    LazyLock::new(|| RwLock::new(LanguageRegistry::builtin()));

fn with_registry<T>(f: impl FnOnce(&LanguageRegistry) -> T) -> T {
    let guard = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    f(&guard)
}

/// Language name for an extension in the process-wide registry.
pub fn resolve_language(extension: &str) -> String {
    with_registry(|r| r.resolve_language(extension).to_string())
}

/// Language name for a path, from its extension.
pub fn language_for_path(path: impl AsRef<Path>) -> String {
    match path.as_ref().extension() {
        Some(ext) => resolve_language(&ext.to_string_lossy()),
        None => UNKNOWN_LANGUAGE.to_string(),
    }
}

/// Comment syntax for a language in the process-wide registry.
pub fn syntax_for(language: &str) -> Arc<LanguageSyntax> {
    with_registry(|r| r.syntax_for(language))
}

/// Whether an extension is known to the process-wide registry.
pub fn is_supported_extension(extension: &str) -> bool {
    with_registry(|r| r.is_supported(extension))
}

/// Every extension known to the process-wide registry, sorted.
pub fn supported_extensions() -> Vec<String> {
    with_registry(LanguageRegistry::supported_extensions)
}

/// Extensions of the process-wide registry grouped by language.
pub fn extensions_by_language() -> BTreeMap<String, Vec<String>> {
    with_registry(LanguageRegistry::extensions_by_language)
}

/// Add or replace a language in the process-wide registry.
pub fn register_language<I, S>(extensions: I, language: &str, syntax: LanguageSyntax)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut guard = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    guard.register(extensions, language, syntax);
}
