//! # codestat
//!
//! A CLI tool for counting code, comment and blank lines across a project.
//!
//! ## Overview
//!
//! codestat is built on top of codestatlib. It walks a directory, analyzes
//! every file with a known extension and prints a tree report with per-file
//! counts, a directory-only tree and a summary. Python files get class,
//! function and docstring statistics; Markdown files get heading, link,
//! image, code block and table counts.
//!
//! ## Usage
//!
//! ```bash
//! # Analyze the current directory
//! codestat
//!
//! # Only Python and Markdown, skipping an extra directory
//! codestat ./project --ext py --ext md --ignore fixtures
//!
//! # Filter files with glob patterns
//! codestat . --include "**/src/**" --exclude "**/*_pb2.py"
//!
//! # Compact summary, or machine-readable output
//! codestat . --quiet
//! codestat . --output json
//!
//! # Which extensions are recognized
//! codestat --list-extensions
//! ```
//!
//! Logging goes to stderr; `-v` raises the level and `RUST_LOG` overrides it.

mod render;

use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use codestatlib::{
    count_directory, extensions_by_language, is_supported_extension, CountOptions, FilterConfig,
};
use render::OutputMode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("codestat")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Count code, comment and blank lines across a project")
        .arg(
            Arg::new("path")
                .help("Directory to analyze (defaults to current directory)")
                .default_value("."),
        )
        .arg(
            Arg::new("ext")
                .short('e')
                .long("ext")
                .value_name("EXT")
                .action(ArgAction::Append)
                .help("Only analyze files with this extension (can be specified multiple times)"),
        )
        .arg(
            Arg::new("ignore")
                .short('i')
                .long("ignore")
                .value_name("DIR")
                .action(ArgAction::Append)
                .help("Additional directory name to skip (can be specified multiple times)"),
        )
        .arg(
            Arg::new("include")
                .long("include")
                .value_name("GLOB")
                .action(ArgAction::Append)
                .help("Include files matching glob pattern"),
        )
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .value_name("GLOB")
                .action(ArgAction::Append)
                .help("Exclude files matching glob pattern"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Show only a compact summary"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["auto", "term", "text", "json"])
                .default_value("auto")
                .help("Output mode; auto styles the report only on a terminal"),
        )
        .arg(
            Arg::new("list-extensions")
                .long("list-extensions")
                .action(ArgAction::SetTrue)
                .help("List supported file extensions and exit"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)"),
        )
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn values<'a>(matches: &'a ArgMatches, id: &str) -> Vec<&'a str> {
    matches
        .get_many::<String>(id)
        .map(|values| values.map(String::as_str).collect())
        .unwrap_or_default()
}

/// Build filter config from matches
fn build_filter(matches: &ArgMatches) -> anyhow::Result<FilterConfig> {
    let mut filter = FilterConfig::new()
        .include_many(&values(matches, "include"))?
        .exclude_many(&values(matches, "exclude"))?;

    let extensions = values(matches, "ext");
    for ext in extensions.iter().filter(|e| !is_supported_extension(e)) {
        warn!(extension = %ext, "unsupported extension, no files will match it");
    }
    if !extensions.is_empty() {
        filter = filter.extensions(extensions);
    }

    Ok(filter)
}

/// Build count options from matches
fn build_options(matches: &ArgMatches) -> anyhow::Result<CountOptions> {
    let mut options = CountOptions::new().filter(build_filter(matches)?);

    if let Some(dirs) = matches.get_many::<String>("ignore") {
        options = options.ignore_dirs(dirs.cloned());
    }

    Ok(options)
}

fn output_mode(matches: &ArgMatches) -> OutputMode {
    match matches.get_one::<String>("output").map(String::as_str) {
        Some("json") => OutputMode::Json,
        Some("text") => OutputMode::Text,
        Some("term") => OutputMode::Term,
        _ => OutputMode::Auto,
    }
}

/// Templates may drop the final newline; print exactly one.
fn emit(rendered: &str) {
    println!("{}", rendered.trim_end());
}

fn render_failed(e: Box<dyn std::error::Error>) -> anyhow::Error {
    anyhow::anyhow!("failed to render output: {e}")
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let mode = output_mode(matches);

    if matches.get_flag("list-extensions") {
        let listing =
            render::render_extensions(&extensions_by_language(), mode).map_err(render_failed)?;
        emit(&listing);
        return Ok(());
    }

    let path = matches
        .get_one::<String>("path")
        .map(|s| s.as_str())
        .unwrap_or(".");
    let options = build_options(matches)?;

    let tree = count_directory(path, &options)?;
    let root = tree.path().to_path_buf();
    info!(files = tree.file_count(), "analysis complete");

    if tree.is_empty() && !mode.is_structured() {
        emit(&render::render_no_files(&root, mode).map_err(render_failed)?);
        return Ok(());
    }

    let report = render::render_report(&tree, &root, matches.get_flag("quiet"), mode)
        .map_err(render_failed)?;
    emit(&report);

    Ok(())
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(matches.get_count("verbose"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
