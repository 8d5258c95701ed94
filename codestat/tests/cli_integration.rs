//! Integration tests for codestat CLI

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::{tempdir, TempDir};

fn run_codestat(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_codestat"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn sample_project() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();

    write(
        root,
        "app.py",
        "\"\"\"App entry.\"\"\"\n\nclass App:\n    def run(self):\n        return 1  # done\n",
    );
    write(root, "pkg/util.py", "def helper():\n    pass\n");
    write(root, "src/main.rs", "// entry\nfn main() {\n\n}\n");
    write(root, "README.md", "# Project\n\nSee [docs](docs.md).\n");
    write(root, "node_modules/dep/index.js", "module.exports = {};\n");

    dir
}

fn path_arg(dir: &TempDir) -> String {
    dir.path().to_string_lossy().to_string()
}

#[test]
fn test_cli_help() {
    let (stdout, _, success) = run_codestat(&["--help"]);

    assert!(success);
    assert!(stdout.contains("codestat"));
    assert!(stdout.contains("--ext"));
    assert!(stdout.contains("--ignore"));
    assert!(stdout.contains("--quiet"));
    assert!(stdout.contains("--output"));
    assert!(stdout.contains("--list-extensions"));
}

#[test]
fn test_cli_version() {
    let (stdout, _, success) = run_codestat(&["--version"]);

    assert!(success);
    assert!(stdout.contains("codestat"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_text_output() {
    let project = sample_project();
    let (stdout, _, success) = run_codestat(&[&path_arg(&project)]);

    assert!(success);
    assert!(stdout.contains("Project Analysis"));
    assert!(stdout.contains("app.py"));
    assert!(stdout.contains("main.rs"));
    assert!(stdout.contains("Summary"));
    assert!(stdout.contains("Total Files: 4"));
    assert!(stdout.contains("Files with Docstring: 1"));
    assert!(stdout.contains("Headings: 1"));
    assert!(!stdout.contains("index.js"));
}

#[test]
fn test_json_output() {
    let project = sample_project();
    let (stdout, _, success) = run_codestat(&[&path_arg(&project), "--output", "json"]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");

    assert_eq!(parsed["summary"]["files"], 4);
    assert_eq!(parsed["summary"]["total_lines"], 5 + 2 + 4 + 3);
    assert_eq!(parsed["summary"]["comment_lines"], 2);
    assert_eq!(parsed["python"]["python_files"], 2);
    assert_eq!(parsed["python"]["class_count"], 1);
    assert_eq!(parsed["python"]["function_count"], 2);
    assert_eq!(parsed["markdown"]["link_count"], 1);
    assert!(parsed["tree"]["files"].is_array());
    assert!(parsed["tree"]["children"].is_array());
}

#[test]
fn test_quiet_output() {
    let project = sample_project();
    let (stdout, _, success) = run_codestat(&[&path_arg(&project), "--quiet"]);

    assert!(success);
    assert!(stdout.contains("Quick Summary"));
    assert!(stdout.contains("Files: 4 | Lines: 14"));
    assert!(stdout.contains("Python: 2 files, 1 classes, 2 functions"));
    assert!(!stdout.contains("app.py"));
}

#[test]
fn test_ext_filter() {
    let project = sample_project();
    let (stdout, _, success) =
        run_codestat(&[&path_arg(&project), "--ext", "rs", "--output", "json"]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["summary"]["files"], 1);
    assert_eq!(parsed["python"]["python_files"], 0);
}

#[test]
fn test_unsupported_ext_matches_nothing() {
    let project = sample_project();
    write(project.path(), "data.xyz", "payload\n");

    let (stdout, stderr, success) =
        run_codestat(&[&path_arg(&project), "--ext", "xyz", "--ext", "rs", "-o", "json"]);

    assert!(success);
    assert!(stderr.contains("unsupported extension"));
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["summary"]["files"], 1);

    let (stdout, _, success) = run_codestat(&[&path_arg(&project), "--ext", "xyz"]);
    assert!(success);
    assert!(stdout.contains("No files analyzed"));
}

#[test]
fn test_plain_text_has_no_escape_codes() {
    let project = sample_project();
    let (stdout, _, success) = run_codestat(&[&path_arg(&project), "--output", "text"]);

    assert!(success);
    assert!(stdout.contains("Total Files: 4"));
    assert!(!stdout.contains('\u{1b}'));
    assert!(!stdout.contains("[title]"));
}

#[test]
fn test_ignore_dir() {
    let project = sample_project();
    let (stdout, _, success) =
        run_codestat(&[&path_arg(&project), "-i", "pkg", "-o", "json"]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["summary"]["files"], 3);
}

#[test]
fn test_exclude_glob() {
    let project = sample_project();
    let (stdout, _, success) = run_codestat(&[
        &path_arg(&project),
        "--exclude",
        "**/*.md",
        "--output",
        "json",
    ]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["summary"]["files"], 3);
    assert_eq!(parsed["markdown"]["markdown_files"], 0);
}

#[test]
fn test_invalid_glob() {
    let project = sample_project();
    let (_, stderr, success) = run_codestat(&[&path_arg(&project), "--include", "[bad"]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_list_extensions() {
    let (stdout, _, success) = run_codestat(&["--list-extensions"]);

    assert!(success);
    assert!(stdout.contains(".py"));
    assert!(stdout.contains(".rs"));
    assert!(stdout.contains(".md"));
    assert!(stdout.contains("supported extensions"));
    assert!(stdout.contains("Python: .py"));
}

#[test]
fn test_list_extensions_json() {
    let (stdout, _, success) = run_codestat(&["--list-extensions", "-o", "json"]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["Rust"][0], ".rs");
    assert!(parsed["Python"].as_array().unwrap().contains(&".py".into()));
}

#[test]
fn test_invalid_path() {
    let (_, stderr, success) = run_codestat(&["/nonexistent/path/that/does/not/exist"]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_path_is_a_file() {
    let project = sample_project();
    let file = project.path().join("app.py");
    let (_, stderr, success) = run_codestat(&[&file.to_string_lossy()]);

    assert!(!success);
    assert!(stderr.contains("not a directory"));
}

#[test]
fn test_no_files_notice() {
    let dir = tempdir().unwrap();
    write(dir.path(), "image.png", "binary");

    let (stdout, _, success) = run_codestat(&[&path_arg(&dir)]);

    assert!(success);
    assert!(stdout.contains("No files analyzed"));
}
