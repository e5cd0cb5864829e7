//! Descriptor linting library for the Dirstub stub server.
//!
//! The server parses descriptors per request, so a bad file only shows up
//! when the route is first hit. This library walks a stub tree ahead of
//! time and reports every problem the server would: unreadable files,
//! malformed JSON, invalid predicate regexes, plus a few things the
//! server tolerates silently (missing body files, descriptors that can
//! never match).
//!
//! # Example
//!
//! ```no_run
//! use dirstub_lint::lint_tree;
//! use std::path::Path;
//!
//! let result = lint_tree(Path::new("./stubs"));
//! if result.has_errors() {
//!     eprintln!("Found {} errors", result.errors);
//! }
//! ```

mod types;

pub use types::{LintIssue, LintResult, Severity};

use dirstub_server::descriptor::{parse_descriptor, ContentSpec};
use std::path::{Path, PathBuf};

const KNOWN_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

/// Lint every descriptor file (`$*.json`) under a stub tree root.
pub fn lint_tree(root: &Path) -> LintResult {
    let mut result = LintResult::new();
    walk(root, root, &mut result);
    result
}

fn walk(root: &Path, dir: &Path, result: &mut LintResult) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            walk(root, &path, result);
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(is_descriptor_name)
        {
            result.merge(lint_file(&path, Some(root)));
        }
    }
}

fn is_descriptor_name(name: &str) -> bool {
    name.starts_with('$') && name.ends_with(".json")
}

/// Lint a single descriptor file.
///
/// `root` is the stub tree root used to resolve rooted body references;
/// without it rooted bodies are not checked for existence.
pub fn lint_file(path: &Path, root: Option<&Path>) -> LintResult {
    let mut result = LintResult::new();
    result.files_checked = 1;

    check_file_name(path, &mut result);

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            result.add_issue(LintIssue::error(
                "E001",
                format!("Failed to read file: {e}"),
                path.to_path_buf(),
            ));
            return result;
        }
    };

    let descriptor = match parse_descriptor(&bytes, &path.to_string_lossy()) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            result.add_issue(
                LintIssue::error("E002", e.to_string(), path.to_path_buf())
                    .with_suggestion("The server rejects this descriptor with a 400 response"),
            );
            return result;
        }
    };

    let dir = path.parent().unwrap_or(Path::new(""));
    check_content_spec(&descriptor.default, "default", path, dir, root, &mut result);
    for (idx, handler) in descriptor.handlers.iter().enumerate() {
        let location = format!("handlers[{idx}]");
        check_content_spec(&handler.content, &location, path, dir, root, &mut result);
        if !handler.has_predicates() {
            result.add_issue(
                LintIssue::warning(
                    "W003",
                    format!("{location} has no predicates and can never match"),
                    path.to_path_buf(),
                )
                .with_suggestion("Add a path/header/param predicate or remove the handler"),
            );
        }
    }

    result
}

/// Flag descriptor names the route index will never look up.
fn check_file_name(path: &Path, result: &mut LintResult) {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return;
    };
    let Some(method) = name
        .strip_prefix('$')
        .and_then(|n| n.strip_suffix(".json"))
    else {
        return;
    };

    if method != method.to_uppercase() {
        result.add_issue(
            LintIssue::warning(
                "W001",
                format!("Method in '{name}' is not upper-cased; the server looks up '${}.json'", method.to_uppercase()),
                path.to_path_buf(),
            )
            .with_suggestion(format!("Rename the file to '${}.json'", method.to_uppercase())),
        );
    } else if !KNOWN_METHODS.contains(&method) {
        result.add_issue(LintIssue::warning(
            "W002",
            format!("'{method}' is not a standard HTTP method"),
            path.to_path_buf(),
        ));
    }
}

fn check_content_spec(
    spec: &ContentSpec,
    location: &str,
    descriptor: &Path,
    dir: &Path,
    root: Option<&Path>,
    result: &mut LintResult,
) {
    if !(100..=599).contains(&spec.status) {
        result.add_issue(LintIssue::warning(
            "W004",
            format!("{location}.status {} is not a valid HTTP status; the server serves 200", spec.status),
            descriptor.to_path_buf(),
        ));
    }

    if spec.body.is_empty() {
        result.add_issue(
            LintIssue::warning(
                "W005",
                format!("{location}.body is empty; responses will have an empty body"),
                descriptor.to_path_buf(),
            )
            .with_suggestion("Point body at a file next to the descriptor"),
        );
        return;
    }

    let body_path = match spec.body.strip_prefix('/') {
        Some(rooted) => match root {
            Some(root) => root.join(rooted),
            // No tree root to resolve rooted bodies against.
            None => return,
        },
        None => dir.join(&spec.body),
    };
    if !body_path.exists() {
        result.add_issue(
            LintIssue::warning(
                "W006",
                format!("{location}.body '{}' does not exist; responses will have an empty body", spec.body),
                descriptor.to_path_buf(),
            )
            .with_suggestion(format!("Create {}", body_path.display())),
        );
    }
}
