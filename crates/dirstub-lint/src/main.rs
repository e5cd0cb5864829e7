//! Dirstub descriptor linter CLI.
//!
//! Validates a stub tree before serving it, reporting every descriptor
//! the server would reject at request time.
//!
//! Usage:
//!   dirstub-lint <directory_or_file> [OPTIONS]

use clap::Parser;
use dirstub_lint::{lint_file, lint_tree, LintResult, Severity};
use std::path::PathBuf;

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Dirstub descriptor linter
#[derive(Parser, Debug)]
#[command(name = "dirstub-lint")]
#[command(author, version, about = "Validate stub descriptor trees for Dirstub")]
struct Args {
    /// Path to a stub tree root or a single descriptor file
    #[arg(required = true)]
    path: PathBuf,

    /// Output format: text (default), json
    #[arg(short, long, default_value = "text")]
    output: String,

    /// Strict mode - treat warnings as errors
    #[arg(short, long)]
    strict: bool,
}

fn main() {
    let args = Args::parse();

    let result = if args.path.is_file() {
        lint_file(&args.path, None)
    } else {
        lint_tree(&args.path)
    };

    if args.output == "json" {
        print_results_json(&result);
    } else {
        print_results(&result, &args);
    }

    let failed = result.has_errors() || (args.strict && result.has_warnings());
    std::process::exit(if failed { 1 } else { 0 });
}

fn print_results(result: &LintResult, args: &Args) {
    println!("{BOLD}{CYAN}Dirstub Descriptor Linter{RESET}");
    println!("{DIM}Scanning:{RESET} {CYAN}{}{RESET}", args.path.display());
    println!(
        "{DIM}Checked:{RESET}  {BOLD}{}{RESET} descriptor file(s)\n",
        result.files_checked
    );

    for issue in &result.issues {
        let (color, label) = match issue.severity {
            Severity::Error => (RED, issue.severity.label()),
            Severity::Warning => (YELLOW, issue.severity.label()),
        };
        println!(
            "{color}{label}{RESET}[{}] {}: {}",
            issue.code,
            issue.file.display(),
            issue.message
        );
        if let Some(suggestion) = &issue.suggestion {
            println!("  {DIM}hint: {suggestion}{RESET}");
        }
    }

    if result.issues.is_empty() {
        println!("{GREEN}All descriptors are valid.{RESET}");
    } else {
        println!(
            "\n{BOLD}{} error(s), {} warning(s){RESET}",
            result.errors, result.warnings
        );
    }
}

fn print_results_json(result: &LintResult) {
    match serde_json::to_string_pretty(result) {
        Ok(output) => println!("{output}"),
        Err(e) => eprintln!("Failed to serialize results: {e}"),
    }
}
