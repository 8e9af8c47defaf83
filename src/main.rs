//! wikidoc — lint wiki-markup doc comments in source files.
//!
//! Two modes, shdoc-style:
//!
//! - **stdin mode**: `wikidoc < file.c` — lint one source from stdin
//! - **file mode**: `wikidoc src/*.c lib/` — lint files, globs, directories
//!
//! Warnings go to stderr as `path:line:col: warning: message`; `--short`
//! additionally prints each comment's extracted summary to stdout.

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use wikidoc::report::{Position, Reporter};

#[derive(Parser)]
#[command(
    name = "wikidoc",
    about = "Lint /** ... */ doc comments written in wiki-style markup"
)]
struct Cli {
    /// Input files (glob patterns supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Print each comment's extracted short summary to stdout
    #[arg(short = 's', long)]
    short: bool,

    /// Exit with status 1 if any warning was reported
    #[arg(long)]
    strict: bool,
}

/// Reporter that prints `path:line:col: warning: message` to stderr.
struct StderrReporter<'a> {
    path: &'a str,
    count: usize,
}

impl Reporter for StderrReporter<'_> {
    fn warning(&mut self, pos: Position, message: &str) {
        eprintln!("{}:{}: warning: {}", self.path, pos, message);
        self.count += 1;
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let warnings = if cli.files.is_empty() {
        stdin_mode(&cli)?
    } else {
        file_mode(&cli)?
    };

    if cli.strict && warnings > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn stdin_mode(cli: &Cli) -> Result<usize> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    Ok(lint_source("<stdin>", &input, cli.short))
}

fn file_mode(cli: &Cli) -> Result<usize> {
    let mut warnings = 0;
    for path in resolve_inputs(&cli.files)? {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        warnings += lint_source(&path.to_string_lossy(), &content, cli.short);
    }
    Ok(warnings)
}

/// Lint every doc comment in one source; returns the warning count.
fn lint_source(path: &str, source: &str, print_short: bool) -> usize {
    let mut reporter = StderrReporter { path, count: 0 };
    for comment in wikidoc::extract::extract(source) {
        let parsed = wikidoc::parse(&comment.raw, comment.pos, &mut reporter);
        if print_short {
            println!("{}:{}\t{}", path, comment.pos, parsed.short.to_text());
        }
    }
    reporter.count
}

/// Extensions lintable when matched through a directory or glob pattern.
const SOURCE_EXTENSIONS: &[&str] = &["c", "h", "cc", "cpp", "hpp", "java", "js", "ts"];

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Resolve CLI inputs to the files to lint. An explicit file path is taken
/// as-is; a directory stands for the source files directly inside it;
/// anything else is a glob pattern. The result is sorted and deduplicated.
fn resolve_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.insert(path.to_path_buf());
            continue;
        }
        let expanded = if path.is_dir() {
            format!("{}/*", pattern.trim_end_matches('/'))
        } else {
            pattern.clone()
        };
        let mut matched = 0;
        for entry in glob::glob(&expanded)
            .with_context(|| format!("invalid glob pattern: {pattern}"))?
        {
            let entry = entry?;
            if entry.is_file() && is_source_file(&entry) {
                files.insert(entry);
                matched += 1;
            }
        }
        if matched == 0 {
            eprintln!("warning: no files matched: {pattern}");
        }
    }
    Ok(files.into_iter().collect())
}
