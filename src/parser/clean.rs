//! Pass 1a: strip comment delimiters and per-line `*` gutters.

use crate::report::{Position, Reporter};
use regex::Regex;
use std::sync::LazyLock;

/// A comment line: leading `*` then at most one whitespace, rest captured.
static CLEAN_COMMENT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\s?(.*)$").unwrap());

/// Strip `/*` .. `*/` and per-line gutters, yielding cleaned lines.
///
/// Emitted lines carry no `*` marker and no trailing whitespace; leading
/// whitespace after the marker survives (it drives list indentation).
/// Empty gutter-less lines are dropped; non-empty ones are kept verbatim
/// with a warning.
pub fn clean(raw: &str, pos: Position, reporter: &mut dyn Reporter) -> Vec<String> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix("/*").unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("*/").unwrap_or(trimmed);

    let mut lines = Vec::new();
    for line in trimmed.lines() {
        let line = line.trim();
        if let Some(caps) = CLEAN_COMMENT_LINE.captures(line) {
            lines.push(caps[1].to_string());
        } else if !line.is_empty() {
            reporter.warning(pos, "Comment has no start-of-line marker ('*')");
            lines.push(line.to_string());
        }
    }
    lines
}
