//! Pull `/** ... */` doc comments out of raw source text.
//!
//! Purely textual: no language awareness, so a doc comment inside a string
//! literal is extracted too. Good enough for linting; the parser proper
//! only ever sees one comment at a time.

use crate::report::Position;
use regex::Regex;
use std::sync::LazyLock;

static DOC_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*\*.*?\*/").unwrap());

/// One extracted doc comment: raw text including delimiters, plus the
/// position of its opening `/`.
#[derive(Debug, Clone, PartialEq)]
pub struct DocComment {
    pub raw: String,
    pub pos: Position,
}

/// All doc comments in `source`, in document order.
pub fn extract(source: &str) -> Vec<DocComment> {
    DOC_COMMENT
        .find_iter(source)
        .map(|m| DocComment {
            raw: m.as_str().to_string(),
            pos: position_at(source, m.start()),
        })
        .collect()
}

/// 1-based line/column of a byte offset.
fn position_at(source: &str, offset: usize) -> Position {
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    Position::new(line, offset - line_start + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_comments_with_positions() {
        let source = "int x;\n/** First. */\nvoid f();\n  /** Second. */\n";
        let comments = extract(source);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].raw, "/** First. */");
        assert_eq!(comments[0].pos, Position::new(2, 1));
        assert_eq!(comments[1].pos, Position::new(4, 3));
    }

    #[test]
    fn multi_line_comment_is_one_match() {
        let source = "/** a\n  * b\n  */\n/** c. */";
        let comments = extract(source);
        assert_eq!(comments.len(), 2);
        assert!(comments[0].raw.contains("* b"));
    }

    #[test]
    fn plain_block_comments_are_ignored() {
        assert!(extract("/* not a doc comment */").is_empty());
    }

    #[test]
    fn no_comments() {
        assert!(extract("void f();\n").is_empty());
    }
}
