//! Pass 2: recursive-descent wiki grammar over a character cursor.
//!
//! ```text
//! document ::= { block }
//! block    ::= code | title | hrule | list | paragraph
//! inline   ::= styled | text, repeated until an end predicate fires
//! ```
//!
//! Inline parsing carries two predicates: the closing marker of the
//! nearest styled span (`inline_end`) and the end of the enclosing block
//! (`block_end`). Both are pure lookahead over the reader, so an unclosed
//! span still terminates at the block boundary.

use crate::model::{Block, Body, Inline};
use crate::reader::{CharReader, END_OF_LINE, END_OF_TEXT};
use crate::report::{Position, Reporter};

type Pred<'p> = &'p dyn Fn(&CharReader) -> bool;

// Predicates are pure lookahead over the reader, so nested inline calls can
// freely layer a new inline-end over the same block-end.

/// Parse one wiki string into a [`Body`].
pub fn parse_wiki(text: &str, pos: Position, reporter: &mut dyn Reporter) -> Body {
    WikiParser {
        reader: CharReader::new(text),
        pos,
        reporter,
    }
    .document()
}

/// End-of-text, a blank line, a new code fence, or a new title.
fn para_ended(r: &CharReader) -> bool {
    r.current() == END_OF_TEXT
        || (r.current() == END_OF_LINE
            && (r.check("\n\n") || r.check("\n{{{") || r.check("\n=")))
}

/// A list-item start (`- ` or `1 ` after optional indentation) on the
/// line following the cursor's newline.
fn list_item_after_eol(r: &CharReader) -> bool {
    if r.current() != END_OF_LINE {
        return false;
    }
    let indent = 1 + r.count_whitespace_from(1);
    r.check_from(indent, "- ") || r.check_from(indent, "1 ")
}

/// Marker prefix and list constructor at the cursor, if a list item
/// starts here (after optional indentation).
fn peek_list_style(r: &CharReader) -> Option<(&'static str, fn(Vec<Block>) -> Block)> {
    if r.check_after_whitespace("- ") {
        Some(("- ", Block::UnorderedList))
    } else if r.check_after_whitespace("1 ") {
        Some(("1 ", Block::OrderedList))
    } else {
        None
    }
}

struct WikiParser<'a> {
    reader: CharReader,
    pos: Position,
    reporter: &'a mut dyn Reporter,
}

impl WikiParser<'_> {
    fn warn(&mut self, message: &str) {
        self.reporter.warning(self.pos, message);
    }

    fn document(&mut self) -> Body {
        let mut blocks = Vec::new();
        while self.reader.current() != END_OF_TEXT {
            blocks.push(self.block());
        }
        Body { blocks }
    }

    fn block(&mut self) -> Block {
        if self.reader.check_after_whitespace("{{{") {
            self.code()
        } else if self.reader.check_after_whitespace("=") {
            self.title()
        } else if self.reader.check_after_whitespace("----") {
            self.hrule()
        } else if let Some((style, ctor)) = peek_list_style(&self.reader) {
            let indent = self.reader.count_whitespace();
            self.list_level(indent, style, ctor)
        } else {
            self.paragraph()
        }
    }

    fn code(&mut self) -> Block {
        self.reader.jump_whitespace();
        self.reader.jump("{{{");
        self.reader.read_until(|r| r.check("}}}"));
        let contents = self.reader.get_read();
        if self.reader.current() == END_OF_TEXT {
            self.warn("unclosed code block");
        } else {
            self.reader.jump("}}}");
        }
        self.block_ended("code block");
        Block::Code(contents)
    }

    fn title(&mut self) -> Block {
        self.reader.jump_whitespace();
        let level = self.reader.repeat_jump("=");
        let closing = "=".repeat(level);
        let text = self.inline(&|r| r.check(&closing), &para_ended);
        let closed = self.reader.repeat_jump_up_to("=", level);
        if closed != level || self.reader.check("=") {
            self.warn("unbalanced or unclosed heading");
            // excess equals belong to the broken closing run, not the line tail
            self.reader.repeat_jump("=");
        }
        self.block_ended("heading");
        Block::Title(text, level)
    }

    fn hrule(&mut self) -> Block {
        self.reader.jump_whitespace();
        self.reader.repeat_jump("-");
        self.block_ended("horizontal rule");
        Block::HorizontalRule
    }

    /// One list level: lines at `indent`, with deeper-indented items
    /// opening a nested list as a sibling block.
    fn list_level(
        &mut self,
        indent: usize,
        style: &'static str,
        ctor: fn(Vec<Block>) -> Block,
    ) -> Block {
        let mut items = vec![self.list_line(style)];
        loop {
            let deeper = self.reader.count_whitespace();
            if deeper > indent {
                match peek_list_style(&self.reader) {
                    Some((nested_style, nested_ctor)) => {
                        items.push(self.list_level(deeper, nested_style, nested_ctor));
                    }
                    None => break,
                }
            } else if deeper == indent && self.reader.check_after_whitespace(style) {
                items.push(self.list_line(style));
            } else {
                break;
            }
        }
        ctor(items)
    }

    fn list_line(&mut self, style: &'static str) -> Block {
        self.reader.jump_whitespace();
        self.reader.jump(style);
        let text = self.inline(&|r| r.current() == END_OF_LINE, &para_ended);
        self.block_ended("list line");
        Block::Paragraph(text)
    }

    fn paragraph(&mut self) -> Block {
        self.reader.jump_whitespace();
        let text = self.inline(&|_| false, &|r| para_ended(r) || list_item_after_eol(r));
        while self.reader.current() == END_OF_LINE {
            self.reader.advance();
        }
        Block::Paragraph(text)
    }

    /// After a block's terminator: expect end of line or end of text,
    /// discard (with a warning) anything else, then eat blank lines.
    fn block_ended(&mut self, block_type: &str) {
        if self.reader.current() != END_OF_LINE && self.reader.current() != END_OF_TEXT {
            self.warn(&format!(
                "no additional content on same line after {block_type}"
            ));
            self.reader.jump_until(|r| r.current() == END_OF_LINE);
        }
        while self.reader.current() == END_OF_LINE {
            self.reader.advance();
        }
    }

    /// Parse inline content until `inline_end`, `block_end`, or the end of
    /// text. Lone line-ends are skipped; text fragments on both sides of
    /// one merge into a single node with the newline preserved inside.
    fn inline(&mut self, inline_end: Pred<'_>, block_end: Pred<'_>) -> Inline {
        let mut chain: Vec<Inline> = Vec::new();
        chain.push(self.inline0(inline_end, block_end));
        while !self.inline_ended(inline_end, block_end) {
            let skipped_eol = self.reader.current() == END_OF_LINE;
            if skipped_eol {
                self.reader.advance();
            }
            let current = self.inline0(inline_end, block_end);
            if skipped_eol {
                match (chain.pop(), current) {
                    (Some(Inline::Text(mut prev)), Inline::Text(next)) => {
                        prev.push(END_OF_LINE);
                        prev.push_str(&next);
                        chain.push(Inline::Text(prev));
                    }
                    (last, current) => {
                        chain.extend(last);
                        chain.push(Inline::Text(END_OF_LINE.to_string()));
                        chain.push(current);
                    }
                }
            } else {
                chain.push(current);
            }
        }
        match chain.len() {
            0 => Inline::Text(String::new()),
            1 => chain.pop().unwrap(),
            _ => Inline::Chain(chain),
        }
    }

    fn inline_ended(&self, inline_end: Pred<'_>, block_end: Pred<'_>) -> bool {
        self.reader.current() == END_OF_TEXT
            || inline_end(&self.reader)
            || block_end(&self.reader)
    }

    /// One styled span or one maximal run of plain text.
    fn inline0(&mut self, inline_end: Pred<'_>, block_end: Pred<'_>) -> Inline {
        if self.reader.check("'''") {
            self.styled("'''", "bold", Inline::Bold, block_end)
        } else if self.reader.check("''") {
            self.styled("''", "italic", Inline::Italic, block_end)
        } else if self.reader.check("`") {
            self.monospace()
        } else if self.reader.check("__") {
            self.styled("__", "underline", Inline::Underline, block_end)
        } else if self.reader.check("^") {
            self.styled("^", "superscript", Inline::Superscript, block_end)
        } else if self.reader.check(",,") {
            self.styled(",,", "subscript", Inline::Subscript, block_end)
        } else if self.reader.check("[[") {
            self.link()
        } else {
            self.reader.read_until(|r| {
                r.check("''")
                    || r.current() == '`'
                    || r.check("__")
                    || r.current() == '^'
                    || r.check(",,")
                    || r.check("[[")
                    || r.current() == END_OF_LINE
                    || inline_end(r)
                    || block_end(r)
            });
            Inline::Text(self.reader.get_read())
        }
    }

    fn styled(
        &mut self,
        marker: &'static str,
        style: &'static str,
        ctor: fn(Box<Inline>) -> Inline,
        block_end: Pred<'_>,
    ) -> Inline {
        self.reader.jump(marker);
        let inner = self.inline(&|r| r.check(marker), block_end);
        if self.reader.check(marker) {
            self.reader.jump(marker);
        } else {
            self.warn(&format!("unclosed {style} marker"));
        }
        ctor(Box::new(inner))
    }

    fn monospace(&mut self) -> Inline {
        self.reader.jump("`");
        self.reader.read_until(|r| r.current() == '`');
        let contents = self.reader.get_read();
        if self.reader.current() == '`' {
            self.reader.advance();
        } else {
            self.warn("unclosed monospace marker");
        }
        Inline::Monospace(contents)
    }

    /// `[[target]]` or `[[target title words]]` — split at the first space.
    fn link(&mut self) -> Inline {
        self.reader.jump("[[");
        self.reader.read_until(|r| r.check("]]"));
        let raw = self.reader.get_read();
        if self.reader.current() == END_OF_TEXT {
            self.warn("unclosed link");
        } else {
            self.reader.jump("]]");
        }
        match raw.find(' ') {
            Some(idx) if idx > 0 => Inline::Link {
                target: raw[..idx].to_string(),
                title: Some(raw[idx + 1..].trim().to_string()),
            },
            _ => Inline::Link {
                target: raw.trim().to_string(),
                title: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CollectingReporter;

    fn parse(text: &str) -> Body {
        let mut reporter = CollectingReporter::new();
        parse_wiki(text, Position::default(), &mut reporter)
    }

    fn parse_warn(text: &str) -> (Body, Vec<String>) {
        let mut reporter = CollectingReporter::new();
        let body = parse_wiki(text, Position::default(), &mut reporter);
        let messages = reporter
            .warnings
            .into_iter()
            .map(|(_, m)| m)
            .collect();
        (body, messages)
    }

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn empty_input() {
        assert_eq!(parse(""), Body { blocks: vec![] });
    }

    #[test]
    fn plain_paragraph() {
        assert_eq!(parse("Hello."), Body {
            blocks: vec![Block::Paragraph(text("Hello."))],
        });
    }

    #[test]
    fn blank_line_splits_paragraphs() {
        assert_eq!(parse("a\n\nb"), Body {
            blocks: vec![Block::Paragraph(text("a")), Block::Paragraph(text("b"))],
        });
    }

    #[test]
    fn lone_newline_merges_text() {
        assert_eq!(parse("a\nb"), Body {
            blocks: vec![Block::Paragraph(text("a\nb"))],
        });
    }

    #[test]
    fn bold_italic_underline() {
        let body = parse("'''b'' i ''u'''");
        // outermost is bold; the italic nests inside it
        let Block::Paragraph(inline) = &body.blocks[0] else {
            panic!("expected paragraph, got {:?}", body.blocks[0]);
        };
        match inline {
            Inline::Bold(inner) => match inner.as_ref() {
                Inline::Chain(items) => {
                    assert_eq!(items[0], text("b"));
                    assert!(matches!(items[1], Inline::Italic(_)));
                }
                other => panic!("expected chain, got {other:?}"),
            },
            other => panic!("expected bold, got {other:?}"),
        }
    }

    #[test]
    fn styled_markers() {
        let body = parse("''i'' __u__ ^s^ ,,b,, `m`");
        let Block::Paragraph(Inline::Chain(items)) = &body.blocks[0] else {
            panic!("expected chained paragraph");
        };
        assert!(matches!(items[0], Inline::Italic(_)));
        assert!(matches!(items[2], Inline::Underline(_)));
        assert!(matches!(items[4], Inline::Superscript(_)));
        assert!(matches!(items[6], Inline::Subscript(_)));
        assert_eq!(items[8], Inline::Monospace("m".to_string()));
    }

    #[test]
    fn unclosed_style_warns_and_terminates() {
        let (body, messages) = parse_warn("''oops");
        assert_eq!(body.blocks.len(), 1);
        let Block::Paragraph(Inline::Italic(inner)) = &body.blocks[0] else {
            panic!("expected italic paragraph");
        };
        assert_eq!(**inner, text("oops"));
        assert_eq!(messages, vec!["unclosed italic marker"]);
    }

    #[test]
    fn monospace_is_raw() {
        let body = parse("`''not styled''`");
        assert_eq!(body.blocks, vec![Block::Paragraph(Inline::Monospace(
            "''not styled''".to_string()
        ))]);
    }

    #[test]
    fn link_with_title() {
        let body = parse("[[t u v]]");
        assert_eq!(body.blocks, vec![Block::Paragraph(Inline::Link {
            target: "t".to_string(),
            title: Some("u v".to_string()),
        })]);
    }

    #[test]
    fn link_without_title() {
        let body = parse("[[t]]");
        assert_eq!(body.blocks, vec![Block::Paragraph(Inline::Link {
            target: "t".to_string(),
            title: None,
        })]);
    }

    #[test]
    fn title_level_matches_run_length() {
        let body = parse("== Section ==");
        assert_eq!(body.blocks, vec![Block::Title(text(" Section "), 2)]);
    }

    #[test]
    fn unbalanced_title_warns() {
        let (body, messages) = parse_warn("=== Title ==");
        assert!(matches!(body.blocks[0], Block::Title(_, 3)));
        assert!(messages.contains(&"unbalanced or unclosed heading".to_string()));
    }

    #[test]
    fn overlong_title_close_warns() {
        let (body, messages) = parse_warn("== Section ===");
        assert_eq!(body.blocks, vec![Block::Title(text(" Section "), 2)]);
        assert_eq!(messages, vec!["unbalanced or unclosed heading"]);
    }

    #[test]
    fn horizontal_rule() {
        assert_eq!(parse("----"), Body {
            blocks: vec![Block::HorizontalRule],
        });
    }

    #[test]
    fn code_block() {
        let body = parse("{{{\nval x = 1\n}}}");
        assert_eq!(body.blocks, vec![Block::Code("\nval x = 1\n".to_string())]);
    }

    #[test]
    fn unclosed_code_block_warns() {
        let (body, messages) = parse_warn("{{{\nval x = 1");
        assert_eq!(body.blocks, vec![Block::Code("\nval x = 1".to_string())]);
        assert_eq!(messages, vec!["unclosed code block"]);
    }

    #[test]
    fn content_after_code_fence_warns() {
        let (body, messages) = parse_warn("{{{x}}} trailing");
        assert_eq!(body.blocks, vec![Block::Code("x".to_string())]);
        assert_eq!(
            messages,
            vec!["no additional content on same line after code block"]
        );
    }

    #[test]
    fn paragraph_breaks_before_code_fence() {
        let body = parse("Example.\n{{{\ncode\n}}}");
        assert_eq!(body.blocks, vec![
            Block::Paragraph(text("Example.")),
            Block::Code("\ncode\n".to_string()),
        ]);
    }

    #[test]
    fn flat_list() {
        let body = parse(" - a\n - b");
        assert_eq!(body.blocks, vec![Block::UnorderedList(vec![
            Block::Paragraph(text("a")),
            Block::Paragraph(text("b")),
        ])]);
    }

    #[test]
    fn ordered_list() {
        let body = parse(" 1 first\n 1 second");
        assert_eq!(body.blocks, vec![Block::OrderedList(vec![
            Block::Paragraph(text("first")),
            Block::Paragraph(text("second")),
        ])]);
    }

    #[test]
    fn nested_list_indentation() {
        let body = parse(" - item A\n   - child of A\n - item B");
        assert_eq!(body.blocks, vec![Block::UnorderedList(vec![
            Block::Paragraph(text("item A")),
            Block::UnorderedList(vec![Block::Paragraph(text("child of A"))]),
            Block::Paragraph(text("item B")),
        ])]);
    }

    #[test]
    fn ordered_nested_in_unordered() {
        let body = parse(" - item\n   1 step");
        assert_eq!(body.blocks, vec![Block::UnorderedList(vec![
            Block::Paragraph(text("item")),
            Block::OrderedList(vec![Block::Paragraph(text("step"))]),
        ])]);
    }

    #[test]
    fn paragraph_breaks_before_list_item() {
        let body = parse("intro\n - a");
        assert_eq!(body.blocks, vec![
            Block::Paragraph(text("intro")),
            Block::UnorderedList(vec![Block::Paragraph(text("a"))]),
        ]);
    }

    #[test]
    fn styles_span_inside_list_line() {
        let body = parse(" - ''em'' tail");
        let Block::UnorderedList(items) = &body.blocks[0] else {
            panic!("expected list");
        };
        let Block::Paragraph(Inline::Chain(parts)) = &items[0] else {
            panic!("expected chained paragraph");
        };
        assert!(matches!(parts[0], Inline::Italic(_)));
        assert_eq!(parts[1], text(" tail"));
    }
}
