//! Summary extraction and projection of tag sections into the `Comment`.
//!
//! Tag sections are consumed from the multimap as they are projected;
//! whatever is left at the end is an unrecognised tag. Duplicate
//! single-valued tags warn and keep the last occurrence (see DESIGN.md).

use super::split::TagMap;
use super::wiki;
use crate::model::{Block, Body, Comment, Inline};
use crate::report::{Position, Reporter};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// First sentence terminator: a period, or an HTML-ish tag. The greedy
/// `.*` truncates conservatively on tag-heavy lines; intentional.
static SHORT_LINE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.|</?.*>").unwrap());

/// Layout-relevant HTML tags stripped from the short-summary prefix.
static CLEAN_HTML: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?(p|h\d|pre|dl|dt|dd|ol|ul|li|blockquote|div|hr|br|br).*/?>").unwrap()
});

/// Wiki-parse the body and every tag section, then assemble the `Comment`.
pub fn build(
    doc_body: &str,
    tags: TagMap,
    pos: Position,
    reporter: &mut dyn Reporter,
) -> Comment {
    let body = wiki::parse_wiki(doc_body, pos, reporter);
    let short = short_summary(doc_body, pos, reporter);

    let mut projector = Projector {
        tags,
        pos,
        reporter,
    };
    let comment = Comment {
        body,
        short,
        authors: projector.all_tags("author"),
        see: projector.all_tags("see"),
        result: projector.one_tag("return"),
        throws: projector.all_syms_one_tag("throws"),
        value_params: projector.all_syms_one_tag("param"),
        type_params: projector.all_syms_one_tag("tparam"),
        version: projector.one_tag("version"),
        since: projector.one_tag("since"),
        todo: projector.all_tags("todo"),
        deprecated: projector.one_tag("deprecated"),
        note: projector.all_tags("note"),
        example: projector.all_tags("example"),
    };
    projector.warn_leftovers();
    comment
}

/// Extract the short-summary inline: body prefix up to the first sentence
/// terminator, HTML layout tags removed, wiki-parsed, first paragraph's
/// inline. Anything else is an empty `Text` (with a warning when the
/// prefix had content).
fn short_summary(doc_body: &str, pos: Position, reporter: &mut dyn Reporter) -> Inline {
    let prefix = match SHORT_LINE_END.find(doc_body) {
        Some(m) => &doc_body[..m.start()],
        None => doc_body,
    };
    let cleaned = CLEAN_HTML.replace_all(prefix, "");
    let parsed = wiki::parse_wiki(&cleaned, pos, reporter);
    match parsed.blocks.into_iter().next() {
        Some(Block::Paragraph(inline)) => inline,
        _ => {
            if !prefix.trim().is_empty() {
                reporter.warning(pos, "Comment must start with a sentence");
            }
            Inline::Text(String::new())
        }
    }
}

struct Projector<'a> {
    tags: TagMap,
    pos: Position,
    reporter: &'a mut dyn Reporter,
}

impl Projector<'_> {
    fn parse(&mut self, raw: &str) -> Body {
        wiki::parse_wiki(raw, self.pos, self.reporter)
    }

    /// Single-valued simple tag. More than one occurrence warns; the last
    /// one is kept.
    fn one_tag(&mut self, name: &str) -> Option<Body> {
        let values = self.tags.remove_simple(name)?;
        if values.len() > 1 {
            self.reporter
                .warning(self.pos, &format!("Only one '@{name}' tag is allowed"));
        }
        let mut bodies: Vec<Body> = values.iter().map(|v| self.parse(v)).collect();
        bodies.pop()
    }

    /// Multi-valued simple tag, in encounter order.
    fn all_tags(&mut self, name: &str) -> Vec<Body> {
        self.tags
            .remove_simple(name)
            .unwrap_or_default()
            .iter()
            .map(|v| self.parse(v))
            .collect()
    }

    /// Symbol-keyed tag projected to a symbol → body mapping. A symbol
    /// with several entries warns and keeps the last; a symbol-less use
    /// of the name warns and is dropped.
    fn all_syms_one_tag(&mut self, name: &str) -> BTreeMap<String, Body> {
        if self.tags.has_simple(name) {
            self.tags.remove_simple(name);
            self.reporter.warning(
                self.pos,
                &format!("Tag '@{name}' must be followed by a symbol name"),
            );
        }
        let mut projected = BTreeMap::new();
        for sym in self.tags.symbols_for(name) {
            let values = self
                .tags
                .remove_symbol(name, &sym)
                .unwrap_or_else(|| unreachable!("listed symbol vanished from tag map"));
            if values.len() > 1 {
                self.reporter.warning(
                    self.pos,
                    &format!("Only one '@{name}' tag for symbol {sym} is allowed"),
                );
            }
            let mut bodies: Vec<Body> = values.iter().map(|v| self.parse(v)).collect();
            if let Some(body) = bodies.pop() {
                projected.insert(sym, body);
            }
        }
        projected
    }

    fn warn_leftovers(&mut self) {
        for key in self.tags.remaining_keys() {
            self.reporter.warning(
                self.pos,
                &format!("Tag '@{}' is not recognised", key.name()),
            );
        }
    }
}
