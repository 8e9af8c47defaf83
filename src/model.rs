//! Data model for parsed doc comments — markup-agnostic on the way out.

use std::collections::BTreeMap;

/// Key under which tag lines are grouped during splitting.
///
/// `@author Alice` → `Simple { name: "author" }`;
/// `@param x the value` → `Symbol { name: "param", symbol: "x" }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagKey {
    Simple { name: String },
    Symbol { name: String, symbol: String },
}

impl TagKey {
    pub fn name(&self) -> &str {
        match self {
            TagKey::Simple { name } => name,
            TagKey::Symbol { name, .. } => name,
        }
    }
}

/// An ordered sequence of blocks — the parsed form of any wiki string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Body {
    pub blocks: Vec<Block>,
}

impl Body {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Top-level structural node.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Inline),
    /// Heading text and level; level is the length of the `=` run.
    Title(Inline, usize),
    /// Verbatim contents of a `{{{ ... }}}` fence.
    Code(String),
    HorizontalRule,
    UnorderedList(Vec<Block>),
    OrderedList(Vec<Block>),
}

/// Content node living inside a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Chain(Vec<Inline>),
    Bold(Box<Inline>),
    Italic(Box<Inline>),
    Underline(Box<Inline>),
    /// Verbatim contents of a `` ` ... ` `` span.
    Monospace(String),
    Superscript(Box<Inline>),
    Subscript(Box<Inline>),
    /// Unresolved link target plus optional display title.
    Link { target: String, title: Option<String> },
}

impl Inline {
    /// Flatten to plain text: styles unwrap, links show their title
    /// (target when untitled).
    pub fn to_text(&self) -> String {
        match self {
            Inline::Text(text) => text.clone(),
            Inline::Chain(items) => items.iter().map(Inline::to_text).collect(),
            Inline::Bold(inner)
            | Inline::Italic(inner)
            | Inline::Underline(inner)
            | Inline::Superscript(inner)
            | Inline::Subscript(inner) => inner.to_text(),
            Inline::Monospace(text) => text.clone(),
            Inline::Link { target, title } => title.clone().unwrap_or_else(|| target.clone()),
        }
    }
}

/// Complete parsed doc comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Main body, everything before the first tag line.
    pub body: Body,
    /// Short-summary inline; `Text("")` when none could be extracted.
    pub short: Inline,
    /// @author
    pub authors: Vec<Body>,
    /// @see
    pub see: Vec<Body>,
    /// @return
    pub result: Option<Body>,
    /// @throws, keyed by exception symbol
    pub throws: BTreeMap<String, Body>,
    /// @param, keyed by parameter name
    pub value_params: BTreeMap<String, Body>,
    /// @tparam, keyed by type-parameter name
    pub type_params: BTreeMap<String, Body>,
    /// @version
    pub version: Option<Body>,
    /// @since
    pub since: Option<Body>,
    /// @todo
    pub todo: Vec<Body>,
    /// @deprecated
    pub deprecated: Option<Body>,
    /// @note
    pub note: Vec<Body>,
    /// @example
    pub example: Vec<Body>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_key_name() {
        let simple = TagKey::Simple {
            name: "author".to_string(),
        };
        let symbol = TagKey::Symbol {
            name: "param".to_string(),
            symbol: "x".to_string(),
        };
        assert_eq!(simple.name(), "author");
        assert_eq!(symbol.name(), "param");
        assert_ne!(simple, symbol);
    }

    #[test]
    fn flatten_styles() {
        let inline = Inline::Chain(vec![
            Inline::Text("a ".to_string()),
            Inline::Bold(Box::new(Inline::Text("b".to_string()))),
            Inline::Monospace("c".to_string()),
        ]);
        assert_eq!(inline.to_text(), "a bc");
    }

    #[test]
    fn flatten_link_prefers_title() {
        let titled = Inline::Link {
            target: "util.Widget".to_string(),
            title: Some("Widget".to_string()),
        };
        let bare = Inline::Link {
            target: "util.Widget".to_string(),
            title: None,
        };
        assert_eq!(titled.to_text(), "Widget");
        assert_eq!(bare.to_text(), "util.Widget");
    }
}
