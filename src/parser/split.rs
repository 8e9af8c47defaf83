//! Pass 1b: partition cleaned lines into the main body and tag sections.
//!
//! Line-by-line state machine over regex rules, in priority order: code
//! fences first (their interior suppresses tag recognition), then symbol
//! tags, simple tags, tag continuation, body. Fence-bearing lines are
//! re-split into logical lines so the marker always sits on its own.

use crate::model::TagKey;
use regex::Regex;
use std::sync::LazyLock;

static CODE_BLOCK_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\{\{\{(.*)$").unwrap());

static CODE_BLOCK_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\}\}\}(.*)$").unwrap());

/// Tags bound to a symbol: `@param x ...`, `@tparam T ...`, `@throws E ...`.
static SYMBOL_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*@(param|tparam|throws)\s+(\S*)\s*(.*)$").unwrap());

static SIMPLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*@(\S+)\s+(.*)$").unwrap());

/// Ordered multimap of tag sections. Keys appear in encounter order; each
/// key's values are the raw tag bodies in encounter order, multi-line
/// bodies already joined with `\n`.
#[derive(Debug, Default)]
pub struct TagMap {
    entries: Vec<(TagKey, Vec<String>)>,
}

impl TagMap {
    fn insert(&mut self, key: TagKey, body: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(body),
            None => self.entries.push((key, vec![body])),
        }
    }

    /// Extend the most recent value of `key` with a continuation line.
    fn append_continuation(&mut self, key: &TagKey, line: &str) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .and_then(|(_, values)| values.last_mut())
        {
            Some(last) => {
                last.push('\n');
                last.push_str(line);
                true
            }
            None => false,
        }
    }

    /// Remove the simple-keyed entry for `name`, if any.
    pub fn remove_simple(&mut self, name: &str) -> Option<Vec<String>> {
        let idx = self
            .entries
            .iter()
            .position(|(k, _)| matches!(k, TagKey::Simple { name: n } if n == name))?;
        Some(self.entries.remove(idx).1)
    }

    /// Symbols recorded under symbol-keyed entries for `name`, in order.
    pub fn symbols_for(&self, name: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|(k, _)| match k {
                TagKey::Symbol { name: n, symbol } if n == name => Some(symbol.clone()),
                _ => None,
            })
            .collect()
    }

    /// Remove the symbol-keyed entry for `(name, symbol)`, if any.
    pub fn remove_symbol(&mut self, name: &str, symbol: &str) -> Option<Vec<String>> {
        let idx = self.entries.iter().position(|(k, _)| {
            matches!(k, TagKey::Symbol { name: n, symbol: s } if n == name && s == symbol)
        })?;
        Some(self.entries.remove(idx).1)
    }

    /// Whether a simple-keyed entry for `name` exists.
    pub fn has_simple(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|(k, _)| matches!(k, TagKey::Simple { name: n } if n == name))
    }

    /// Keys still present, in encounter order.
    pub fn remaining_keys(&self) -> Vec<TagKey> {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }

    #[cfg(test)]
    fn get(&self, key: &TagKey) -> Option<&Vec<String>> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

#[derive(Default)]
struct Splitter {
    body: String,
    tags: TagMap,
    last_tag: Option<TagKey>,
    in_code_block: bool,
}

/// Split cleaned lines into `(body, tags)`.
pub fn split(lines: &[String]) -> (String, TagMap) {
    let mut splitter = Splitter::default();
    for line in lines {
        splitter.line(line);
    }
    (splitter.body, splitter.tags)
}

impl Splitter {
    fn line(&mut self, line: &str) {
        if !self.in_code_block {
            if let Some(caps) = CODE_BLOCK_START.captures(line) {
                let (pre, post) = (&caps[1], caps[2].to_string());
                if !pre.trim().is_empty() {
                    // split the physical line: content, then the fence part
                    let pre = pre.to_string();
                    self.line(&pre);
                    self.line(&format!("{{{{{{{post}"));
                } else {
                    self.in_code_block = true;
                    self.append("{{{");
                    if !post.trim().is_empty() {
                        self.line(&post);
                    }
                }
                return;
            }
        }

        // closing fences match regardless of state; rule 1 already keeps
        // an opening line from reaching this point
        if let Some(caps) = CODE_BLOCK_END.captures(line) {
            let (pre, post) = (&caps[1], caps[2].to_string());
            if !pre.trim().is_empty() {
                let pre = pre.to_string();
                self.line(&pre);
                self.line(&format!("}}}}}}{post}"));
            } else {
                self.in_code_block = false;
                self.append("}}}");
                if !post.trim().is_empty() {
                    self.line(&post);
                }
            }
            return;
        }

        if !self.in_code_block {
            if let Some(caps) = SYMBOL_TAG.captures(line) {
                let key = TagKey::Symbol {
                    name: caps[1].to_string(),
                    symbol: caps[2].to_string(),
                };
                self.tags.insert(key.clone(), caps[3].to_string());
                self.last_tag = Some(key);
                return;
            }
            if let Some(caps) = SIMPLE_TAG.captures(line) {
                let key = TagKey::Simple {
                    name: caps[1].to_string(),
                };
                self.tags.insert(key.clone(), caps[2].to_string());
                self.last_tag = Some(key);
                return;
            }
        }

        self.append(line);
    }

    /// Route a non-tag line: continuation of the last tag if one is open,
    /// body otherwise.
    fn append(&mut self, line: &str) {
        match &self.last_tag {
            Some(key) => {
                if !self.tags.append_continuation(key, line) {
                    unreachable!("tag continuation with no entry for the last tag key");
                }
            }
            None => {
                if !self.body.is_empty() {
                    self.body.push('\n');
                }
                self.body.push_str(line);
            }
        }
    }
}
