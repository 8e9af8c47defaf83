//! Two-pass doc comment parser.
//!
//! Pass 1 is line-oriented: the cleaner strips delimiters and `*` gutters,
//! the splitter partitions lines into the main body and tag sections while
//! fences suppress tag recognition. Pass 2 runs the character-oriented
//! wiki grammar over the body and every tag section, and the projector
//! assembles the final [`Comment`].

pub(crate) mod clean;
pub(crate) mod project;
pub(crate) mod split;
pub(crate) mod wiki;

use crate::model::{Body, Comment};
use crate::report::{Position, Reporter};

/// Parse one raw `/** ... */` comment into a [`Comment`]. Never fails;
/// everything user-facing is a warning on `reporter`, attributed to `pos`.
pub fn parse(raw: &str, pos: Position, reporter: &mut dyn Reporter) -> Comment {
    let lines = clean::clean(raw, pos, reporter);
    let (body, tags) = split::split(&lines);
    project::build(&body, tags, pos, reporter)
}

/// Parse a bare wiki string (no comment delimiters) into a [`Body`].
pub fn parse_wiki(text: &str, pos: Position, reporter: &mut dyn Reporter) -> Body {
    wiki::parse_wiki(text, pos, reporter)
}
