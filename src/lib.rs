//! wikidoc — parse `/** ... */` doc comments with wiki-style markup.
//!
//! Module layout:
//!   model.rs   — comment data model: blocks, inlines, tag keys
//!   report.rs  — warning sink + source positions
//!   reader.rs  — character cursor with lookahead
//!   parser/    — line cleaner, tag splitter, wiki grammar, projection
//!   extract.rs — find doc comments in raw source text
//!
//! The entry point is [`parse`]: one raw comment in, one [`Comment`] out,
//! with all diagnostics flowing through a caller-supplied [`Reporter`].

pub mod extract;
pub mod model;
pub mod parser;
pub mod reader;
pub mod report;

pub use model::{Block, Body, Comment, Inline, TagKey};
pub use parser::{parse, parse_wiki};
pub use report::{CollectingReporter, Position, Reporter};
