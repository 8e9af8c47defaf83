//! Warning sink and source positions.
//!
//! The parser never fails: everything user-facing is a warning pushed
//! through a [`Reporter`]. Callers own the sink; the parser only forwards
//! the comment's position verbatim with each message.

use std::fmt;

/// 1-based source location of a doc comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Sink for parser warnings.
pub trait Reporter {
    fn warning(&mut self, pos: Position, message: &str);
}

/// Reporter that keeps warnings in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub warnings: Vec<(Position, String)>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages only, in emission order.
    pub fn messages(&self) -> Vec<&str> {
        self.warnings.iter().map(|(_, m)| m.as_str()).collect()
    }
}

impl Reporter for CollectingReporter {
    fn warning(&mut self, pos: Position, message: &str) {
        self.warnings.push((pos, message.to_string()));
    }
}
