//! Source positions and position tags
//!
//! Every symbol the compiler emits carries a `$line$column` suffix derived
//! from the syntax node it came from. The suffix makes same-named bindings at
//! different source locations distinct in the IR and lets downstream errors
//! point back at the original source.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Separator between a symbol and each component of its position tag
pub const TAG_SEPARATOR: char = '$';

/// A line/column location in host-language source
///
/// Lines are 1-based, columns are 0-based byte offsets into the line.
/// `Display` renders the bare tag (`$line$column`).
#[derive(
    Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Display,
)]
#[display("${line}${column}")]
pub struct Position {
    /// 1-based line number
    pub line: u32,
    /// 0-based column offset
    pub column: u32,
}

impl Position {
    /// Create a position from a 1-based line and 0-based column
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Tag `name` with this position: `<name>$<line>$<column>`
    ///
    /// An empty `name` still yields the positional part, which is how
    /// constants and control nodes carry provenance.
    pub fn tag(&self, name: &str) -> String {
        format!("{name}{self}")
    }
}
