//! Python language adapter
//!
//! Parses host-language source with tree-sitter and converts the concrete
//! tree into `px-syntax` nodes.

pub mod convert;
pub mod error;
pub mod literal;

pub use error::{ParseError, ParseResult};

use convert::{Converter, position};
use px_syntax::{Language, Module};
use tree_sitter::{Node, Parser, Tree};

/// Python language implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonLanguage;

impl PythonLanguage {
    /// Creates a new Python language adapter
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse source code to a concrete syntax tree
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded or tree-sitter gives up
    pub fn parse(&self, source: &str) -> ParseResult<Tree> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|error| ParseError::Language {
                message: error.to_string(),
            })?;
        parser.parse(source, None).ok_or(ParseError::ParseFailed)
    }
}

impl Language for PythonLanguage {
    type Error = ParseError;

    fn name(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &[&'static str] {
        &["py"]
    }

    fn lower_module(&self, source: &str) -> ParseResult<Module> {
        let tree = self.parse(source)?;
        let root = tree.root_node();
        if let Some(error) = first_error(root) {
            let pos = position(error)?;
            let found = if error.is_missing() {
                format!("missing `{}`", error.kind())
            } else {
                let text = source.get(error.byte_range()).unwrap_or_default();
                format!("unexpected `{}`", text.lines().next().unwrap_or_default())
            };
            return Err(ParseError::Syntax {
                line: pos.line,
                column: pos.column,
                found,
            });
        }
        Converter::new(source).module(root)
    }
}

/// First error or missing node in document order
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_error);
    found
}
