//! Front-end errors

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while turning source text into a syntax tree
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ParseError {
    /// The grammar could not be loaded into the parser
    #[error("failed to load the Python grammar: {message}")]
    #[diagnostic(code(parse::language))]
    Language {
        /// Underlying tree-sitter message
        message: String,
    },

    /// tree-sitter returned no tree
    #[error("tree-sitter parse failed")]
    #[diagnostic(code(parse::failed))]
    ParseFailed,

    /// The source contains a syntax error
    #[error("syntax error at line {line}, column {column}: {found}")]
    #[diagnostic(code(parse::syntax))]
    Syntax {
        /// Source line
        line: u32,
        /// Source column
        column: u32,
        /// What the parser choked on
        found: String,
    },

    /// A parameter form other than a plain (optionally annotated) name
    #[error("unsupported parameter form `{kind}` at line {line}, column {column}")]
    #[diagnostic(
        code(parse::unsupported_parameter),
        help("only positional parameters without defaults can be compiled")
    )]
    UnsupportedParameter {
        /// Parameter node kind
        kind: String,
        /// Source line
        line: u32,
        /// Source column
        column: u32,
    },

    /// A numeric literal that does not fit the tree model
    #[error("invalid numeric literal `{literal}` at line {line}")]
    #[diagnostic(
        code(parse::invalid_literal),
        help("integers must fit in 64 bits and floats must be finite")
    )]
    InvalidLiteral {
        /// Literal text
        literal: String,
        /// Source line
        line: u32,
    },

    /// A node starts past the line or column range positions can hold
    #[error("source position row {row}, column {column} is out of range")]
    #[diagnostic(code(parse::position_overflow))]
    PositionOverflow {
        /// 0-based row reported by tree-sitter
        row: usize,
        /// 0-based column reported by tree-sitter
        column: usize,
    },

    /// A node is missing a child the grammar guarantees
    #[error("malformed `{kind}` node at line {line}, column {column}")]
    #[diagnostic(code(parse::malformed))]
    Malformed {
        /// Node kind
        kind: String,
        /// Source line
        line: u32,
        /// Source column
        column: u32,
    },
}

/// Result alias for the front end
pub type ParseResult<T> = Result<T, ParseError>;
