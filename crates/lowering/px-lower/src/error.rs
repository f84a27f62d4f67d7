//! Error types for lowering
//!
//! Every error aborts the compilation of the current function; the caller
//! discards any partial output.

use derive_more::Display;
use miette::Diagnostic;
use thiserror::Error;

/// Which operator family an unsupported operator came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum OperatorClass {
    /// Binary arithmetic
    #[display("binary")]
    Binary,
    /// Unary prefix operators
    #[display("unary")]
    Unary,
    /// Comparisons
    #[display("boolean")]
    Boolean,
    /// Augmented assignment (`x op= y`)
    #[display("augmented assignment")]
    Augmented,
}

/// Errors raised while lowering a syntax tree to IR source
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum LowerError {
    /// A node kind outside the compiled subset
    #[error("unsupported AST node type: {kind} (line {line}, column {column})")]
    #[diagnostic(
        code(lower::unsupported_node_kind),
        help("only the documented subset of the host language can be compiled")
    )]
    UnsupportedNodeKind {
        /// Kind name of the offending node
        kind: String,
        /// Source line
        line: u32,
        /// Source column
        column: u32,
    },

    /// An operator outside the supported set of its family
    #[error("{class} operation not supported: {op} (line {line})")]
    #[diagnostic(code(lower::unsupported_operator))]
    UnsupportedOperator {
        /// Operator family
        class: OperatorClass,
        /// Operator text
        op: String,
        /// Source line
        line: u32,
    },

    /// A comparison with more than two operands
    #[error("chained comparison not supported (line {line})")]
    #[diagnostic(
        code(lower::chained_comparison),
        help("split `a < b < c` into separate comparisons")
    )]
    ChainedComparison {
        /// Source line
        line: u32,
    },

    /// An assignment target that is not one of the four subscript forms
    #[error("unsupported slicing in assignment: line={line}")]
    #[diagnostic(
        code(lower::unsupported_slicing),
        help("assign to a name, `a[i]`, `a[i, j]`, `a[lo:hi]` or `a[lo:hi, lo:hi]`")
    )]
    UnsupportedSlicingShape {
        /// Source line
        line: u32,
    },

    /// A `return` that is not the final statement of the function
    #[error("return only allowed at end of function: line={line}")]
    #[diagnostic(code(lower::misplaced_return))]
    MisplacedReturn {
        /// Source line
        line: u32,
    },

    /// An `object.member` reference that resolves to nothing
    #[error("undefined function: {object}.{member}() (line {line})")]
    #[diagnostic(code(lower::unresolvable_reference))]
    UnresolvableReference {
        /// Object text (dotted for attribute chains)
        object: String,
        /// Member name
        member: String,
        /// Source line
        line: u32,
    },

    /// An expression statement without exactly one child
    #[error("unexpected: expression statement has {count} sub-expressions (line {line})")]
    #[diagnostic(code(lower::malformed_expression))]
    MalformedExpressionArity {
        /// Number of direct children found
        count: usize,
        /// Source line
        line: u32,
    },

    /// A module with nothing to compile
    #[error("module contains no statements")]
    #[diagnostic(code(lower::empty_module))]
    EmptyModule,
}

impl LowerError {
    /// Source line the error refers to, if any
    pub fn line(&self) -> Option<u32> {
        match self {
            Self::UnsupportedNodeKind { line, .. }
            | Self::UnsupportedOperator { line, .. }
            | Self::ChainedComparison { line }
            | Self::UnsupportedSlicingShape { line }
            | Self::MisplacedReturn { line }
            | Self::UnresolvableReference { line, .. }
            | Self::MalformedExpressionArity { line, .. } => Some(*line),
            Self::EmptyModule => None,
        }
    }
}

/// Result alias for lowering
pub type LowerResult<T> = Result<T, LowerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_line_and_text() {
        let operator = LowerError::UnsupportedOperator {
            class: OperatorClass::Binary,
            op: "//".to_string(),
            line: 7,
        };
        assert_eq!(operator.to_string(), "binary operation not supported: // (line 7)");

        let reference = LowerError::UnresolvableReference {
            object: "numpy".to_string(),
            member: "shape".to_string(),
            line: 3,
        };
        assert_eq!(reference.to_string(), "undefined function: numpy.shape() (line 3)");
        assert_eq!(reference.line(), Some(3));
    }

    #[test]
    fn test_diagnostic_codes() {
        let error = LowerError::MisplacedReturn { line: 2 };
        let code = error.code().map(|code| code.to_string());
        assert_eq!(code.as_deref(), Some("lower::misplaced_return"));
        assert_eq!(LowerError::EmptyModule.line(), None);
    }
}
