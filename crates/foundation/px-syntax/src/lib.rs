//! Generic syntax tree for the compiled host-language subset
//!
//! Front ends (see `lang-python`) produce these nodes; the lowering compiler
//! only ever reads them. Node kinds form closed enums so that every consumer
//! matches exhaustively. Constructs outside the supported subset are kept as
//! `Unknown` nodes carrying the front end's own kind name, which lets the
//! lowering pass report them precisely instead of the front end guessing.

pub mod builder;

use derive_more::Display;
use px_span::Position;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

/// A source-language front end producing [`Module`] trees
pub trait Language: Send + Sync + 'static {
    /// Error raised for source the front end cannot turn into a tree
    type Error: Error + Send + Sync + 'static;

    /// Name of the language
    fn name(&self) -> &'static str;

    /// File extensions this language handles
    fn extensions(&self) -> &[&'static str];

    /// Parse `source` and convert it to a syntax tree
    ///
    /// # Errors
    ///
    /// Returns an error if the source does not parse or uses a construct
    /// the tree model cannot represent at all
    fn lower_module(&self, source: &str) -> Result<Module, Self::Error>;

    /// Whether `path` has one of this language's extensions
    fn handles(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext))
    }
}

/// A whole source file: the top-level statements plus its module imports
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Module {
    /// Top-level statements, in source order
    pub body: Vec<Stmt>,
    /// `import x` / `import x as y` bindings visible to every function
    #[serde(default)]
    pub imports: Vec<Import>,
}

impl Module {
    /// Iterate over the top-level function definitions
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        self.body.iter().filter_map(|stmt| match &stmt.kind {
            StmtKind::FunctionDef(function) => Some(function),
            _ => None,
        })
    }

    /// Find a top-level function by name
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions().find(|function| function.name == name)
    }
}

/// A module-level import binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    /// Dotted module path as written (`numpy`, `os.path`)
    pub module: String,
    /// Name the module is bound to (`np` for `import numpy as np`)
    pub binding: String,
}

/// A function definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    /// Function name
    pub name: String,
    /// Formal parameters
    pub params: Vec<Param>,
    /// Body statements (never empty in well-formed input)
    pub body: Vec<Stmt>,
    /// Position of the definition
    pub pos: Position,
}

/// A formal parameter of a function or lambda
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name
    pub name: String,
    /// Position of the parameter
    pub pos: Position,
}

/// A statement node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    /// Statement kind and children
    pub kind: StmtKind,
    /// Source position
    pub pos: Position,
}

/// Statement kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    /// Function definition
    FunctionDef(FunctionDef),
    /// `target = value`
    Assign {
        /// Assignment target
        target: Expr,
        /// Assigned value
        value: Expr,
    },
    /// `target op= value`
    AugAssign {
        /// Assignment target
        target: Expr,
        /// Operator applied
        op: BinOperator,
        /// Right-hand side
        value: Expr,
    },
    /// Conditional
    If {
        /// Condition
        test: Expr,
        /// Then branch
        body: Vec<Stmt>,
        /// Else branch (an `elif` is a nested `If`)
        orelse: Vec<Stmt>,
    },
    /// While loop
    While {
        /// Condition
        test: Expr,
        /// Loop body
        body: Vec<Stmt>,
        /// `else` clause
        orelse: Vec<Stmt>,
    },
    /// For loop
    For {
        /// Loop variable(s)
        target: Expr,
        /// Iterated expression
        iter: Expr,
        /// Loop body
        body: Vec<Stmt>,
        /// `else` clause
        orelse: Vec<Stmt>,
    },
    /// Return statement
    Return {
        /// Returned value
        value: Option<Expr>,
    },
    /// Expression statement
    ///
    /// Holds the direct children the front end found; well-formed input has
    /// exactly one.
    Expr {
        /// Direct child expressions
        values: Vec<Expr>,
    },
    /// Statement outside the supported subset, by front-end kind name
    Unknown(String),
}

/// An expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    /// Expression kind and children
    pub kind: ExprKind,
    /// Source position
    pub pos: Position,
}

/// Expression kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// Identifier reference
    Name(String),
    /// Numeric literal
    Number(Number),
    /// String literal (unescaped contents)
    Str(String),
    /// Named constant
    Constant(Constant),
    /// Binary arithmetic
    BinOp {
        /// Left operand
        left: Box<Expr>,
        /// Operator
        op: BinOperator,
        /// Right operand
        right: Box<Expr>,
    },
    /// Unary operation
    UnaryOp {
        /// Operator
        op: UnaryOperator,
        /// Operand
        operand: Box<Expr>,
    },
    /// Comparison, possibly chained (`a < b < c`)
    Compare {
        /// First operand
        left: Box<Expr>,
        /// Operators, one per comparator
        ops: Vec<CmpOperator>,
        /// Remaining operands
        comparators: Vec<Expr>,
    },
    /// Call
    Call {
        /// Called expression
        func: Box<Expr>,
        /// Positional arguments
        args: Vec<Expr>,
    },
    /// `value.attr`
    Attribute {
        /// Object expression
        value: Box<Expr>,
        /// Member name
        attr: String,
    },
    /// `value[index]`
    Subscript {
        /// Subscripted expression
        value: Box<Expr>,
        /// Index shape
        index: Box<Index>,
    },
    /// List display
    List(Vec<Expr>),
    /// Tuple display
    Tuple(Vec<Expr>),
    /// Lambda expression
    Lambda {
        /// Parameters
        params: Vec<Param>,
        /// Body expression
        body: Box<Expr>,
    },
    /// Expression outside the supported subset, by front-end kind name
    Unknown(String),
}

impl ExprKind {
    /// Kind name used in diagnostics
    pub fn name(&self) -> &str {
        match self {
            Self::Name(_) => "Name",
            Self::Number(_) => "Num",
            Self::Str(_) => "Str",
            Self::Constant(_) => "NameConstant",
            Self::BinOp { .. } => "BinOp",
            Self::UnaryOp { .. } => "UnaryOp",
            Self::Compare { .. } => "Compare",
            Self::Call { .. } => "Call",
            Self::Attribute { .. } => "Attribute",
            Self::Subscript { .. } => "Subscript",
            Self::List(_) => "List",
            Self::Tuple(_) => "Tuple",
            Self::Lambda { .. } => "Lambda",
            Self::Unknown(kind) => kind,
        }
    }
}

/// Numeric literal value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Number {
    /// Integer literal
    Int(i64),
    /// Floating-point literal
    Float(f64),
}

/// The three named constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constant {
    /// `None`
    None,
    /// `False`
    False,
    /// `True`
    True,
}

/// The index part of a subscript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Index {
    /// Single value, or a tuple of values for `a[i, j]`
    Index(Expr),
    /// One-dimensional slice `a[lo:hi:step]`
    Slice(Slice),
    /// Several dimensions, at least one of them a slice
    ExtSlice(Vec<Dim>),
}

/// `lower:upper:step` with every bound optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    /// Lower bound
    pub lower: Option<Expr>,
    /// Upper bound
    pub upper: Option<Expr>,
    /// Step
    pub step: Option<Expr>,
    /// Source position
    pub pos: Position,
}

/// One dimension of an extended slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Dim {
    /// Plain index
    Index(Expr),
    /// Slice
    Slice(Slice),
}

/// Binary operators of the host language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum BinOperator {
    /// Addition
    #[display("+")]
    Add,
    /// Subtraction
    #[display("-")]
    Sub,
    /// Multiplication
    #[display("*")]
    Mult,
    /// True division
    #[display("/")]
    Div,
    /// Modulo
    #[display("%")]
    Mod,
    /// Power
    #[display("**")]
    Pow,
    /// Floor division
    #[display("//")]
    FloorDiv,
    /// Matrix multiplication
    #[display("@")]
    MatMult,
    /// Left shift
    #[display("<<")]
    LShift,
    /// Right shift
    #[display(">>")]
    RShift,
    /// Bitwise or
    #[display("|")]
    BitOr,
    /// Bitwise xor
    #[display("^")]
    BitXor,
    /// Bitwise and
    #[display("&")]
    BitAnd,
}

/// Unary operators of the host language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum UnaryOperator {
    /// Negation
    #[display("-")]
    USub,
    /// Unary plus
    #[display("+")]
    UAdd,
    /// Logical not
    #[display("not")]
    Not,
    /// Bitwise inversion
    #[display("~")]
    Invert,
}

/// Comparison operators of the host language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum CmpOperator {
    /// `<`
    #[display("<")]
    Lt,
    /// `>`
    #[display(">")]
    Gt,
    /// `<=`
    #[display("<=")]
    LtE,
    /// `>=`
    #[display(">=")]
    GtE,
    /// `==`
    #[display("==")]
    Eq,
    /// `!=`
    #[display("!=")]
    NotEq,
    /// `is`
    #[display("is")]
    Is,
    /// `is not`
    #[display("is not")]
    IsNot,
    /// `in`
    #[display("in")]
    In,
    /// `not in`
    #[display("not in")]
    NotIn,
}
