//! The re-entrant dispatcher and the per-compilation context it threads
//!
//! [`recompile`] is the single entry point every lowering routine uses to
//! lower a child node. Routing is an exhaustive match over [`Node`], and each
//! routine matches exhaustively over its own kind enum, so a new syntax kind
//! without a lowering rule is a build error rather than a runtime surprise.

use crate::{
    env::Environment,
    error::{LowerError, LowerResult},
    expr,
    scope::ScopeTracker,
    stmt, subscript,
};
use px_span::Position;
use px_syntax::{Dim, Expr, FunctionDef, Module, Slice, Stmt};
use std::mem;

/// Any node the dispatcher can route
#[derive(Debug, Clone, Copy)]
pub enum Node<'tree> {
    /// Whole source file
    Module(&'tree Module),
    /// Function definition
    FunctionDef(&'tree FunctionDef),
    /// Statement
    Stmt(&'tree Stmt),
    /// Expression
    Expr(&'tree Expr),
    /// One-dimensional slice in read position
    Slice(&'tree Slice),
    /// Multi-dimensional subscript in read position, at the subscript's position
    ExtSlice(&'tree [Dim], Position),
}

/// State of one function compilation
///
/// Owns the scope tracker; borrows the shared environment. Never reused
/// across functions.
#[derive(Debug)]
pub struct LoweringContext<'env> {
    env: &'env Environment,
    scope: ScopeTracker,
    /// Priority of the innermost enclosing operator, 0 in delimited contexts
    priority: u8,
    in_function: bool,
}

impl<'env> LoweringContext<'env> {
    /// Fresh context with an empty scope
    pub fn new(env: &'env Environment) -> Self {
        Self {
            env,
            scope: ScopeTracker::new(),
            priority: 0,
            in_function: false,
        }
    }

    /// Shared environment
    pub fn env(&self) -> &'env Environment {
        self.env
    }

    /// Names bound so far
    pub fn scope(&self) -> &ScopeTracker {
        &self.scope
    }

    pub(crate) fn scope_mut(&mut self) -> &mut ScopeTracker {
        &mut self.scope
    }

    pub(crate) fn group_aggressively(&self) -> bool {
        self.env.options.group_aggressively
    }

    pub(crate) fn priority(&self) -> u8 {
        self.priority
    }

    /// Run `lower` with the operator priority set to `priority`, restoring it after
    pub(crate) fn with_priority<T>(
        &mut self,
        priority: u8,
        lower: impl FnOnce(&mut Self) -> LowerResult<T>,
    ) -> LowerResult<T> {
        let saved = mem::replace(&mut self.priority, priority);
        let result = lower(self);
        self.priority = saved;
        result
    }

    /// Run `lower` in a context that supplies its own delimiters
    pub(crate) fn delimited<T>(
        &mut self,
        lower: impl FnOnce(&mut Self) -> LowerResult<T>,
    ) -> LowerResult<T> {
        self.with_priority(0, lower)
    }

    /// Mark entry into a function body; nested definitions are rejected
    pub(crate) fn enter_function(&mut self, function: &FunctionDef) -> LowerResult<()> {
        if self.in_function {
            return Err(LowerError::UnsupportedNodeKind {
                kind: "FunctionDef".to_string(),
                line: function.pos.line,
                column: function.pos.column,
            });
        }
        self.in_function = true;
        self.scope = ScopeTracker::with_params(
            function.params.iter().map(|param| param.name.as_str()),
        );
        Ok(())
    }
}

/// Lower `node` to IR text
///
/// `allow_return` is true only when `node` is the final statement of a
/// function body or of a branch that is itself in return position.
pub fn recompile(
    ctx: &mut LoweringContext<'_>,
    node: Node<'_>,
    allow_return: bool,
) -> LowerResult<String> {
    match node {
        Node::Module(module) => stmt::lower_module(ctx, module),
        Node::FunctionDef(function) => stmt::lower_function_def(ctx, function),
        Node::Stmt(stmt) => stmt::lower_stmt(ctx, stmt, allow_return),
        Node::Expr(expr) => expr::lower_expr(ctx, expr),
        Node::Slice(slice) => subscript::lower_slice(ctx, slice),
        Node::ExtSlice(dims, pos) => subscript::lower_ext_slice(ctx, dims, pos),
    }
}

/// Error for a node kind outside the compiled subset
pub(crate) fn unsupported(kind: &str, pos: Position) -> LowerError {
    LowerError::UnsupportedNodeKind {
        kind: kind.to_string(),
        line: pos.line,
        column: pos.column,
    }
}
