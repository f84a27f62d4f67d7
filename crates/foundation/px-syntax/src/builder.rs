//! Terse constructors for building trees by hand
//!
//! Every constructor takes the node's `line` and `column` last.

#![allow(missing_docs, reason = "constructor names mirror the node kinds they build")]

use crate::{
    BinOperator, CmpOperator, Constant, Dim, Expr, ExprKind, FunctionDef, Index, Module, Number,
    Param, Slice, Stmt, StmtKind, UnaryOperator,
};
use px_span::Position;

fn expr(kind: ExprKind, line: u32, column: u32) -> Expr {
    Expr {
        kind,
        pos: Position::new(line, column),
    }
}

fn stmt(kind: StmtKind, line: u32, column: u32) -> Stmt {
    Stmt {
        kind,
        pos: Position::new(line, column),
    }
}

pub fn name(id: &str, line: u32, column: u32) -> Expr {
    expr(ExprKind::Name(id.to_string()), line, column)
}

pub fn int(value: i64, line: u32, column: u32) -> Expr {
    expr(ExprKind::Number(Number::Int(value)), line, column)
}

pub fn float(value: f64, line: u32, column: u32) -> Expr {
    expr(ExprKind::Number(Number::Float(value)), line, column)
}

pub fn string(value: &str, line: u32, column: u32) -> Expr {
    expr(ExprKind::Str(value.to_string()), line, column)
}

pub fn constant(value: Constant, line: u32, column: u32) -> Expr {
    expr(ExprKind::Constant(value), line, column)
}

pub fn bin(left: Expr, op: BinOperator, right: Expr, line: u32, column: u32) -> Expr {
    expr(
        ExprKind::BinOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        line,
        column,
    )
}

pub fn unary(op: UnaryOperator, operand: Expr, line: u32, column: u32) -> Expr {
    expr(
        ExprKind::UnaryOp {
            op,
            operand: Box::new(operand),
        },
        line,
        column,
    )
}

/// Comparison; a single `(op, rhs)` pair is the ordinary two-operand form
pub fn compare(left: Expr, rest: Vec<(CmpOperator, Expr)>, line: u32, column: u32) -> Expr {
    let (ops, comparators) = rest.into_iter().unzip();
    expr(
        ExprKind::Compare {
            left: Box::new(left),
            ops,
            comparators,
        },
        line,
        column,
    )
}

pub fn call(func: Expr, args: Vec<Expr>, line: u32, column: u32) -> Expr {
    expr(
        ExprKind::Call {
            func: Box::new(func),
            args,
        },
        line,
        column,
    )
}

/// Call of a bare name, the name sharing the call's position
pub fn call_name(func: &str, args: Vec<Expr>, line: u32, column: u32) -> Expr {
    call(name(func, line, column), args, line, column)
}

pub fn attribute(value: Expr, attr: &str, line: u32, column: u32) -> Expr {
    expr(
        ExprKind::Attribute {
            value: Box::new(value),
            attr: attr.to_string(),
        },
        line,
        column,
    )
}

pub fn subscript(value: Expr, index: Index, line: u32, column: u32) -> Expr {
    expr(
        ExprKind::Subscript {
            value: Box::new(value),
            index: Box::new(index),
        },
        line,
        column,
    )
}

pub fn slice(
    lower: Option<Expr>,
    upper: Option<Expr>,
    step: Option<Expr>,
    line: u32,
    column: u32,
) -> Slice {
    Slice {
        lower,
        upper,
        step,
        pos: Position::new(line, column),
    }
}

/// `value[index]`
pub fn index(value: Expr, index: Expr, line: u32, column: u32) -> Expr {
    subscript(value, Index::Index(index), line, column)
}

/// `value[lo:hi:step]`
pub fn sliced(value: Expr, bounds: Slice, line: u32, column: u32) -> Expr {
    subscript(value, Index::Slice(bounds), line, column)
}

/// `value[d1, d2, ...]` with at least one slice dimension
pub fn ext_sliced(value: Expr, dims: Vec<Dim>, line: u32, column: u32) -> Expr {
    subscript(value, Index::ExtSlice(dims), line, column)
}

pub fn list(elts: Vec<Expr>, line: u32, column: u32) -> Expr {
    expr(ExprKind::List(elts), line, column)
}

pub fn tuple(elts: Vec<Expr>, line: u32, column: u32) -> Expr {
    expr(ExprKind::Tuple(elts), line, column)
}

pub fn lambda(params: Vec<Param>, body: Expr, line: u32, column: u32) -> Expr {
    expr(
        ExprKind::Lambda {
            params,
            body: Box::new(body),
        },
        line,
        column,
    )
}

pub fn unknown_expr(kind: &str, line: u32, column: u32) -> Expr {
    expr(ExprKind::Unknown(kind.to_string()), line, column)
}

pub fn param(name: &str, line: u32, column: u32) -> Param {
    Param {
        name: name.to_string(),
        pos: Position::new(line, column),
    }
}

pub fn assign(target: Expr, value: Expr, line: u32, column: u32) -> Stmt {
    stmt(StmtKind::Assign { target, value }, line, column)
}

pub fn aug_assign(target: Expr, op: BinOperator, value: Expr, line: u32, column: u32) -> Stmt {
    stmt(StmtKind::AugAssign { target, op, value }, line, column)
}

pub fn if_(test: Expr, body: Vec<Stmt>, orelse: Vec<Stmt>, line: u32, column: u32) -> Stmt {
    stmt(StmtKind::If { test, body, orelse }, line, column)
}

pub fn while_(test: Expr, body: Vec<Stmt>, line: u32, column: u32) -> Stmt {
    stmt(
        StmtKind::While {
            test,
            body,
            orelse: Vec::new(),
        },
        line,
        column,
    )
}

pub fn for_(target: Expr, iter: Expr, body: Vec<Stmt>, line: u32, column: u32) -> Stmt {
    stmt(
        StmtKind::For {
            target,
            iter,
            body,
            orelse: Vec::new(),
        },
        line,
        column,
    )
}

pub fn ret(value: Option<Expr>, line: u32, column: u32) -> Stmt {
    stmt(StmtKind::Return { value }, line, column)
}

/// Expression statement positioned at its expression
pub fn expr_stmt(value: Expr) -> Stmt {
    let pos = value.pos;
    Stmt {
        kind: StmtKind::Expr {
            values: vec![value],
        },
        pos,
    }
}

pub fn unknown_stmt(kind: &str, line: u32, column: u32) -> Stmt {
    stmt(StmtKind::Unknown(kind.to_string()), line, column)
}

pub fn function_def(
    name: &str,
    params: Vec<Param>,
    body: Vec<Stmt>,
    line: u32,
    column: u32,
) -> FunctionDef {
    FunctionDef {
        name: name.to_string(),
        params,
        body,
        pos: Position::new(line, column),
    }
}

/// Function definition as a statement
pub fn function(name: &str, params: Vec<Param>, body: Vec<Stmt>, line: u32, column: u32) -> Stmt {
    let function = function_def(name, params, body, line, column);
    let pos = function.pos;
    Stmt {
        kind: StmtKind::FunctionDef(function),
        pos,
    }
}

/// Module without imports
pub fn module(body: Vec<Stmt>) -> Module {
    Module {
        body,
        imports: Vec::new(),
    }
}
