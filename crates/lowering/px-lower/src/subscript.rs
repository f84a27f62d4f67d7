//! Subscript reads and subscript assignment targets
//!
//! Reads become `slice<tag>(base, selector)`. Writes become one untagged,
//! eight-argument `set` whatever their shape:
//!
//! ```text
//! a[lo:hi]          = v   ->  set(a, lo|0, hi|0,   1, 0,     0,     0, v)
//! a[i]              = v   ->  set(a, i,    0,      0, 0,     0,     0, v)
//! a[i, j]           = v   ->  set(a, i,    0,      0, j,     0,     0, v)
//! a[l1:u1, l2:u2]   = v   ->  set(a, l1|0, u1|nil, 1, l2|0,  u2|nil, 1, v)
//! ```

use crate::{
    dispatch::{LoweringContext, Node, recompile},
    emit,
    error::{LowerError, LowerResult},
    expr::lower_expr,
};
use px_span::Position;
use px_syntax::{Dim, Expr, ExprKind, Index, Slice};
use std::iter;

const ZERO: &str = "0";
const ONE: &str = "1";

/// Lower `value[index]` in read position
pub fn lower_subscript(
    ctx: &mut LoweringContext<'_>,
    value: &Expr,
    index: &Index,
    pos: Position,
) -> LowerResult<String> {
    let base = lower_expr(ctx, value)?;
    let selector = match index {
        Index::Index(expr) => recompile(ctx, Node::Expr(expr), false)?,
        Index::Slice(slice) => recompile(ctx, Node::Slice(slice), false)?,
        Index::ExtSlice(dims) => recompile(ctx, Node::ExtSlice(dims, pos), false)?,
    };
    Ok(emit::call(&pos.tag(emit::SLICE), [base, selector]))
}

/// `make_list(lower|0, upper|nil[, step])`
pub fn lower_slice(ctx: &mut LoweringContext<'_>, slice: &Slice) -> LowerResult<String> {
    let mut bounds = vec![
        bound_or(ctx, slice.lower.as_ref(), ZERO)?,
        bound_or(ctx, slice.upper.as_ref(), emit::NIL)?,
    ];
    if let Some(step) = &slice.step {
        bounds.push(lower_expr(ctx, step)?);
    }
    Ok(emit::call(emit::MAKE_LIST, bounds))
}

/// Both dimensions of a two-dimensional subscript, comma-joined
pub fn lower_ext_slice(
    ctx: &mut LoweringContext<'_>,
    dims: &[Dim],
    pos: Position,
) -> LowerResult<String> {
    let [first, second] = dims else {
        return Err(LowerError::UnsupportedSlicingShape { line: pos.line });
    };
    Ok(emit::join([lower_dim(ctx, first)?, lower_dim(ctx, second)?]))
}

fn lower_dim(ctx: &mut LoweringContext<'_>, dim: &Dim) -> LowerResult<String> {
    match dim {
        Dim::Index(expr) => lower_expr(ctx, expr),
        Dim::Slice(slice) => lower_slice(ctx, slice),
    }
}

/// Lower `value[index] = rhs`; `pos` is the assignment statement's position
pub fn lower_subscript_assign(
    ctx: &mut LoweringContext<'_>,
    value: &Expr,
    index: &Index,
    rhs: &Expr,
    pos: Position,
) -> LowerResult<String> {
    let shape_error = || LowerError::UnsupportedSlicingShape { line: pos.line };
    let base = lower_expr(ctx, value)?;
    let selector: [String; 6] = match index {
        Index::Slice(slice) => {
            if slice.step.is_some() {
                return Err(shape_error());
            }
            [
                bound_or(ctx, slice.lower.as_ref(), ZERO)?,
                bound_or(ctx, slice.upper.as_ref(), ZERO)?,
                ONE.to_string(),
                ZERO.to_string(),
                ZERO.to_string(),
                ZERO.to_string(),
            ]
        }
        Index::Index(expr) => match &expr.kind {
            ExprKind::Tuple(elts) => {
                let [row, column] = elts.as_slice() else {
                    return Err(shape_error());
                };
                [
                    lower_expr(ctx, row)?,
                    ZERO.to_string(),
                    ZERO.to_string(),
                    lower_expr(ctx, column)?,
                    ZERO.to_string(),
                    ZERO.to_string(),
                ]
            }
            _ => [
                lower_expr(ctx, expr)?,
                ZERO.to_string(),
                ZERO.to_string(),
                ZERO.to_string(),
                ZERO.to_string(),
                ZERO.to_string(),
            ],
        },
        Index::ExtSlice(dims) => {
            let [Dim::Slice(rows), Dim::Slice(columns)] = dims.as_slice() else {
                return Err(shape_error());
            };
            if rows.step.is_some() || columns.step.is_some() {
                return Err(shape_error());
            }
            [
                bound_or(ctx, rows.lower.as_ref(), ZERO)?,
                bound_or(ctx, rows.upper.as_ref(), emit::NIL)?,
                ONE.to_string(),
                bound_or(ctx, columns.lower.as_ref(), ZERO)?,
                bound_or(ctx, columns.upper.as_ref(), emit::NIL)?,
                ONE.to_string(),
            ]
        }
    };
    let rhs = lower_expr(ctx, rhs)?;
    Ok(emit::call(
        emit::SET,
        iter::once(base).chain(selector).chain(iter::once(rhs)),
    ))
}

fn bound_or(
    ctx: &mut LoweringContext<'_>,
    bound: Option<&Expr>,
    default: &str,
) -> LowerResult<String> {
    bound.map_or_else(|| Ok(default.to_string()), |expr| lower_expr(ctx, expr))
}
