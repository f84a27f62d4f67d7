//! Expression lowering
//!
//! Binary and unary operators are the only expressions that can appear
//! without delimiters in the output, so they are the only ones that look at
//! the operator priority threaded through the context. Every other compound
//! expression supplies its own delimiters and lowers its children at
//! priority 0.

use crate::{
    attribute,
    dispatch::{LoweringContext, unsupported},
    emit,
    error::{LowerError, LowerResult, OperatorClass},
    subscript,
};
use px_span::Position;
use px_syntax::{
    BinOperator, CmpOperator, Constant, Expr, ExprKind, Param, UnaryOperator,
};

/// Call target marking a loop as parallel when it is a `for` iterable
pub const PARALLEL_RANGE: &str = "prange";
/// Call target lowered to the output primitive
pub const PRINT: &str = "print";

const ADDITIVE: u8 = 1;
const MULTIPLICATIVE: u8 = 2;
const POWER: u8 = 3;
const PREFIX: u8 = 3;

/// Priorities of a binary operator and of its two operand slots
///
/// The slot on the non-associative side sits one level higher so that
/// `a - (b - c)` and `(a ** b) ** c` keep their grouping without aggressive
/// mode.
#[derive(Debug, Clone, Copy)]
struct Precedence {
    operator: u8,
    left: u8,
    right: u8,
}

impl Precedence {
    fn of(op: BinOperator, line: u32) -> LowerResult<Self> {
        let operator = match op {
            BinOperator::Add | BinOperator::Sub => ADDITIVE,
            BinOperator::Mult | BinOperator::Div | BinOperator::Mod => MULTIPLICATIVE,
            BinOperator::Pow => POWER,
            BinOperator::FloorDiv
            | BinOperator::MatMult
            | BinOperator::LShift
            | BinOperator::RShift
            | BinOperator::BitOr
            | BinOperator::BitXor
            | BinOperator::BitAnd => {
                return Err(LowerError::UnsupportedOperator {
                    class: OperatorClass::Binary,
                    op: op.to_string(),
                    line,
                });
            }
        };
        Ok(if op == BinOperator::Pow {
            Self {
                operator,
                left: operator + 1,
                right: operator,
            }
        } else {
            Self {
                operator,
                left: operator,
                right: operator + 1,
            }
        })
    }
}

/// Lower any expression
pub fn lower_expr(ctx: &mut LoweringContext<'_>, expr: &Expr) -> LowerResult<String> {
    let pos = expr.pos;
    match &expr.kind {
        ExprKind::Name(id) => Ok(pos.tag(id)),
        ExprKind::Number(value) => Ok(emit::number(*value)),
        ExprKind::Str(value) => Ok(emit::string(value)),
        ExprKind::Constant(value) => Ok(pos.tag(constant_token(*value))),
        ExprKind::BinOp { left, op, right } => lower_bin_op(ctx, left, *op, right, pos),
        ExprKind::UnaryOp { op, operand } => lower_unary_op(ctx, *op, operand, pos),
        ExprKind::Compare {
            left,
            ops,
            comparators,
        } => ctx.delimited(|inner| lower_compare(inner, left, ops, comparators, pos)),
        ExprKind::Call { func, args } => ctx.delimited(|inner| lower_call(inner, func, args, pos)),
        ExprKind::Attribute { value, attr } => {
            ctx.delimited(|inner| attribute::lower_attribute_call(inner, value, attr, pos, &[]))
        }
        ExprKind::Subscript { value, index } => {
            ctx.delimited(|inner| subscript::lower_subscript(inner, value, index, pos))
        }
        ExprKind::List(elts) => ctx.delimited(|inner| {
            Ok(emit::call(&pos.tag(emit::MAKE_LIST), lower_all(inner, elts)?))
        }),
        ExprKind::Tuple(elts) => ctx.delimited(|inner| Ok(emit::join(lower_all(inner, elts)?))),
        ExprKind::Lambda { params, body } => {
            ctx.delimited(|inner| lower_lambda(inner, params, body, pos))
        }
        ExprKind::Unknown(kind) => Err(unsupported(kind, pos)),
    }
}

/// Lower each expression in order
pub(crate) fn lower_all(ctx: &mut LoweringContext<'_>, exprs: &[Expr]) -> LowerResult<Vec<String>> {
    exprs.iter().map(|expr| lower_expr(ctx, expr)).collect()
}

/// Lower `lhs op right` where the left operand has already been lowered
pub(crate) fn lower_infix_with(
    ctx: &mut LoweringContext<'_>,
    lhs: &str,
    op: BinOperator,
    right: &Expr,
    line: u32,
) -> LowerResult<String> {
    let precedence = Precedence::of(op, line)?;
    let saved = ctx.priority();
    let rhs = ctx.with_priority(precedence.right, |inner| lower_expr(inner, right))?;
    let grouped = ctx.group_aggressively() || precedence.operator < saved;
    Ok(emit::infix(lhs, &op.to_string(), &rhs, grouped))
}

fn lower_bin_op(
    ctx: &mut LoweringContext<'_>,
    left: &Expr,
    op: BinOperator,
    right: &Expr,
    pos: Position,
) -> LowerResult<String> {
    let precedence = Precedence::of(op, pos.line)?;
    let lhs = ctx.with_priority(precedence.left, |inner| lower_expr(inner, left))?;
    lower_infix_with(ctx, &lhs, op, right, pos.line)
}

fn lower_unary_op(
    ctx: &mut LoweringContext<'_>,
    op: UnaryOperator,
    operand: &Expr,
    pos: Position,
) -> LowerResult<String> {
    let symbol = match op {
        UnaryOperator::USub => "-",
        UnaryOperator::Not => "!",
        UnaryOperator::UAdd | UnaryOperator::Invert => {
            return Err(LowerError::UnsupportedOperator {
                class: OperatorClass::Unary,
                op: op.to_string(),
                line: pos.line,
            });
        }
    };
    let saved = ctx.priority();
    let nested = matches!(
        operand.kind,
        ExprKind::BinOp { .. } | ExprKind::UnaryOp { .. }
    );
    let lowered = ctx.delimited(|inner| lower_expr(inner, operand))?;
    let text = emit::prefix(symbol, &lowered, ctx.group_aggressively() || nested);
    // `(-x) ** y` must not read back as `-(x ** y)`
    Ok(if PREFIX < saved {
        emit::group(&text)
    } else {
        text
    })
}

fn lower_compare(
    ctx: &mut LoweringContext<'_>,
    left: &Expr,
    ops: &[CmpOperator],
    comparators: &[Expr],
    pos: Position,
) -> LowerResult<String> {
    let ([op], [right]) = (ops, comparators) else {
        return Err(LowerError::ChainedComparison { line: pos.line });
    };
    match op {
        CmpOperator::Lt
        | CmpOperator::Gt
        | CmpOperator::LtE
        | CmpOperator::GtE
        | CmpOperator::Eq
        | CmpOperator::NotEq => {}
        CmpOperator::Is | CmpOperator::IsNot | CmpOperator::In | CmpOperator::NotIn => {
            return Err(LowerError::UnsupportedOperator {
                class: OperatorClass::Boolean,
                op: op.to_string(),
                line: pos.line,
            });
        }
    }
    let lhs = lower_expr(ctx, left)?;
    let rhs = lower_expr(ctx, right)?;
    Ok(emit::infix(&lhs, &op.to_string(), &rhs, true))
}

fn lower_call(
    ctx: &mut LoweringContext<'_>,
    func: &Expr,
    args: &[Expr],
    pos: Position,
) -> LowerResult<String> {
    match &func.kind {
        ExprKind::Name(id) => {
            let args = lower_all(ctx, args)?;
            Ok(emit::call(&pos.tag(call_target(id)), args))
        }
        ExprKind::Attribute { value, attr } => {
            attribute::lower_attribute_call(ctx, value, attr, func.pos, args)
        }
        other => Err(unsupported(other.name(), func.pos)),
    }
}

fn lower_lambda(
    ctx: &mut LoweringContext<'_>,
    params: &[Param],
    body: &Expr,
    pos: Position,
) -> LowerResult<String> {
    let mut parts: Vec<String> = params.iter().map(|param| param.pos.tag(&param.name)).collect();
    let body = lower_expr(ctx, body)?;
    parts.push(emit::call(emit::BLOCK, [body]));
    Ok(emit::call(&pos.tag(emit::LAMBDA), parts))
}

/// Name emitted for a call to `id`
///
/// The input tree is never rewritten; reserved names are substituted here.
pub fn call_target(id: &str) -> &str {
    match id {
        PRINT => emit::OUTPUT,
        PARALLEL_RANGE => emit::RANGE,
        other => other,
    }
}

/// Whether `expr` is a call to the parallel range marker
pub fn is_parallel_range(expr: &Expr) -> bool {
    let ExprKind::Call { func, .. } = &expr.kind else {
        return false;
    };
    matches!(&func.kind, ExprKind::Name(id) if id == PARALLEL_RANGE)
}

fn constant_token(value: Constant) -> &'static str {
    match value {
        Constant::None => emit::NIL,
        Constant::False => emit::FALSE,
        Constant::True => emit::TRUE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{Environment, LowerOptions};
    use px_syntax::builder::*;

    fn lower_with(expr: &Expr, group_aggressively: bool) -> LowerResult<String> {
        let env = Environment::new().with_options(LowerOptions { group_aggressively });
        let mut ctx = LoweringContext::new(&env);
        lower_expr(&mut ctx, expr)
    }

    fn lower(expr: &Expr) -> String {
        lower_with(expr, true).unwrap()
    }

    fn relaxed(expr: &Expr) -> String {
        lower_with(expr, false).unwrap()
    }

    #[test]
    fn test_literals_and_names() {
        assert_eq!(lower(&name("x", 2, 4)), "x$2$4");
        assert_eq!(lower(&int(42, 1, 0)), "42");
        assert_eq!(lower(&float(2.5, 1, 0)), "2.5");
        assert_eq!(lower(&string("hi", 1, 0)), "\"hi\"");
        assert_eq!(lower(&constant(Constant::None, 3, 7)), "nil$3$7");
        assert_eq!(lower(&constant(Constant::True, 3, 7)), "true$3$7");
        assert_eq!(lower(&constant(Constant::False, 3, 7)), "false$3$7");
    }

    #[test]
    fn test_aggressive_grouping() {
        // a + b * c
        let expr = bin(
            name("a", 1, 0),
            BinOperator::Add,
            bin(name("b", 1, 4), BinOperator::Mult, name("c", 1, 8), 1, 4),
            1,
            0,
        );
        assert_eq!(lower(&expr), "(a$1$0 + (b$1$4 * c$1$8))");
        assert_eq!(relaxed(&expr), "a$1$0 + b$1$4 * c$1$8");
    }

    #[test]
    fn test_relaxed_grouping_keeps_meaning() {
        // (a + b) * c
        let expr = bin(
            bin(name("a", 1, 1), BinOperator::Add, name("b", 1, 5), 1, 1),
            BinOperator::Mult,
            name("c", 1, 10),
            1,
            0,
        );
        assert_eq!(relaxed(&expr), "(a$1$1 + b$1$5) * c$1$10");

        // a - (b - c)
        let nested = bin(
            name("a", 1, 0),
            BinOperator::Sub,
            bin(name("b", 1, 5), BinOperator::Sub, name("c", 1, 9), 1, 5),
            1,
            0,
        );
        assert_eq!(relaxed(&nested), "a$1$0 - (b$1$5 - c$1$9)");

        // (a ** b) ** c and a ** b ** c
        let left = bin(
            bin(name("a", 1, 1), BinOperator::Pow, name("b", 1, 6), 1, 1),
            BinOperator::Pow,
            name("c", 1, 12),
            1,
            0,
        );
        assert_eq!(relaxed(&left), "(a$1$1 ** b$1$6) ** c$1$12");
        let right = bin(
            name("a", 1, 0),
            BinOperator::Pow,
            bin(name("b", 1, 5), BinOperator::Pow, name("c", 1, 10), 1, 5),
            1,
            0,
        );
        assert_eq!(relaxed(&right), "a$1$0 ** b$1$5 ** c$1$10");
    }

    #[test]
    fn test_unsupported_binary_operator() {
        let expr = bin(name("a", 4, 0), BinOperator::FloorDiv, name("b", 4, 5), 4, 0);
        assert_eq!(
            lower_with(&expr, true),
            Err(LowerError::UnsupportedOperator {
                class: OperatorClass::Binary,
                op: "//".to_string(),
                line: 4,
            })
        );
    }

    #[test]
    fn test_unary_operators() {
        let negated = unary(UnaryOperator::USub, name("x", 1, 1), 1, 0);
        assert_eq!(lower(&negated), "-(x$1$1)");
        assert_eq!(relaxed(&negated), "-x$1$1");

        let sum = bin(name("a", 1, 2), BinOperator::Add, name("b", 1, 6), 1, 2);
        assert_eq!(
            relaxed(&unary(UnaryOperator::USub, sum, 1, 0)),
            "-(a$1$2 + b$1$6)"
        );

        let not = unary(UnaryOperator::Not, name("flag", 2, 8), 2, 4);
        assert_eq!(lower(&not), "!(flag$2$8)");

        let invert = unary(UnaryOperator::Invert, name("x", 5, 1), 5, 0);
        assert!(matches!(
            lower_with(&invert, true),
            Err(LowerError::UnsupportedOperator {
                class: OperatorClass::Unary,
                line: 5,
                ..
            })
        ));
    }

    #[test]
    fn test_negated_base_of_power_is_grouped() {
        // (-x) ** 2
        let expr = bin(
            unary(UnaryOperator::USub, name("x", 1, 2), 1, 1),
            BinOperator::Pow,
            int(2, 1, 8),
            1,
            0,
        );
        assert_eq!(lower(&expr), "((-(x$1$2)) ** 2)");
        assert_eq!(relaxed(&expr), "(-x$1$2) ** 2");
    }

    #[test]
    fn test_comparisons() {
        let expr = compare(name("n", 2, 7), vec![(CmpOperator::Lt, int(2, 2, 11))], 2, 7);
        assert_eq!(lower(&expr), "(n$2$7 < 2)");

        let chained = compare(
            name("a", 3, 0),
            vec![(CmpOperator::Lt, name("b", 3, 4)), (CmpOperator::Lt, name("c", 3, 8))],
            3,
            0,
        );
        assert_eq!(
            lower_with(&chained, true),
            Err(LowerError::ChainedComparison { line: 3 })
        );

        let membership = compare(name("a", 6, 0), vec![(CmpOperator::In, name("b", 6, 5))], 6, 0);
        assert!(matches!(
            lower_with(&membership, true),
            Err(LowerError::UnsupportedOperator {
                class: OperatorClass::Boolean,
                ..
            })
        ));
    }

    #[test]
    fn test_operands_of_delimited_calls_reset_priority() {
        // a * f(b + c)
        let expr = bin(
            name("a", 1, 0),
            BinOperator::Mult,
            call_name(
                "f",
                vec![bin(name("b", 1, 6), BinOperator::Add, name("c", 1, 10), 1, 6)],
                1,
                4,
            ),
            1,
            0,
        );
        assert_eq!(relaxed(&expr), "a$1$0 * f$1$4(b$1$6 + c$1$10)");
    }

    #[test]
    fn test_reserved_call_targets() {
        let print = call_name("print", vec![name("x", 3, 10)], 3, 4);
        assert_eq!(lower(&print), "cout$3$4(x$3$10)");
        let range = call_name("prange", vec![int(10, 4, 20)], 4, 13);
        assert_eq!(lower(&range), "range$4$13(10)");
        assert!(is_parallel_range(&range));
        assert!(!is_parallel_range(&call_name("range", vec![], 4, 13)));
    }

    #[test]
    fn test_unsupported_call_target() {
        let expr = call(
            subscript_call_target(),
            vec![],
            7,
            0,
        );
        assert_eq!(
            lower_with(&expr, true),
            Err(LowerError::UnsupportedNodeKind {
                kind: "Subscript".to_string(),
                line: 7,
                column: 0,
            })
        );
    }

    fn subscript_call_target() -> Expr {
        index(name("table", 7, 0), int(0, 7, 6), 7, 0)
    }

    #[test]
    fn test_collections() {
        assert_eq!(lower(&list(vec![], 1, 4)), "make_list$1$4()");
        assert_eq!(
            lower(&list(vec![int(1, 1, 5), int(2, 1, 8)], 1, 4)),
            "make_list$1$4(1, 2)"
        );
        assert_eq!(
            lower(&tuple(vec![name("a", 1, 0), name("b", 1, 3)], 1, 0)),
            "a$1$0, b$1$3"
        );
    }

    #[test]
    fn test_lambda() {
        let expr = lambda(
            vec![param("x", 2, 15)],
            bin(name("x", 2, 18), BinOperator::Mult, int(2, 2, 22), 2, 18),
            2,
            8,
        );
        assert_eq!(lower(&expr), "lambda$2$8(x$2$15, block((x$2$18 * 2)))");
        assert_eq!(
            lower(&lambda(vec![], int(1, 2, 15), 2, 8)),
            "lambda$2$8(block(1))"
        );
    }

    #[test]
    fn test_unknown_expression() {
        assert_eq!(
            lower_with(&unknown_expr("dictionary", 9, 4), true),
            Err(LowerError::UnsupportedNodeKind {
                kind: "dictionary".to_string(),
                line: 9,
                column: 4,
            })
        );
    }
}
