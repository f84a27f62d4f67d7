//! Statement and control-flow lowering

use crate::{
    dispatch::{LoweringContext, Node, recompile, unsupported},
    emit,
    error::{LowerError, LowerResult, OperatorClass},
    expr::{is_parallel_range, lower_expr, lower_infix_with},
    subscript,
};
use px_span::Position;
use px_syntax::{BinOperator, Expr, ExprKind, FunctionDef, Module, Stmt, StmtKind};

/// Lower the first statement of a module
pub fn lower_module(ctx: &mut LoweringContext<'_>, module: &Module) -> LowerResult<String> {
    let first = module.body.first().ok_or(LowerError::EmptyModule)?;
    recompile(ctx, Node::Stmt(first), false)
}

/// `define<tag>(name<tag>, param<tag>..., body)`
pub fn lower_function_def(
    ctx: &mut LoweringContext<'_>,
    function: &FunctionDef,
) -> LowerResult<String> {
    ctx.enter_function(function)?;
    let pos = function.pos;

    let mut parts = Vec::with_capacity(function.params.len() + 2);
    parts.push(pos.tag(&function.name));
    parts.extend(function.params.iter().map(|param| param.pos.tag(&param.name)));
    parts.push(match function.body.as_slice() {
        [single] => recompile(ctx, Node::Stmt(single), true)?,
        body => emit::call(&pos.tag(emit::BLOCK), lower_sequence(ctx, body, true)?),
    });
    Ok(emit::call(&pos.tag(emit::DEFINE), parts))
}

/// Lower one statement
pub fn lower_stmt(
    ctx: &mut LoweringContext<'_>,
    stmt: &Stmt,
    allow_return: bool,
) -> LowerResult<String> {
    let pos = stmt.pos;
    match &stmt.kind {
        StmtKind::FunctionDef(function) => recompile(ctx, Node::FunctionDef(function), allow_return),
        StmtKind::Assign { target, value } => lower_assign(ctx, target, value, pos),
        StmtKind::AugAssign { target, op, value } => {
            lower_aug_assign(ctx, target, *op, value, pos)
        }
        StmtKind::If { test, body, orelse } => {
            lower_if(ctx, test, body, orelse, pos, allow_return)
        }
        StmtKind::While { test, body, orelse } => {
            if !orelse.is_empty() {
                return Err(unsupported("While.orelse", pos));
            }
            lower_while(ctx, test, body, pos)
        }
        StmtKind::For {
            target,
            iter,
            body,
            orelse,
        } => {
            if !orelse.is_empty() {
                return Err(unsupported("For.orelse", pos));
            }
            lower_for(ctx, target, iter, body, pos)
        }
        StmtKind::Return { value } => {
            if !allow_return {
                return Err(LowerError::MisplacedReturn { line: pos.line });
            }
            value
                .as_ref()
                .map_or_else(|| Ok(pos.tag(emit::NIL)), |returned| lower_expr(ctx, returned))
        }
        StmtKind::Expr { values } => match values.as_slice() {
            [value] => Ok(emit::group(&lower_expr(ctx, value)?)),
            _ => Err(LowerError::MalformedExpressionArity {
                count: values.len(),
                line: pos.line,
            }),
        },
        StmtKind::Unknown(kind) => Err(unsupported(kind, pos)),
    }
}

/// Lower a statement sequence; only the last statement inherits `allow_return`
fn lower_sequence(
    ctx: &mut LoweringContext<'_>,
    stmts: &[Stmt],
    allow_return: bool,
) -> LowerResult<Vec<String>> {
    let last = stmts.len().saturating_sub(1);
    stmts
        .iter()
        .enumerate()
        .map(|(idx, stmt)| recompile(ctx, Node::Stmt(stmt), allow_return && idx == last))
        .collect()
}

/// A single statement inline, several wrapped in a tagged `block`
fn lower_branch(
    ctx: &mut LoweringContext<'_>,
    stmts: &[Stmt],
    pos: Position,
    allow_return: bool,
) -> LowerResult<String> {
    match stmts {
        [single] => recompile(ctx, Node::Stmt(single), allow_return),
        _ => Ok(emit::call(
            &pos.tag(emit::BLOCK),
            lower_sequence(ctx, stmts, allow_return)?,
        )),
    }
}

fn lower_assign(
    ctx: &mut LoweringContext<'_>,
    target: &Expr,
    value: &Expr,
    pos: Position,
) -> LowerResult<String> {
    match &target.kind {
        ExprKind::Name(id) => {
            let binding = ctx.scope_mut().assign(id);
            tracing::debug!(name = %id, line = pos.line, primitive = binding.primitive(), "assignment");
            let rhs = lower_expr(ctx, value)?;
            Ok(emit::call(
                &pos.tag(binding.primitive()),
                [target.pos.tag(id), rhs],
            ))
        }
        ExprKind::Subscript {
            value: base,
            index,
        } => subscript::lower_subscript_assign(ctx, base, index, value, pos),
        _ => Err(LowerError::UnsupportedSlicingShape { line: pos.line }),
    }
}

/// `name += rhs` as `store<tag>(name, (name + rhs))`
fn lower_aug_assign(
    ctx: &mut LoweringContext<'_>,
    target: &Expr,
    op: BinOperator,
    value: &Expr,
    pos: Position,
) -> LowerResult<String> {
    if op != BinOperator::Add {
        return Err(LowerError::UnsupportedOperator {
            class: OperatorClass::Augmented,
            op: format!("{op}="),
            line: pos.line,
        });
    }
    let ExprKind::Name(id) = &target.kind else {
        return Err(LowerError::UnsupportedSlicingShape { line: pos.line });
    };
    let name = target.pos.tag(id);
    let updated = lower_infix_with(ctx, &name, op, value, pos.line)?;
    Ok(emit::call(&pos.tag(emit::STORE), [name, updated]))
}

fn lower_if(
    ctx: &mut LoweringContext<'_>,
    test: &Expr,
    body: &[Stmt],
    orelse: &[Stmt],
    pos: Position,
    allow_return: bool,
) -> LowerResult<String> {
    let test = lower_expr(ctx, test)?;
    let then = lower_branch(ctx, body, pos, allow_return)?;
    let otherwise = if orelse.is_empty() {
        emit::call(&pos.tag(emit::BLOCK), Vec::<String>::new())
    } else {
        lower_branch(ctx, orelse, pos, allow_return)?
    };
    Ok(emit::call(&pos.tag(emit::IF), [test, then, otherwise]))
}

fn lower_while(
    ctx: &mut LoweringContext<'_>,
    test: &Expr,
    body: &[Stmt],
    pos: Position,
) -> LowerResult<String> {
    let test = lower_expr(ctx, test)?;
    let body = lower_branch(ctx, body, pos, false)?;
    Ok(emit::call(&pos.tag(emit::WHILE), [test, body]))
}

/// `map<tag>(lambda<iter tag>(target, block(body...)), iter)`
fn lower_for(
    ctx: &mut LoweringContext<'_>,
    target: &Expr,
    iter: &Expr,
    body: &[Stmt],
    pos: Position,
) -> LowerResult<String> {
    let primitive = if is_parallel_range(iter) {
        emit::PARALLEL_MAP
    } else {
        emit::MAP
    };
    tracing::debug!(line = pos.line, primitive, "lowering for loop");

    let variable = lower_expr(ctx, target)?;
    let statements = lower_sequence(ctx, body, false)?;
    let closure = emit::call(
        &iter.pos.tag(emit::LAMBDA),
        [variable, emit::call(emit::BLOCK, statements)],
    );
    let iterable = lower_expr(ctx, iter)?;
    Ok(emit::call(&pos.tag(primitive), [closure, iterable]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{Environment, LowerOptions};
    use px_syntax::{CmpOperator, Constant, UnaryOperator, builder::*};

    fn lower_fn(function: &FunctionDef) -> LowerResult<String> {
        let env = Environment::new();
        let mut ctx = LoweringContext::new(&env);
        lower_function_def(&mut ctx, function)
    }

    #[test]
    fn test_define_then_store() {
        let function = function_def(
            "f",
            vec![],
            vec![
                assign(name("x", 2, 4), int(1, 2, 8), 2, 4),
                assign(name("x", 3, 4), int(2, 3, 8), 3, 4),
                ret(Some(name("x", 4, 11)), 4, 4),
            ],
            1,
            0,
        );
        assert_eq!(
            lower_fn(&function).unwrap(),
            "define$1$0(f$1$0, block$1$0(define$2$4(x$2$4, 1), store$3$4(x$3$4, 2), x$4$11))"
        );
    }

    #[test]
    fn test_params_are_stored_not_defined() {
        let function = function_def(
            "f",
            vec![param("a", 1, 6)],
            vec![
                assign(name("a", 2, 4), int(0, 2, 8), 2, 4),
                ret(Some(name("a", 3, 11)), 3, 4),
            ],
            1,
            0,
        );
        assert_eq!(
            lower_fn(&function).unwrap(),
            "define$1$0(f$1$0, a$1$6, block$1$0(store$2$4(a$2$4, 0), a$3$11))"
        );
    }

    #[test]
    fn test_binding_inside_branch_persists() {
        let function = function_def(
            "f",
            vec![param("c", 1, 6)],
            vec![
                if_(
                    name("c", 2, 7),
                    vec![assign(name("y", 3, 8), int(1, 3, 12), 3, 8)],
                    vec![],
                    2,
                    4,
                ),
                assign(name("y", 4, 4), int(2, 4, 8), 4, 4),
                ret(Some(name("y", 5, 11)), 5, 4),
            ],
            1,
            0,
        );
        assert_eq!(
            lower_fn(&function).unwrap(),
            "define$1$0(f$1$0, c$1$6, block$1$0(\
             if$2$4(c$2$7, define$3$8(y$3$8, 1), block$2$4()), \
             store$4$4(y$4$4, 2), y$5$11))"
        );
    }

    #[test]
    fn test_return_placement() {
        let early = function_def(
            "f",
            vec![],
            vec![ret(Some(int(1, 2, 11)), 2, 4), ret(Some(int(2, 3, 11)), 3, 4)],
            1,
            0,
        );
        assert_eq!(lower_fn(&early), Err(LowerError::MisplacedReturn { line: 2 }));

        let bare = function_def("f", vec![], vec![ret(None, 2, 4)], 1, 0);
        assert_eq!(lower_fn(&bare).unwrap(), "define$1$0(f$1$0, nil$2$4)");
    }

    #[test]
    fn test_return_inside_loop_rejected() {
        let function = function_def(
            "f",
            vec![],
            vec![while_(
                constant(Constant::True, 2, 10),
                vec![ret(Some(int(1, 3, 15)), 3, 8)],
                2,
                4,
            )],
            1,
            0,
        );
        assert_eq!(lower_fn(&function), Err(LowerError::MisplacedReturn { line: 3 }));
    }

    #[test]
    fn test_if_branches_in_return_position() {
        let function = function_def(
            "sign",
            vec![param("x", 1, 9)],
            vec![if_(
                compare(name("x", 2, 7), vec![(CmpOperator::Lt, int(0, 2, 11))], 2, 7),
                vec![ret(Some(unary(UnaryOperator::USub, int(1, 3, 16), 3, 15)), 3, 8)],
                vec![
                    assign(name("y", 5, 8), int(1, 5, 12), 5, 8),
                    ret(Some(name("y", 6, 15)), 6, 8),
                ],
                2,
                4,
            )],
            1,
            0,
        );
        assert_eq!(
            lower_fn(&function).unwrap(),
            "define$1$0(sign$1$0, x$1$9, if$2$4((x$2$7 < 0), -(1), \
             block$2$4(define$5$8(y$5$8, 1), y$6$15)))"
        );
    }

    #[test]
    fn test_while_bodies() {
        let single = function_def(
            "f",
            vec![param("i", 1, 6)],
            vec![while_(
                compare(name("i", 2, 10), vec![(CmpOperator::Gt, int(0, 2, 14))], 2, 10),
                vec![aug_assign(name("i", 3, 8), BinOperator::Add, int(-1, 3, 13), 3, 8)],
                2,
                4,
            )],
            1,
            0,
        );
        assert_eq!(
            lower_fn(&single).unwrap(),
            "define$1$0(f$1$0, i$1$6, while$2$4((i$2$10 > 0), store$3$8(i$3$8, (i$3$8 + -1))))"
        );
    }

    #[test]
    fn test_augmented_assignment_rules() {
        let env = Environment::new().with_options(LowerOptions {
            group_aggressively: false,
        });
        let mut ctx = LoweringContext::new(&env);
        let add = aug_assign(name("s", 2, 4), BinOperator::Add, name("i", 2, 9), 2, 4);
        assert_eq!(lower_stmt(&mut ctx, &add, false).unwrap(), "store$2$4(s$2$4, s$2$4 + i$2$9)");

        let mult = aug_assign(name("s", 3, 4), BinOperator::Mult, int(2, 3, 9), 3, 4);
        assert_eq!(
            lower_stmt(&mut ctx, &mult, false),
            Err(LowerError::UnsupportedOperator {
                class: OperatorClass::Augmented,
                op: "*=".to_string(),
                line: 3,
            })
        );

        let indexed = aug_assign(
            index(name("a", 4, 4), int(0, 4, 6), 4, 4),
            BinOperator::Add,
            int(1, 4, 12),
            4,
            4,
        );
        assert_eq!(
            lower_stmt(&mut ctx, &indexed, false),
            Err(LowerError::UnsupportedSlicingShape { line: 4 })
        );
    }

    #[test]
    fn test_for_loops() {
        let env = Environment::new();
        let mut ctx = LoweringContext::new(&env);
        let sequential = for_(
            name("i", 2, 8),
            call_name("range", vec![int(3, 2, 19)], 2, 13),
            vec![expr_stmt(call_name("print", vec![name("i", 3, 14)], 3, 8))],
            2,
            4,
        );
        assert_eq!(
            lower_stmt(&mut ctx, &sequential, false).unwrap(),
            "map$2$4(lambda$2$13(i$2$8, block((cout$3$8(i$3$14)))), range$2$13(3))"
        );

        let parallel = for_(
            name("i", 2, 8),
            call_name("prange", vec![int(3, 2, 20)], 2, 13),
            vec![expr_stmt(call_name("print", vec![name("i", 3, 14)], 3, 8))],
            2,
            4,
        );
        assert_eq!(
            lower_stmt(&mut ctx, &parallel, false).unwrap(),
            "parallel_map$2$4(lambda$2$13(i$2$8, block((cout$3$8(i$3$14)))), range$2$13(3))"
        );

        let over_name = for_(name("x", 2, 8), name("xs", 2, 13), vec![], 2, 4);
        assert_eq!(
            lower_stmt(&mut ctx, &over_name, false).unwrap(),
            "map$2$4(lambda$2$13(x$2$8, block()), xs$2$13)"
        );
    }

    #[test]
    fn test_expression_statement_arity() {
        let env = Environment::new();
        let mut ctx = LoweringContext::new(&env);
        let malformed = Stmt {
            kind: StmtKind::Expr {
                values: vec![name("a", 2, 4), name("b", 2, 7)],
            },
            pos: Position::new(2, 4),
        };
        assert_eq!(
            lower_stmt(&mut ctx, &malformed, false),
            Err(LowerError::MalformedExpressionArity { count: 2, line: 2 })
        );
    }

    #[test]
    fn test_unsupported_statements() {
        let nested = function_def(
            "outer",
            vec![],
            vec![function("inner", vec![], vec![ret(None, 3, 8)], 2, 4)],
            1,
            0,
        );
        assert_eq!(
            lower_fn(&nested),
            Err(LowerError::UnsupportedNodeKind {
                kind: "FunctionDef".to_string(),
                line: 2,
                column: 4,
            })
        );

        let pass = function_def("f", vec![], vec![unknown_stmt("pass_statement", 2, 4)], 1, 0);
        assert_eq!(
            lower_fn(&pass),
            Err(LowerError::UnsupportedNodeKind {
                kind: "pass_statement".to_string(),
                line: 2,
                column: 4,
            })
        );

        let mut looped = while_(name("c", 2, 10), vec![expr_stmt(name("c", 3, 8))], 2, 4);
        if let StmtKind::While { orelse, .. } = &mut looped.kind {
            orelse.push(expr_stmt(name("c", 5, 8)));
        }
        let env = Environment::new();
        let mut ctx = LoweringContext::new(&env);
        assert!(matches!(
            lower_stmt(&mut ctx, &looped, false),
            Err(LowerError::UnsupportedNodeKind { line: 2, .. })
        ));
    }

    #[test]
    fn test_module_lowers_first_statement() {
        let env = Environment::new();
        let mut ctx = LoweringContext::new(&env);
        assert_eq!(
            lower_module(&mut ctx, &module(vec![])),
            Err(LowerError::EmptyModule)
        );
        let tree = module(vec![function("f", vec![], vec![ret(Some(int(1, 2, 11)), 2, 4)], 1, 0)]);
        assert_eq!(lower_module(&mut ctx, &tree).unwrap(), "define$1$0(f$1$0, 1)");
    }
}
