//! Qualified reference resolution
//!
//! `object.member(args)` lowers to one call. The head is the member's
//! primitive from the reference table (or the member text when it has none),
//! tagged with the attribute's position. What the object contributes depends
//! on what it is:
//!
//! | object                               | contributes                  |
//! |--------------------------------------|------------------------------|
//! | attribute chain, member in the table | nothing                      |
//! | attribute chain, member not in table | `UnresolvableReference`      |
//! | locally bound name                   | the name, as first argument  |
//! | module binding exposing `member`     | nothing                      |
//! | any other name                       | `UnresolvableReference`      |
//! | any other expression                 | its lowering, first argument |

use crate::{
    dispatch::LoweringContext,
    emit,
    error::{LowerError, LowerResult},
    expr::{lower_all, lower_expr},
};
use px_span::Position;
use px_syntax::{Expr, ExprKind};

/// Resolved head of a qualified call
#[derive(Debug, Clone, PartialEq, Eq)]
struct Callee {
    head: String,
    receiver: Option<String>,
}

/// Lower `object.member(args)`; an attribute read passes no `args`
pub fn lower_attribute_call(
    ctx: &mut LoweringContext<'_>,
    object: &Expr,
    member: &str,
    pos: Position,
    args: &[Expr],
) -> LowerResult<String> {
    let callee = resolve(ctx, object, member, pos)?;
    let mut parts = Vec::with_capacity(args.len() + 1);
    parts.extend(callee.receiver);
    parts.extend(lower_all(ctx, args)?);
    Ok(emit::call(&callee.head, parts))
}

fn resolve(
    ctx: &mut LoweringContext<'_>,
    object: &Expr,
    member: &str,
    pos: Position,
) -> LowerResult<Callee> {
    let env = ctx.env();
    let primitive = env.references.resolve(member);
    let head = pos.tag(primitive.unwrap_or(member));
    tracing::trace!(member, primitive, line = pos.line, "resolving qualified reference");

    let unresolvable = || LowerError::UnresolvableReference {
        object: dotted(object),
        member: member.to_string(),
        line: pos.line,
    };

    match &object.kind {
        ExprKind::Attribute { .. } => {
            if primitive.is_none() {
                return Err(unresolvable());
            }
            Ok(Callee {
                head,
                receiver: None,
            })
        }
        ExprKind::Name(id) if ctx.scope().is_bound(id) => Ok(Callee {
            head,
            receiver: Some(object.pos.tag(id)),
        }),
        ExprKind::Name(id) if env.modules.exposes(id, member) => Ok(Callee {
            head,
            receiver: None,
        }),
        ExprKind::Name(_) => Err(unresolvable()),
        _ => Ok(Callee {
            head,
            receiver: Some(lower_expr(ctx, object)?),
        }),
    }
}

/// Source-like text of an attribute object, for diagnostics
fn dotted(object: &Expr) -> String {
    match &object.kind {
        ExprKind::Name(id) => id.clone(),
        ExprKind::Attribute { value, attr } => format!("{}.{attr}", dotted(value)),
        other => other.name().to_string(),
    }
}
