//! IR source grammar and the helpers that produce it
//!
//! All lowering goes through these functions, so this module is the single
//! place the textual shape of the IR is decided:
//!
//! ```text
//! program  := call
//! expr     := call | infix | prefix | group | atom
//! call     := symbol "(" [ expr { "," expr } ] ")"
//! infix    := "(" expr binop expr ")" | expr binop expr
//! prefix   := ( "-" | "!" ) ( "(" expr ")" | expr )
//! group    := "(" expr ")"
//! atom     := symbol | number | string
//! symbol   := ident [ tag ]
//! tag      := "$" line "$" column
//! ```
//!
//! Whitespace is insignificant to the engine; argument lists are joined with
//! `", "` and infix operators are surrounded by single spaces.

use px_syntax::Number;

/// Introduce a binding
pub const DEFINE: &str = "define";
/// Mutate a binding
pub const STORE: &str = "store";
/// Statement sequence
pub const BLOCK: &str = "block";
/// Conditional
pub const IF: &str = "if";
/// While loop
pub const WHILE: &str = "while";
/// Sequential iteration
pub const MAP: &str = "map";
/// Parallel iteration
pub const PARALLEL_MAP: &str = "parallel_map";
/// Anonymous function
pub const LAMBDA: &str = "lambda";
/// Subscript read
pub const SLICE: &str = "slice";
/// Strided subscript write
pub const SET: &str = "set";
/// List construction
pub const MAKE_LIST: &str = "make_list";
/// Output primitive that `print` becomes
pub const OUTPUT: &str = "cout";
/// Range primitive that the parallel-range marker becomes
pub const RANGE: &str = "range";

/// Absent upper bound / `None`
pub const NIL: &str = "nil";
/// `True`
pub const TRUE: &str = "true";
/// `False`
pub const FALSE: &str = "false";

/// `head(arg, arg, ...)`
pub fn call<I, S>(head: &str, args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::with_capacity(head.len() + 2);
    out.push_str(head);
    out.push('(');
    out.push_str(&join(args));
    out.push(')');
    out
}

/// Comma-join already lowered fragments
pub fn join<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (idx, item) in items.into_iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        out.push_str(item.as_ref());
    }
    out
}

/// `lhs op rhs`, parenthesized when `grouped`
pub fn infix(lhs: &str, op: &str, rhs: &str, grouped: bool) -> String {
    if grouped {
        format!("({lhs} {op} {rhs})")
    } else {
        format!("{lhs} {op} {rhs}")
    }
}

/// `op(operand)` or `op operand`
pub fn prefix(op: &str, operand: &str, grouped: bool) -> String {
    if grouped {
        format!("{op}({operand})")
    } else {
        format!("{op}{operand}")
    }
}

/// `(expr)`
pub fn group(expr: &str) -> String {
    format!("({expr})")
}

/// Double-quoted string token
pub fn string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// Numeric token; floats always keep a decimal point or exponent
pub fn number(value: Number) -> String {
    match value {
        Number::Int(int) => int.to_string(),
        Number::Float(float) => format!("{float:?}"),
    }
}
