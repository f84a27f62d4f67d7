//! Arithmetic expression trees and a reference evaluator
//!
//! Round-trip tests generate an expression, compile `return <expr>`, and
//! evaluate both the tree and the lowered IR text. Equal values mean the IR
//! kept the source grouping.

/// Operators covered by the round-trip tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `**`
    Pow,
}

impl Op {
    /// Every operator, in generator order
    pub const ALL: [Self; 6] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::Pow,
    ];

    /// Source text of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "**",
        }
    }

    fn strength(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div | Self::Mod => 2,
            Self::Pow => 4,
        }
    }

    /// Host-language result; `None` when undefined or not finite
    pub fn apply(self, lhs: f64, rhs: f64) -> Option<f64> {
        let value = match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div => lhs / rhs,
            Self::Mod => rhs.mul_add(-(lhs / rhs).floor(), lhs),
            Self::Pow => lhs.powf(rhs),
        };
        value.is_finite().then_some(value)
    }
}

/// An arithmetic expression over small integer literals
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arith {
    /// Integer literal
    Num(u8),
    /// Negation
    Neg(Box<Arith>),
    /// Binary operation
    Bin(Box<Arith>, Op, Box<Arith>),
}

impl Arith {
    /// Value of the tree, `None` if any step is undefined
    pub fn eval(&self) -> Option<f64> {
        match self {
            Self::Num(value) => Some(f64::from(*value)),
            Self::Neg(operand) => operand.eval().map(|value| -value),
            Self::Bin(lhs, op, rhs) => op.apply(lhs.eval()?, rhs.eval()?),
        }
    }

    /// Nesting depth of binary operations
    pub fn depth(&self) -> usize {
        match self {
            Self::Num(_) => 0,
            Self::Neg(operand) => operand.depth(),
            Self::Bin(lhs, _, rhs) => 1 + lhs.depth().max(rhs.depth()),
        }
    }

    /// Host-language source with only the parentheses the grouping needs
    ///
    /// Negations are always parenthesized.
    pub fn source(&self) -> String {
        let mut out = String::new();
        self.write_source(&mut out);
        out
    }

    fn write_source(&self, out: &mut String) {
        match self {
            Self::Num(value) => out.push_str(&value.to_string()),
            Self::Neg(operand) => {
                out.push_str("(-");
                if let Self::Num(value) = **operand {
                    out.push_str(&value.to_string());
                } else {
                    out.push('(');
                    operand.write_source(out);
                    out.push(')');
                }
                out.push(')');
            }
            Self::Bin(lhs, op, rhs) => {
                let wrap_lhs = matches!(**lhs, Self::Bin(_, inner, _)
                    if inner.strength() < op.strength() || *op == Op::Pow);
                let wrap_rhs = matches!(**rhs, Self::Bin(_, inner, _)
                    if inner.strength() < op.strength()
                        || (inner.strength() == op.strength() && *op != Op::Pow));
                write_operand(lhs, wrap_lhs, out);
                out.push(' ');
                out.push_str(op.symbol());
                out.push(' ');
                write_operand(rhs, wrap_rhs, out);
            }
        }
    }
}

fn write_operand(operand: &Arith, wrap: bool, out: &mut String) {
    if wrap {
        out.push('(');
        operand.write_source(out);
        out.push(')');
    } else {
        operand.write_source(out);
    }
}

/// Linear congruential generator for reproducible expression trees
#[derive(Debug, Clone)]
pub struct Lcg(u64);

impl Lcg {
    /// Generator starting from `seed`
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Next value below `bound`
    pub fn below(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) % bound
    }

    /// Random tree with at most `depth` levels of binary operations
    pub fn tree(&mut self, depth: usize) -> Arith {
        if depth == 0 || self.below(4) == 0 {
            let leaf = Arith::Num(self.below(9) as u8 + 1);
            return if self.below(6) == 0 {
                Arith::Neg(Box::new(leaf))
            } else {
                leaf
            };
        }
        let op = Op::ALL[self.below(Op::ALL.len() as u64) as usize];
        let node = Arith::Bin(
            Box::new(self.tree(depth - 1)),
            op,
            Box::new(self.tree(depth - 1)),
        );
        if self.below(8) == 0 {
            Arith::Neg(Box::new(node))
        } else {
            node
        }
    }
}

/// Failure to read an expression back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError(pub String);

/// Evaluate infix text with host-language precedence
///
/// ```text
/// expr   := term (("+" | "-") term)*
/// term   := factor (("*" | "/" | "%") factor)*
/// factor := "-" factor | power
/// power  := atom ["**" factor]
/// atom   := integer | "(" expr ")"
/// ```
///
/// # Errors
///
/// Returns [`SyntaxError`] if `text` is not in the grammar above
pub fn evaluate(text: &str) -> Result<Option<f64>, SyntaxError> {
    let tokens = tokenize(text)?;
    let mut reader = Reader { tokens, at: 0 };
    let value = reader.expr()?;
    match reader.peek() {
        None => Ok(value),
        Some(token) => Err(SyntaxError(format!("trailing `{token}`"))),
    }
}

fn tokenize(text: &str) -> Result<Vec<String>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            ' ' => {}
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                tokens.push("**".to_string());
            }
            '+' | '-' | '*' | '/' | '%' | '(' | ')' => tokens.push(ch.to_string()),
            digit if digit.is_ascii_digit() => {
                let mut number = digit.to_string();
                while let Some(next) = chars.next_if(char::is_ascii_digit) {
                    number.push(next);
                }
                tokens.push(number);
            }
            other => return Err(SyntaxError(format!("unexpected `{other}`"))),
        }
    }
    Ok(tokens)
}

struct Reader {
    tokens: Vec<String>,
    at: usize,
}

impl Reader {
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.at).map(String::as_str)
    }

    fn eat(&mut self, token: &str) -> bool {
        let found = self.peek() == Some(token);
        if found {
            self.at += 1;
        }
        found
    }

    fn expr(&mut self) -> Result<Option<f64>, SyntaxError> {
        let mut value = self.term()?;
        loop {
            let op = if self.eat("+") {
                Op::Add
            } else if self.eat("-") {
                Op::Sub
            } else {
                return Ok(value);
            };
            let rhs = self.term()?;
            value = combine(value, op, rhs);
        }
    }

    fn term(&mut self) -> Result<Option<f64>, SyntaxError> {
        let mut value = self.factor()?;
        loop {
            let op = if self.eat("*") {
                Op::Mul
            } else if self.eat("/") {
                Op::Div
            } else if self.eat("%") {
                Op::Mod
            } else {
                return Ok(value);
            };
            let rhs = self.factor()?;
            value = combine(value, op, rhs);
        }
    }

    fn factor(&mut self) -> Result<Option<f64>, SyntaxError> {
        if self.eat("-") {
            return Ok(self.factor()?.map(|value| -value));
        }
        let base = self.atom()?;
        if self.eat("**") {
            let exponent = self.factor()?;
            return Ok(combine(base, Op::Pow, exponent));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Option<f64>, SyntaxError> {
        if self.eat("(") {
            let value = self.expr()?;
            return if self.eat(")") {
                Ok(value)
            } else {
                Err(SyntaxError("unclosed `(`".to_string()))
            };
        }
        let token = self
            .peek()
            .ok_or_else(|| SyntaxError("unexpected end of input".to_string()))?;
        let number: u32 = token
            .parse()
            .map_err(|_| SyntaxError(format!("expected a number, found `{token}`")))?;
        self.at += 1;
        Ok(Some(f64::from(number)))
    }
}

fn combine(lhs: Option<f64>, op: Op, rhs: Option<f64>) -> Option<f64> {
    op.apply(lhs?, rhs?)
}
