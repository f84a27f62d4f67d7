//! tree-sitter CST -> `px-syntax` tree conversion
//!
//! Node kinds the tree model has no shape for are kept as `Unknown` with the
//! grammar's kind name; only source the model cannot hold at all (a syntax
//! error, a defaulted parameter, an oversized literal) is an error here.

use crate::{
    error::{ParseError, ParseResult},
    literal,
};
use px_span::Position;
use px_syntax::{
    BinOperator, CmpOperator, Constant, Dim, Expr, ExprKind, FunctionDef, Import, Index, Module,
    Number, Param, Slice, Stmt, StmtKind, UnaryOperator,
};
use tree_sitter::{Node, Point};

/// Converts nodes of one parsed source file
pub struct Converter<'src> {
    source: &'src str,
}

impl<'src> Converter<'src> {
    /// Converter over `source`
    pub fn new(source: &'src str) -> Self {
        Self { source }
    }

    fn text(&self, node: Node<'_>) -> &'src str {
        self.source.get(node.byte_range()).unwrap_or_default()
    }

    /// Convert the `module` root
    pub fn module(&self, root: Node<'_>) -> ParseResult<Module> {
        let mut module = Module::default();
        for child in named_children(root) {
            match child.kind() {
                "import_statement" => module.imports.extend(self.imports(child)),
                "import_from_statement" | "future_import_statement" => {}
                _ => module.body.push(self.stmt(child)?),
            }
        }
        tracing::debug!(
            statements = module.body.len(),
            imports = module.imports.len(),
            "converted module"
        );
        Ok(module)
    }

    fn imports(&self, node: Node<'_>) -> Vec<Import> {
        named_children(node)
            .into_iter()
            .filter_map(|child| match child.kind() {
                "dotted_name" => {
                    let root = self.text(child).split('.').next().unwrap_or_default();
                    Some(Import {
                        module: root.to_string(),
                        binding: root.to_string(),
                    })
                }
                "aliased_import" => {
                    let module = child.child_by_field_name("name")?;
                    let alias = child.child_by_field_name("alias")?;
                    Some(Import {
                        module: self.text(module).to_string(),
                        binding: self.text(alias).to_string(),
                    })
                }
                _ => None,
            })
            .collect()
    }

    fn stmt(&self, node: Node<'_>) -> ParseResult<Stmt> {
        let pos = position(node)?;
        let kind = match node.kind() {
            "function_definition" => StmtKind::FunctionDef(self.function(node)?),
            "decorated_definition" => {
                return match node.child_by_field_name("definition") {
                    Some(definition) => self.stmt(definition),
                    None => Err(malformed(node)),
                };
            }
            "expression_statement" => self.expression_statement(node)?,
            "return_statement" => StmtKind::Return {
                value: named_children(node)
                    .first()
                    .map(|value| self.expr(*value))
                    .transpose()?,
            },
            "if_statement" => StmtKind::If {
                test: self.expr(field(node, "condition")?)?,
                body: self.block(field(node, "consequence")?)?,
                orelse: self.else_chain(&children_by_field(node, "alternative"))?,
            },
            "while_statement" => StmtKind::While {
                test: self.expr(field(node, "condition")?)?,
                body: self.block(field(node, "body")?)?,
                orelse: self.else_clause(node)?,
            },
            "for_statement" => StmtKind::For {
                target: self.expr(field(node, "left")?)?,
                iter: self.expr(field(node, "right")?)?,
                body: self.block(field(node, "body")?)?,
                orelse: self.else_clause(node)?,
            },
            other => StmtKind::Unknown(other.to_string()),
        };
        Ok(Stmt { kind, pos })
    }

    fn function(&self, node: Node<'_>) -> ParseResult<FunctionDef> {
        Ok(FunctionDef {
            name: self.text(field(node, "name")?).to_string(),
            params: self.params(field(node, "parameters")?)?,
            body: self.block(field(node, "body")?)?,
            pos: position(node)?,
        })
    }

    fn params(&self, node: Node<'_>) -> ParseResult<Vec<Param>> {
        named_children(node)
            .into_iter()
            .map(|param| {
                let name = match param.kind() {
                    "identifier" => Some(param),
                    "typed_parameter" => named_children(param)
                        .into_iter()
                        .next()
                        .filter(|inner| inner.kind() == "identifier"),
                    _ => None,
                };
                let pos = position(param)?;
                name.map(|ident| Param {
                    name: self.text(ident).to_string(),
                    pos,
                })
                .ok_or_else(|| ParseError::UnsupportedParameter {
                    kind: param.kind().to_string(),
                    line: pos.line,
                    column: pos.column,
                })
            })
            .collect()
    }

    fn block(&self, node: Node<'_>) -> ParseResult<Vec<Stmt>> {
        named_children(node)
            .into_iter()
            .map(|stmt| self.stmt(stmt))
            .collect()
    }

    /// `elif` chains nest as a single `If` in the else branch
    fn else_chain(&self, alternatives: &[Node<'_>]) -> ParseResult<Vec<Stmt>> {
        let Some((first, rest)) = alternatives.split_first() else {
            return Ok(Vec::new());
        };
        if first.kind() == "elif_clause" {
            return Ok(vec![Stmt {
                kind: StmtKind::If {
                    test: self.expr(field(*first, "condition")?)?,
                    body: self.block(field(*first, "consequence")?)?,
                    orelse: self.else_chain(rest)?,
                },
                pos: position(*first)?,
            }]);
        }
        self.block(field(*first, "body")?)
    }

    fn else_clause(&self, node: Node<'_>) -> ParseResult<Vec<Stmt>> {
        node.child_by_field_name("alternative")
            .map_or_else(|| Ok(Vec::new()), |clause| self.block(field(clause, "body")?))
    }

    fn expression_statement(&self, node: Node<'_>) -> ParseResult<StmtKind> {
        let children = named_children(node);
        if let [single] = children.as_slice() {
            match single.kind() {
                "assignment" => return self.assignment(*single),
                "augmented_assignment" => return self.augmented_assignment(*single),
                _ => {}
            }
        }
        let mut values = children
            .iter()
            .map(|value| self.expr(*value))
            .collect::<ParseResult<Vec<_>>>()?;
        // `a, b` as a statement is a bare tuple display
        if let [first, _, ..] = values.as_slice() {
            let pos = first.pos;
            values = vec![Expr {
                kind: ExprKind::Tuple(values),
                pos,
            }];
        }
        Ok(StmtKind::Expr { values })
    }

    fn assignment(&self, node: Node<'_>) -> ParseResult<StmtKind> {
        let Some(value) = node.child_by_field_name("right") else {
            return Ok(StmtKind::Unknown("annotated_assignment".to_string()));
        };
        if value.kind() == "assignment" {
            return Ok(StmtKind::Unknown("chained_assignment".to_string()));
        }
        Ok(StmtKind::Assign {
            target: self.expr(field(node, "left")?)?,
            value: self.expr(value)?,
        })
    }

    fn augmented_assignment(&self, node: Node<'_>) -> ParseResult<StmtKind> {
        let operator = self.text(field(node, "operator")?);
        let Some(op) = operator.strip_suffix('=').and_then(binary_operator) else {
            return Ok(StmtKind::Unknown(format!("augmented_assignment `{operator}`")));
        };
        Ok(StmtKind::AugAssign {
            target: self.expr(field(node, "left")?)?,
            op,
            value: self.expr(field(node, "right")?)?,
        })
    }

    #[allow(clippy::too_many_lines, reason = "one arm per expression kind of the grammar")]
    fn expr(&self, node: Node<'_>) -> ParseResult<Expr> {
        let pos = position(node)?;
        let kind = match node.kind() {
            "identifier" => ExprKind::Name(self.text(node).to_string()),
            "integer" => self.integer(node)?,
            "float" => self.float(node)?,
            "string" => self.string(node),
            "concatenated_string" => self.concatenated_string(node),
            "true" => ExprKind::Constant(Constant::True),
            "false" => ExprKind::Constant(Constant::False),
            "none" => ExprKind::Constant(Constant::None),
            "binary_operator" => {
                let operator = self.text(field(node, "operator")?);
                match binary_operator(operator) {
                    Some(op) => ExprKind::BinOp {
                        left: Box::new(self.expr(field(node, "left")?)?),
                        op,
                        right: Box::new(self.expr(field(node, "right")?)?),
                    },
                    None => ExprKind::Unknown(format!("binary_operator `{operator}`")),
                }
            }
            "unary_operator" => {
                let op = match self.text(field(node, "operator")?) {
                    "-" => UnaryOperator::USub,
                    "+" => UnaryOperator::UAdd,
                    _ => UnaryOperator::Invert,
                };
                ExprKind::UnaryOp {
                    op,
                    operand: Box::new(self.expr(field(node, "argument")?)?),
                }
            }
            "not_operator" => ExprKind::UnaryOp {
                op: UnaryOperator::Not,
                operand: Box::new(self.expr(field(node, "argument")?)?),
            },
            "comparison_operator" => self.comparison(node)?,
            "call" => {
                let arguments = field(node, "arguments")?;
                let args = if arguments.kind() == "argument_list" {
                    named_children(arguments)
                        .into_iter()
                        .map(|arg| self.expr(arg))
                        .collect::<ParseResult<_>>()?
                } else {
                    vec![self.expr(arguments)?]
                };
                ExprKind::Call {
                    func: Box::new(self.expr(field(node, "function")?)?),
                    args,
                }
            }
            "attribute" => ExprKind::Attribute {
                value: Box::new(self.expr(field(node, "object")?)?),
                attr: self.text(field(node, "attribute")?).to_string(),
            },
            "subscript" => ExprKind::Subscript {
                value: Box::new(self.expr(field(node, "value")?)?),
                index: Box::new(self.index(node)?),
            },
            "list" | "list_pattern" => ExprKind::List(self.elements(node)?),
            "tuple" | "tuple_pattern" | "expression_list" | "pattern_list" => {
                ExprKind::Tuple(self.elements(node)?)
            }
            "parenthesized_expression" => {
                return match named_children(node).first() {
                    Some(inner) => self.expr(*inner),
                    None => Err(malformed(node)),
                };
            }
            "lambda" => ExprKind::Lambda {
                params: match node.child_by_field_name("parameters") {
                    Some(params) => self.params(params)?,
                    None => Vec::new(),
                },
                body: Box::new(self.expr(field(node, "body")?)?),
            },
            other => ExprKind::Unknown(other.to_string()),
        };
        Ok(Expr { kind, pos })
    }

    fn elements(&self, node: Node<'_>) -> ParseResult<Vec<Expr>> {
        named_children(node)
            .into_iter()
            .map(|element| self.expr(element))
            .collect()
    }

    fn integer(&self, node: Node<'_>) -> ParseResult<ExprKind> {
        let text = self.text(node);
        if literal::is_imaginary(text) {
            return Ok(ExprKind::Unknown("complex".to_string()));
        }
        literal::integer(text)
            .map(|value| ExprKind::Number(Number::Int(value)))
            .ok_or_else(|| invalid_literal(node, text))
    }

    fn float(&self, node: Node<'_>) -> ParseResult<ExprKind> {
        let text = self.text(node);
        if literal::is_imaginary(text) {
            return Ok(ExprKind::Unknown("complex".to_string()));
        }
        literal::float(text)
            .map(|value| ExprKind::Number(Number::Float(value)))
            .ok_or_else(|| invalid_literal(node, text))
    }

    /// Contents of a plain or raw string; f-strings and bytes stay unknown
    fn string(&self, node: Node<'_>) -> ExprKind {
        let text = self.text(node);
        let quote_at = text.find(['"', '\'']).unwrap_or_default();
        let prefix = text.get(..quote_at).unwrap_or_default().to_ascii_lowercase();
        if prefix.contains('f') {
            return ExprKind::Unknown("f-string".to_string());
        }
        if prefix.contains('b') {
            return ExprKind::Unknown("bytes".to_string());
        }
        let quoted = text.get(quote_at..).unwrap_or_default();
        let quote = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") {
            quoted.get(..3).unwrap_or_default()
        } else {
            quoted.get(..1).unwrap_or_default()
        };
        let body = quoted
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
            .unwrap_or_default();
        if prefix.contains('r') {
            ExprKind::Str(body.to_string())
        } else {
            ExprKind::Str(literal::unescape(body))
        }
    }

    fn concatenated_string(&self, node: Node<'_>) -> ExprKind {
        let mut joined = String::new();
        for part in named_children(node) {
            match self.string(part) {
                ExprKind::Str(value) => joined.push_str(&value),
                other => return other,
            }
        }
        ExprKind::Str(joined)
    }

    fn comparison(&self, node: Node<'_>) -> ParseResult<ExprKind> {
        let mut operands = Vec::new();
        let mut ops = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.is_extra() {
                continue;
            }
            if child.is_named() {
                operands.push(self.expr(child)?);
                continue;
            }
            let Some(op) = comparison_operator(child.kind()) else {
                return Ok(ExprKind::Unknown(format!("comparison_operator `{}`", child.kind())));
            };
            ops.push(op);
        }
        if operands.is_empty() {
            return Err(malformed(node));
        }
        let left = operands.remove(0);
        Ok(ExprKind::Compare {
            left: Box::new(left),
            ops,
            comparators: operands,
        })
    }

    /// `a[i]`, `a[i, j]`, `a[lo:hi]` or a multi-dimension index with a slice
    fn index(&self, node: Node<'_>) -> ParseResult<Index> {
        let parts = children_by_field(node, "subscript");
        match parts.as_slice() {
            [] => Err(malformed(node)),
            [single] if single.kind() == "slice" => Ok(Index::Slice(self.slice(*single)?)),
            [single] => Ok(Index::Index(self.expr(*single)?)),
            _ if parts.iter().any(|part| part.kind() == "slice") => parts
                .iter()
                .map(|part| {
                    if part.kind() == "slice" {
                        self.slice(*part).map(Dim::Slice)
                    } else {
                        self.expr(*part).map(Dim::Index)
                    }
                })
                .collect::<ParseResult<_>>()
                .map(Index::ExtSlice),
            [first, ..] => Ok(Index::Index(Expr {
                kind: ExprKind::Tuple(
                    parts
                        .iter()
                        .map(|part| self.expr(*part))
                        .collect::<ParseResult<_>>()?,
                ),
                pos: position(*first)?,
            })),
        }
    }

    /// Bounds are assigned by counting the `:` separators seen so far
    fn slice(&self, node: Node<'_>) -> ParseResult<Slice> {
        let mut bounds: [Option<Expr>; 3] = [None, None, None];
        let mut slot = 0usize;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.is_extra() {
                continue;
            }
            if child.kind() == ":" {
                slot += 1;
                continue;
            }
            if let Some(bound) = bounds.get_mut(slot) {
                *bound = Some(self.expr(child)?);
            }
        }
        let [lower, upper, step] = bounds;
        Ok(Slice {
            lower,
            upper,
            step,
            pos: position(node)?,
        })
    }
}

fn binary_operator(text: &str) -> Option<BinOperator> {
    Some(match text {
        "+" => BinOperator::Add,
        "-" => BinOperator::Sub,
        "*" => BinOperator::Mult,
        "/" => BinOperator::Div,
        "%" => BinOperator::Mod,
        "**" => BinOperator::Pow,
        "//" => BinOperator::FloorDiv,
        "@" => BinOperator::MatMult,
        "<<" => BinOperator::LShift,
        ">>" => BinOperator::RShift,
        "|" => BinOperator::BitOr,
        "^" => BinOperator::BitXor,
        "&" => BinOperator::BitAnd,
        _ => return None,
    })
}

fn comparison_operator(kind: &str) -> Option<CmpOperator> {
    Some(match kind {
        "<" => CmpOperator::Lt,
        ">" => CmpOperator::Gt,
        "<=" => CmpOperator::LtE,
        ">=" => CmpOperator::GtE,
        "==" => CmpOperator::Eq,
        "!=" | "<>" => CmpOperator::NotEq,
        "is" => CmpOperator::Is,
        "is not" => CmpOperator::IsNot,
        "in" => CmpOperator::In,
        "not in" => CmpOperator::NotIn,
        _ => return None,
    })
}

/// 1-based line, 0-based byte column
///
/// # Errors
///
/// Returns [`ParseError::PositionOverflow`] for a row or column past `u32`
pub fn position(node: Node<'_>) -> ParseResult<Position> {
    point_position(node.start_position())
}

fn point_position(point: Point) -> ParseResult<Position> {
    let overflow = || ParseError::PositionOverflow {
        row: point.row,
        column: point.column,
    };
    let line = u32::try_from(point.row)
        .ok()
        .and_then(|row| row.checked_add(1))
        .ok_or_else(overflow)?;
    let column = u32::try_from(point.column).map_err(|_| overflow())?;
    Ok(Position::new(line, column))
}

fn named_children<'tree>(node: Node<'tree>) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

fn children_by_field<'tree>(node: Node<'tree>, name: &str) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    node.children_by_field_name(name, &mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

fn field<'tree>(node: Node<'tree>, name: &str) -> ParseResult<Node<'tree>> {
    node.child_by_field_name(name)
        .ok_or_else(|| malformed(node))
}

fn malformed(node: Node<'_>) -> ParseError {
    match position(node) {
        Ok(pos) => ParseError::Malformed {
            kind: node.kind().to_string(),
            line: pos.line,
            column: pos.column,
        },
        Err(error) => error,
    }
}

fn invalid_literal(node: Node<'_>, text: &str) -> ParseError {
    match position(node) {
        Ok(pos) => ParseError::InvalidLiteral {
            literal: text.to_string(),
            line: pos.line,
        },
        Err(error) => error,
    }
}
