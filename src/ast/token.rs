use serde::{Deserialize, Serialize};

use crate::ast::{Comparator, LogicalOp, Value};
use crate::mapping::FieldRef;

/// A node of a composable SQL expression.
///
/// Tokens are immutable once built. Rendering lives in
/// [`crate::transpiler::render`] and dispatches on the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    /// A model field, rendered as its mapped column.
    Field(FieldRef),
    /// A literal, rendered as a bound parameter.
    Literal(Value),
    /// `left <op> right`; `right` is absent for unary comparators.
    Comparison {
        left: Box<Token>,
        op: Comparator,
        right: Option<Box<Token>>,
    },
    /// Operands joined by one connective, parenthesized.
    Combinator { op: LogicalOp, operands: Vec<Token> },
}

impl Token {
    pub fn field(field: FieldRef) -> Self {
        Token::Field(field)
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Token::Literal(value.into())
    }

    pub fn compare(left: Token, op: Comparator, right: Token) -> Self {
        Token::Comparison {
            left: Box::new(left),
            op,
            right: Some(Box::new(right)),
        }
    }

    pub fn unary(left: Token, op: Comparator) -> Self {
        Token::Comparison {
            left: Box::new(left),
            op,
            right: None,
        }
    }

    /// The equality node behind `is_true()` / `is_false()`.
    pub fn true_false(field: FieldRef, y: bool) -> Self {
        Token::compare(Token::Field(field), Comparator::Equal, Token::Literal(Value::Bool(y)))
    }

    /// All operands must hold.
    pub fn all(operands: impl IntoIterator<Item = Token>) -> Self {
        Token::Combinator {
            op: LogicalOp::And,
            operands: operands.into_iter().collect(),
        }
    }

    /// At least one operand must hold.
    pub fn any(operands: impl IntoIterator<Item = Token>) -> Self {
        Token::Combinator {
            op: LogicalOp::Or,
            operands: operands.into_iter().collect(),
        }
    }

    /// Every field descriptor referenced anywhere in this token.
    pub fn fields(&self) -> Vec<&FieldRef> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a FieldRef>) {
        match self {
            Token::Field(field) => out.push(field),
            Token::Literal(_) => {}
            Token::Comparison { left, right, .. } => {
                left.collect_fields(out);
                if let Some(right) = right {
                    right.collect_fields(out);
                }
            }
            Token::Combinator { operands, .. } => {
                for operand in operands {
                    operand.collect_fields(out);
                }
            }
        }
    }
}

impl From<FieldRef> for Token {
    fn from(field: FieldRef) -> Self {
        Token::Field(field)
    }
}

impl From<Value> for Token {
    fn from(value: Value) -> Self {
        Token::Literal(value)
    }
}
