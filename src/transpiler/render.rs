//! Token rendering and the value renderer.
//!
//! Rendering never mutates a token; the only side effect is appending to the
//! given [`Statement`]. Left operands are always rendered before right
//! operands so parameters come out in text order.

use crate::ast::{LogicalOp, Token, Value};
use crate::error::{FieldqlResult, MappingError};
use crate::mapping::{ColumnDef, FieldRef, TableDefinition};
use crate::transpiler::statement::Statement;

/// Mapping context a token is rendered against.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    table: &'a TableDefinition,
}

impl<'a> RenderContext<'a> {
    pub fn new(table: &'a TableDefinition) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a TableDefinition {
        self.table
    }

    pub fn resolve(&self, field: &FieldRef) -> Result<&'a ColumnDef, MappingError> {
        self.table.resolve(field)
    }

    /// Check that every field referenced by `token` resolves.
    pub fn validate(&self, token: &Token) -> Result<(), MappingError> {
        for field in token.fields() {
            self.resolve(field)?;
        }
        Ok(())
    }
}

/// Append `token` to the statement.
pub fn render_token(stmt: &mut Statement, ctx: &RenderContext<'_>, token: &Token) -> FieldqlResult<()> {
    match token {
        Token::Field(field) => {
            let column = ctx.resolve(field)?;
            stmt.append_identifier(&column.column);
        }
        Token::Literal(value) => {
            stmt.append_parameter(value.clone());
        }
        Token::Comparison { left, op, right } => {
            render_token(stmt, ctx, left)?;
            stmt.append_text(" ").append_text(op.sql_symbol());
            if let (Some(right), false) = (right, op.is_unary()) {
                stmt.append_text(" ");
                render_operand(stmt, ctx, left, right)?;
            }
        }
        Token::Combinator { op, operands } => match operands.as_slice() {
            [] => {
                stmt.append_text(match op {
                    LogicalOp::And => "1 = 1",
                    LogicalOp::Or => "1 = 0",
                });
            }
            [single] => render_token(stmt, ctx, single)?,
            many => {
                stmt.append_text("(");
                for (i, operand) in many.iter().enumerate() {
                    if i > 0 {
                        stmt.append_text(" ").append_text(op.keyword()).append_text(" ");
                    }
                    render_token(stmt, ctx, operand)?;
                }
                stmt.append_text(")");
            }
        },
    }
    Ok(())
}

/// Render the right side of a comparison in the context of its left side.
///
/// Literals compared against a mapped field go through the field's coercion
/// rule before binding. Any other right operand is rendered as a token.
pub fn render_operand(
    stmt: &mut Statement,
    ctx: &RenderContext<'_>,
    left: &Token,
    right: &Token,
) -> FieldqlResult<()> {
    match (left, right) {
        (Token::Field(field), Token::Literal(value)) => {
            let column = ctx.resolve(field)?;
            bind_column_value(stmt, column, value)
        }
        (_, Token::Literal(value)) => {
            stmt.append_parameter(value.clone());
            Ok(())
        }
        (_, token) => render_token(stmt, ctx, token),
    }
}

/// Bind a value destined for `column`, applying its coercion rule.
pub fn bind_column_value(stmt: &mut Statement, column: &ColumnDef, value: &Value) -> FieldqlResult<()> {
    let bound = column.bind_value(value)?;
    stmt.append_parameter(bound);
    Ok(())
}
