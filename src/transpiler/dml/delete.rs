//! DELETE SQL generation.

use crate::ast::{ConditionChain, Value};
use crate::error::FieldqlResult;
use crate::mapping::TableDefinition;
use crate::transpiler::dialect::Dialect;
use crate::transpiler::dml::{check_fields, render_primary_key_where, render_where};
use crate::transpiler::render::RenderContext;
use crate::transpiler::statement::{CompiledStatement, Statement};

/// `DELETE FROM table [WHERE ...]`
pub fn build_delete(
    table: &TableDefinition,
    chain: &ConditionChain,
    dialect: Dialect,
) -> FieldqlResult<CompiledStatement> {
    let ctx = RenderContext::new(table);
    let mut stmt = Statement::new(dialect);
    stmt.append_text("DELETE FROM ").append_identifier(&table.name);
    render_where(&mut stmt, &ctx, chain)?;
    Ok(stmt.finish())
}

/// Delete one model row, matched by primary key.
pub fn build_delete_model(
    table: &TableDefinition,
    values: &[(&str, Value)],
    dialect: Dialect,
) -> FieldqlResult<CompiledStatement> {
    check_fields(table, values)?;
    let mut stmt = Statement::new(dialect);
    stmt.append_text("DELETE FROM ").append_identifier(&table.name);
    render_primary_key_where(&mut stmt, table, values)?;
    Ok(stmt.finish())
}
