//! UPDATE SQL generation.

use crate::ast::{ConditionChain, Value};
use crate::error::{FieldqlError, FieldqlResult, MappingError};
use crate::mapping::{FieldRef, TableDefinition};
use crate::transpiler::dialect::Dialect;
use crate::transpiler::dml::{check_fields, render_primary_key_where, render_where, value_of};
use crate::transpiler::render::{bind_column_value, RenderContext};
use crate::transpiler::statement::{CompiledStatement, Statement};

/// `UPDATE table SET ... [WHERE ...]`
///
/// SET values are bound before the WHERE parameters.
pub fn build_update(
    table: &TableDefinition,
    assignments: &[(FieldRef, Value)],
    chain: &ConditionChain,
    dialect: Dialect,
) -> FieldqlResult<CompiledStatement> {
    if assignments.is_empty() {
        return Err(FieldqlError::Config(format!(
            "update on '{}' has no SET assignments",
            table.name
        )));
    }

    let ctx = RenderContext::new(table);
    let mut stmt = Statement::new(dialect);
    stmt.append_text("UPDATE ").append_identifier(&table.name).append_text(" SET ");
    for (i, (field, value)) in assignments.iter().enumerate() {
        if i > 0 {
            stmt.append_text(", ");
        }
        let column = ctx.resolve(field)?;
        stmt.append_identifier(&column.column).append_text(" = ");
        bind_column_value(&mut stmt, column, value)?;
    }
    render_where(&mut stmt, &ctx, chain)?;
    Ok(stmt.finish())
}

/// Update every non-key column of one model row, matched by primary key.
pub fn build_update_model(
    table: &TableDefinition,
    values: &[(&str, Value)],
    dialect: Dialect,
) -> FieldqlResult<CompiledStatement> {
    check_fields(table, values)?;
    if table.primary_key().is_empty() {
        return Err(MappingError::NoPrimaryKey(table.name.clone()).into());
    }

    let mut stmt = Statement::new(dialect);
    stmt.append_text("UPDATE ").append_identifier(&table.name).append_text(" SET ");
    let mut first = true;
    for column in table.columns.iter().filter(|c| !c.primary_key) {
        let Some(value) = value_of(table, values, column).ok() else {
            continue;
        };
        if !first {
            stmt.append_text(", ");
        }
        first = false;
        stmt.append_identifier(&column.column).append_text(" = ");
        bind_column_value(&mut stmt, column, value)?;
    }
    if first {
        return Err(FieldqlError::InvalidValue(format!(
            "nothing to update in '{}'",
            table.name
        )));
    }
    render_primary_key_where(&mut stmt, table, values)?;
    Ok(stmt.finish())
}
