//! Statement builders for SELECT, INSERT, UPDATE and DELETE.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

pub use delete::{build_delete, build_delete_model};
pub use insert::build_insert;
pub use select::{build_select, build_select_count, SelectOptions};
pub use update::{build_update, build_update_model};

use crate::ast::{ConditionChain, Value};
use crate::error::{FieldqlResult, MappingError};
use crate::mapping::{ColumnDef, TableDefinition};
use crate::transpiler::render::{bind_column_value, render_token, RenderContext};
use crate::transpiler::statement::Statement;

/// Append ` WHERE ...` for a non-empty chain.
pub fn render_where(
    stmt: &mut Statement,
    ctx: &RenderContext<'_>,
    chain: &ConditionChain,
) -> FieldqlResult<()> {
    for (i, link) in chain.links().iter().enumerate() {
        if i == 0 {
            stmt.append_text(" WHERE ");
        } else {
            stmt.append_text(" ").append_text(link.connective.keyword()).append_text(" ");
        }
        render_token(stmt, ctx, &link.token)?;
    }
    Ok(())
}

/// Append ` WHERE pk1 = ? AND pk2 = ?` for the primary key of a model row.
pub(crate) fn render_primary_key_where(
    stmt: &mut Statement,
    table: &TableDefinition,
    values: &[(&str, Value)],
) -> FieldqlResult<()> {
    let keys = table.primary_key();
    if keys.is_empty() {
        return Err(MappingError::NoPrimaryKey(table.name.clone()).into());
    }
    for (i, key) in keys.iter().enumerate() {
        stmt.append_text(if i == 0 { " WHERE " } else { " AND " });
        stmt.append_identifier(&key.column).append_text(" = ");
        bind_column_value(stmt, key, value_of(table, values, key)?)?;
    }
    Ok(())
}

/// Value supplied for `column`, or an error naming the missing field.
pub(crate) fn value_of<'v>(
    table: &TableDefinition,
    values: &'v [(&str, Value)],
    column: &ColumnDef,
) -> FieldqlResult<&'v Value> {
    values
        .iter()
        .find(|(field, _)| *field == column.field)
        .map(|(_, value)| value)
        .ok_or_else(|| {
            crate::error::FieldqlError::InvalidValue(format!(
                "no value for field '{}' of table '{}'",
                column.field, table.name
            ))
        })
}

/// Reject values for fields the table does not declare.
pub(crate) fn check_fields(table: &TableDefinition, values: &[(&str, Value)]) -> FieldqlResult<()> {
    for (field, _) in values {
        if table.column_for(field).is_none() {
            return Err(MappingError::UnmappedField {
                table: table.name.clone(),
                field: field.to_string(),
            }
            .into());
        }
    }
    Ok(())
}
