//! INSERT SQL generation.

use crate::ast::Value;
use crate::error::{FieldqlError, FieldqlResult};
use crate::mapping::TableDefinition;
use crate::transpiler::dialect::Dialect;
use crate::transpiler::dml::check_fields;
use crate::transpiler::render::bind_column_value;
use crate::transpiler::statement::{CompiledStatement, Statement};

/// Insert one row. Columns follow the table's declaration order; fields
/// missing from `values` are left to the column default.
pub fn build_insert(
    table: &TableDefinition,
    values: &[(&str, Value)],
    dialect: Dialect,
) -> FieldqlResult<CompiledStatement> {
    check_fields(table, values)?;

    let present: Vec<_> = table
        .columns
        .iter()
        .filter_map(|column| {
            values
                .iter()
                .find(|(field, _)| *field == column.field)
                .map(|(_, value)| (column, value))
        })
        .collect();
    if present.is_empty() {
        return Err(FieldqlError::InvalidValue(format!(
            "nothing to insert into '{}'",
            table.name
        )));
    }

    let mut stmt = Statement::new(dialect);
    stmt.append_text("INSERT INTO ").append_identifier(&table.name).append_text(" (");
    for (i, (column, _)) in present.iter().enumerate() {
        if i > 0 {
            stmt.append_text(", ");
        }
        stmt.append_identifier(&column.column);
    }
    stmt.append_text(") VALUES (");
    for (i, (column, value)) in present.iter().enumerate() {
        if i > 0 {
            stmt.append_text(", ");
        }
        bind_column_value(&mut stmt, column, value)?;
    }
    stmt.append_text(")");
    Ok(stmt.finish())
}
