//! SELECT SQL generation.

use crate::ast::{ConditionChain, SortOrder};
use crate::error::FieldqlResult;
use crate::mapping::{FieldRef, TableDefinition};
use crate::transpiler::dialect::Dialect;
use crate::transpiler::dml::render_where;
use crate::transpiler::render::RenderContext;
use crate::transpiler::statement::{CompiledStatement, Statement};

/// ORDER BY / LIMIT / OFFSET of a row select.
#[derive(Debug, Clone, Default)]
pub struct SelectOptions {
    pub order_by: Vec<(FieldRef, SortOrder)>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// `SELECT COUNT(*) FROM table [WHERE ...]`
pub fn build_select_count(
    table: &TableDefinition,
    chain: &ConditionChain,
    dialect: Dialect,
) -> FieldqlResult<CompiledStatement> {
    let ctx = RenderContext::new(table);
    let mut stmt = Statement::new(dialect);
    stmt.append_text("SELECT COUNT(*) FROM ").append_identifier(&table.name);
    render_where(&mut stmt, &ctx, chain)?;
    Ok(stmt.finish())
}

/// Select every mapped column of the table.
pub fn build_select(
    table: &TableDefinition,
    chain: &ConditionChain,
    options: &SelectOptions,
    dialect: Dialect,
) -> FieldqlResult<CompiledStatement> {
    let ctx = RenderContext::new(table);
    let mut stmt = Statement::new(dialect);

    stmt.append_text("SELECT ");
    if table.columns.is_empty() {
        stmt.append_text("*");
    }
    for (i, column) in table.columns.iter().enumerate() {
        if i > 0 {
            stmt.append_text(", ");
        }
        stmt.append_text(&dialect.select_column(&column.column, column.sql_type));
    }
    stmt.append_text(" FROM ").append_identifier(&table.name);

    render_where(&mut stmt, &ctx, chain)?;

    for (i, (field, order)) in options.order_by.iter().enumerate() {
        stmt.append_text(if i == 0 { " ORDER BY " } else { ", " });
        stmt.append_identifier(&ctx.resolve(field)?.column)
            .append_text(" ")
            .append_text(order.keyword());
    }

    stmt.append_text(&dialect.limit_offset(options.limit, options.offset));
    Ok(stmt.finish())
}
