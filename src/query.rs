//! Fluent query construction.
//!
//! A [`Query`] is bound to one mapped table. `where_`, `and` and `or` resolve
//! a field descriptor and hand back a [`ConditionBuilder`]; the comparison
//! called on it appends one condition to the chain and returns the query.
//!
//! ```
//! use fieldql::prelude::*;
//! use fieldql::engine::DryRun;
//!
//! const FLAG: FieldRef = FieldRef::new("t_flags", "flag");
//! const COUNT: FieldRef = FieldRef::new("t_flags", "count");
//!
//! let table = TableDefinition::new("t_flags")
//!     .column(ColumnDef::int_flag("flag", "flag"))
//!     .column(ColumnDef::integer("count", "count"));
//!
//! let dry = DryRun::new(Dialect::Postgres);
//! let stmt = Query::<Row, _>::new(&dry, table.into())
//!     .where_(&FLAG)?.is_true()
//!     .and(&COUNT)?.exceeds(3)
//!     .select_count_statement()?;
//!
//! assert_eq!(stmt.sql, "SELECT COUNT(*) FROM t_flags WHERE flag = $1 AND count > $2");
//! assert_eq!(stmt.params, vec![Value::Int(1), Value::Int(3)]);
//! # Ok::<(), FieldqlError>(())
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use crate::ast::{Comparator, ConditionChain, LogicalOp, SortOrder, Token, Value};
use crate::engine::Executor;
use crate::error::FieldqlResult;
use crate::mapping::{FieldRef, FromRow, Row, TableDefinition};
use crate::parser::{self, Predicate};
use crate::transpiler::dml::{self, SelectOptions};
use crate::transpiler::{CompiledStatement, Dialect, RenderContext};

/// A query over one table, yielding rows of type `R`.
pub struct Query<'a, R, E> {
    executor: &'a E,
    table: Arc<TableDefinition>,
    dialect: Dialect,
    conditions: ConditionChain,
    assignments: Vec<(FieldRef, Value)>,
    options: SelectOptions,
    _row: PhantomData<fn() -> R>,
}

impl<'a, R, E: Executor> Query<'a, R, E> {
    pub fn new(executor: &'a E, table: Arc<TableDefinition>) -> Self {
        Self {
            executor,
            dialect: executor.dialect(),
            table,
            conditions: ConditionChain::new(),
            assignments: Vec::new(),
            options: SelectOptions::default(),
            _row: PhantomData,
        }
    }

    pub fn table(&self) -> &TableDefinition {
        &self.table
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn conditions(&self) -> &ConditionChain {
        &self.conditions
    }

    /// Start the condition chain.
    pub fn where_(self, field: &FieldRef) -> FieldqlResult<ConditionBuilder<'a, R, E>> {
        self.link(LogicalOp::And, field)
    }

    pub fn and(self, field: &FieldRef) -> FieldqlResult<ConditionBuilder<'a, R, E>> {
        self.link(LogicalOp::And, field)
    }

    pub fn or(self, field: &FieldRef) -> FieldqlResult<ConditionBuilder<'a, R, E>> {
        self.link(LogicalOp::Or, field)
    }

    fn link(self, connective: LogicalOp, field: &FieldRef) -> FieldqlResult<ConditionBuilder<'a, R, E>> {
        self.context().resolve(field)?;
        Ok(ConditionBuilder {
            query: self,
            connective,
            field: field.clone(),
        })
    }

    /// Append an arbitrary condition token with AND.
    pub fn filter(self, token: Token) -> FieldqlResult<Self> {
        self.push_token(LogicalOp::And, token)
    }

    /// Append an arbitrary condition token with OR.
    pub fn or_filter(self, token: Token) -> FieldqlResult<Self> {
        self.push_token(LogicalOp::Or, token)
    }

    fn push_token(mut self, connective: LogicalOp, token: Token) -> FieldqlResult<Self> {
        self.context().validate(&token)?;
        self.conditions.push(connective, token);
        Ok(self)
    }

    /// Apply a textual filter such as `active IS TRUE AND score > 3`.
    pub fn parse_filter(self, input: &str) -> FieldqlResult<Self> {
        let filter = parser::parse_filter(input)?;
        let table = self.table.name.clone();
        let mut query = self;
        for (connective, condition) in filter.conditions {
            let field = FieldRef::owned(table.clone(), condition.field);
            let builder = query.link(connective, &field)?;
            query = match condition.predicate {
                Predicate::IsTrue => builder.is_true(),
                Predicate::IsFalse => builder.is_false(),
                Predicate::IsNull => builder.is_null(),
                Predicate::IsNotNull => builder.is_not_null(),
                Predicate::Compare(op, value) => builder.compare(op, value),
            };
        }
        Ok(query)
    }

    /// Add a SET assignment for [`Query::update`].
    pub fn set(mut self, field: &FieldRef, value: impl Into<Value>) -> FieldqlResult<Self> {
        self.context().resolve(field)?;
        self.assignments.push((field.clone(), value.into()));
        Ok(self)
    }

    pub fn order_by(self, field: &FieldRef) -> FieldqlResult<Self> {
        self.order(field, SortOrder::Asc)
    }

    pub fn order_by_desc(self, field: &FieldRef) -> FieldqlResult<Self> {
        self.order(field, SortOrder::Desc)
    }

    fn order(mut self, field: &FieldRef, order: SortOrder) -> FieldqlResult<Self> {
        self.context().resolve(field)?;
        self.options.order_by.push((field.clone(), order));
        Ok(self)
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.options.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.options.offset = Some(n);
        self
    }

    fn context(&self) -> RenderContext<'_> {
        RenderContext::new(&self.table)
    }

    fn traced(stmt: CompiledStatement) -> CompiledStatement {
        tracing::debug!("Compiled SQL: {} ({} params)", stmt.sql, stmt.params.len());
        stmt
    }

    pub fn select_count_statement(&self) -> FieldqlResult<CompiledStatement> {
        dml::build_select_count(&self.table, &self.conditions, self.dialect).map(Self::traced)
    }

    pub fn select_statement(&self) -> FieldqlResult<CompiledStatement> {
        dml::build_select(&self.table, &self.conditions, &self.options, self.dialect).map(Self::traced)
    }

    pub fn delete_statement(&self) -> FieldqlResult<CompiledStatement> {
        dml::build_delete(&self.table, &self.conditions, self.dialect).map(Self::traced)
    }

    pub fn update_statement(&self) -> FieldqlResult<CompiledStatement> {
        dml::build_update(&self.table, &self.assignments, &self.conditions, self.dialect)
            .map(Self::traced)
    }

    /// Number of matching rows.
    pub async fn select_count(self) -> FieldqlResult<i64> {
        let stmt = self.select_count_statement()?;
        self.executor.fetch_scalar(&stmt).await
    }

    /// Delete matching rows, returning the affected count.
    pub async fn delete(self) -> FieldqlResult<u64> {
        let stmt = self.delete_statement()?;
        self.executor.execute(&stmt).await
    }

    /// Apply the SET assignments to matching rows.
    pub async fn update(self) -> FieldqlResult<u64> {
        let stmt = self.update_statement()?;
        self.executor.execute(&stmt).await
    }
}

impl<'a, R: FromRow, E: Executor> Query<'a, R, E> {
    /// Matching rows, decoded into `R`.
    pub async fn select(self) -> FieldqlResult<Vec<R>> {
        let stmt = self.select_statement()?;
        let rows: Vec<Row> = self.executor.fetch_rows(&stmt, &self.table).await?;
        rows.iter().map(R::from_row).collect()
    }
}

/// Pending condition on one field; a comparison call completes it.
pub struct ConditionBuilder<'a, R, E> {
    query: Query<'a, R, E>,
    connective: LogicalOp,
    field: FieldRef,
}

impl<'a, R, E: Executor> ConditionBuilder<'a, R, E> {
    fn push(self, token: Token) -> Query<'a, R, E> {
        let mut query = self.query;
        query.conditions.push(self.connective, token);
        query
    }

    fn compare(self, op: Comparator, value: Value) -> Query<'a, R, E> {
        let left = Token::Field(self.field.clone());
        self.push(Token::compare(left, op, Token::Literal(value)))
    }

    /// `field = TRUE`, in the field's stored representation.
    pub fn is_true(self) -> Query<'a, R, E> {
        let token = Token::true_false(self.field.clone(), true);
        self.push(token)
    }

    /// `field = FALSE`, in the field's stored representation. NULL does not
    /// match.
    pub fn is_false(self) -> Query<'a, R, E> {
        let token = Token::true_false(self.field.clone(), false);
        self.push(token)
    }

    pub fn is_equal(self, value: impl Into<Value>) -> Query<'a, R, E> {
        self.compare(Comparator::Equal, value.into())
    }

    pub fn is_not_equal(self, value: impl Into<Value>) -> Query<'a, R, E> {
        self.compare(Comparator::NotEqual, value.into())
    }

    pub fn exceeds(self, value: impl Into<Value>) -> Query<'a, R, E> {
        self.compare(Comparator::GreaterThan, value.into())
    }

    pub fn at_least(self, value: impl Into<Value>) -> Query<'a, R, E> {
        self.compare(Comparator::GreaterEqual, value.into())
    }

    pub fn less_than(self, value: impl Into<Value>) -> Query<'a, R, E> {
        self.compare(Comparator::LessThan, value.into())
    }

    pub fn at_most(self, value: impl Into<Value>) -> Query<'a, R, E> {
        self.compare(Comparator::LessEqual, value.into())
    }

    pub fn like(self, pattern: impl Into<Value>) -> Query<'a, R, E> {
        self.compare(Comparator::Like, pattern.into())
    }

    pub fn is_null(self) -> Query<'a, R, E> {
        let token = Token::unary(Token::Field(self.field.clone()), Comparator::IsNull);
        self.push(token)
    }

    pub fn is_not_null(self) -> Query<'a, R, E> {
        let token = Token::unary(Token::Field(self.field.clone()), Comparator::IsNotNull);
        self.push(token)
    }

    /// Column-to-column equality; `other` is rendered, not bound.
    pub fn is_field(self, other: &FieldRef) -> FieldqlResult<Query<'a, R, E>> {
        self.query.context().resolve(other)?;
        let token = Token::compare(
            Token::Field(self.field.clone()),
            Comparator::Equal,
            Token::Field(other.clone()),
        );
        Ok(self.push(token))
    }
}
