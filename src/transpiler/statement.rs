//! Statement accumulator.
//!
//! Collects SQL text and bound parameters in emission order. Each call to
//! [`Statement::append_parameter`] writes exactly one placeholder, so the
//! parameter list always lines up with the placeholders in the text.

use std::ops::Range;

use serde::Serialize;

use crate::ast::Value;
use crate::transpiler::dialect::Dialect;

#[derive(Debug, Clone)]
pub struct Statement {
    dialect: Dialect,
    sql: String,
    params: Vec<Value>,
    markers: Vec<Range<usize>>,
}

impl Statement {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            sql: String::new(),
            params: Vec::new(),
            markers: Vec::new(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Append raw SQL text verbatim.
    pub fn append_text(&mut self, fragment: &str) -> &mut Self {
        self.sql.push_str(fragment);
        self
    }

    /// Append an identifier, quoted when the dialect requires it.
    pub fn append_identifier(&mut self, name: &str) -> &mut Self {
        let quoted = self.dialect.quote_identifier(name);
        self.sql.push_str(&quoted);
        self
    }

    /// Append a placeholder and bind `value` to it.
    pub fn append_parameter(&mut self, value: Value) -> &mut Self {
        self.params.push(value);
        let placeholder = self.dialect.placeholder(self.params.len());
        let start = self.sql.len();
        self.sql.push_str(&placeholder);
        self.markers.push(start..self.sql.len());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub fn finish(self) -> CompiledStatement {
        CompiledStatement {
            sql: self.sql,
            params: self.params,
            dialect: self.dialect,
            markers: self.markers,
        }
    }
}

/// Final SQL text and its ordered parameters.
///
/// Only built by [`Statement::finish`], which records where each placeholder
/// sits. It serializes for output but cannot be read back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledStatement {
    pub sql: String,
    pub params: Vec<Value>,
    pub dialect: Dialect,
    #[serde(skip)]
    markers: Vec<Range<usize>>,
}

impl CompiledStatement {
    /// Replay the statement with every placeholder replaced by its literal.
    ///
    /// For display only; never send the result to a database.
    pub fn to_inline_sql(&self) -> String {
        let mut out = String::with_capacity(self.sql.len());
        let mut cursor = 0;
        for (marker, value) in self.markers.iter().zip(&self.params) {
            out.push_str(&self.sql[cursor..marker.start]);
            out.push_str(&self.dialect.literal(value));
            cursor = marker.end;
        }
        out.push_str(&self.sql[cursor..]);
        out
    }
}

impl std::fmt::Display for CompiledStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sql)
    }
}
