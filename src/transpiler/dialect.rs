//! SQL dialect adapter.
//!
//! The only differences handled here are placeholder syntax, identifier
//! quoting and literal spelling.

use serde::{Deserialize, Serialize};

use crate::ast::Value;
use crate::mapping::SqlType;

/// SQL reserved words that must be quoted when used as identifiers.
pub const RESERVED_WORDS: &[&str] = &[
    "order", "group", "user", "table", "select", "from", "where", "join", "on", "and", "or",
    "not", "null", "true", "false", "limit", "offset", "as", "in", "is", "like", "between",
    "having", "union", "all", "distinct", "case", "when", "then", "else", "end", "insert",
    "update", "delete", "set", "values", "index", "key", "primary", "default", "check",
];

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Postgres,
    MySql,
    Sqlite,
}

impl Dialect {
    /// Guess the dialect from a connection URL scheme.
    pub fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split(':').next()?.to_ascii_lowercase();
        match scheme.as_str() {
            "postgres" | "postgresql" => Some(Dialect::Postgres),
            "mysql" | "mariadb" => Some(Dialect::MySql),
            "sqlite" => Some(Dialect::Sqlite),
            _ => None,
        }
    }

    /// Placeholder for the 1-based parameter `index`.
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", index),
            Dialect::MySql | Dialect::Sqlite => "?".to_string(),
        }
    }

    pub fn bool_literal(self, value: bool) -> &'static str {
        match (self, value) {
            (Dialect::Sqlite, true) => "1",
            (Dialect::Sqlite, false) => "0",
            (_, true) => "TRUE",
            (_, false) => "FALSE",
        }
    }

    /// Quote an identifier if it is a reserved word or contains special chars.
    pub fn quote_identifier(self, name: &str) -> String {
        let lower = name.to_lowercase();
        let needs_escaping = RESERVED_WORDS.contains(&lower.as_str())
            || name.chars().any(|c| !c.is_alphanumeric() && c != '_')
            || name.chars().next().map(|c| c.is_numeric()).unwrap_or(true);

        if !needs_escaping {
            return name.to_string();
        }
        match self {
            Dialect::MySql => format!("`{}`", name.replace('`', "``")),
            Dialect::Postgres | Dialect::Sqlite => format!("\"{}\"", name.replace('"', "\"\"")),
        }
    }

    /// Select-list entry for a column.
    ///
    /// SQLite has no boolean storage class, so boolean columns are read back
    /// as integers under their own name.
    pub fn select_column(self, column: &str, sql_type: SqlType) -> String {
        let quoted = self.quote_identifier(column);
        match (self, sql_type) {
            (Dialect::Sqlite, SqlType::Boolean) => {
                format!("CAST({} AS INTEGER) AS {}", quoted, quoted)
            }
            _ => quoted,
        }
    }

    /// LIMIT / OFFSET suffix, with a leading space when non-empty.
    pub fn limit_offset(self, limit: Option<u64>, offset: Option<u64>) -> String {
        match (self, limit, offset) {
            (_, None, None) => String::new(),
            (_, Some(n), None) => format!(" LIMIT {}", n),
            (_, Some(n), Some(m)) => format!(" LIMIT {} OFFSET {}", n, m),
            (Dialect::Postgres, None, Some(m)) => format!(" OFFSET {}", m),
            (Dialect::Sqlite, None, Some(m)) => format!(" LIMIT -1 OFFSET {}", m),
            (Dialect::MySql, None, Some(m)) => format!(" LIMIT {} OFFSET {}", u64::MAX, m),
        }
    }

    /// Inline literal spelling, used when replaying a statement for display.
    pub fn literal(self, value: &Value) -> String {
        match value {
            Value::Bool(b) => self.bool_literal(*b).to_string(),
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Postgres => write!(f, "postgres"),
            Dialect::MySql => write!(f, "mysql"),
            Dialect::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "sqlite" => Ok(Dialect::Sqlite),
            other => Err(format!("unknown dialect '{}'", other)),
        }
    }
}
