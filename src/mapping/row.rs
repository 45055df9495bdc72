//! Rows and the model traits that replace annotation scanning.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::ast::Value;
use crate::error::{FieldqlError, FieldqlResult};
use crate::mapping::TableDefinition;

/// A decoded result row, keyed by field name in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, value: Value) {
        self.values.push((field.into(), value));
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Typed access to a field.
    pub fn get<T: FromValue>(&self, field: &str) -> FieldqlResult<T> {
        let value = self
            .value(field)
            .ok_or_else(|| FieldqlError::Decode(format!("missing field '{}'", field)))?;
        T::from_value(value)
            .map_err(|e| FieldqlError::Decode(format!("field '{}': {}", field, e)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Conversion from a decoded column value into a field type.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, String>;
}

fn mismatch(expected: &str, value: &Value) -> String {
    format!("expected {}, found {}", expected, value.kind())
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, String> {
        value.as_flag().ok_or_else(|| mismatch("boolean", value))
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Int(n) => Ok(*n),
            Value::Bool(b) => Ok(i64::from(*b)),
            other => Err(mismatch("integer", other)),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self, String> {
        let n = i64::from_value(value)?;
        i32::try_from(n).map_err(|_| format!("{} does not fit in i32", n))
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Float(n) => Ok(*n),
            Value::Int(n) => Ok(*n as f64),
            other => Err(mismatch("float", other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            other => Err(mismatch("text", other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Types that can be built from a decoded row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> FieldqlResult<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> FieldqlResult<Self> {
        Ok(row.clone())
    }
}

/// A Rust type mapped to one table.
///
/// # Example
///
/// ```
/// use fieldql::prelude::*;
///
/// struct Account {
///     id: i64,
///     active: bool,
/// }
///
/// impl Account {
///     const ACTIVE: FieldRef = FieldRef::new("accounts", "active");
/// }
///
/// impl FromRow for Account {
///     fn from_row(row: &Row) -> FieldqlResult<Self> {
///         Ok(Self { id: row.get("id")?, active: row.get("active")? })
///     }
/// }
///
/// impl Model for Account {
///     const TABLE: &'static str = "accounts";
///
///     fn definition() -> TableDefinition {
///         TableDefinition::new(Self::TABLE)
///             .column(ColumnDef::integer("id", "id").primary_key())
///             .column(ColumnDef::boolean("active", "is_active"))
///     }
///
///     fn to_values(&self) -> Vec<(&'static str, Value)> {
///         vec![("id", self.id.into()), ("active", self.active.into())]
///     }
/// }
///
/// let table = Account::definition();
/// assert_eq!(table.resolve(&Account::ACTIVE).unwrap().column, "is_active");
/// ```
pub trait Model: FromRow {
    const TABLE: &'static str;

    fn definition() -> TableDefinition;

    /// Current field values, keyed by field name.
    fn to_values(&self) -> Vec<(&'static str, Value)>;
}

/// Decode raw column values into a row of field values.
pub fn decode_row(table: &TableDefinition, columns: Vec<(String, Value)>) -> Row {
    let mut row = Row::new();
    for (name, stored) in columns {
        match table.columns.iter().find(|c| c.column == name) {
            Some(column) => row.push(column.field.clone(), column.read_value(stored)),
            None => row.push(name, stored),
        }
    }
    row
}
