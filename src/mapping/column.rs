use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::ast::Value;
use crate::error::{CoercionError, MappingError};

/// How a boolean-like field is represented in its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionRule {
    /// `bool` field, boolean column: binds TRUE/FALSE.
    NativeBoolean,
    /// Integer field used as a flag: binds 1/0, never NULL.
    IntFlag,
    /// Optional integer flag: binds 1/0, keeps NULL.
    NullableIntFlag,
}

impl CoercionRule {
    /// Translate a literal into the column's stored representation.
    pub fn coerce(self, column: &str, value: &Value) -> Result<Value, CoercionError> {
        let coerced = match (self, value) {
            (CoercionRule::NativeBoolean, Value::Bool(b)) => Some(Value::Bool(*b)),
            (CoercionRule::IntFlag | CoercionRule::NullableIntFlag, Value::Bool(b)) => {
                Some(Value::Int(i64::from(*b)))
            }
            (CoercionRule::IntFlag | CoercionRule::NullableIntFlag, Value::Int(n)) => {
                Some(Value::Int(*n))
            }
            (CoercionRule::NullableIntFlag, Value::Null) => Some(Value::Null),
            _ => None,
        };
        coerced.ok_or_else(|| CoercionError::Incompatible {
            column: column.to_string(),
            rule: self,
            value: value.to_string(),
        })
    }

    /// Translate a stored column value back into the field's shape.
    ///
    /// Nullable flags keep NULL apart from 0. Stored integers of int flags
    /// are returned as they are.
    pub fn decode(self, stored: Value) -> Value {
        match (self, stored) {
            (CoercionRule::NativeBoolean, stored) => match stored.as_flag() {
                Some(flag) => Value::Bool(flag),
                None => stored,
            },
            (CoercionRule::IntFlag | CoercionRule::NullableIntFlag, Value::Bool(b)) => {
                Value::Int(i64::from(b))
            }
            (_, stored) => stored,
        }
    }

    /// Column type implied by the rule when none is declared.
    pub fn default_sql_type(self) -> SqlType {
        match self {
            CoercionRule::NativeBoolean => SqlType::Boolean,
            CoercionRule::IntFlag | CoercionRule::NullableIntFlag => SqlType::Integer,
        }
    }
}

impl std::fmt::Display for CoercionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoercionRule::NativeBoolean => write!(f, "native boolean"),
            CoercionRule::IntFlag => write!(f, "int flag"),
            CoercionRule::NullableIntFlag => write!(f, "nullable int flag"),
        }
    }
}

/// Storage type of a column, used when decoding rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlType {
    Boolean,
    Integer,
    Float,
    Text,
}

/// One mapped column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Name of the model field.
    pub field: String,
    /// Name of the SQL column.
    pub column: String,
    pub sql_type: SqlType,
    #[serde(default)]
    pub coercion: Option<CoercionRule>,
    #[serde(default)]
    pub primary_key: bool,
}

impl ColumnDef {
    pub fn new(field: impl Into<String>, column: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            field: field.into(),
            column: column.into(),
            sql_type,
            coercion: None,
            primary_key: false,
        }
    }

    pub fn integer(field: impl Into<String>, column: impl Into<String>) -> Self {
        Self::new(field, column, SqlType::Integer)
    }

    pub fn float(field: impl Into<String>, column: impl Into<String>) -> Self {
        Self::new(field, column, SqlType::Float)
    }

    pub fn text(field: impl Into<String>, column: impl Into<String>) -> Self {
        Self::new(field, column, SqlType::Text)
    }

    pub fn boolean(field: impl Into<String>, column: impl Into<String>) -> Self {
        Self::new(field, column, SqlType::Boolean).coerce(CoercionRule::NativeBoolean)
    }

    pub fn int_flag(field: impl Into<String>, column: impl Into<String>) -> Self {
        Self::new(field, column, SqlType::Integer).coerce(CoercionRule::IntFlag)
    }

    pub fn nullable_int_flag(field: impl Into<String>, column: impl Into<String>) -> Self {
        Self::new(field, column, SqlType::Integer).coerce(CoercionRule::NullableIntFlag)
    }

    pub fn coerce(mut self, rule: CoercionRule) -> Self {
        self.coercion = Some(rule);
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Apply the column's coercion rule, if any, to a literal.
    pub fn bind_value(&self, value: &Value) -> Result<Value, CoercionError> {
        match self.coercion {
            Some(rule) => rule.coerce(&self.column, value),
            None => Ok(value.clone()),
        }
    }

    /// Turn a stored value into the field's in-memory shape.
    pub fn read_value(&self, stored: Value) -> Value {
        match (self.coercion, self.sql_type) {
            (Some(rule), _) => rule.decode(stored),
            (None, SqlType::Boolean) => CoercionRule::NativeBoolean.decode(stored),
            (None, _) => stored,
        }
    }
}

/// Descriptor of a model field, handed to `where_/and/or`.
///
/// Descriptors are plain names; whether they resolve is decided by the
/// table definition of the query they are used in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    table: Cow<'static, str>,
    field: Cow<'static, str>,
}

impl FieldRef {
    pub const fn new(table: &'static str, field: &'static str) -> Self {
        Self {
            table: Cow::Borrowed(table),
            field: Cow::Borrowed(field),
        }
    }

    pub fn owned(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            table: Cow::Owned(table.into()),
            field: Cow::Owned(field.into()),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl std::fmt::Display for FieldRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.table, self.field)
    }
}

/// A mapped table and its columns, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn column_for(&self, field: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Resolve a descriptor to its column on this table.
    pub fn resolve(&self, field: &FieldRef) -> Result<&ColumnDef, MappingError> {
        if field.table() != self.name {
            return Err(MappingError::ForeignField {
                expected: self.name.clone(),
                table: field.table().to_string(),
                field: field.field().to_string(),
            });
        }
        self.column_for(field.field())
            .ok_or_else(|| MappingError::UnmappedField {
                table: self.name.clone(),
                field: field.field().to_string(),
            })
    }

    /// Descriptor for a declared field.
    pub fn field(&self, name: &str) -> Result<FieldRef, MappingError> {
        let column = self
            .column_for(name)
            .ok_or_else(|| MappingError::UnmappedField {
                table: self.name.clone(),
                field: name.to_string(),
            })?;
        Ok(FieldRef::owned(self.name.clone(), column.field.clone()))
    }

    pub fn primary_key(&self) -> Vec<&ColumnDef> {
        self.columns.iter().filter(|c| c.primary_key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flags() -> TableDefinition {
        TableDefinition::new("t_multiple_boolean")
            .column(ColumnDef::boolean("boolean_flag", "boolean_flag"))
            .column(ColumnDef::int_flag("primitive_flag", "primitive_flag"))
            .column(ColumnDef::nullable_int_flag("object_flag", "object_flag"))
    }

    #[test]
    fn test_coercion_boundary_table() {
        let cases = [
            (CoercionRule::NativeBoolean, Value::Bool(true), Value::Bool(true)),
            (CoercionRule::NativeBoolean, Value::Bool(false), Value::Bool(false)),
            (CoercionRule::IntFlag, Value::Bool(true), Value::Int(1)),
            (CoercionRule::IntFlag, Value::Bool(false), Value::Int(0)),
            (CoercionRule::NullableIntFlag, Value::Bool(true), Value::Int(1)),
            (CoercionRule::NullableIntFlag, Value::Null, Value::Null),
        ];
        for (rule, input, expected) in cases {
            assert_eq!(rule.coerce("c", &input).unwrap(), expected, "{rule} <- {input}");
        }
    }

    #[test]
    fn test_int_flag_keeps_integer_literals() {
        assert_eq!(CoercionRule::IntFlag.coerce("c", &Value::Int(5)).unwrap(), Value::Int(5));
        assert_eq!(CoercionRule::IntFlag.coerce("c", &Value::Int(0)).unwrap(), Value::Int(0));
        assert_eq!(
            CoercionRule::NullableIntFlag.coerce("c", &Value::Int(-2)).unwrap(),
            Value::Int(-2)
        );
        assert_eq!(CoercionRule::IntFlag.decode(Value::Int(7)), Value::Int(7));
    }

    #[test]
    fn test_incompatible_literals() {
        assert!(CoercionRule::NativeBoolean.coerce("c", &Value::Int(1)).is_err());
        assert!(CoercionRule::IntFlag.coerce("c", &Value::Null).is_err());
        assert!(CoercionRule::NullableIntFlag.coerce("c", &Value::from("yes")).is_err());
        assert!(CoercionRule::IntFlag.coerce("c", &Value::Float(1.0)).is_err());
    }

    #[test]
    fn test_decode_keeps_null_apart_from_zero() {
        let rule = CoercionRule::NullableIntFlag;
        assert_eq!(rule.decode(Value::Null), Value::Null);
        assert_eq!(rule.decode(Value::Bool(false)), Value::Int(0));
        assert_eq!(rule.decode(Value::Int(1)), Value::Int(1));
        assert_eq!(CoercionRule::NativeBoolean.decode(Value::Int(1)), Value::Bool(true));
    }

    #[test]
    fn test_resolve() {
        let table = flags();
        let col = table
            .resolve(&FieldRef::new("t_multiple_boolean", "primitive_flag"))
            .unwrap();
        assert_eq!(col.coercion, Some(CoercionRule::IntFlag));

        let err = table
            .resolve(&FieldRef::new("t_multiple_boolean", "ghost"))
            .unwrap_err();
        assert!(matches!(err, MappingError::UnmappedField { .. }));

        let err = table.resolve(&FieldRef::new("t_other", "boolean_flag")).unwrap_err();
        assert!(matches!(err, MappingError::ForeignField { .. }));
    }

    #[test]
    fn test_field_handle() {
        let table = flags();
        assert_eq!(
            table.field("object_flag").unwrap(),
            FieldRef::new("t_multiple_boolean", "object_flag")
        );
        assert!(table.field("nope").is_err());
    }
}
