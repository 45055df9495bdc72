//! Error types for fieldql.

use thiserror::Error;

use crate::mapping::CoercionRule;

/// A field descriptor or model could not be resolved against the registry.
///
/// Always raised while a query is being built, before any statement exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The field is not declared on the table.
    #[error("Field '{field}' is not a mapped column of table '{table}'")]
    UnmappedField { table: String, field: String },

    /// The field belongs to another table than the one being queried.
    #[error("Field '{table}.{field}' cannot be used in a query on '{expected}'")]
    ForeignField {
        expected: String,
        table: String,
        field: String,
    },

    /// No table with this name was registered.
    #[error("Table '{0}' is not registered")]
    UnregisteredTable(String),

    /// A table with this name was registered twice.
    #[error("Table '{0}' is already registered")]
    DuplicateTable(String),

    /// The operation needs a primary key and the table declares none.
    #[error("Table '{0}' has no primary key column")]
    NoPrimaryKey(String),
}

/// A literal does not fit the coercion rule of the column it is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("Cannot bind {value} to {rule} column '{column}'")]
    Incompatible {
        column: String,
        rule: CoercionRule,
        value: String,
    },
}

/// The main error type for fieldql operations.
#[derive(Debug, Error)]
pub enum FieldqlError {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Coercion(#[from] CoercionError),

    /// Failed to parse a textual filter expression.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A column read from the database does not fit the model field.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FieldqlError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    pub fn is_coercion(&self) -> bool {
        matches!(self, Self::Coercion(_))
    }
}

/// Result type alias for fieldql operations.
pub type FieldqlResult<T> = Result<T, FieldqlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FieldqlError::parse(5, "unexpected character");
        assert_eq!(
            err.to_string(),
            "Parse error at position 5: unexpected character"
        );
    }

    #[test]
    fn test_mapping_error_is_transparent() {
        let err: FieldqlError = MappingError::UnmappedField {
            table: "t_flags".to_string(),
            field: "ghost".to_string(),
        }
        .into();
        assert!(err.is_mapping());
        assert_eq!(
            err.to_string(),
            "Field 'ghost' is not a mapped column of table 't_flags'"
        );
    }

    #[test]
    fn test_coercion_error_display() {
        let err: FieldqlError = CoercionError::Incompatible {
            column: "primitive_flag".to_string(),
            rule: CoercionRule::IntFlag,
            value: "'yes'".to_string(),
        }
        .into();
        assert!(err.is_coercion());
        assert_eq!(
            err.to_string(),
            "Cannot bind 'yes' to int flag column 'primitive_flag'"
        );
    }
}
