//! Model-to-table mapping.
//!
//! Tables are declared explicitly, either by implementing [`Model`] or by
//! listing them in the configuration file. Each column may carry a
//! [`CoercionRule`] describing how a boolean-like field is stored.

pub mod column;
pub mod registry;
pub mod row;

pub use column::{CoercionRule, ColumnDef, FieldRef, SqlType, TableDefinition};
pub use registry::Registry;
pub use row::{decode_row, FromRow, FromValue, Model, Row};
