//! # fieldql: typed query construction over mapped tables
//!
//! > **Name the field, not the column.**
//!
//! fieldql builds SQL conditions from field descriptors. Each mapped column
//! may carry a boolean coercion rule, so `is_true()` on a native boolean, an
//! int flag and a nullable int flag all bind the right representation.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use fieldql::prelude::*;
//!
//! let db = Db::connect("sqlite://flags.db", Registry::new().with_model::<MultipleBoolean>()?).await?;
//!
//! let count = db
//!     .from::<MultipleBoolean>()?
//!     .where_(&MultipleBoolean::PRIMITIVE_FLAG)?.is_true()
//!     .and(&MultipleBoolean::OBJECT_FLAG)?.is_false()
//!     .select_count()
//!     .await?;
//! // => SELECT COUNT(*) FROM t_multiple_boolean WHERE primitive_flag = ? AND object_flag = ?
//! //    with parameters [1, 0]
//! ```
//!
//! ## Coercion Rules
//!
//! | Rule                | `true` | `false` | `NULL`  |
//! |---------------------|--------|---------|---------|
//! | `NativeBoolean`     | TRUE   | FALSE   | error   |
//! | `IntFlag`           | 1      | 0       | error   |
//! | `NullableIntFlag`   | 1      | 0       | NULL    |

pub mod ast;
pub mod config;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod parser;
pub mod query;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::Config;
    pub use crate::engine::{Db, DryRun, Executor};
    pub use crate::error::*;
    pub use crate::mapping::*;
    pub use crate::query::{ConditionBuilder, Query};
    pub use crate::transpiler::{CompiledStatement, Dialect};
}

pub use query::{ConditionBuilder, Query};

/// Parse a textual filter expression.
///
/// # Example
///
/// ```
/// use fieldql::parse_filter;
///
/// let filter = parse_filter("booleanFlag IS TRUE AND objectFlag IS NULL").unwrap();
/// assert_eq!(filter.conditions.len(), 2);
/// assert_eq!(filter.conditions[1].1.field, "objectFlag");
/// ```
pub fn parse_filter(input: &str) -> Result<parser::Filter, error::FieldqlError> {
    parser::parse_filter(input)
}
