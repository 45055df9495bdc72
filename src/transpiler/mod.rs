//! SQL generation for fieldql queries.
//!
//! Tokens are rendered into a [`Statement`] through a [`RenderContext`] that
//! knows the mapped table. The result is a [`CompiledStatement`]: SQL text
//! plus parameters in placeholder order.

pub mod dialect;
pub mod dml;
pub mod render;
pub mod statement;

#[cfg(test)]
mod tests;

pub use dialect::Dialect;
pub use render::{render_token, RenderContext};
pub use statement::{CompiledStatement, Statement};
