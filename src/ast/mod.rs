//! Expression tree for fieldql queries.
//!
//! Every node is a [`Token`]; conditions are `Token::Comparison` nodes whose
//! left side is usually a field descriptor and whose right side is a literal
//! [`Value`] or another token.

pub mod chain;
pub mod comparator;
pub mod token;
pub mod value;

pub use chain::{ChainLink, ConditionChain};
pub use comparator::{Comparator, LogicalOp, SortOrder};
pub use token::Token;
pub use value::Value;
