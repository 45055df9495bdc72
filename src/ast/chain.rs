use serde::{Deserialize, Serialize};

use crate::ast::{LogicalOp, Token};

/// One condition of a query together with the connective that joins it to
/// the previous one. The connective of the first link is never emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainLink {
    pub connective: LogicalOp,
    pub token: Token,
}

/// Ordered conditions of a query's WHERE clause.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConditionChain {
    links: Vec<ChainLink>,
}

impl ConditionChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, connective: LogicalOp, token: Token) {
        self.links.push(ChainLink { connective, token });
    }

    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
