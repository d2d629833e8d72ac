// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query model: the parsed, immutable form of a query
//!
//! The model is produced by a parser (not part of this crate) or built
//! directly in code, and is consumed read-only by the planner. Every shape is
//! a closed enum, so the planner handles all of them exhaustively.

pub mod constraint;
pub mod query;
pub mod source;
pub mod visitors;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use constraint::{
    ArithmeticOperator, Constraint, DynamicOperand, Literal, Operator, StaticOperand,
};
pub use query::{Column, Limit, Order, Ordering, Query, QueryCommand, SetOperation, SetQuery};
pub use source::{JoinCondition, JoinType, Selector, SelectorKind, Source};

/// Name (or alias) by which a relation's rows are referred to in a query
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectorName(String);

impl SelectorName {
    pub fn new(name: impl Into<String>) -> Self {
        SelectorName(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SelectorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SelectorName {
    fn from(name: &str) -> Self {
        SelectorName::new(name)
    }
}

impl From<String> for SelectorName {
    fn from(name: String) -> Self {
        SelectorName(name)
    }
}

/// Writes `items` separated by `", "`
pub(crate) fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
