// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Sources of a query: selectors and the joins that combine them

use serde::{Deserialize, Serialize};
use std::fmt;

use super::SelectorName;

/// The FROM clause of a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Source {
    /// A single relation, optionally aliased
    Selector(Selector),
    /// A binary join of two sources
    Join {
        left: Box<Source>,
        right: Box<Source>,
        join_type: JoinType,
        condition: JoinCondition,
    },
}

impl Source {
    pub fn named(name: impl Into<SelectorName>) -> Self {
        Source::Selector(Selector::named(name))
    }

    pub fn aliased(name: impl Into<SelectorName>, alias: impl Into<SelectorName>) -> Self {
        Source::Selector(Selector::named(name).with_alias(alias))
    }

    pub fn join(left: Source, join_type: JoinType, right: Source, condition: JoinCondition) -> Self {
        Source::Join {
            left: Box::new(left),
            right: Box::new(right),
            join_type,
            condition,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Selector(selector) => write!(f, "{}", selector),
            Source::Join {
                left,
                right,
                join_type,
                condition,
            } => write!(f, "{} {} {} ON {}", left, join_type, right, condition),
        }
    }
}

/// Whether a selector names a node type or every node in the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectorKind {
    #[default]
    Named,
    AllNodes,
}

/// A relation referenced in the FROM clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    #[serde(default)]
    pub kind: SelectorKind,
    pub name: SelectorName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<SelectorName>,
}

impl Selector {
    /// Name of the pseudo-relation containing every node
    pub const ALL_NODES_NAME: &'static str = "__ALLNODES__";

    pub fn named(name: impl Into<SelectorName>) -> Self {
        Self {
            kind: SelectorKind::Named,
            name: name.into(),
            alias: None,
        }
    }

    pub fn all_nodes() -> Self {
        Self {
            kind: SelectorKind::AllNodes,
            name: SelectorName::new(Self::ALL_NODES_NAME),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<SelectorName>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// The name other parts of the query use to refer to this selector
    pub fn alias_or_name(&self) -> &SelectorName {
        self.alias.as_ref().unwrap_or(&self.name)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {}", alias)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
    Cross,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::LeftOuter => "LEFT OUTER JOIN",
            JoinType::RightOuter => "RIGHT OUTER JOIN",
            JoinType::FullOuter => "FULL OUTER JOIN",
            JoinType::Cross => "CROSS JOIN",
        };
        f.write_str(symbol)
    }
}

/// The ON criteria of a join
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JoinCondition {
    /// `selector1.property1 = selector2.property2`
    Equi {
        selector1: SelectorName,
        property1: String,
        selector2: SelectorName,
        property2: String,
    },
    /// Both selectors identify the same node, or the node at `path` below selector2
    SameNode {
        selector1: SelectorName,
        selector2: SelectorName,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    ChildNode {
        parent_selector: SelectorName,
        child_selector: SelectorName,
    },
    DescendantNode {
        ancestor_selector: SelectorName,
        descendant_selector: SelectorName,
    },
}

impl JoinCondition {
    pub fn equi(
        selector1: impl Into<SelectorName>,
        property1: impl Into<String>,
        selector2: impl Into<SelectorName>,
        property2: impl Into<String>,
    ) -> Self {
        JoinCondition::Equi {
            selector1: selector1.into(),
            property1: property1.into(),
            selector2: selector2.into(),
            property2: property2.into(),
        }
    }
}

impl fmt::Display for JoinCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinCondition::Equi {
                selector1,
                property1,
                selector2,
                property2,
            } => write!(f, "{}.{} = {}.{}", selector1, property1, selector2, property2),
            JoinCondition::SameNode {
                selector1,
                selector2,
                path: None,
            } => write!(f, "ISSAMENODE({},{})", selector1, selector2),
            JoinCondition::SameNode {
                selector1,
                selector2,
                path: Some(path),
            } => write!(f, "ISSAMENODE({},{},'{}')", selector1, selector2, path),
            JoinCondition::ChildNode {
                parent_selector,
                child_selector,
            } => write!(f, "ISCHILDNODE({},{})", child_selector, parent_selector),
            JoinCondition::DescendantNode {
                ancestor_selector,
                descendant_selector,
            } => write!(
                f,
                "ISDESCENDANTNODE({},{})",
                descendant_selector, ancestor_selector
            ),
        }
    }
}
