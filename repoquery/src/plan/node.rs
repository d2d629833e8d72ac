// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Plan tree nodes
//!
//! A [`PlanNode`] pairs the set of selectors contributing to its output with
//! a [`PlanOp`] that carries the node's own typed properties and its owned
//! children. Nodes are built bottom-up: each constructor takes its children by
//! value and computes the node's selectors from them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::model::visitors::selectors_referenced_by_constraint;
use crate::model::{
    write_list, Column, Constraint, JoinCondition, JoinType, Ordering, SelectorName, SetOperation,
};
use crate::schema::TableColumn;

/// The closed set of plan node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanNodeType {
    Source,
    Join,
    Select,
    Project,
    DupRemove,
    Sort,
    Limit,
    SetOperation,
}

impl PlanNodeType {
    pub fn symbol(&self) -> &'static str {
        match self {
            PlanNodeType::Source => "Source",
            PlanNodeType::Join => "Join",
            PlanNodeType::Select => "Select",
            PlanNodeType::Project => "Project",
            PlanNodeType::DupRemove => "DupRemoval",
            PlanNodeType::Sort => "Sort",
            PlanNodeType::Limit => "Limit",
            PlanNodeType::SetOperation => "SetOperation",
        }
    }
}

impl fmt::Display for PlanNodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// How a JOIN node will combine its inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JoinAlgorithm {
    #[default]
    NestedLoop,
    Merge,
}

impl fmt::Display for JoinAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinAlgorithm::NestedLoop => f.write_str("NESTED_LOOP"),
            JoinAlgorithm::Merge => f.write_str("MERGE"),
        }
    }
}

/// The operation of a plan node, with its properties and children
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum PlanOp {
    Source {
        name: SelectorName,
        alias: Option<SelectorName>,
        /// Columns of the resolved table; `None` when the table is unknown
        columns: Option<Vec<TableColumn>>,
    },
    Join {
        join_type: JoinType,
        algorithm: JoinAlgorithm,
        condition: JoinCondition,
        left: Box<PlanNode>,
        right: Box<PlanNode>,
    },
    Select {
        criteria: Constraint,
        input: Box<PlanNode>,
    },
    Project {
        columns: Vec<Column>,
        /// Type name of each entry in `columns`
        column_types: Vec<String>,
        input: Box<PlanNode>,
    },
    DupRemove {
        input: Box<PlanNode>,
    },
    Sort {
        orderings: Vec<Ordering>,
        input: Box<PlanNode>,
    },
    Limit {
        /// Maximum number of rows to return
        row_limit: Option<usize>,
        /// Number of leading rows to skip
        offset: Option<usize>,
        input: Box<PlanNode>,
    },
    SetOperation {
        operation: SetOperation,
        /// Keep duplicate rows
        all: bool,
        left: Box<PlanNode>,
        right: Box<PlanNode>,
    },
}

/// A node of the canonical plan tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanNode {
    selectors: BTreeSet<SelectorName>,
    #[serde(flatten)]
    op: PlanOp,
}

impl PlanNode {
    // ========================================================================
    // Construction
    // ========================================================================

    pub fn source(
        name: SelectorName,
        alias: Option<SelectorName>,
        columns: Option<Vec<TableColumn>>,
    ) -> Self {
        let selector = alias.clone().unwrap_or_else(|| name.clone());
        Self {
            selectors: BTreeSet::from([selector]),
            op: PlanOp::Source {
                name,
                alias,
                columns,
            },
        }
    }

    pub fn join(
        join_type: JoinType,
        algorithm: JoinAlgorithm,
        condition: JoinCondition,
        left: PlanNode,
        right: PlanNode,
    ) -> Self {
        Self {
            selectors: union(&left, &right),
            op: PlanOp::Join {
                join_type,
                algorithm,
                condition,
                left: Box::new(left),
                right: Box::new(right),
            },
        }
    }

    /// SELECT node whose selectors are those referenced by `criteria`
    pub fn select(criteria: Constraint, input: PlanNode) -> Self {
        Self {
            selectors: selectors_referenced_by_constraint(&criteria),
            op: PlanOp::Select {
                criteria,
                input: Box::new(input),
            },
        }
    }

    /// PROJECT node; `selectors` are those registered while resolving columns
    pub fn project(
        selectors: BTreeSet<SelectorName>,
        columns: Vec<Column>,
        column_types: Vec<String>,
        input: PlanNode,
    ) -> Self {
        debug_assert_eq!(columns.len(), column_types.len());
        Self {
            selectors,
            op: PlanOp::Project {
                columns,
                column_types,
                input: Box::new(input),
            },
        }
    }

    pub fn dup_remove(input: PlanNode) -> Self {
        Self {
            selectors: input.selectors.clone(),
            op: PlanOp::DupRemove {
                input: Box::new(input),
            },
        }
    }

    pub fn sort(orderings: Vec<Ordering>, input: PlanNode) -> Self {
        Self {
            selectors: input.selectors.clone(),
            op: PlanOp::Sort {
                orderings,
                input: Box::new(input),
            },
        }
    }

    pub fn limit(row_limit: Option<usize>, offset: Option<usize>, input: PlanNode) -> Self {
        Self {
            selectors: input.selectors.clone(),
            op: PlanOp::Limit {
                row_limit,
                offset,
                input: Box::new(input),
            },
        }
    }

    pub fn set_operation(
        operation: SetOperation,
        all: bool,
        left: PlanNode,
        right: PlanNode,
    ) -> Self {
        Self {
            selectors: union(&left, &right),
            op: PlanOp::SetOperation {
                operation,
                all,
                left: Box::new(left),
                right: Box::new(right),
            },
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn node_type(&self) -> PlanNodeType {
        match &self.op {
            PlanOp::Source { .. } => PlanNodeType::Source,
            PlanOp::Join { .. } => PlanNodeType::Join,
            PlanOp::Select { .. } => PlanNodeType::Select,
            PlanOp::Project { .. } => PlanNodeType::Project,
            PlanOp::DupRemove { .. } => PlanNodeType::DupRemove,
            PlanOp::Sort { .. } => PlanNodeType::Sort,
            PlanOp::Limit { .. } => PlanNodeType::Limit,
            PlanOp::SetOperation { .. } => PlanNodeType::SetOperation,
        }
    }

    pub fn is(&self, node_type: PlanNodeType) -> bool {
        self.node_type() == node_type
    }

    pub fn op(&self) -> &PlanOp {
        &self.op
    }

    pub fn selectors(&self) -> &BTreeSet<SelectorName> {
        &self.selectors
    }

    /// Children in order: none for SOURCE, two for JOIN and SET_OPERATION,
    /// one for every other kind
    pub fn children(&self) -> Vec<&PlanNode> {
        match &self.op {
            PlanOp::Source { .. } => Vec::new(),
            PlanOp::Join { left, right, .. } | PlanOp::SetOperation { left, right, .. } => {
                vec![left.as_ref(), right.as_ref()]
            }
            PlanOp::Select { input, .. }
            | PlanOp::Project { input, .. }
            | PlanOp::DupRemove { input }
            | PlanOp::Sort { input, .. }
            | PlanOp::Limit { input, .. } => vec![input.as_ref()],
        }
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    pub fn first_child(&self) -> Option<&PlanNode> {
        self.children().first().copied()
    }

    pub fn last_child(&self) -> Option<&PlanNode> {
        self.children().last().copied()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// This node and all of its descendants, in pre-order
    pub fn pre_order(&self) -> Vec<&PlanNode> {
        let mut nodes = Vec::new();
        self.collect_pre_order(&mut nodes);
        nodes
    }

    fn collect_pre_order<'a>(&'a self, nodes: &mut Vec<&'a PlanNode>) {
        nodes.push(self);
        for child in self.children() {
            child.collect_pre_order(nodes);
        }
    }

    /// First node of the given type at or below this node, in pre-order
    pub fn find_at_or_below(&self, node_type: PlanNodeType) -> Option<&PlanNode> {
        self.pre_order().into_iter().find(|node| node.is(node_type))
    }

    /// All nodes of the given type at or below this node, in pre-order
    pub fn find_all_at_or_below(&self, node_type: PlanNodeType) -> Vec<&PlanNode> {
        self.pre_order()
            .into_iter()
            .filter(|node| node.is(node_type))
            .collect()
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(|child| child.depth())
            .max()
            .unwrap_or(0)
    }

    /// Node types along the first-child path from this node down to a leaf
    pub fn first_child_path(&self) -> Vec<PlanNodeType> {
        let mut path = vec![self.node_type()];
        let mut current = self;
        while let Some(child) = current.first_child() {
            path.push(child.node_type());
            current = child;
        }
        path
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        for _ in 0..indent {
            f.write_str("  ")?;
        }
        self.write_node(f)?;
        f.write_str("\n")?;
        for child in self.children() {
            child.write_tree(f, indent + 1)?;
        }
        Ok(())
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.node_type().symbol())?;
        if !self.selectors.is_empty() {
            let names: Vec<&str> = self.selectors.iter().map(SelectorName::name).collect();
            write!(f, " [{}]", names.join(","))?;
        }
        match &self.op {
            PlanOp::Source {
                name,
                alias,
                columns,
            } => {
                write!(f, " <SOURCE_NAME={}", name)?;
                if let Some(alias) = alias {
                    write!(f, ", SOURCE_ALIAS={}", alias)?;
                }
                if let Some(columns) = columns {
                    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
                    write!(f, ", SOURCE_COLUMNS=[{}]", names.join(", "))?;
                }
                f.write_str(">")
            }
            PlanOp::Join {
                join_type,
                algorithm,
                condition,
                ..
            } => write!(
                f,
                " <JOIN_TYPE={}, JOIN_ALGORITHM={}, JOIN_CONDITION={}>",
                join_type, algorithm, condition
            ),
            PlanOp::Select { criteria, .. } => write!(f, " <SELECT_CRITERIA={}>", criteria),
            PlanOp::Project {
                columns,
                column_types,
                ..
            } => {
                f.write_str(" <PROJECT_COLUMNS=[")?;
                write_list(f, columns)?;
                write!(f, "], PROJECT_COLUMN_TYPES=[{}]>", column_types.join(", "))
            }
            PlanOp::DupRemove { .. } => Ok(()),
            PlanOp::Sort { orderings, .. } => {
                f.write_str(" <SORT_ORDER_BY=[")?;
                write_list(f, orderings)?;
                f.write_str("]>")
            }
            PlanOp::Limit {
                row_limit, offset, ..
            } => {
                let mut properties = Vec::new();
                if let Some(rows) = row_limit {
                    properties.push(format!("LIMIT_COUNT={}", rows));
                }
                if let Some(offset) = offset {
                    properties.push(format!("LIMIT_OFFSET={}", offset));
                }
                write!(f, " <{}>", properties.join(", "))
            }
            PlanOp::SetOperation { operation, all, .. } => {
                write!(f, " <SET_OPERATION={}, SET_USE_ALL={}>", operation, all)
            }
        }
    }
}

fn union(left: &PlanNode, right: &PlanNode) -> BTreeSet<SelectorName> {
    left.selectors.union(&right.selectors).cloned().collect()
}

impl fmt::Display for PlanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DynamicOperand, Operator, StaticOperand};

    fn source(name: &str) -> PlanNode {
        PlanNode::source(
            name.into(),
            None,
            Some(vec![TableColumn::new("c1", "STRING")]),
        )
    }

    #[test]
    fn test_source_selector_prefers_alias() {
        let node = PlanNode::source("nt:base".into(), Some("b".into()), None);
        assert_eq!(node.selectors(), &BTreeSet::from([SelectorName::new("b")]));
        assert_eq!(node.child_count(), 0);
    }

    #[test]
    fn test_join_and_set_operation_have_two_children() {
        let join = PlanNode::join(
            JoinType::Inner,
            JoinAlgorithm::NestedLoop,
            JoinCondition::equi("A", "id", "B", "id"),
            source("A"),
            source("B"),
        );
        assert_eq!(join.child_count(), 2);
        assert_eq!(join.selectors().len(), 2);

        let set = PlanNode::set_operation(SetOperation::Union, false, join, source("C"));
        assert_eq!(set.child_count(), 2);
        let names: Vec<&str> = set.selectors().iter().map(SelectorName::name).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_single_child_wrappers_keep_child_selectors() {
        let limited = PlanNode::limit(Some(5), None, PlanNode::dup_remove(source("A")));
        assert_eq!(limited.selectors(), source("A").selectors());
        assert_eq!(
            limited.first_child_path(),
            vec![PlanNodeType::Limit, PlanNodeType::DupRemove, PlanNodeType::Source]
        );
    }

    #[test]
    fn test_find_all_at_or_below_is_pre_order() {
        let criteria = Constraint::comparison(
            DynamicOperand::property_value("A", "c1"),
            Operator::EqualTo,
            StaticOperand::literal(1),
        );
        let plan = PlanNode::select(
            criteria,
            PlanNode::join(
                JoinType::Inner,
                JoinAlgorithm::NestedLoop,
                JoinCondition::equi("A", "id", "B", "id"),
                source("A"),
                source("B"),
            ),
        );

        let sources = plan.find_all_at_or_below(PlanNodeType::Source);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].selectors(), source("A").selectors());
        assert!(plan.find_at_or_below(PlanNodeType::Sort).is_none());
        assert_eq!(plan.depth(), 3);
    }

    #[test]
    fn test_tree_rendering() {
        let plan = PlanNode::limit(Some(10), Some(2), source("A"));
        assert_eq!(
            plan.to_string(),
            "Limit [A] <LIMIT_COUNT=10, LIMIT_OFFSET=2>\n  Source [A] <SOURCE_NAME=A, SOURCE_COLUMNS=[c1]>\n"
        );
    }
}
