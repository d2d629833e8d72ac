// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Walking the query model
//!
//! [`Visitor`] receives every constraint, operand and join condition reached
//! by the `walk_*` functions, in pre-order. The helpers at the bottom of the
//! module are the traversals the planner needs: selector references and
//! full-text search detection.

use std::collections::{BTreeMap, BTreeSet};

use super::{
    Column, Constraint, DynamicOperand, JoinCondition, Ordering, Query, QueryCommand,
    SelectorName, Source,
};

/// Callbacks for the parts of a query reached by a walk
///
/// Every method has an empty default so visitors implement only what they need.
pub trait Visitor<'a> {
    fn visit_constraint(&mut self, _constraint: &'a Constraint) {}
    fn visit_operand(&mut self, _operand: &'a DynamicOperand) {}
    fn visit_join_condition(&mut self, _condition: &'a JoinCondition) {}
    fn visit_source(&mut self, _source: &'a Source) {}
    fn visit_column(&mut self, _column: &'a Column) {}
}

pub fn walk_constraint<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, constraint: &'a Constraint) {
    visitor.visit_constraint(constraint);
    match constraint {
        Constraint::And { left, right } | Constraint::Or { left, right } => {
            walk_constraint(visitor, left);
            walk_constraint(visitor, right);
        }
        Constraint::Not { constraint } => walk_constraint(visitor, constraint),
        Constraint::Comparison { operand, .. }
        | Constraint::Between { operand, .. }
        | Constraint::SetCriteria { operand, .. } => walk_operand(visitor, operand),
        Constraint::PropertyExistence { .. }
        | Constraint::FullTextSearch { .. }
        | Constraint::SameNode { .. }
        | Constraint::ChildNode { .. }
        | Constraint::DescendantNode { .. } => {}
    }
}

pub fn walk_operand<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, operand: &'a DynamicOperand) {
    visitor.visit_operand(operand);
    match operand {
        DynamicOperand::LowerCase { operand } | DynamicOperand::UpperCase { operand } => {
            walk_operand(visitor, operand)
        }
        DynamicOperand::Arithmetic { left, right, .. } => {
            walk_operand(visitor, left);
            walk_operand(visitor, right);
        }
        DynamicOperand::PropertyValue { .. }
        | DynamicOperand::Length { .. }
        | DynamicOperand::NodeName { .. }
        | DynamicOperand::NodeLocalName { .. }
        | DynamicOperand::NodeDepth { .. }
        | DynamicOperand::NodePath { .. }
        | DynamicOperand::FullTextSearchScore { .. }
        | DynamicOperand::ReferenceValue { .. } => {}
    }
}

pub fn walk_source<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, source: &'a Source) {
    visitor.visit_source(source);
    if let Source::Join {
        left,
        right,
        condition,
        ..
    } = source
    {
        walk_source(visitor, left);
        walk_source(visitor, right);
        visitor.visit_join_condition(condition);
    }
}

pub fn walk_ordering<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, ordering: &'a Ordering) {
    walk_operand(visitor, &ordering.operand);
}

/// Walks the source, constraint, columns and orderings of a simple query
pub fn walk_query<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, query: &'a Query) {
    walk_source(visitor, &query.source);
    if let Some(constraint) = &query.constraint {
        walk_constraint(visitor, constraint);
    }
    for column in &query.columns {
        visitor.visit_column(column);
    }
    for ordering in &query.orderings {
        walk_ordering(visitor, ordering);
    }
}

/// Collects the selector names referenced by everything it visits
#[derive(Debug, Default)]
pub struct SelectorCollector {
    pub selectors: BTreeSet<SelectorName>,
}

impl<'a> Visitor<'a> for SelectorCollector {
    fn visit_constraint(&mut self, constraint: &'a Constraint) {
        match constraint {
            Constraint::PropertyExistence { selector, .. }
            | Constraint::FullTextSearch { selector, .. }
            | Constraint::SameNode { selector, .. }
            | Constraint::ChildNode { selector, .. }
            | Constraint::DescendantNode { selector, .. } => {
                self.selectors.insert(selector.clone());
            }
            _ => {}
        }
    }

    fn visit_operand(&mut self, operand: &'a DynamicOperand) {
        if let Some(selector) = operand_selector(operand) {
            self.selectors.insert(selector.clone());
        }
    }

    fn visit_join_condition(&mut self, condition: &'a JoinCondition) {
        let (first, second) = join_condition_selectors(condition);
        self.selectors.insert(first.clone());
        self.selectors.insert(second.clone());
    }

    fn visit_source(&mut self, source: &'a Source) {
        if let Source::Selector(selector) = source {
            self.selectors.insert(selector.alias_or_name().clone());
        }
    }

    fn visit_column(&mut self, column: &'a Column) {
        self.selectors.insert(column.selector.clone());
    }
}

/// Selector directly named by an operand; `None` for composite operands
pub fn operand_selector(operand: &DynamicOperand) -> Option<&SelectorName> {
    match operand {
        DynamicOperand::PropertyValue { selector, .. }
        | DynamicOperand::Length { selector, .. }
        | DynamicOperand::NodeName { selector }
        | DynamicOperand::NodeLocalName { selector }
        | DynamicOperand::NodeDepth { selector }
        | DynamicOperand::NodePath { selector }
        | DynamicOperand::FullTextSearchScore { selector }
        | DynamicOperand::ReferenceValue { selector, .. } => Some(selector),
        DynamicOperand::LowerCase { .. }
        | DynamicOperand::UpperCase { .. }
        | DynamicOperand::Arithmetic { .. } => None,
    }
}

pub fn join_condition_selectors(condition: &JoinCondition) -> (&SelectorName, &SelectorName) {
    match condition {
        JoinCondition::Equi {
            selector1,
            selector2,
            ..
        }
        | JoinCondition::SameNode {
            selector1,
            selector2,
            ..
        } => (selector1, selector2),
        JoinCondition::ChildNode {
            parent_selector,
            child_selector,
        } => (parent_selector, child_selector),
        JoinCondition::DescendantNode {
            ancestor_selector,
            descendant_selector,
        } => (ancestor_selector, descendant_selector),
    }
}

/// Selector names referenced anywhere inside a constraint
pub fn selectors_referenced_by_constraint(constraint: &Constraint) -> BTreeSet<SelectorName> {
    let mut collector = SelectorCollector::default();
    walk_constraint(&mut collector, constraint);
    collector.selectors
}

#[derive(Default)]
struct AliasCollector {
    names: BTreeMap<SelectorName, SelectorName>,
}

impl<'a> Visitor<'a> for AliasCollector {
    fn visit_source(&mut self, source: &'a Source) {
        if let Source::Selector(selector) = source {
            self.names
                .entry(selector.alias_or_name().clone())
                .or_insert_with(|| selector.name.clone());
        }
    }
}

fn collect_aliases(collector: &mut AliasCollector, command: &QueryCommand) {
    match command {
        QueryCommand::Query(query) => walk_source(collector, &query.source),
        QueryCommand::SetQuery(query) => {
            collect_aliases(collector, &query.left);
            collect_aliases(collector, &query.right);
        }
    }
}

/// Relation names keyed by the selector each source is known by
///
/// Unaliased sources map to themselves. The first source wins when two
/// share a selector.
pub fn selector_names_by_alias(command: &QueryCommand) -> BTreeMap<SelectorName, SelectorName> {
    let mut collector = AliasCollector::default();
    collect_aliases(&mut collector, command);
    collector.names
}

#[derive(Default)]
struct FullTextSearchDetector {
    found: bool,
}

impl<'a> Visitor<'a> for FullTextSearchDetector {
    fn visit_constraint(&mut self, constraint: &'a Constraint) {
        if matches!(constraint, Constraint::FullTextSearch { .. }) {
            self.found = true;
        }
    }
}

/// Whether a full-text search appears anywhere inside the constraint
pub fn contains_full_text_search(constraint: &Constraint) -> bool {
    let mut detector = FullTextSearchDetector::default();
    walk_constraint(&mut detector, constraint);
    detector.found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{JoinType, Operator, StaticOperand};

    fn names(names: &[&str]) -> BTreeSet<SelectorName> {
        names.iter().map(|name| SelectorName::new(*name)).collect()
    }

    #[test]
    fn test_selectors_in_nested_constraint() {
        let constraint = Constraint::or(
            Constraint::comparison(
                DynamicOperand::LowerCase {
                    operand: Box::new(DynamicOperand::property_value("a", "title")),
                },
                Operator::EqualTo,
                StaticOperand::literal("x"),
            ),
            Constraint::not(Constraint::full_text_search("b", Some("body"), "rust")),
        );

        assert_eq!(selectors_referenced_by_constraint(&constraint), names(&["a", "b"]));
    }

    #[test]
    fn test_full_text_search_detected_under_not() {
        let constraint = Constraint::not(Constraint::full_text_search("b", None, "rust"));
        assert!(contains_full_text_search(&constraint));

        let plain = Constraint::PropertyExistence {
            selector: "b".into(),
            property: "title".to_string(),
        };
        assert!(!contains_full_text_search(&plain));
    }

    #[test]
    fn test_walk_source_visits_join_condition() {
        let source = Source::join(
            Source::aliased("nt:file", "f"),
            JoinType::Inner,
            Source::named("nt:folder"),
            JoinCondition::ChildNode {
                parent_selector: "nt:folder".into(),
                child_selector: "f".into(),
            },
        );

        let mut collector = SelectorCollector::default();
        walk_source(&mut collector, &source);
        assert_eq!(collector.selectors, names(&["f", "nt:folder"]));
    }

    #[test]
    fn test_selector_names_by_alias_covers_set_operands() {
        let command = QueryCommand::from(crate::model::SetQuery::new(
            Query::new(Source::aliased("nt:file", "f")),
            crate::model::SetOperation::Union,
            Query::new(Source::named("nt:folder")),
        ));

        let names = selector_names_by_alias(&command);
        assert_eq!(names.get(&"f".into()), Some(&SelectorName::new("nt:file")));
        assert_eq!(
            names.get(&"nt:folder".into()),
            Some(&SelectorName::new("nt:folder"))
        );
        assert_eq!(names.len(), 2);
    }
}
