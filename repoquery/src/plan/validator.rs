// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Post-planning validation of selector and column references
//!
//! Checks the criteria, orderings and join conditions of a simple query
//! against the tables resolved while planning it. Projected columns are
//! checked by the planner itself.

use super::canonical::UsedSelectors;
use crate::context::QueryContext;
use crate::model::visitors::{walk_query, Visitor};
use crate::model::{Constraint, DynamicOperand, JoinCondition, Query, SelectorName};
use crate::problems::{ProblemKind, Problems};
use crate::schema::Table;

/// Record a problem for every unresolvable reference in `query`
pub(crate) fn validate(context: &mut QueryContext, query: &Query, used: &UsedSelectors<'_>) {
    let validate_columns = context.hints().validate_column_existence;
    let mut validator = ReferenceValidator {
        used,
        validate_columns,
        problems: context.problems_mut(),
    };
    walk_query(&mut validator, query);
}

struct ReferenceValidator<'u, 's, 'p> {
    used: &'u UsedSelectors<'s>,
    validate_columns: bool,
    problems: &'p mut Problems,
}

impl<'u, 's, 'p> ReferenceValidator<'u, 's, 'p> {
    fn check_selector(&mut self, selector: &SelectorName) -> Option<&'s Table> {
        let table = self.used.get(selector);
        if table.is_none() {
            self.problems
                .add_error(ProblemKind::table_does_not_exist(selector));
        }
        table
    }

    fn check_column(&mut self, selector: &SelectorName, property: &str) {
        let Some(table) = self.check_selector(selector) else {
            return;
        };
        if self.validate_columns && !table.has_extra_columns() && !table.has_column(property) {
            self.problems
                .add_error(ProblemKind::column_does_not_exist(property, selector));
        }
    }

    fn check_full_text_search(&mut self, selector: &SelectorName, property: Option<&str>) {
        let Some(table) = self.check_selector(selector) else {
            return;
        };
        match property {
            None => {
                if !table.is_full_text_searchable() {
                    self.problems.add_error(ProblemKind::TableIsNotSearchable {
                        table: selector.clone(),
                    });
                }
            }
            Some(property) => match table.column(property) {
                None => {
                    if self.validate_columns && !table.has_extra_columns() {
                        self.problems
                            .add_error(ProblemKind::column_does_not_exist(property, selector));
                    }
                }
                Some(column) if !column.full_text_searchable => {
                    self.problems.add_error(ProblemKind::ColumnIsNotSearchable {
                        column: property.to_string(),
                        table: selector.clone(),
                    });
                }
                Some(_) => {}
            },
        }
    }
}

impl<'a, 'u, 's, 'p> Visitor<'a> for ReferenceValidator<'u, 's, 'p> {
    fn visit_constraint(&mut self, constraint: &'a Constraint) {
        match constraint {
            Constraint::PropertyExistence { selector, property } => {
                self.check_column(selector, property)
            }
            Constraint::FullTextSearch {
                selector, property, ..
            } => self.check_full_text_search(selector, property.as_deref()),
            Constraint::SameNode { selector, .. }
            | Constraint::ChildNode { selector, .. }
            | Constraint::DescendantNode { selector, .. } => {
                self.check_selector(selector);
            }
            _ => {}
        }
    }

    fn visit_operand(&mut self, operand: &'a DynamicOperand) {
        match operand {
            DynamicOperand::PropertyValue { selector, property }
            | DynamicOperand::Length { selector, property } => {
                self.check_column(selector, property)
            }
            DynamicOperand::ReferenceValue {
                selector,
                property: Some(property),
            } => self.check_column(selector, property),
            DynamicOperand::ReferenceValue {
                selector,
                property: None,
            }
            | DynamicOperand::NodeName { selector }
            | DynamicOperand::NodeLocalName { selector }
            | DynamicOperand::NodeDepth { selector }
            | DynamicOperand::NodePath { selector }
            | DynamicOperand::FullTextSearchScore { selector } => {
                self.check_selector(selector);
            }
            DynamicOperand::LowerCase { .. }
            | DynamicOperand::UpperCase { .. }
            | DynamicOperand::Arithmetic { .. } => {}
        }
    }

    fn visit_join_condition(&mut self, condition: &'a JoinCondition) {
        match condition {
            JoinCondition::Equi {
                selector1,
                property1,
                selector2,
                property2,
            } => {
                self.check_column(selector1, property1);
                self.check_column(selector2, property2);
            }
            JoinCondition::SameNode {
                selector1,
                selector2,
                ..
            } => {
                self.check_selector(selector1);
                self.check_selector(selector2);
            }
            JoinCondition::ChildNode {
                parent_selector,
                child_selector,
            } => {
                self.check_selector(parent_selector);
                self.check_selector(child_selector);
            }
            JoinCondition::DescendantNode {
                ancestor_selector,
                descendant_selector,
            } => {
                self.check_selector(ancestor_selector);
                self.check_selector(descendant_selector);
            }
        }
    }
}
