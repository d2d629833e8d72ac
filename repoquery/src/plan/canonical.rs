// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Canonical planner - converts query models into canonical plan trees
//!
//! Planning is a pure function of the query, the catalog and the context:
//! it never fails on semantic errors. Unknown tables and columns are recorded
//! in the context's [`Problems`] and planning carries on, so callers always
//! receive a structurally valid tree.

use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::hints::PlanHints;
use super::node::PlanNode;
use super::validator;
use crate::config::PlannerConfig;
use crate::context::QueryContext;
use crate::model::visitors::contains_full_text_search;
use crate::model::{
    Column, Constraint, JoinType, Limit, Ordering, Query, QueryCommand, SelectorName, SetQuery,
    Source,
};
use crate::problems::{ProblemKind, Problems};
use crate::schema::{Schemata, Table};
use crate::types::{StandardTypeSystem, TypeSystem};

/// Produces a plan for a query command
pub trait Planner {
    /// Create a plan for `query`, recording problems and hints in `context`
    fn create_plan(&self, context: &mut QueryContext, query: &QueryCommand) -> PlanNode;
}

/// Result of planning one query with a fresh context
#[derive(Debug, Clone, Serialize)]
pub struct PlanOutcome {
    pub plan: PlanNode,
    pub hints: PlanHints,
    pub problems: Problems,
}

/// Tables resolved for the selectors of one query, in registration order
#[derive(Debug, Default)]
pub(crate) struct UsedSelectors<'s> {
    entries: Vec<(SelectorName, &'s Table)>,
}

impl<'s> UsedSelectors<'s> {
    /// Register the table for a selector; a selector already present keeps its first table
    fn register(&mut self, selector: SelectorName, table: &'s Table) -> bool {
        if self.get(&selector).is_some() {
            return false;
        }
        self.entries.push((selector, table));
        true
    }

    pub(crate) fn get(&self, selector: &SelectorName) -> Option<&'s Table> {
        self.entries
            .iter()
            .find(|(name, _)| name == selector)
            .map(|(_, table)| *table)
    }

    fn iter(&self) -> impl Iterator<Item = (&SelectorName, &'s Table)> {
        self.entries.iter().map(|(name, table)| (name, *table))
    }
}

/// Planner producing the canonical plan shape
///
/// ```text
/// Limit -> Sort -> DupRemove -> Project -> Select* -> (Source | Join)
/// ```
///
/// Each stage is present only when the query uses the matching feature.
#[derive(Debug, Clone, Default)]
pub struct CanonicalPlanner {
    config: PlannerConfig,
}

impl Planner for CanonicalPlanner {
    fn create_plan(&self, context: &mut QueryContext, query: &QueryCommand) -> PlanNode {
        match query {
            QueryCommand::Query(query) => self.create_canonical_plan(context, query),
            QueryCommand::SetQuery(query) => self.create_set_query_plan(context, query),
        }
    }
}

impl CanonicalPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Create a fresh context whose hints follow this planner's configuration
    pub fn new_context(
        &self,
        schemata: Arc<dyn Schemata>,
        type_system: Arc<dyn TypeSystem>,
    ) -> QueryContext {
        let hints = PlanHints {
            validate_column_existence: self.config.validate_column_existence,
            ..PlanHints::default()
        };
        QueryContext::with_hints(schemata, type_system, hints)
    }

    /// Plan one query with a fresh context
    pub fn plan(
        &self,
        schemata: Arc<dyn Schemata>,
        type_system: Arc<dyn TypeSystem>,
        query: &QueryCommand,
    ) -> PlanOutcome {
        let mut context = self.new_context(schemata, type_system);
        let plan = self.create_plan(&mut context, query);
        let (hints, problems) = context.into_parts();
        PlanOutcome {
            plan,
            hints,
            problems,
        }
    }

    /// Plan a batch of queries in parallel, one fresh context per query
    ///
    /// Outcomes are returned in the order of `queries`.
    pub fn plan_all(
        &self,
        schemata: Arc<dyn Schemata>,
        type_system: Arc<dyn TypeSystem>,
        queries: &[QueryCommand],
    ) -> Vec<PlanOutcome> {
        log::debug!("Planning batch of {} queries", queries.len());
        queries
            .par_iter()
            .map(|query| self.plan(Arc::clone(&schemata), Arc::clone(&type_system), query))
            .collect()
    }

    // ========================================================================
    // Query commands
    // ========================================================================

    fn create_canonical_plan(&self, context: &mut QueryContext, query: &Query) -> PlanNode {
        log::debug!("Creating canonical plan for: {}", query);

        // The selector map borrows tables from this handle, not from the context
        let schemata = Arc::clone(context.schemata());
        let mut used_selectors = UsedSelectors::default();

        let mut plan =
            self.create_plan_node(context, schemata.as_ref(), &query.source, &mut used_selectors);
        plan = self.attach_criteria(context, plan, query.constraint.as_ref());
        plan = self.attach_project(context, plan, &query.columns, &used_selectors);
        if query.distinct {
            plan = self.attach_duplicate_removal(plan);
        }
        plan = self.attach_sorting(context, plan, &query.orderings);
        plan = self.attach_limits(context, plan, &query.limits);

        validator::validate(context, query, &used_selectors);
        plan
    }

    fn create_set_query_plan(&self, context: &mut QueryContext, query: &SetQuery) -> PlanNode {
        log::debug!("Creating canonical plan for set query: {}", query);

        let left = self.create_plan(context, &query.left);
        let right = self.create_plan(context, &query.right);

        context.hints_mut().has_set_query = true;
        let mut plan = PlanNode::set_operation(query.operation, query.all, left, right);

        plan = self.attach_sorting(context, plan, &query.orderings);
        self.attach_limits(context, plan, &query.limits)
    }

    // ========================================================================
    // Stages
    // ========================================================================

    /// Create the SOURCE or JOIN subtree for the query's source
    fn create_plan_node<'s>(
        &self,
        context: &mut QueryContext,
        schemata: &'s dyn Schemata,
        source: &Source,
        used_selectors: &mut UsedSelectors<'s>,
    ) -> PlanNode {
        match source {
            Source::Selector(selector) => {
                let columns = match schemata.find_table(&selector.name) {
                    Some(table) => {
                        if table.is_view() {
                            context.hints_mut().has_view = true;
                        }
                        let alias = selector.alias_or_name();
                        if !used_selectors.register(alias.clone(), table) {
                            if let Some(first) = used_selectors.get(alias) {
                                context
                                    .problems_mut()
                                    .add_warning(ProblemKind::DuplicateSelector {
                                        selector: alias.clone(),
                                        table: first.name().clone(),
                                        ignored: table.name().clone(),
                                    });
                            }
                        }
                        Some(table.columns().to_vec())
                    }
                    None => {
                        context
                            .problems_mut()
                            .add_error(ProblemKind::table_does_not_exist(&selector.name));
                        None
                    }
                };
                log::trace!("Source node for {}", selector);
                PlanNode::source(selector.name.clone(), selector.alias.clone(), columns)
            }
            Source::Join {
                left,
                right,
                join_type,
                condition,
            } => {
                let hints = context.hints_mut();
                hints.has_join = true;
                if *join_type == JoinType::LeftOuter {
                    hints.has_optional_join = true;
                }

                let left = self.create_plan_node(context, schemata, left, used_selectors);
                let right = self.create_plan_node(context, schemata, right, used_selectors);
                log::trace!("Join node: {} ON {}", join_type, condition);
                PlanNode::join(
                    *join_type,
                    self.config.default_join_algorithm,
                    condition.clone(),
                    left,
                    right,
                )
            }
        }
    }

    /// Attach one SELECT node per AND-ed constraint above the source/join subtree
    ///
    /// Nodes are stacked from the last conjunct to the first, so the
    /// outermost SELECT holds the first constraint in source order.
    fn attach_criteria(
        &self,
        context: &mut QueryContext,
        mut plan: PlanNode,
        constraint: Option<&Constraint>,
    ) -> PlanNode {
        let Some(constraint) = constraint else {
            return plan;
        };
        context.hints_mut().has_criteria = true;

        let conjuncts = constraint.conjuncts();
        log::trace!("Constraint split into {} conjuncts", conjuncts.len());
        for criteria in conjuncts.into_iter().rev() {
            if contains_full_text_search(criteria) {
                context.hints_mut().has_full_text_search = true;
            }
            plan = PlanNode::select(criteria.clone(), plan);
        }
        plan
    }

    /// Attach the PROJECT node, resolving and validating the requested columns
    fn attach_project(
        &self,
        context: &mut QueryContext,
        plan: PlanNode,
        columns: &[Column],
        used_selectors: &UsedSelectors<'_>,
    ) -> PlanNode {
        let mut selectors = BTreeSet::new();
        let mut new_columns = Vec::new();
        let mut new_types = Vec::new();

        if columns.is_empty() {
            // SELECT *: every column of every resolved source
            for (selector, table) in used_selectors.iter() {
                selectors.insert(selector.clone());
                all_columns_for(table, selector, &mut new_columns, &mut new_types);
            }
            return PlanNode::project(selectors, new_columns, new_types, plan);
        }

        let validate_columns = context.hints().validate_column_existence;
        let fallback_type = context.type_system().string_type_name().to_string();
        for column in columns {
            selectors.insert(column.selector.clone());

            let Some(table) = used_selectors.get(&column.selector) else {
                context
                    .problems_mut()
                    .add_error(ProblemKind::table_does_not_exist(&column.selector));
                continue;
            };

            if column.is_all_properties() {
                all_columns_for(table, &column.selector, &mut new_columns, &mut new_types);
                continue;
            }

            if !new_columns.contains(column) {
                let type_name = table
                    .column(&column.property)
                    .map(|c| c.type_name.clone())
                    .unwrap_or_else(|| fallback_type.clone());
                new_columns.push(column.clone());
                new_types.push(type_name);
            }

            if validate_columns && !table.has_extra_columns() && !table.has_column(&column.property)
            {
                context.problems_mut().add_error(ProblemKind::column_does_not_exist(
                    &column.property,
                    &column.selector,
                ));
            }
        }
        PlanNode::project(selectors, new_columns, new_types, plan)
    }

    fn attach_duplicate_removal(&self, plan: PlanNode) -> PlanNode {
        PlanNode::dup_remove(plan)
    }

    fn attach_sorting(
        &self,
        context: &mut QueryContext,
        plan: PlanNode,
        orderings: &[Ordering],
    ) -> PlanNode {
        if orderings.is_empty() {
            return plan;
        }
        context.hints_mut().has_sort = true;
        PlanNode::sort(orderings.to_vec(), plan)
    }

    /// Attach a LIMIT node when a row cap or a nonzero offset is in effect
    fn attach_limits(&self, context: &mut QueryContext, plan: PlanNode, limits: &Limit) -> PlanNode {
        if limits.is_empty() {
            return plan;
        }
        context.hints_mut().has_limit = true;
        let offset = limits.is_offset().then_some(limits.offset);
        PlanNode::limit(limits.row_limit, offset, plan)
    }
}

/// Append the `SELECT *` columns of `table` under `selector`, skipping duplicates
fn all_columns_for(
    table: &Table,
    selector: &SelectorName,
    columns: &mut Vec<Column>,
    types: &mut Vec<String>,
) {
    for table_column in table.select_star_columns() {
        let column = Column::new(selector.clone(), table_column.name.as_str());
        if !columns.contains(&column) {
            columns.push(column);
            types.push(table_column.type_name.clone());
        }
    }
}

/// Plan one query with a fresh context and the standard type system
pub fn plan_query(
    schemata: Arc<dyn Schemata>,
    config: &PlannerConfig,
    query: &QueryCommand,
) -> PlanOutcome {
    CanonicalPlanner::with_config(config.clone()).plan(schemata, Arc::new(StandardTypeSystem), query)
}
