// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory, immutable schema catalog and its builder

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::{Schemata, Table, TableColumn};
use crate::config::PlannerConfig;
use crate::error::{RepoQueryError, Result};
use crate::model::visitors::selector_names_by_alias;
use crate::model::{QueryCommand, SelectorName};
use crate::plan::{CanonicalPlanner, PlanNode, PlanNodeType, PlanOp};
use crate::types::{StandardTypeSystem, TypeSystem};

/// A [`Schemata`] whose tables are fixed once built
#[derive(Debug, Clone, Default)]
pub struct ImmutableSchemata {
    tables: BTreeMap<SelectorName, Table>,
}

impl ImmutableSchemata {
    /// Start building a catalog using the standard type system
    pub fn builder() -> SchemataBuilder {
        SchemataBuilder::new(Arc::new(StandardTypeSystem))
    }

    /// Start building a catalog whose column types come from `type_system`
    pub fn builder_with(type_system: Arc<dyn TypeSystem>) -> SchemataBuilder {
        SchemataBuilder::new(type_system)
    }

    /// Tables ordered by name
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl Schemata for ImmutableSchemata {
    fn find_table(&self, name: &SelectorName) -> Option<&Table> {
        self.tables.get(name)
    }
}

/// Builder of [`ImmutableSchemata`]
///
/// Methods chain by value. Mistakes such as marking a column of an unknown
/// table are collected and reported together by [`SchemataBuilder::build`].
#[derive(Debug)]
pub struct SchemataBuilder {
    type_system: Arc<dyn TypeSystem>,
    tables: BTreeMap<SelectorName, Table>,
    views: BTreeMap<SelectorName, QueryCommand>,
    views_with_extra_columns: BTreeSet<SelectorName>,
    errors: Vec<String>,
}

impl SchemataBuilder {
    fn new(type_system: Arc<dyn TypeSystem>) -> Self {
        Self {
            type_system,
            tables: BTreeMap::new(),
            views: BTreeMap::new(),
            views_with_extra_columns: BTreeSet::new(),
            errors: Vec::new(),
        }
    }

    /// Add a view defined by a query over tables and other views
    ///
    /// The view's columns, with their types and searchability, are taken
    /// from the columns its definition projects. Definitions are resolved by
    /// [`SchemataBuilder::build`], so views may be added in any order.
    pub fn add_view(
        mut self,
        name: impl Into<SelectorName>,
        definition: impl Into<QueryCommand>,
    ) -> Self {
        self.views.insert(name.into(), definition.into());
        self
    }

    /// Add a table whose columns all have the default type
    ///
    /// Adding a table that already exists appends the columns it lacks.
    pub fn add_table(mut self, name: impl Into<SelectorName>, columns: &[&str]) -> Self {
        let default_type = self.type_system.default_type_name().to_string();
        let table = self
            .tables
            .entry(name.into())
            .or_insert_with_key(|name| Table::new(name.clone(), Vec::new()));
        for column in columns {
            if !table.has_column(column) {
                table
                    .columns_mut()
                    .push(TableColumn::new(*column, default_type.clone()));
            }
        }
        self
    }

    /// Add (or retype) one column, creating the table when needed
    pub fn add_column(
        mut self,
        table_name: impl Into<SelectorName>,
        column: &str,
        type_name: &str,
    ) -> Self {
        let table_name = table_name.into();
        if !self.type_system.is_known_type(type_name) {
            self.errors.push(format!(
                "Unknown type '{}' for column '{}' on table '{}'",
                type_name, column, table_name
            ));
            return self;
        }
        let type_name = type_name.to_ascii_uppercase();
        let table = self
            .tables
            .entry(table_name)
            .or_insert_with_key(|name| Table::new(name.clone(), Vec::new()));
        match table.columns_mut().iter_mut().find(|c| c.name == column) {
            Some(existing) => existing.type_name = type_name,
            None => table.columns_mut().push(TableColumn::new(column, type_name)),
        }
        self
    }

    /// Allow full-text searches on a column
    pub fn make_searchable(mut self, table_name: impl Into<SelectorName>, column: &str) -> Self {
        let table_name = table_name.into();
        let target = self
            .tables
            .get_mut(&table_name)
            .and_then(|table| table.columns_mut().iter_mut().find(|c| c.name == column));
        match target {
            Some(target) => target.full_text_searchable = true,
            None => self.errors.push(format!(
                "Cannot make unknown column '{}' on table '{}' searchable",
                column, table_name
            )),
        }
        self
    }

    /// Leave a column out of the columns synthesized for `SELECT *`
    pub fn exclude_from_select_star(
        mut self,
        table_name: impl Into<SelectorName>,
        column: &str,
    ) -> Self {
        let table_name = table_name.into();
        match self.tables.get_mut(&table_name) {
            Some(table) if table.has_column(column) => table.exclude_from_select_star(column),
            _ => self.errors.push(format!(
                "Cannot exclude unknown column '{}' on table '{}' from SELECT *",
                column, table_name
            )),
        }
        self
    }

    /// Declare that a table or view may contain columns beyond those listed
    pub fn mark_extra_columns(mut self, table_name: impl Into<SelectorName>) -> Self {
        let table_name = table_name.into();
        match self.tables.get_mut(&table_name) {
            Some(table) => table.set_extra_columns(true),
            None if self.views.contains_key(&table_name) => {
                self.views_with_extra_columns.insert(table_name);
            }
            None => self.errors.push(format!(
                "Cannot mark unknown table '{}' as having extra columns",
                table_name
            )),
        }
        self
    }

    pub fn build(self) -> Result<ImmutableSchemata> {
        let SchemataBuilder {
            type_system,
            tables,
            views,
            views_with_extra_columns,
            mut errors,
        } = self;

        for name in views.keys().filter(|name| tables.contains_key(*name)) {
            errors.push(format!("View '{}' has the same name as a table", name));
        }
        if !errors.is_empty() {
            return Err(RepoQueryError::invalid_schema(errors.join("; ")));
        }

        let view_count = views.len();
        let tables = resolve_views(&type_system, tables, views, &views_with_extra_columns)?;
        log::debug!(
            "Built schemata with {} tables and {} views",
            tables.len() - view_count,
            view_count
        );
        Ok(ImmutableSchemata { tables })
    }
}

// ============================================================================
// View resolution
// ============================================================================

/// Turn view definitions into tables, in dependency order
///
/// Each pass plans every pending definition against the catalog built so
/// far. A definition whose plan still reports errors waits for a later pass;
/// a pass that resolves nothing leaves the remaining views unresolvable.
fn resolve_views(
    type_system: &Arc<dyn TypeSystem>,
    mut tables: BTreeMap<SelectorName, Table>,
    mut pending: BTreeMap<SelectorName, QueryCommand>,
    views_with_extra_columns: &BTreeSet<SelectorName>,
) -> Result<BTreeMap<SelectorName, Table>> {
    let planner = CanonicalPlanner::with_config(PlannerConfig {
        validate_column_existence: false,
        ..PlannerConfig::default()
    });

    while !pending.is_empty() {
        let snapshot: Arc<dyn Schemata> = Arc::new(ImmutableSchemata {
            tables: tables.clone(),
        });

        let mut resolved = Vec::new();
        for (name, definition) in &pending {
            let outcome = planner.plan(Arc::clone(&snapshot), Arc::clone(type_system), definition);
            if outcome.problems.has_errors() {
                log::trace!("View '{}' not resolvable yet: {}", name, outcome.problems);
                continue;
            }
            let mut view = view_table(
                name,
                definition,
                &outcome.plan,
                snapshot.as_ref(),
                type_system.default_type_name(),
            )?;
            if views_with_extra_columns.contains(name) {
                view.set_extra_columns(true);
            }
            resolved.push(view);
        }

        if resolved.is_empty() {
            let names: Vec<&str> = pending.keys().map(SelectorName::name).collect();
            return Err(RepoQueryError::invalid_schema(format!(
                "Cannot resolve view definitions: {}",
                names.join(", ")
            )));
        }
        for view in resolved {
            pending.remove(view.name());
            log::debug!("Resolved view '{}'", view.name());
            tables.insert(view.name().clone(), view);
        }
    }
    Ok(tables)
}

/// Build the table of a view from the PROJECT node of its planned definition
fn view_table(
    name: &SelectorName,
    definition: &QueryCommand,
    plan: &PlanNode,
    schemata: &dyn Schemata,
    default_type: &str,
) -> Result<Table> {
    let Some(PlanOp::Project { columns, .. }) = plan
        .find_at_or_below(PlanNodeType::Project)
        .map(PlanNode::op)
    else {
        return Err(RepoQueryError::invalid_schema(format!(
            "View '{}' projects no columns",
            name
        )));
    };

    let table_names = selector_names_by_alias(definition);
    let mut view_columns: Vec<TableColumn> = Vec::new();
    let mut excluded = Vec::new();
    for column in columns {
        let table_name = table_names.get(&column.selector).unwrap_or(&column.selector);
        let Some(source) = schemata.find_table(table_name) else {
            continue;
        };
        if view_columns.iter().any(|c| c.name == column.column_name) {
            continue;
        }

        let view_column = match source.column(&column.property) {
            Some(source_column) => TableColumn {
                name: column.column_name.clone(),
                type_name: source_column.type_name.clone(),
                full_text_searchable: source_column.full_text_searchable,
            },
            None if source.has_extra_columns() => {
                TableColumn::new(column.column_name.as_str(), default_type)
            }
            None => {
                return Err(RepoQueryError::invalid_schema(format!(
                    "View '{}' references unknown column '{}' on '{}'",
                    name,
                    column.property,
                    source.name()
                )))
            }
        };
        if !source.select_star_columns().any(|c| c.name == column.property) {
            excluded.push(view_column.name.clone());
        }
        view_columns.push(view_column);
    }

    let mut view = Table::view(name.clone(), view_columns, definition.clone());
    for column in &excluded {
        view.exclude_from_select_star(column);
    }
    Ok(view)
}
