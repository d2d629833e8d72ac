// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Table descriptors

use serde::Serialize;

use crate::model::{QueryCommand, SelectorName};

/// One column exposed by a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    pub name: String,
    pub type_name: String,
    pub full_text_searchable: bool,
}

impl TableColumn {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            full_text_searchable: false,
        }
    }
}

/// A relation and the columns it makes available to queries
///
/// A view is a table whose rows are defined by a query over other tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    name: SelectorName,
    columns: Vec<TableColumn>,
    /// Columns left out of `SELECT *`
    excluded_from_select_star: Vec<String>,
    /// The table may hold columns beyond those listed, so unknown names are not errors
    extra_columns: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    view_definition: Option<QueryCommand>,
}

impl Table {
    pub fn new(name: impl Into<SelectorName>, columns: Vec<TableColumn>) -> Self {
        Self {
            name: name.into(),
            columns,
            excluded_from_select_star: Vec::new(),
            extra_columns: false,
            view_definition: None,
        }
    }

    pub fn view(
        name: impl Into<SelectorName>,
        columns: Vec<TableColumn>,
        definition: QueryCommand,
    ) -> Self {
        Self {
            view_definition: Some(definition),
            ..Self::new(name, columns)
        }
    }

    pub fn name(&self) -> &SelectorName {
        &self.name
    }

    /// Columns in declaration order
    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Columns produced by `SELECT *`, in declaration order
    pub fn select_star_columns(&self) -> impl Iterator<Item = &TableColumn> {
        self.columns
            .iter()
            .filter(|column| !self.excluded_from_select_star.contains(&column.name))
    }

    pub fn has_extra_columns(&self) -> bool {
        self.extra_columns
    }

    /// Whether at least one column can be targeted by a full-text search
    pub fn is_full_text_searchable(&self) -> bool {
        self.columns.iter().any(|column| column.full_text_searchable)
    }

    pub fn is_view(&self) -> bool {
        self.view_definition.is_some()
    }

    /// The query defining this view; `None` for base tables
    pub fn view_definition(&self) -> Option<&QueryCommand> {
        self.view_definition.as_ref()
    }

    pub(crate) fn columns_mut(&mut self) -> &mut Vec<TableColumn> {
        &mut self.columns
    }

    pub(crate) fn exclude_from_select_star(&mut self, column: &str) {
        if !self.excluded_from_select_star.iter().any(|c| c == column) {
            self.excluded_from_select_star.push(column.to_string());
        }
    }

    pub(crate) fn set_extra_columns(&mut self, extra_columns: bool) {
        self.extra_columns = extra_columns;
    }
}
