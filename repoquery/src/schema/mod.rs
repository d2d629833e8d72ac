// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Schema catalog
//!
//! The planner resolves every selector against a [`Schemata`] to learn which
//! columns a relation exposes. Lookups return `None` for unknown relations;
//! reporting the problem is the planner's job.

pub mod definition;
pub mod immutable;
pub mod table;

use std::fmt::Debug;

use crate::model::SelectorName;

pub use definition::{ColumnDefinition, SchemaDefinition, TableDefinition, ViewDefinition};
pub use immutable::{ImmutableSchemata, SchemataBuilder};
pub use table::{Table, TableColumn};

/// Catalog of the tables a query may select from
///
/// Implementations are shared between concurrent planning calls and must be
/// safe for concurrent reads.
pub trait Schemata: Debug + Send + Sync {
    /// Look up a table by its name; never fails for unknown names
    fn find_table(&self, name: &SelectorName) -> Option<&Table>;
}
