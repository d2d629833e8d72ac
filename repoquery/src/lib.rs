// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! RepoQuery - canonical query planning for content repositories
//!
//! This crate turns an already-parsed query model into the canonical plan
//! tree consumed by later optimization and execution stages. Planning never
//! fails on semantic errors: unknown tables and columns are recorded as
//! [`Problems`] and a structurally valid plan is always produced.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use repoquery::{plan_query, ImmutableSchemata, PlannerConfig, Query, QueryCommand, Selector, Source};
//!
//! let schemata = ImmutableSchemata::builder().add_table("nt:base", &["jcr:primaryType"]).build()?;
//! let query = QueryCommand::Query(Query::new(Source::Selector(Selector::named("nt:base"))));
//! let outcome = plan_query(Arc::new(schemata), &PlannerConfig::default(), &query);
//! println!("{}", outcome.plan);
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod plan;
pub mod problems;
pub mod schema;
pub mod types;

pub use config::PlannerConfig;
pub use context::QueryContext;
pub use error::{RepoQueryError, Result};
pub use model::{
    ArithmeticOperator, Column, Constraint, DynamicOperand, JoinCondition, JoinType, Limit,
    Literal, Operator, Order, Ordering, Query, QueryCommand, Selector, SelectorKind,
    SelectorName, SetOperation, SetQuery, Source, StaticOperand,
};
pub use plan::{
    plan_query, CanonicalPlanner, JoinAlgorithm, PlanHints, PlanNode, PlanNodeType, PlanOp,
    PlanOutcome, Planner,
};
pub use problems::{Problem, ProblemKind, ProblemStatus, Problems};
pub use schema::{ImmutableSchemata, SchemaDefinition, Schemata, Table, TableColumn};
pub use types::{StandardTypeSystem, TypeSystem};
