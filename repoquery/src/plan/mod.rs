// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query planning for repository queries
//!
//! This module converts query models into canonical plan trees. The
//! canonical plan always has the same shape, and later stages (optimizer,
//! executor) rely on that shape:
//!
//! ```text
//!       LIMIT       if row limit or offset are used
//!         |
//!      SORTING      if 'ORDER BY' is used
//!         |
//!     DUP_REMOVE    if 'SELECT DISTINCT' is used
//!         |
//!      PROJECT      with the list of columns being SELECTed
//!         |
//!      SELECT1
//!         |         One SELECT node per AND-ed constraint
//!      SELECTn
//!         |
//!    SOURCE or JOIN
//! ```

pub mod canonical;
pub mod hints;
pub mod node;
mod validator;

pub use canonical::{plan_query, CanonicalPlanner, PlanOutcome, Planner};
pub use hints::PlanHints;
pub use node::{JoinAlgorithm, PlanNode, PlanNodeType, PlanOp};
