// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Per-call planning context

use std::sync::Arc;

use crate::plan::PlanHints;
use crate::problems::Problems;
use crate::schema::Schemata;
use crate::types::TypeSystem;

/// Everything one planning call reads from or writes to
///
/// The catalog and type system are shared handles; the hints and problems
/// belong to this context alone. Give each concurrent planning call its own
/// context.
#[derive(Debug, Clone)]
pub struct QueryContext {
    schemata: Arc<dyn Schemata>,
    type_system: Arc<dyn TypeSystem>,
    hints: PlanHints,
    problems: Problems,
}

impl QueryContext {
    pub fn new(schemata: Arc<dyn Schemata>, type_system: Arc<dyn TypeSystem>) -> Self {
        Self::with_hints(schemata, type_system, PlanHints::default())
    }

    /// Create a context whose hints start from `hints`
    ///
    /// Only the configuration carried by the hints matters here; the
    /// detected-feature flags are set by planning.
    pub fn with_hints(
        schemata: Arc<dyn Schemata>,
        type_system: Arc<dyn TypeSystem>,
        hints: PlanHints,
    ) -> Self {
        Self {
            schemata,
            type_system,
            hints,
            problems: Problems::new(),
        }
    }

    pub fn schemata(&self) -> &Arc<dyn Schemata> {
        &self.schemata
    }

    pub fn type_system(&self) -> &Arc<dyn TypeSystem> {
        &self.type_system
    }

    pub fn hints(&self) -> &PlanHints {
        &self.hints
    }

    pub fn hints_mut(&mut self) -> &mut PlanHints {
        &mut self.hints
    }

    pub fn problems(&self) -> &Problems {
        &self.problems
    }

    pub fn problems_mut(&mut self) -> &mut Problems {
        &mut self.problems
    }

    /// Consume the context, keeping what planning produced
    pub fn into_parts(self) -> (PlanHints, Problems) {
        (self.hints, self.problems)
    }
}
