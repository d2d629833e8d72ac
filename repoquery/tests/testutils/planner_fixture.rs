// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Planner fixture: a small content-repository catalog plus helpers to plan
//! queries against it with a fresh context

use std::sync::Arc;

use repoquery::{
    CanonicalPlanner, Constraint, DynamicOperand, ImmutableSchemata, Operator, PlanHints,
    PlanNode, PlanNodeType, Planner, Problems, QueryCommand, QueryContext, Schemata,
    StandardTypeSystem, StaticOperand,
};

/// Result of planning one query through the fixture
pub struct PlannedQuery {
    pub plan: PlanNode,
    pub hints: PlanHints,
    pub problems: Problems,
}

impl PlannedQuery {
    pub fn assert_no_problems(&self) {
        assert!(
            self.problems.is_empty(),
            "expected no problems, got:\n{}",
            self.problems
        );
    }

    pub fn shape(&self) -> Vec<PlanNodeType> {
        self.plan.first_child_path()
    }
}

pub struct PlannerFixture {
    schemata: Arc<dyn Schemata>,
    planner: CanonicalPlanner,
}

impl PlannerFixture {
    /// Catalog with tables `A(c1, c2)` and `B(c3)`
    pub fn simple() -> Self {
        let schemata = ImmutableSchemata::builder()
            .add_table("A", &["c1", "c2"])
            .add_table("B", &["c3"])
            .build()
            .expect("Failed to build fixture schemata");
        Self::with_schemata(schemata)
    }

    /// Catalog shaped like a content repository
    ///
    /// - `nt:base(jcr:primaryType, jcr:mixinTypes)` with extra columns
    /// - `nt:file(jcr:name, jcr:created LONG, jcr:content)`, content searchable
    /// - `nt:folder(jcr:name)`, no searchable columns
    pub fn repository() -> Self {
        let schemata = ImmutableSchemata::builder()
            .add_table("nt:base", &["jcr:primaryType", "jcr:mixinTypes"])
            .mark_extra_columns("nt:base")
            .add_table("nt:file", &["jcr:name"])
            .add_column("nt:file", "jcr:created", "LONG")
            .add_column("nt:file", "jcr:content", "BINARY")
            .make_searchable("nt:file", "jcr:content")
            .exclude_from_select_star("nt:file", "jcr:content")
            .add_table("nt:folder", &["jcr:name"])
            .build()
            .expect("Failed to build fixture schemata");
        Self::with_schemata(schemata)
    }

    pub fn with_schemata(schemata: ImmutableSchemata) -> Self {
        Self {
            schemata: Arc::new(schemata),
            planner: CanonicalPlanner::new(),
        }
    }

    pub fn schemata(&self) -> Arc<dyn Schemata> {
        Arc::clone(&self.schemata)
    }

    pub fn new_context(&self) -> QueryContext {
        self.planner
            .new_context(self.schemata(), Arc::new(StandardTypeSystem))
    }

    pub fn plan(&self, query: impl Into<QueryCommand>) -> PlannedQuery {
        let mut context = self.new_context();
        let plan = self.planner.create_plan(&mut context, &query.into());
        let (hints, problems) = context.into_parts();
        PlannedQuery {
            plan,
            hints,
            problems,
        }
    }
}

/// `selector.property = value`
pub fn equals(selector: &str, property: &str, value: i64) -> Constraint {
    Constraint::comparison(
        DynamicOperand::property_value(selector, property),
        Operator::EqualTo,
        StaticOperand::literal(value),
    )
}
