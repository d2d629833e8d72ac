// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Planning from several threads against one shared catalog

use std::sync::Arc;
use std::thread;

use repoquery::{
    plan_query, CanonicalPlanner, Column, Constraint, DynamicOperand, ImmutableSchemata, Limit,
    Operator, PlanNodeType, PlannerConfig, Query, QueryCommand, Schemata, SetOperation, SetQuery,
    Source, StandardTypeSystem, StaticOperand,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn shared_schemata() -> Arc<dyn Schemata> {
    Arc::new(
        ImmutableSchemata::builder()
            .add_table("A", &["c1", "c2"])
            .add_table("B", &["c3"])
            .build()
            .expect("valid schemata"),
    )
}

fn query_with_limit(rows: usize) -> QueryCommand {
    Query::new(Source::named("A"))
        .with_constraint(Constraint::comparison(
            DynamicOperand::property_value("A", "c1"),
            Operator::GreaterThan,
            StaticOperand::literal(rows as i64),
        ))
        .with_limits(Limit::rows(rows))
        .into()
}

#[test]
fn test_threads_share_catalog() {
    init_logging();
    let schemata = shared_schemata();

    let handles: Vec<_> = (1..=8)
        .map(|rows| {
            let schemata = Arc::clone(&schemata);
            thread::spawn(move || {
                plan_query(schemata, &PlannerConfig::default(), &query_with_limit(rows))
            })
        })
        .collect();

    for handle in handles {
        let outcome = handle.join().expect("planning thread panicked");
        assert!(outcome.problems.is_empty());
        assert!(outcome.hints.has_limit);
        assert!(outcome.hints.has_criteria);
        assert!(outcome.plan.is(PlanNodeType::Limit));
    }
}

#[test]
fn test_plan_all_preserves_order() {
    init_logging();
    let queries: Vec<QueryCommand> = vec![
        query_with_limit(1),
        Query::new(Source::named("Ghost")).into(),
        SetQuery::new(
            Query::new(Source::named("A")).with_columns(vec![Column::new("A", "c1")]),
            SetOperation::Except,
            Query::new(Source::named("B")).with_columns(vec![Column::new("B", "c3")]),
        )
        .all()
        .into(),
        Query::new(Source::named("B")).distinct().into(),
    ];

    let outcomes = CanonicalPlanner::new().plan_all(
        shared_schemata(),
        Arc::new(StandardTypeSystem),
        &queries,
    );

    assert_eq!(outcomes.len(), 4);
    assert!(outcomes[0].plan.is(PlanNodeType::Limit));
    assert!(outcomes[1].problems.has_errors());
    assert!(outcomes[2].plan.is(PlanNodeType::SetOperation));
    assert!(outcomes[2].hints.has_set_query);
    assert_eq!(
        outcomes[3].plan.first_child_path(),
        vec![
            PlanNodeType::DupRemove,
            PlanNodeType::Project,
            PlanNodeType::Source
        ]
    );
    for (index, outcome) in outcomes.iter().enumerate() {
        if index != 1 {
            assert!(outcome.problems.is_empty(), "query {} had problems", index);
        }
    }
}

#[test]
fn test_batch_matches_sequential_planning() {
    let queries: Vec<QueryCommand> = (1..=16).map(query_with_limit).collect();
    let schemata = shared_schemata();

    let batch = CanonicalPlanner::new().plan_all(
        Arc::clone(&schemata),
        Arc::new(StandardTypeSystem),
        &queries,
    );
    for (query, outcome) in queries.iter().zip(&batch) {
        let sequential = plan_query(Arc::clone(&schemata), &PlannerConfig::default(), query);
        assert_eq!(sequential.plan, outcome.plan);
        assert_eq!(sequential.hints, outcome.hints);
    }
}
