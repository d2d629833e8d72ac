// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Tests for planning from schema, query and configuration files on disk

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use repoquery::{
    plan_query, JoinAlgorithm, PlanNodeType, PlanOp, PlannerConfig, QueryCommand,
    RepoQueryError, SchemaDefinition, Schemata, StandardTypeSystem,
};
use tempfile::TempDir;

const SCHEMA_JSON: &str = r#"{
    "tables": [
        {
            "name": "nt:file",
            "columns": [
                { "name": "jcr:name", "type": "NAME" },
                { "name": "jcr:created", "type": "date" },
                { "name": "jcr:data", "type": "BINARY", "select_star": false, "searchable": true }
            ]
        },
        {
            "name": "nt:unstructured",
            "columns": [ { "name": "jcr:primaryType" } ],
            "extra_columns": true
        }
    ]
}"#;

const QUERY_JSON: &str = r#"{
    "type": "query",
    "source": {
        "type": "join",
        "left": { "type": "selector", "name": "nt:file", "alias": "f" },
        "right": { "type": "selector", "name": "nt:unstructured", "alias": "u" },
        "join_type": "left_outer",
        "condition": { "type": "child_node", "parent_selector": "f", "child_selector": "u" }
    },
    "constraint": {
        "type": "and",
        "left": { "type": "full_text_search", "selector": "f", "property": "jcr:data", "expression": "report" },
        "right": { "type": "property_existence", "selector": "u", "property": "anything" }
    },
    "columns": [
        { "selector": "f", "property": "jcr:name", "column_name": "name" },
        { "selector": "u", "property": "*", "column_name": "*" }
    ],
    "orderings": [
        { "operand": { "type": "node_depth", "selector": "u" }, "order": "descending" }
    ],
    "limits": { "offset": 20 }
}"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("Failed to write fixture file");
        path
    }
}

fn load_schemata(path: &Path) -> Arc<dyn Schemata> {
    let definition = SchemaDefinition::from_json_file(path).expect("schema file parses");
    Arc::new(
        definition
            .build(Arc::new(StandardTypeSystem))
            .expect("schema definition is valid"),
    )
}

#[test]
fn test_plan_from_files() {
    let workspace = Workspace::new();
    let schema_path = workspace.write("schema.json", SCHEMA_JSON);
    let query_path = workspace.write("query.json", QUERY_JSON);

    let schemata = load_schemata(&schema_path);
    let query = QueryCommand::from_json_file(&query_path).expect("query file parses");
    let outcome = plan_query(schemata, &PlannerConfig::default(), &query);

    assert!(
        outcome.problems.is_empty(),
        "unexpected problems: {}",
        outcome.problems
    );
    assert_eq!(
        outcome.plan.first_child_path(),
        vec![
            PlanNodeType::Limit,
            PlanNodeType::Sort,
            PlanNodeType::Project,
            PlanNodeType::Select,
            PlanNodeType::Select,
            PlanNodeType::Join,
            PlanNodeType::Source,
        ]
    );
    assert!(outcome.hints.has_join);
    assert!(outcome.hints.has_optional_join);
    assert!(outcome.hints.has_full_text_search);
    assert!(matches!(
        outcome.plan.op(),
        PlanOp::Limit {
            row_limit: None,
            offset: Some(20),
            ..
        }
    ));

    let project = outcome
        .plan
        .find_at_or_below(PlanNodeType::Project)
        .expect("project node");
    let PlanOp::Project {
        columns,
        column_types,
        ..
    } = project.op()
    else {
        panic!("expected a Project node");
    };
    let names: Vec<&str> = columns.iter().map(|c| c.column_name.as_str()).collect();
    assert_eq!(names, vec!["name", "jcr:primaryType"]);
    assert_eq!(column_types, &vec!["NAME", "STRING"]);
}

#[test]
fn test_config_file_changes_join_algorithm() {
    let workspace = Workspace::new();
    let schema_path = workspace.write("schema.json", SCHEMA_JSON);
    let config_path = workspace.write(
        "config.json",
        r#"{ "default_join_algorithm": "merge", "validate_column_existence": false }"#,
    );

    let config = PlannerConfig::from_json_file(&config_path).expect("config file parses");
    assert_eq!(config.default_join_algorithm, JoinAlgorithm::Merge);

    let query = QueryCommand::from_json_str(QUERY_JSON).expect("query parses");
    let outcome = plan_query(load_schemata(&schema_path), &config, &query);

    let join = outcome
        .plan
        .find_at_or_below(PlanNodeType::Join)
        .expect("join node");
    assert!(matches!(
        join.op(),
        PlanOp::Join {
            algorithm: JoinAlgorithm::Merge,
            ..
        }
    ));
}

#[test]
fn test_unknown_type_in_schema_is_rejected() {
    let definition = SchemaDefinition::from_json_str(
        r#"{ "tables": [ { "name": "t", "columns": [ { "name": "c", "type": "VARCHAR" } ] } ] }"#,
    )
    .expect("definition parses");

    let result = definition.build(Arc::new(StandardTypeSystem));
    assert!(matches!(result, Err(RepoQueryError::InvalidSchema(_))));
}

#[test]
fn test_unknown_field_in_schema_is_rejected() {
    let result = SchemaDefinition::from_json_str(r#"{ "tables": [], "indexes": [] }"#);
    assert!(matches!(result, Err(RepoQueryError::Serialization(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let workspace = Workspace::new();
    let missing = workspace.dir.path().join("nope.json");

    let result = QueryCommand::from_json_file(&missing);
    assert!(matches!(result, Err(RepoQueryError::Io(_))));
}
