// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command handlers

use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use repoquery::{
    plan_query, PlanOutcome, PlannerConfig, QueryCommand, SchemaDefinition, StandardTypeSystem,
};

use super::commands::OutputFormat;
use super::output::OutcomeFormatter;

/// Process exit status of a successful command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// `--strict` was given and planning reported an error
    ProblemsFound,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::ProblemsFound => 2,
        }
    }
}

pub fn handle_version() -> Result<ExitStatus, Box<dyn std::error::Error>> {
    println!(
        "{} {}",
        "RepoQuery".bold(),
        env!("CARGO_PKG_VERSION").green()
    );
    println!("Canonical query planner for content repositories");
    Ok(ExitStatus::Success)
}

pub fn handle_plan(
    schema: PathBuf,
    query: PathBuf,
    config: Option<PathBuf>,
    format: OutputFormat,
    strict: bool,
) -> Result<ExitStatus, Box<dyn std::error::Error>> {
    let outcome = plan_files(&schema, &query, config.as_deref())?;
    println!("{}", OutcomeFormatter::format(&outcome, format)?);

    if strict && outcome.problems.has_errors() {
        return Ok(ExitStatus::ProblemsFound);
    }
    Ok(ExitStatus::Success)
}

/// Load the schema, query and optional configuration, then plan the query
fn plan_files(
    schema: &Path,
    query: &Path,
    config: Option<&Path>,
) -> Result<PlanOutcome, Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => PlannerConfig::from_json_file(path)?,
        None => PlannerConfig::default(),
    };
    let schemata = SchemaDefinition::from_json_file(schema)?.build(Arc::new(StandardTypeSystem))?;
    let query = QueryCommand::from_json_file(query)?;

    log::info!("Planning {}", query);
    Ok(plan_query(Arc::new(schemata), &config, &query))
}
