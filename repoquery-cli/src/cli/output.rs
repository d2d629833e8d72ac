// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Formatting of planning outcomes for the terminal

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use repoquery::{PlanHints, PlanOutcome, ProblemStatus, Problems};

use super::commands::OutputFormat;

pub struct OutcomeFormatter;

impl OutcomeFormatter {
    pub fn format(outcome: &PlanOutcome, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Tree => Ok(Self::format_tree(outcome)),
            OutputFormat::Json => serde_json::to_string_pretty(outcome),
        }
    }

    fn format_tree(outcome: &PlanOutcome) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", "Canonical plan".bold()));
        output.push_str(&outcome.plan.to_string());
        output.push('\n');
        output.push_str(&Self::hints_table(&outcome.hints).to_string());
        output.push('\n');
        output.push_str(&Self::format_problems(&outcome.problems));
        output
    }

    fn hints_table(hints: &PlanHints) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![Cell::new("Hint"), Cell::new("Value")]);
        for (name, value) in hints.flags() {
            table.add_row(vec![Cell::new(name), Cell::new(value)]);
        }
        table
    }

    fn format_problems(problems: &Problems) -> String {
        if problems.is_empty() {
            return format!("{}\n", "No problems".green());
        }

        let mut output = format!("{}\n", format!("{} problem(s)", problems.len()).bold());
        for problem in problems {
            let line = match problem.status {
                ProblemStatus::Error => problem.to_string().red(),
                ProblemStatus::Warning => problem.to_string().yellow(),
            };
            output.push_str(&format!("  {}\n", line));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repoquery::{
        plan_query, Column, ImmutableSchemata, PlannerConfig, Query, Schemata, Source,
    };
    use std::sync::Arc;

    fn outcome(query: Query) -> PlanOutcome {
        let schemata: Arc<dyn Schemata> = Arc::new(
            ImmutableSchemata::builder()
                .add_table("A", &["c1"])
                .build()
                .expect("valid schemata"),
        );
        plan_query(schemata, &PlannerConfig::default(), &query.into())
    }

    #[test]
    fn test_tree_output_lists_plan_hints_and_problems() {
        colored::control::set_override(false);
        let outcome = outcome(
            Query::new(Source::named("A")).with_columns(vec![Column::new("A", "nope")]),
        );

        let output = OutcomeFormatter::format(&outcome, OutputFormat::Tree).expect("formats");

        assert!(output.contains("Project [A]"));
        assert!(output.contains("has_criteria"));
        assert!(output.contains("[ERROR] Column 'nope' does not exist on table 'A'"));
    }

    #[test]
    fn test_json_output_is_parseable() {
        let outcome = outcome(Query::new(Source::named("A")));

        let output = OutcomeFormatter::format(&outcome, OutputFormat::Json).expect("formats");
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");

        assert_eq!(value["plan"]["type"], "Project");
        assert_eq!(value["hints"]["has_join"], false);
        assert!(value["problems"].is_array());
    }
}
