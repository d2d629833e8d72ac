// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Diagnostics recorded while planning
//!
//! Planning never stops on a semantic error. Each problem found is appended
//! to a [`Problems`] sink and the planner carries on; callers must check the
//! sink before handing the plan to an executor.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::model::SelectorName;

/// The cause of a problem, with its human-readable message
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProblemKind {
    #[error("Table '{table}' does not exist")]
    TableDoesNotExist { table: SelectorName },

    #[error("Column '{column}' does not exist on table '{table}'")]
    ColumnDoesNotExistOnTable { column: String, table: SelectorName },

    #[error("Table '{table}' has no full-text searchable columns")]
    TableIsNotSearchable { table: SelectorName },

    #[error("Column '{column}' on table '{table}' is not full-text searchable")]
    ColumnIsNotSearchable { column: String, table: SelectorName },

    #[error("Selector '{selector}' is already bound to table '{table}'; '{ignored}' is ignored")]
    DuplicateSelector {
        selector: SelectorName,
        table: SelectorName,
        ignored: SelectorName,
    },
}

impl ProblemKind {
    pub fn table_does_not_exist(table: &SelectorName) -> Self {
        ProblemKind::TableDoesNotExist {
            table: table.clone(),
        }
    }

    pub fn column_does_not_exist(column: &str, table: &SelectorName) -> Self {
        ProblemKind::ColumnDoesNotExistOnTable {
            column: column.to_string(),
            table: table.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemStatus {
    Error,
    Warning,
}

impl fmt::Display for ProblemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemStatus::Error => f.write_str("ERROR"),
            ProblemStatus::Warning => f.write_str("WARNING"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Problem {
    pub status: ProblemStatus,
    #[serde(flatten)]
    pub kind: ProblemKind,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status, self.kind)
    }
}

/// Append-only sink of planning problems
///
/// Recording a problem identical to one already present keeps a single
/// record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Problems {
    problems: Vec<Problem>,
}

impl Problems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, kind: ProblemKind) {
        self.add(ProblemStatus::Error, kind);
    }

    pub fn add_warning(&mut self, kind: ProblemKind) {
        self.add(ProblemStatus::Warning, kind);
    }

    fn add(&mut self, status: ProblemStatus, kind: ProblemKind) {
        let problem = Problem { status, kind };
        if self.problems.contains(&problem) {
            return;
        }
        log::warn!("Planning problem: {}", problem);
        self.problems.push(problem);
    }

    pub fn has_errors(&self) -> bool {
        self.problems
            .iter()
            .any(|problem| problem.status == ProblemStatus::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Problem> {
        self.problems.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Problem> {
        self.problems
            .iter()
            .filter(|problem| problem.status == ProblemStatus::Error)
    }
}

impl<'a> IntoIterator for &'a Problems {
    type Item = &'a Problem;
    type IntoIter = std::slice::Iter<'a, Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.problems.iter()
    }
}

impl fmt::Display for Problems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for problem in &self.problems {
            writeln!(f, "{}", problem)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_problems_collapse() {
        let mut problems = Problems::new();
        problems.add_error(ProblemKind::table_does_not_exist(&"Ghost".into()));
        problems.add_error(ProblemKind::table_does_not_exist(&"Ghost".into()));
        problems.add_error(ProblemKind::column_does_not_exist("x", &"Ghost".into()));

        assert_eq!(problems.len(), 2);
        assert!(problems.has_errors());
    }

    #[test]
    fn test_warnings_are_not_errors() {
        let mut problems = Problems::new();
        problems.add_warning(ProblemKind::DuplicateSelector {
            selector: "t".into(),
            table: "A".into(),
            ignored: "B".into(),
        });

        assert!(!problems.is_empty());
        assert!(!problems.has_errors());
        assert_eq!(problems.errors().count(), 0);
    }

    #[test]
    fn test_problem_display() {
        let problem = Problem {
            status: ProblemStatus::Error,
            kind: ProblemKind::column_does_not_exist("c4", &"someTable".into()),
        };
        assert_eq!(
            problem.to_string(),
            "[ERROR] Column 'c4' does not exist on table 'someTable'"
        );
    }
}
