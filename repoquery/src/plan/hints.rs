// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Structural summary of a plan, gathered while planning

use serde::{Deserialize, Serialize};
use std::fmt;

/// Features found while building a plan
///
/// Each `has_*` flag is set the first time planning meets the feature and is
/// never cleared; `false` means the feature is definitely absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanHints {
    pub has_criteria: bool,
    pub has_join: bool,
    pub has_sort: bool,
    pub has_limit: bool,
    pub has_optional_join: bool,
    pub has_full_text_search: bool,
    pub has_set_query: bool,
    pub has_view: bool,
    /// Input rather than output: report columns unknown to the catalog
    pub validate_column_existence: bool,
}

impl Default for PlanHints {
    fn default() -> Self {
        Self {
            has_criteria: false,
            has_join: false,
            has_sort: false,
            has_limit: false,
            has_optional_join: false,
            has_full_text_search: false,
            has_set_query: false,
            has_view: false,
            validate_column_existence: true,
        }
    }
}

impl PlanHints {
    /// The detected-feature flags with their names
    pub fn flags(&self) -> [(&'static str, bool); 8] {
        [
            ("has_criteria", self.has_criteria),
            ("has_join", self.has_join),
            ("has_sort", self.has_sort),
            ("has_limit", self.has_limit),
            ("has_optional_join", self.has_optional_join),
            ("has_full_text_search", self.has_full_text_search),
            ("has_set_query", self.has_set_query),
            ("has_view", self.has_view),
        ]
    }
}

impl fmt::Display for PlanHints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set: Vec<&str> = self
            .flags()
            .iter()
            .filter(|(_, value)| *value)
            .map(|(name, _)| *name)
            .collect();
        write!(f, "PlanHints[{}]", set.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_features() {
        let hints = PlanHints::default();
        assert!(hints.flags().iter().all(|(_, value)| !value));
        assert!(hints.validate_column_existence);
    }

    #[test]
    fn test_display_lists_set_flags() {
        let hints = PlanHints {
            has_join: true,
            has_limit: true,
            ..PlanHints::default()
        };
        assert_eq!(hints.to_string(), "PlanHints[has_join, has_limit]");
    }
}
