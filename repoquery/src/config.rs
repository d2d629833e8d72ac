// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Planner configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::plan::JoinAlgorithm;

/// Settings applied to every planning call made by a
/// [`CanonicalPlanner`](crate::CanonicalPlanner)
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    /// Report requested columns that the catalog does not know
    pub validate_column_existence: bool,
    /// Algorithm recorded on JOIN nodes until an optimizer picks one
    pub default_join_algorithm: JoinAlgorithm,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            validate_column_existence: true,
            default_join_algorithm: JoinAlgorithm::NestedLoop,
        }
    }
}

impl PlannerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading planner configuration from {:?}", path);
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config = PlannerConfig::from_json_str("{}").expect("valid config");
        assert_eq!(config, PlannerConfig::default());
        assert!(config.validate_column_existence);
    }

    #[test]
    fn test_partial_override() {
        let config = PlannerConfig::from_json_str(r#"{ "default_join_algorithm": "merge" }"#)
            .expect("valid config");
        assert_eq!(config.default_join_algorithm, JoinAlgorithm::Merge);
        assert!(config.validate_column_existence);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(PlannerConfig::from_json_str(r#"{ "validate_columns": false }"#).is_err());
    }
}
