// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Value-type services used while planning
//!
//! The planner only needs type *names*: the type reported for columns
//! synthesized by `SELECT *`, and the fallback type of a requested column
//! the catalog cannot describe. A type system is handed to each
//! [`QueryContext`](crate::QueryContext) explicitly.

use std::fmt::Debug;

/// Names of the value types known to a repository
pub trait TypeSystem: Debug + Send + Sync {
    /// Name of the string type, the type of any value when nothing better is known
    fn string_type_name(&self) -> &str;

    /// Type name to use for a column whose definition does not specify one
    fn default_type_name(&self) -> &str {
        self.string_type_name()
    }

    /// All type names this system recognizes
    fn type_names(&self) -> &[&'static str];

    /// Whether `name` is a recognized type name (case-insensitive)
    fn is_known_type(&self, name: &str) -> bool {
        self.type_names()
            .iter()
            .any(|known| known.eq_ignore_ascii_case(name))
    }
}

/// Type system with the value types of a content repository
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTypeSystem;

impl StandardTypeSystem {
    pub const STRING: &'static str = "STRING";
    pub const LONG: &'static str = "LONG";
    pub const DOUBLE: &'static str = "DOUBLE";
    pub const DECIMAL: &'static str = "DECIMAL";
    pub const BOOLEAN: &'static str = "BOOLEAN";
    pub const DATE: &'static str = "DATE";
    pub const BINARY: &'static str = "BINARY";
    pub const NAME: &'static str = "NAME";
    pub const PATH: &'static str = "PATH";
    pub const REFERENCE: &'static str = "REFERENCE";
    pub const URI: &'static str = "URI";

    const ALL: [&'static str; 11] = [
        Self::STRING,
        Self::LONG,
        Self::DOUBLE,
        Self::DECIMAL,
        Self::BOOLEAN,
        Self::DATE,
        Self::BINARY,
        Self::NAME,
        Self::PATH,
        Self::REFERENCE,
        Self::URI,
    ];
}

impl TypeSystem for StandardTypeSystem {
    fn string_type_name(&self) -> &str {
        Self::STRING
    }

    fn type_names(&self) -> &[&'static str] {
        &Self::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_is_default_type() {
        let types = StandardTypeSystem;
        assert_eq!(types.default_type_name(), "STRING");
    }

    #[test]
    fn test_known_types_are_case_insensitive() {
        let types = StandardTypeSystem;
        assert!(types.is_known_type("long"));
        assert!(types.is_known_type("Reference"));
        assert!(!types.is_known_type("INTEGER"));
    }
}
