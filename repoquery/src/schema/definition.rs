// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Serializable schema definitions
//!
//! A [`SchemaDefinition`] is the JSON form of a catalog:
//!
//! ```json
//! {
//!   "tables": [
//!     {
//!       "name": "nt:file",
//!       "columns": [
//!         { "name": "jcr:name", "type": "NAME" },
//!         { "name": "jcr:data", "type": "BINARY", "select_star": false },
//!         { "name": "jcr:content", "searchable": true }
//!       ],
//!       "extra_columns": false
//!     }
//!   ],
//!   "views": [
//!     {
//!       "name": "documents",
//!       "query": { "type": "query", "source": { "type": "selector", "name": "nt:file" } }
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use super::ImmutableSchemata;
use crate::error::Result;
use crate::model::QueryCommand;
use crate::types::TypeSystem;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDefinition {
    #[serde(default)]
    pub tables: Vec<TableDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub views: Vec<ViewDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewDefinition {
    pub name: String,
    pub query: QueryCommand,
    #[serde(default)]
    pub extra_columns: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableDefinition {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnDefinition>,
    #[serde(default)]
    pub extra_columns: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnDefinition {
    pub name: String,
    /// Type name; the type system's default when absent
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub searchable: bool,
    #[serde(default = "included")]
    pub select_star: bool,
}

fn included() -> bool {
    true
}

impl SchemaDefinition {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading schema definition from {:?}", path);
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Build the catalog described by this definition
    pub fn build(&self, type_system: Arc<dyn TypeSystem>) -> Result<ImmutableSchemata> {
        let default_type = type_system.default_type_name().to_string();
        let mut builder = ImmutableSchemata::builder_with(type_system);
        for table in &self.tables {
            builder = builder.add_table(table.name.as_str(), &[]);
            for column in &table.columns {
                let type_name = column.type_name.as_deref().unwrap_or(&default_type);
                builder = builder.add_column(table.name.as_str(), &column.name, type_name);
                if column.searchable {
                    builder = builder.make_searchable(table.name.as_str(), &column.name);
                }
                if !column.select_star {
                    builder = builder.exclude_from_select_star(table.name.as_str(), &column.name);
                }
            }
            if table.extra_columns {
                builder = builder.mark_extra_columns(table.name.as_str());
            }
        }
        for view in &self.views {
            builder = builder.add_view(view.name.as_str(), view.query.clone());
            if view.extra_columns {
                builder = builder.mark_extra_columns(view.name.as_str());
            }
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schemata;
    use crate::types::StandardTypeSystem;

    #[test]
    fn test_definition_builds_catalog() {
        let json = r#"{
            "tables": [
                {
                    "name": "nt:file",
                    "columns": [
                        { "name": "jcr:name", "type": "NAME" },
                        { "name": "jcr:data", "type": "BINARY", "select_star": false },
                        { "name": "jcr:content", "searchable": true }
                    ]
                }
            ]
        }"#;

        let definition = SchemaDefinition::from_json_str(json).expect("valid definition");
        let schemata = definition
            .build(Arc::new(StandardTypeSystem))
            .expect("valid schemata");

        let table = schemata.find_table(&"nt:file".into()).expect("nt:file");
        let star: Vec<&str> = table.select_star_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(star, vec!["jcr:name", "jcr:content"]);
        assert_eq!(
            table.column("jcr:content").map(|c| c.type_name.as_str()),
            Some("STRING")
        );
        assert!(table.is_full_text_searchable());
    }

    #[test]
    fn test_definition_builds_views() {
        let json = r#"{
            "tables": [ { "name": "nt:file", "columns": [ { "name": "jcr:name" } ] } ],
            "views": [
                {
                    "name": "files",
                    "query": { "type": "query", "source": { "type": "selector", "name": "nt:file" } },
                    "extra_columns": true
                }
            ]
        }"#;

        let schemata = SchemaDefinition::from_json_str(json)
            .expect("valid definition")
            .build(Arc::new(StandardTypeSystem))
            .expect("valid schemata");

        let view = schemata.find_table(&"files".into()).expect("files view");
        assert!(view.is_view());
        assert!(view.has_column("jcr:name"));
        assert!(view.has_extra_columns());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let json = r#"{ "tables": [ { "name": "t", "colums": [] } ] }"#;
        assert!(SchemaDefinition::from_json_str(json).is_err());
    }
}
