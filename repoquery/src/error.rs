// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for operations around the planner
//!
//! Planning itself never fails; these errors cover loading schemata, queries
//! and configuration from their serialized forms.

use thiserror::Error;

/// Result type alias for RepoQuery operations
pub type Result<T> = std::result::Result<T, RepoQueryError>;

/// Main error type for RepoQuery operations
#[derive(Error, Debug)]
pub enum RepoQueryError {
    /// I/O errors while reading definitions from disk
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A schema definition that cannot be turned into a catalog
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
}

impl RepoQueryError {
    pub(crate) fn invalid_schema(message: impl Into<String>) -> Self {
        RepoQueryError::InvalidSchema(message.into())
    }
}
