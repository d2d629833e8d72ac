// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for RepoQuery
//!
//! Loads a schema and a query from JSON files and prints the canonical plan,
//! its hints and any problems found while planning.

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands};
pub use handlers::{handle_plan, handle_version};
