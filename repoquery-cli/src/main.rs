// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! RepoQuery CLI entry point

mod cli;

use clap::Parser;
use colored::Colorize;

use cli::{handle_plan, handle_version, Cli, Commands};

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.level_filter())
        .init();

    let result = match cli.command {
        Commands::Version => handle_version(),
        Commands::Plan {
            schema,
            query,
            config,
            format,
            strict,
        } => handle_plan(schema, query, config, format, strict),
    };

    match result {
        Ok(status) => std::process::exit(status.code()),
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            std::process::exit(1);
        }
    }
}
