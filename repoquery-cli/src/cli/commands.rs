// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command definitions for RepoQuery

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Verbosity accepted by `--log-level`
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// RepoQuery CLI - canonical query plans for content repositories
#[derive(Parser)]
#[command(name = "repoquery")]
#[command(about = "RepoQuery - canonical query planner for content repositories")]
#[command(version)]
pub struct Cli {
    /// Log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long = "log-level", global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Verbose mode (equivalent to --log-level debug)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// `--verbose` overrides `--log-level`; warnings and errors by default
    pub fn level_filter(&self) -> log::LevelFilter {
        match (self.verbose, self.log_level) {
            (true, _) => log::LevelFilter::Debug,
            (false, Some(level)) => level.into(),
            (false, None) => log::LevelFilter::Warn,
        }
    }
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show detailed version information
    Version,

    /// Print the canonical plan of a query
    Plan {
        /// Schema definition (JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// Query model (JSON)
        #[arg(short, long)]
        query: PathBuf,

        /// Planner configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "tree")]
        format: OutputFormat,

        /// Exit with status 2 when planning reports an error
        #[arg(long)]
        strict: bool,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Tree,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tree" => Ok(OutputFormat::Tree),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_plan_command() {
        let cli = Cli::try_parse_from([
            "repoquery",
            "-v",
            "plan",
            "--schema",
            "schema.json",
            "--query",
            "query.json",
            "--format",
            "JSON",
            "--strict",
        ])
        .expect("arguments parse");

        assert!(cli.verbose);
        match cli.command {
            Commands::Plan {
                schema,
                config,
                format,
                strict,
                ..
            } => {
                assert_eq!(schema, PathBuf::from("schema.json"));
                assert!(config.is_none());
                assert_eq!(format, OutputFormat::Json);
                assert!(strict);
            }
            Commands::Version => panic!("expected plan command"),
        }
    }

    #[test]
    fn test_level_filter() {
        let quiet = Cli::try_parse_from(["repoquery", "version"]).expect("arguments parse");
        assert_eq!(quiet.level_filter(), log::LevelFilter::Warn);

        let traced = Cli::try_parse_from(["repoquery", "--log-level", "trace", "version"])
            .expect("arguments parse");
        assert_eq!(traced.level_filter(), log::LevelFilter::Trace);

        let verbose = Cli::try_parse_from(["repoquery", "-v", "-l", "off", "version"])
            .expect("arguments parse");
        assert_eq!(verbose.level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!("csv".parse::<OutputFormat>().is_err());
    }
}
