// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Command-line interface
//!
//! `check` (the default when no subcommand is given) runs the health
//! checks; `report` renders a markdown monitoring report from previously
//! collected data.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Health checks for model endpoints, GitHub Pages sites and GitHub API targets
#[derive(Parser, Debug)]
#[command(name = "model-healthcheck")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    MODEL_ENDPOINTS    Comma-separated model endpoint URLs (fallback when no config file is given)
    GITHUB_TOKEN       Token for GitHub Pages and API requests
    RUST_LOG           Log filter (default: info)

EXIT CODES:
    0    All checks passed
    1    One or more health checks failed
    2    Configuration or setup error
"#)]
pub struct Cli {
    /// Subcommand to execute; defaults to `check`
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run health checks against the configured endpoints
    Check(CheckArgs),
    /// Render a markdown monitoring report from collected data
    Report(ReportArgs),
}

/// Arguments for the `check` subcommand
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Path to the JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the machine-readable JSON report to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `report` subcommand
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Output file path for the markdown report
    #[arg(short, long)]
    pub output: PathBuf,

    /// Health report JSON produced by `check --output`
    #[arg(long, default_value = "health_report.json")]
    pub health: PathBuf,

    /// Benchmark report JSON produced by sibling automation
    #[arg(long, default_value = "benchmark_report.json")]
    pub benchmark: PathBuf,

    /// Drift report JSON produced by sibling automation
    #[arg(long, default_value = "drift_report.json")]
    pub drift: PathBuf,

    /// Skip the host resource section
    #[arg(long)]
    pub no_system: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["model-healthcheck"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_check_args_parse() {
        let cli = Cli::try_parse_from([
            "model-healthcheck",
            "check",
            "--config",
            "monitoring.json",
            "--output",
            "health_report.json",
            "--verbose",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Check(args)) => {
                assert_eq!(args.config.unwrap(), PathBuf::from("monitoring.json"));
                assert_eq!(args.output.unwrap(), PathBuf::from("health_report.json"));
            }
            other => panic!("expected check subcommand, got {other:?}"),
        }
    }

    #[test]
    fn test_report_requires_output() {
        assert!(Cli::try_parse_from(["model-healthcheck", "report"]).is_err());
    }

    #[test]
    fn test_report_defaults() {
        let cli =
            Cli::try_parse_from(["model-healthcheck", "report", "--output", "report.md"]).unwrap();
        match cli.command {
            Some(Commands::Report(args)) => {
                assert_eq!(args.output, PathBuf::from("report.md"));
                assert_eq!(args.health, PathBuf::from("health_report.json"));
                assert_eq!(args.benchmark, PathBuf::from("benchmark_report.json"));
                assert_eq!(args.drift, PathBuf::from("drift_report.json"));
                assert!(!args.no_system);
            }
            other => panic!("expected report subcommand, got {other:?}"),
        }
    }
}
