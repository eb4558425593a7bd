// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command definitions for NetFrenzy

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only errors
    Error,
    /// Warnings and errors
    Warn,
    /// Info, warnings, and errors
    Info,
    /// Debug messages and above (verbose)
    Debug,
    /// All messages including every generated statement
    Trace,
    /// Disable all logging
    Off,
}

impl LogLevel {
    /// Convert to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// NetFrenzy CLI - network traffic as a graph
#[derive(Parser)]
#[command(name = "netfrenzy")]
#[command(about = "NetFrenzy - network traffic as a graph")]
#[command(version)]
pub struct Cli {
    /// Set log level (error, warn, info, debug, trace, off)
    #[arg(short = 'l', long = "log-level", global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Verbose mode (equivalent to --log-level debug)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Level from -v, then --log-level, defaulting to warn
    pub fn level_filter(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else if let Some(level) = self.log_level {
            level.to_level_filter()
        } else {
            log::LevelFilter::Warn
        }
    }
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show detailed version information
    Version,

    /// Browse the helpful example queries
    Queries {
        #[command(subcommand)]
        action: QueriesAction,
    },

    /// Convert JSON-lines packet summaries into a Cypher script
    Ingest {
        /// Packet summaries, one JSON object per line (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Cypher script destination (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON ingest configuration, applied before the flags below
        #[arg(long)]
        config: Option<PathBuf>,

        /// Skip timing, size and service tracking on connections
        #[arg(long)]
        reduce: bool,

        /// Recently written values remembered per node/relationship kind
        #[arg(long)]
        cache_size: Option<usize>,

        /// MAC address never assigned to an IP (repeatable)
        #[arg(long = "ignore-mac")]
        ignore_macs: Vec<String>,

        /// Print packet, statement and cache statistics to stderr
        #[arg(long)]
        stats: bool,
    },
}

/// Query catalog subcommands
#[derive(Subcommand)]
pub enum QueriesAction {
    /// List every example query in catalog order
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the query for one label
    Show {
        /// Exact label, as printed by `queries list`
        label: String,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("csv".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_show_command_parses() {
        let cli = Cli::try_parse_from([
            "netfrenzy",
            "queries",
            "show",
            "Find all 80/tcp connections",
            "-f",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Queries {
                action: QueriesAction::Show { label, format },
            } => {
                assert_eq!(label, "Find all 80/tcp connections");
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected queries show"),
        }
    }

    #[test]
    fn test_ingest_flags() {
        let cli = Cli::try_parse_from([
            "netfrenzy",
            "-v",
            "ingest",
            "--reduce",
            "--cache-size",
            "10",
            "--ignore-mac",
            "aa:bb:cc:dd:ee:ff",
            "--ignore-mac",
            "11:22:33:44:55:66",
        ])
        .unwrap();
        assert_eq!(cli.level_filter(), log::LevelFilter::Debug);
        match cli.command {
            Commands::Ingest {
                reduce,
                cache_size,
                ignore_macs,
                input,
                ..
            } => {
                assert!(reduce);
                assert_eq!(cache_size, Some(10));
                assert_eq!(ignore_macs.len(), 2);
                assert!(input.is_none());
            }
            _ => panic!("expected ingest"),
        }
    }

    #[test]
    fn test_default_log_level() {
        let cli = Cli::try_parse_from(["netfrenzy", "version"]).unwrap();
        assert_eq!(cli.level_filter(), log::LevelFilter::Warn);
    }
}
