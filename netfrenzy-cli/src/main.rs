// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! NetFrenzy CLI entry point

use clap::Parser;
use colored::Colorize;
use netfrenzy::QueryCatalog;

mod cli;
use cli::{Cli, Commands, IngestArgs, QueriesAction};

fn main() {
    // Parse command line arguments first to get log level
    let cli = Cli::parse();

    // RUST_LOG can still refine the level per module
    env_logger::Builder::from_default_env()
        .filter_level(cli.level_filter())
        .init();

    if let Err(e) = run(cli) {
        let (message, hint) = cli::output::error_report(e.as_ref());
        eprintln!("{}", message.red());
        if let Some(hint) = hint {
            eprintln!("{}", hint.yellow());
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Version => {
            println!("{} {}", "NetFrenzy".bold().green(), netfrenzy::VERSION);
            println!("Network traffic as a graph");
            Ok(())
        }

        Commands::Queries { action } => {
            // Built once and handed to the handlers
            let catalog = QueryCatalog::builtin()?;
            match action {
                QueriesAction::List { format } => cli::handle_queries_list(&catalog, format),
                QueriesAction::Show { label, format } => {
                    cli::handle_queries_show(&catalog, &label, format)
                }
            }
        }

        Commands::Ingest {
            input,
            output,
            config,
            reduce,
            cache_size,
            ignore_macs,
            stats,
        } => cli::handle_ingest(IngestArgs {
            input,
            output,
            config,
            reduce,
            cache_size,
            ignore_macs,
            stats,
        }),
    }
}
