// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog and ingest statistics formatting for CLI output

use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use netfrenzy::catalog::{CatalogError, QueryCatalogEntry};
use netfrenzy::ingest::{CacheKind, CacheStats, IngestStats};
use serde::Serialize;
use std::error::Error;

use super::commands::OutputFormat;

/// JSON envelope for catalog listings
#[derive(Serialize)]
struct CatalogListing<'a> {
    count: usize,
    queries: &'a [QueryCatalogEntry],
}

/// Catalog formatter for different output formats
pub struct CatalogFormatter;

impl CatalogFormatter {
    /// Format a list of entries in the specified format
    pub fn format_list(entries: &[QueryCatalogEntry], format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::format_table(entries),
            OutputFormat::Json => Self::format_json(entries),
            OutputFormat::Csv => Self::format_csv(entries),
        }
    }

    /// Format a single entry. Table output is the bare query, ready to paste.
    pub fn format_entry(entry: &QueryCatalogEntry, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => format!("{}\n", entry.query()),
            OutputFormat::Json => serde_json::to_string_pretty(entry).unwrap_or_else(|_| {
                "{\"status\": \"error\", \"error\": \"Could not serialize entry to JSON\"}"
                    .to_string()
            }),
            OutputFormat::Csv => Self::format_csv(std::slice::from_ref(entry)),
        }
    }

    fn format_table(entries: &[QueryCatalogEntry]) -> String {
        if entries.is_empty() {
            return format!("{}\n", "No example queries".yellow());
        }

        let mut output = String::new();
        output.push_str(&format!("{}\n", "Helpful Queries".bold().green()));
        output.push_str(&format!("Entries: {}\n\n", entries.len()));

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("#").fg(Color::Green),
            Cell::new("Label").fg(Color::Green),
            Cell::new("Query").fg(Color::Green),
        ]);
        for (i, entry) in entries.iter().enumerate() {
            table.add_row(vec![
                (i + 1).to_string(),
                entry.label().to_string(),
                entry.query().to_string(),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    fn format_json(entries: &[QueryCatalogEntry]) -> String {
        let listing = CatalogListing {
            count: entries.len(),
            queries: entries,
        };
        serde_json::to_string_pretty(&listing).unwrap_or_else(|_| {
            "{\"status\": \"error\", \"error\": \"Could not serialize catalog to JSON\"}"
                .to_string()
        })
    }

    fn format_csv(entries: &[QueryCatalogEntry]) -> String {
        let mut output = String::from("label,query\n");
        for entry in entries {
            output.push_str(&format!(
                "{},{}\n",
                csv_field(entry.label()),
                csv_field(entry.query())
            ));
        }
        output
    }
}

/// Quote a CSV field when it contains a delimiter, quote or newline
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Ingest run summary as a table
pub fn format_ingest_stats(stats: &IngestStats, caches: &[(CacheKind, CacheStats)]) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", "Ingest Summary".bold().green()));
    output.push_str(&format!("Packets: {}\n", stats.packets));
    output.push_str(&format!("Statements: {}\n", stats.statements));
    output.push_str(&format!(
        "Time in sink: {} ms\n\n",
        stats.sink_time.as_millis()
    ));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Cache").fg(Color::Green),
        Cell::new("Hits").fg(Color::Green),
        Cell::new("Misses").fg(Color::Green),
        Cell::new("Use").fg(Color::Green),
    ]);
    for (kind, cache) in caches {
        table.add_row(vec![
            kind.to_string(),
            cache.hits.to_string(),
            cache.misses.to_string(),
            format!("{}/{}", cache.used, cache.capacity),
        ]);
    }
    output.push_str(&table.to_string());
    output.push('\n');
    output
}

/// Lines printed to stderr when a command fails: the error itself, then a
/// hint when one applies.
pub fn error_report(err: &(dyn Error + 'static)) -> (String, Option<&'static str>) {
    let hint = match err.downcast_ref::<CatalogError>() {
        Some(e) if e.is_not_found() => Some("Run 'netfrenzy queries list' to see available labels"),
        _ => None,
    };
    (format!("Error: {}", err), hint)
}
