// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for NetFrenzy

use netfrenzy::ingest::{
    read_packets, CacheKind, CacheStats, CypherWriter, IngestConfig, IngestError, IngestStats,
    Ingestor,
};
use netfrenzy::{QueryCatalog, QueryCatalogEntry};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use super::commands::OutputFormat;
use super::output::{format_ingest_stats, CatalogFormatter};

/// Ingest settings gathered from the command line
#[derive(Debug, Default)]
pub struct IngestArgs {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub reduce: bool,
    pub cache_size: Option<usize>,
    pub ignore_macs: Vec<String>,
    pub stats: bool,
}

impl IngestArgs {
    /// Config file first, then flags on top
    pub fn resolve_config(&self) -> Result<IngestConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => {
                log::debug!("Loading ingest configuration from {:?}", path);
                IngestConfig::from_json_file(path)?
            }
            None => IngestConfig::default(),
        };
        if self.reduce {
            config.reduce = true;
        }
        if let Some(size) = self.cache_size {
            config.cache_capacity = size;
        }
        config.ignored_macs.extend(self.ignore_macs.iter().cloned());
        config.validate()?;
        Ok(config)
    }
}

/// Handle `queries list`
pub fn handle_queries_list(
    catalog: &QueryCatalog,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", CatalogFormatter::format_list(catalog.list(), format));
    Ok(())
}

/// Handle `queries show <label>`
pub fn handle_queries_show(
    catalog: &QueryCatalog,
    label: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = catalog.lookup(label)?;
    let entry = QueryCatalogEntry::new(label, query);
    println!("{}", CatalogFormatter::format_entry(&entry, format).trim_end());
    Ok(())
}

/// Write the Cypher script for every packet in `reader` to `writer`.
///
/// When a packet fails, what was written before it is still flushed and the
/// packet's error is returned.
pub fn ingest_stream<R, W>(
    config: IngestConfig,
    reader: R,
    writer: W,
) -> Result<(IngestStats, Vec<(CacheKind, CacheStats)>), IngestError>
where
    R: BufRead,
    W: Write,
{
    let mut ingestor = Ingestor::new(config, CypherWriter::new(writer))?;
    if let Err(e) = ingestor.ingest_all(read_packets(reader)) {
        if let Err(flush_err) = ingestor.finish() {
            log::warn!("Failed to flush partial output: {}", flush_err);
        }
        return Err(e);
    }

    let stats = ingestor.stats();
    let caches = ingestor.cache_stats();
    ingestor.finish()?;
    Ok((stats, caches))
}

/// Handle `ingest`
pub fn handle_ingest(args: IngestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.resolve_config()?;

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path).map_err(|e| {
            format!("Failed to open packet input {:?}: {}", path, e)
        })?)),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let (stats, caches) = ingest_stream(config, reader, writer)?;
    if args.stats {
        eprint!("{}", format_ingest_stats(&stats, &caches));
    }
    Ok(())
}
