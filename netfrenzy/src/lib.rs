// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! NetFrenzy - network traffic as a graph
//!
//! - [`catalog`] - helpful example queries, looked up by label
//! - [`ingest`] - packet summaries to graph statements

pub mod catalog;
pub mod ingest;

pub use catalog::{CatalogError, QueryCatalog, QueryCatalogBuilder, QueryCatalogEntry};
pub use ingest::{GraphSink, IngestConfig, IngestError, Ingestor, PacketSummary};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
