// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for NetFrenzy
//!
//! Provides browsing of the helpful query catalog and conversion of
//! packet summaries into a Cypher script.

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands, QueriesAction};
pub use handlers::{handle_ingest, handle_queries_list, handle_queries_show, IngestArgs};
