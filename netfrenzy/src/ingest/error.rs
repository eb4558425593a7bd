// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for graph ingest

use thiserror::Error;

/// Result type alias for ingest operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors raised while turning packets into graph statements
#[derive(Error, Debug)]
pub enum IngestError {
    /// Reading packets or writing statements failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A packet line could not be decoded
    #[error("Invalid packet on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration values out of range
    #[error("Invalid ingest configuration: {0}")]
    InvalidConfig(String),

    /// The sink refused a statement. Raised by [`GraphSink`](super::GraphSink)
    /// implementations that talk to a database rather than a writer.
    #[error("Sink error: {0}")]
    Sink(String),
}
