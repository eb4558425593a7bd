// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph ingest for captured traffic
//!
//! Builds the IP/MAC/SSID graph that the catalog's helpful queries are
//! written against:
//! - `(:IP)-[:CONNECTED {port, protocol}]->(:IP)` per destination port/protocol
//! - `(:MAC)-[:CONNECTED {protocol}]->(:MAC)` for non-IP frames
//! - `(:IP)-[:ASSIGNED]->(:MAC)`
//! - `(:MAC)-[:ADVERTISES|PROBES]->(:SSID)` and `(:MAC)-[:PROBE_RESPONSE]->(:MAC)`
//!
//! Packets arrive already decoded as [`PacketSummary`] values. Statements
//! leave through a [`GraphSink`]; executing them is left to the caller.

pub mod cache;
pub mod config;
pub mod error;
pub mod ingestor;
pub mod multicast;
pub mod packet;
pub mod sink;
pub mod statement;

pub use cache::{CacheKind, CacheStats};
pub use config::IngestConfig;
pub use error::{IngestError, Result};
pub use ingestor::{IngestStats, Ingestor};
pub use packet::{read_packets, FrameType, PacketSummary};
pub use sink::{CypherWriter, GraphSink, StatementLog};
pub use statement::GraphStatement;
