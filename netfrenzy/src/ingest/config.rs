// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Ingest configuration

use super::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of recent values remembered per cache kind
pub const DEFAULT_CACHE_CAPACITY: usize = 50;

/// Settings for an [`Ingestor`](super::Ingestor)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Skip timing, size and service tracking on connections
    pub reduce: bool,
    /// Recent values remembered per cache kind
    pub cache_capacity: usize,
    /// MAC addresses never assigned to an IP (gateways, taps)
    pub ignored_macs: Vec<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            reduce: false,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            ignored_macs: Vec::new(),
        }
    }
}

impl IngestConfig {
    /// Reduced mode, for keeping up with a live capture
    pub fn reduced() -> Self {
        Self {
            reduce: true,
            ..Default::default()
        }
    }

    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self {
            cache_capacity: capacity,
            ..Default::default()
        }
    }

    /// Load from a JSON file; absent fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text).map_err(|source| IngestError::Json {
            line: source.line(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(IngestError::InvalidConfig(
                "cache_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_ignored_mac(&self, mac: &str) -> bool {
        self.ignored_macs
            .iter()
            .any(|ignored| ignored.eq_ignore_ascii_case(mac))
    }
}
