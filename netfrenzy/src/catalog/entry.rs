// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! A single labelled example query

use serde::{Deserialize, Serialize};

/// One (label, query) pair of the catalog.
///
/// The query text is carried verbatim. It is never parsed or checked here;
/// its grammar belongs to whatever engine eventually runs it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryCatalogEntry {
    /// Display name, also the lookup key
    pub label: String,
    /// Query text in the graph-query language
    pub query: String,
}

impl QueryCatalogEntry {
    pub fn new(label: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            query: query.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

impl<L: Into<String>, Q: Into<String>> From<(L, Q)> for QueryCatalogEntry {
    fn from((label, query): (L, Q)) -> Self {
        Self::new(label, query)
    }
}
