// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for the query catalog

use thiserror::Error;

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors raised by catalog construction and lookup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No entry carries the requested label
    #[error("Not found: no example query labelled '{label}'")]
    NotFound { label: String },

    /// Two entries were declared with the same label
    #[error("Duplicate label: '{label}' is declared more than once")]
    DuplicateLabel { label: String },

    /// An entry was declared with an empty or whitespace-only label
    #[error("Invalid entry: label must not be empty")]
    EmptyLabel,
}

impl CatalogError {
    /// True for the lookup miss, which callers are expected to recover from
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}
