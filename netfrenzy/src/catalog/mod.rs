// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Example query catalog
//!
//! An ordered, immutable mapping from a short descriptive label to a query
//! string. A UI populates its "helpful queries" selector from [`QueryCatalog::list`]
//! and forwards the text returned by [`QueryCatalog::lookup`] to the query
//! engine untouched.
//!
//! The catalog is an ordinary value: construct it once, then share it by
//! reference or behind an `Arc`. It is `Send + Sync` and never mutated after
//! construction, so concurrent readers need no locking.
//!
//! Labels are unique. Construction fails with
//! [`CatalogError::DuplicateLabel`] rather than letting a later entry
//! shadow an earlier one.

pub mod builtin;
pub mod entry;
pub mod error;

pub use builtin::HELPFUL_QUERIES;
pub use entry::QueryCatalogEntry;
pub use error::{CatalogError, Result};

use std::collections::HashMap;

/// Insertion-ordered label → query catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryCatalog {
    entries: Vec<QueryCatalogEntry>,
    index: HashMap<String, usize>,
}

impl QueryCatalog {
    /// Build a catalog from entries in declaration order.
    pub fn new<I, E>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<QueryCatalogEntry>,
    {
        let mut catalog = Self::default();
        for entry in entries {
            catalog.insert(entry.into())?;
        }
        log::debug!("Query catalog built with {} entries", catalog.len());
        Ok(catalog)
    }

    /// The helpful queries shipped with NetFrenzy
    pub fn builtin() -> Result<Self> {
        Self::new(HELPFUL_QUERIES.iter().copied())
    }

    pub fn builder() -> QueryCatalogBuilder {
        QueryCatalogBuilder::default()
    }

    fn insert(&mut self, entry: QueryCatalogEntry) -> Result<()> {
        if entry.label.trim().is_empty() {
            return Err(CatalogError::EmptyLabel);
        }
        if self.index.contains_key(&entry.label) {
            return Err(CatalogError::DuplicateLabel { label: entry.label });
        }
        self.index.insert(entry.label.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// All entries in declaration order
    pub fn list(&self) -> &[QueryCatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueryCatalogEntry> {
        self.entries.iter()
    }

    /// Query text for an exact label match
    pub fn lookup(&self, label: &str) -> Result<&str> {
        self.get(label)
            .map(QueryCatalogEntry::query)
            .ok_or_else(|| CatalogError::NotFound {
                label: label.to_string(),
            })
    }

    pub fn get(&self, label: &str) -> Option<&QueryCatalogEntry> {
        self.index.get(label).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// Labels in declaration order
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(QueryCatalogEntry::label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a QueryCatalog {
    type Item = &'a QueryCatalogEntry;
    type IntoIter = std::slice::Iter<'a, QueryCatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Fluent builder for custom catalogs
///
/// ```text
/// let catalog = QueryCatalog::builder()
///     .entry("Everything", "MATCH (n) RETURN n")
///     .entry("Assignments", "MATCH (n:IP)-[:ASSIGNED]-(m:MAC) RETURN *")
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryCatalogBuilder {
    entries: Vec<QueryCatalogEntry>,
}

impl QueryCatalogBuilder {
    pub fn entry(mut self, label: impl Into<String>, query: impl Into<String>) -> Self {
        self.entries.push(QueryCatalogEntry::new(label, query));
        self
    }

    /// Append every built-in helpful query
    pub fn with_builtin(mut self) -> Self {
        self.entries.extend(
            HELPFUL_QUERIES
                .iter()
                .map(|&(label, query)| QueryCatalogEntry::new(label, query)),
        );
        self
    }

    pub fn build(self) -> Result<QueryCatalog> {
        QueryCatalog::new(self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> QueryCatalog {
        QueryCatalog::builtin().expect("built-in catalog is valid")
    }

    #[test]
    fn test_builtin_preserves_declaration_order() {
        let catalog = builtin();
        let labels: Vec<&str> = catalog.labels().collect();
        let declared: Vec<&str> = HELPFUL_QUERIES.iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, declared);
        assert_eq!(catalog.len(), 7);
    }

    #[test]
    fn test_lookup_returns_exact_query() {
        let catalog = builtin();
        assert_eq!(
            catalog.lookup("Find all 80/tcp connections").unwrap(),
            r#"MATCH (n)-[r:CONNECTED {port: 80, protocol: "tcp"}]->(m) RETURN *"#
        );
    }

    #[test]
    fn test_lookup_missing_label() {
        let catalog = builtin();
        let err = catalog.lookup("nonexistent label").unwrap_err();
        assert_eq!(
            err,
            CatalogError::NotFound {
                label: "nonexistent label".to_string()
            }
        );
    }

    #[test]
    fn test_lookup_is_exact_match() {
        let catalog = builtin();
        assert!(catalog.lookup("find all 80/tcp connections").is_err());
        assert!(catalog.lookup("Find all 80/tcp connections ").is_err());
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let result = QueryCatalog::builder()
            .entry("Same", "MATCH (n) RETURN n")
            .entry("Other", "MATCH (m) RETURN m")
            .entry("Same", "MATCH (x) RETURN x")
            .build();
        assert_eq!(
            result.unwrap_err(),
            CatalogError::DuplicateLabel {
                label: "Same".to_string()
            }
        );
    }

    #[test]
    fn test_empty_label_rejected() {
        let result = QueryCatalog::new([("  ", "MATCH (n) RETURN n")]);
        assert_eq!(result.unwrap_err(), CatalogError::EmptyLabel);
    }

    #[test]
    fn test_builder_extends_builtin() {
        let catalog = QueryCatalog::builder()
            .with_builtin()
            .entry("All MAC nodes", "MATCH (m:MAC) RETURN m")
            .build()
            .unwrap();
        assert_eq!(catalog.len(), HELPFUL_QUERIES.len() + 1);
        assert_eq!(catalog.labels().last(), Some("All MAC nodes"));
        assert!(catalog.contains("Display all nodes and relationships"));
    }

    #[test]
    fn test_builder_rejects_builtin_collision() {
        let result = QueryCatalog::builder()
            .with_builtin()
            .entry("Display all nodes and relationships", "MATCH (n) RETURN n")
            .build();
        assert!(matches!(result, Err(CatalogError::DuplicateLabel { .. })));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = QueryCatalog::new(Vec::<QueryCatalogEntry>::new()).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.list().is_empty());
        assert!(catalog.get("anything").is_none());
    }
}
