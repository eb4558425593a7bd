// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Destinations for rendered graph statements

use super::error::Result;
use super::statement::GraphStatement;
use std::io::Write;

/// Receives every statement an [`Ingestor`](super::Ingestor) produces, in order.
pub trait GraphSink {
    fn execute(&mut self, statement: &GraphStatement) -> Result<()>;

    /// Called once after the last packet
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Keeps statements in memory
#[derive(Debug, Default)]
pub struct StatementLog {
    statements: Vec<GraphStatement>,
}

impl StatementLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statements(&self) -> &[GraphStatement] {
        &self.statements
    }

    pub fn into_statements(self) -> Vec<GraphStatement> {
        self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl GraphSink for StatementLog {
    fn execute(&mut self, statement: &GraphStatement) -> Result<()> {
        self.statements.push(statement.clone());
        Ok(())
    }
}

/// Writes a `;`-terminated Cypher script, one statement after another
pub struct CypherWriter<W: Write> {
    out: W,
}

impl<W: Write> CypherWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> GraphSink for CypherWriter<W> {
    fn execute(&mut self, statement: &GraphStatement) -> Result<()> {
        writeln!(self.out, "{};", statement.to_cypher())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
