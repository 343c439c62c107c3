//! Common test utilities for SQL integration tests
#![allow(dead_code)]

use std::collections::HashMap;

use minisql::{Database, Error, ResultSet, Value};

/// Test context that owns a database and provides helper methods
pub struct TestContext {
    pub db: Database,
}

impl TestContext {
    /// Create a new test context
    pub fn new() -> Self {
        Self {
            db: Database::new(),
        }
    }

    /// Create a context and run a setup batch, failing on the first error
    pub fn with_batch(sql: &str) -> Self {
        let mut ctx = Self::new();
        for (i, result) in ctx.db.execute_batch(sql).into_iter().enumerate() {
            if let Err(e) = result {
                panic!("setup statement {} failed: {}", i + 1, e);
            }
        }
        ctx
    }

    /// Execute a statement that must succeed
    pub fn exec(&mut self, sql: &str) -> ResultSet {
        match self.db.execute_statement(sql) {
            Ok(result) => result,
            Err(e) => panic!("statement failed: {}\n  sql: {}", e, sql),
        }
    }

    /// Execute a statement that must fail, returning the error
    pub fn exec_error(&mut self, sql: &str) -> Error {
        match self.db.execute_statement(sql) {
            Ok(result) => panic!("expected an error, got {:?}\n  sql: {}", result, sql),
            Err(e) => e,
        }
    }

    /// Run a query and return its rows keyed by column label
    pub fn query(&mut self, sql: &str) -> Vec<HashMap<String, Value>> {
        match self.exec(sql) {
            ResultSet::Scan { columns, rows } => rows
                .into_iter()
                .map(|row| columns.iter().cloned().zip(row).collect())
                .collect(),
            other => panic!("expected rows, got {:?}", other),
        }
    }

    /// Run a query and return its rows as they come
    pub fn query_rows(&mut self, sql: &str) -> Vec<Vec<Value>> {
        match self.exec(sql) {
            ResultSet::Scan { rows, .. } => rows,
            other => panic!("expected rows, got {:?}", other),
        }
    }

    pub fn query_count(&mut self, sql: &str) -> usize {
        self.query_rows(sql).len()
    }

    pub fn assert_row_count(&mut self, sql: &str, expected: usize) {
        let count = self.query_count(sql);
        assert_eq!(count, expected, "row count mismatch for: {}", sql);
    }

    /// Assert the value of a column in the first row
    pub fn assert_query_value(&mut self, sql: &str, column: &str, expected: Value) {
        let rows = self.query(sql);
        let first = rows.first().unwrap_or_else(|| panic!("no rows for: {}", sql));
        assert_eq!(first.get(column), Some(&expected), "value mismatch for: {}", sql);
    }
}
