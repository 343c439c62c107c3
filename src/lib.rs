//! minisql - A small SQL-subset interpreter over an in-memory table store
//!
//! This crate provides:
//! - Comment stripping, batch splitting and statement classification
//! - SQL parsing (lexer, clause splitter, parser, AST)
//! - Query planning and execution with nested-loop joins
//! - A schema-typed, in-memory table store behind a pluggable engine trait

pub mod config;
pub mod error;
pub mod sql;

pub use config::{Config, OperatorMatching};
pub use error::{Error, Result};
pub use sql::engine::{Engine, MemoryEngine, Session};
pub use sql::executor::ResultSet;
pub use sql::types::Value;

/// Session over the in-memory engine
pub type Database = Session<MemoryEngine>;
