//! SQL processing module
//!
//! This module provides:
//! - `parser`: preprocessing, lexer, clause splitter and parser
//! - `types`: column types and output values
//! - `schema`: table, column and row-set header definitions
//! - `plan`: Execution plan generation
//! - `executor`: Query and mutation execution
//! - `engine`: Table store abstraction and sessions

pub mod parser;
pub mod types;
pub mod schema;
pub mod plan;
pub mod executor;
pub mod engine;
