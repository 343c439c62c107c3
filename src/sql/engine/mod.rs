use tracing::debug;

use crate::{
    config::Config,
    error::{Error, Result},
};

use super::{
    executor::ResultSet,
    parser::{
        OperationKind,
        batch::{split_batch, strip_comments},
        classify, Parser,
    },
    plan::Plan,
    schema::{Schema, Table},
    types::Row,
};

pub use memory::MemoryEngine;

mod memory;

/// Table store trait
///
/// Tables are keyed by their exact, case-sensitive name and listed in the
/// order they were first created.
pub trait Engine {
    /// Registers a table, replacing any table of the same name in place
    fn create_table(&mut self, table: Table) -> Result<()>;
    /// Removes a table together with its rows
    fn drop_table(&mut self, table_name: &str) -> Result<Table>;
    fn get_table(&self, table_name: &str) -> Option<&Table>;
    fn get_table_mut(&mut self, table_name: &str) -> Option<&mut Table>;
    fn table_names(&self) -> Vec<String>;

    /// Returns table info, returns error if table doesn't exist
    fn must_get_table(&self, table_name: &str) -> Result<&Table> {
        self.get_table(table_name)
            .ok_or_else(|| Error::TableNotFound(table_name.to_string()))
    }

    fn must_get_table_mut(&mut self, table_name: &str) -> Result<&mut Table> {
        self.get_table_mut(table_name)
            .ok_or_else(|| Error::TableNotFound(table_name.to_string()))
    }
}

/// SQL session for executing statements
pub struct Session<E: Engine> {
    engine: E,
    config: Config,
}

impl Session<MemoryEngine> {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_engine(MemoryEngine::new(), config)
    }
}

impl Default for Session<MemoryEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Engine + 'static> Session<E> {
    pub fn with_engine(engine: E, config: Config) -> Self {
        Self { engine, config }
    }

    /// Executes a single SQL statement
    ///
    /// Comments are removed first; a statement that was only a comment yields
    /// [`ResultSet::Comment`].
    pub fn execute_statement(&mut self, sql: &str) -> Result<ResultSet> {
        let kind = classify(sql);
        debug!(?kind, statement = sql.trim(), "executing statement");
        match kind {
            OperationKind::Comment => return Ok(ResultSet::Comment),
            OperationKind::Unknown => {
                return Err(Error::UnknownStatement(strip_comments(sql).trim().to_string()));
            }
            _ => {}
        }

        let stripped = strip_comments(sql);
        let stmt = Parser::new(&stripped)
            .operator_matching(self.config.operator_matching)
            .parse()?;
        Plan::build(stmt, &self.config)?.execute(&mut self.engine)
    }

    /// Executes every statement of a batch in order, continuing past failures
    pub fn execute_batch(&mut self, sql: &str) -> Vec<Result<ResultSet>> {
        let statements = split_batch(sql);
        debug!(count = statements.len(), "executing batch");
        statements
            .iter()
            .map(|stmt| self.execute_statement(stmt))
            .collect()
    }

    /// Table names in creation order
    pub fn list_tables(&self) -> Vec<String> {
        self.engine.table_names()
    }

    pub fn get_schema(&self, table_name: &str) -> Option<&Schema> {
        self.engine.get_table(table_name).map(|t| &t.schema)
    }

    pub fn get_rows(&self, table_name: &str) -> Option<&[Row]> {
        self.engine.get_table(table_name).map(|t| t.rows.as_slice())
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
