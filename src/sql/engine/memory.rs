use std::collections::HashMap;

use crate::{
    error::{Error, Result},
    sql::{engine::Engine, schema::Table},
};

/// In-memory table store
#[derive(Debug, Default)]
pub struct MemoryEngine {
    tables: HashMap<String, Table>,
    /// Table names in creation order
    order: Vec<String>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Engine for MemoryEngine {
    fn create_table(&mut self, table: Table) -> Result<()> {
        if !self.tables.contains_key(&table.name) {
            self.order.push(table.name.clone());
        }
        self.tables.insert(table.name.clone(), table);
        Ok(())
    }

    fn drop_table(&mut self, table_name: &str) -> Result<Table> {
        let table = self
            .tables
            .remove(table_name)
            .ok_or_else(|| Error::TableNotFound(table_name.to_string()))?;
        self.order.retain(|name| name != table_name);
        Ok(table)
    }

    fn get_table(&self, table_name: &str) -> Option<&Table> {
        self.tables.get(table_name)
    }

    fn get_table_mut(&mut self, table_name: &str) -> Option<&mut Table> {
        self.tables.get_mut(table_name)
    }

    fn table_names(&self) -> Vec<String> {
        self.order.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryEngine;
    use crate::{
        error::{Error, Result},
        sql::{
            engine::Engine,
            schema::{Column, Schema, Table},
        },
    };

    fn table(name: &str) -> Result<Table> {
        Ok(Table::new(name, Schema::new(vec![Column::new("id", "INT")])?))
    }

    #[test]
    fn test_memory_engine_order() -> Result<()> {
        let mut engine = MemoryEngine::new();
        engine.create_table(table("b")?)?;
        engine.create_table(table("a")?)?;
        engine.create_table(table("c")?)?;
        // re-creating keeps the original position
        engine.create_table(table("b")?)?;
        assert_eq!(engine.table_names(), vec!["b", "a", "c"]);

        engine.drop_table("a")?;
        assert_eq!(engine.table_names(), vec!["b", "c"]);
        assert_eq!(
            engine.drop_table("a"),
            Err(Error::TableNotFound("a".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_memory_engine_case_sensitive() -> Result<()> {
        let mut engine = MemoryEngine::new();
        engine.create_table(table("Users")?)?;
        assert!(engine.get_table("Users").is_some());
        assert!(engine.get_table("users").is_none());
        assert!(engine.must_get_table("users").is_err());
        Ok(())
    }
}
