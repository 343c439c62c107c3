use tracing::info;

use crate::{
    error::{Error, Result},
    sql::{
        engine::Engine,
        executor::{Executor, ResultSet},
        schema::{Column, Table},
        types::Value,
    },
};

/// CREATE TABLE executor
pub struct CreateTable {
    schema: Table,
    replace: bool,
}

impl CreateTable {
    pub fn new(schema: Table, replace: bool) -> Box<Self> {
        Box::new(Self { schema, replace })
    }
}

impl<E: Engine> Executor<E> for CreateTable {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        let table_name = self.schema.name.clone();
        if engine.get_table(&table_name).is_some() {
            if !self.replace {
                return Err(Error::TableExists(table_name));
            }
            info!(table = %table_name, "replacing existing table");
        }
        info!(table = %table_name, columns = self.schema.schema.len(), "creating table");
        engine.create_table(self.schema)?;
        Ok(ResultSet::CreateTable { table_name })
    }
}

/// DROP TABLE executor
pub struct DropTable {
    table_name: String,
}

impl DropTable {
    pub fn new(table_name: String) -> Box<Self> {
        Box::new(Self { table_name })
    }
}

impl<E: Engine> Executor<E> for DropTable {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        engine.drop_table(&self.table_name)?;
        info!(table = %self.table_name, "dropped table");
        Ok(ResultSet::DropTable {
            table_name: self.table_name,
        })
    }
}

/// ALTER TABLE ... ADD executor, existing rows get an empty cell
pub struct AddColumn {
    table_name: String,
    column: Column,
}

impl AddColumn {
    pub fn new(table_name: String, column: Column) -> Box<Self> {
        Box::new(Self { table_name, column })
    }
}

impl<E: Engine> Executor<E> for AddColumn {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        let table = engine.must_get_table_mut(&self.table_name)?;
        let column_name = self.column.name.clone();
        table.add_column(self.column)?;
        info!(table = %self.table_name, column = %column_name, "added column");
        Ok(ResultSet::AddColumn {
            table_name: self.table_name,
            column_name,
        })
    }
}

/// ALTER TABLE ... DROP executor
pub struct DropColumn {
    table_name: String,
    column_name: String,
}

impl DropColumn {
    pub fn new(table_name: String, column_name: String) -> Box<Self> {
        Box::new(Self {
            table_name,
            column_name,
        })
    }
}

impl<E: Engine> Executor<E> for DropColumn {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        engine
            .must_get_table_mut(&self.table_name)?
            .drop_column(&self.column_name)?;
        info!(table = %self.table_name, column = %self.column_name, "dropped column");
        Ok(ResultSet::DropColumn {
            table_name: self.table_name,
            column_name: self.column_name,
        })
    }
}

/// SHOW TABLES executor
pub struct ShowTables;

impl ShowTables {
    pub fn new() -> Box<Self> {
        Box::new(Self)
    }
}

impl<E: Engine> Executor<E> for ShowTables {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        Ok(ResultSet::Scan {
            columns: vec!["table_name".to_string()],
            rows: engine
                .table_names()
                .into_iter()
                .map(|name| vec![Value::Text(name)])
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::Config,
        error::{Error, Result},
        sql::{engine::Session, executor::ResultSet, types::Value},
    };

    #[test]
    fn test_create_and_replace_table() -> Result<()> {
        let mut session = Session::new();
        session.execute_statement("CREATE TABLE t (a INT)")?;
        session.execute_statement("INSERT INTO t VALUES (1)")?;
        session.execute_statement("CREATE TABLE t (b VARCHAR(10), c INT)")?;
        assert_eq!(session.get_rows("t").map(|r| r.len()), Some(0));
        assert_eq!(session.get_schema("t").map(|s| s.len()), Some(2));

        let mut strict = Session::with_config(Config {
            replace_existing_tables: false,
            ..Config::default()
        });
        strict.execute_statement("CREATE TABLE t (a INT)")?;
        assert_eq!(
            strict.execute_statement("CREATE TABLE t (a INT)"),
            Err(Error::TableExists("t".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_alter_table() -> Result<()> {
        let mut session = Session::new();
        session.execute_batch(
            "CREATE TABLE users (id INT, name VARCHAR(10)); INSERT INTO users VALUES (1, 'Ann');",
        );
        assert_eq!(
            session.execute_statement("ALTER TABLE users ADD email VARCHAR(50)")?,
            ResultSet::AddColumn {
                table_name: "users".to_string(),
                column_name: "email".to_string()
            }
        );
        assert_eq!(
            session.get_rows("users").map(|r| r.to_vec()),
            Some(vec![vec!["1".to_string(), "Ann".to_string(), String::new()]])
        );
        assert_eq!(
            session.execute_statement("ALTER TABLE users ADD EMAIL INT"),
            Err(Error::DuplicateColumn("EMAIL".to_string()))
        );

        session.execute_statement("ALTER TABLE users DROP COLUMN NAME")?;
        assert_eq!(
            session.get_rows("users").map(|r| r.to_vec()),
            Some(vec![vec!["1".to_string(), String::new()]])
        );
        assert_eq!(
            session.execute_statement("ALTER TABLE users DROP name"),
            Err(Error::ColumnNotFound("name".to_string()))
        );
        assert_eq!(
            session.execute_statement("ALTER TABLE nope DROP name"),
            Err(Error::TableNotFound("nope".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_drop_and_show_tables() -> Result<()> {
        let mut session = Session::new();
        session.execute_batch("CREATE TABLE a (x INT); CREATE TABLE b (x INT);");
        assert_eq!(
            session.execute_statement("SHOW TABLES")?,
            ResultSet::Scan {
                columns: vec!["table_name".to_string()],
                rows: vec![vec![Value::from("a")], vec![Value::from("b")]],
            }
        );
        session.execute_statement("DROP TABLE a")?;
        assert_eq!(
            session.execute_statement("DROP TABLE a"),
            Err(Error::TableNotFound("a".to_string()))
        );
        assert_eq!(session.list_tables(), vec!["b".to_string()]);
        Ok(())
    }
}
