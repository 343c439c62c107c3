use std::fmt::Display;

use serde::Serialize;

use crate::{
    error::{Error, Result},
    sql::{
        engine::Engine,
        executor::{
            join::NestedLoopJoin,
            mutation::{Delete, Insert, Update},
            query::{Filter, Order, Projection, Scan, Select},
            schema::{AddColumn, CreateTable, DropColumn, DropTable, ShowTables},
        },
        plan::Node,
        schema::Header,
        types::{Row, Value},
    },
};

mod join;
mod mutation;
mod predicate;
mod query;
mod schema;

/// SQL executor trait
pub trait Executor<E: Engine> {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet>;
}

/// Row producing executor used inside a SELECT pipeline
pub trait Source<E: Engine> {
    fn scan(self: Box<Self>, engine: &E) -> Result<RowSet>;
}

/// Intermediate rows of a query together with their column layout
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    pub header: Header,
    pub rows: Vec<Row>,
}

/// Builds an executor from a plan node
///
/// The `'static` bound is required for trait object usage in recursive executor building.
impl<E: Engine + 'static> dyn Executor<E> {
    pub fn build(node: Node) -> Result<Box<dyn Executor<E>>> {
        let executor: Box<dyn Executor<E>> = match node {
            Node::CreateTable { schema, replace } => CreateTable::new(schema, replace),
            Node::DropTable { table_name } => DropTable::new(table_name),
            Node::AddColumn { table_name, column } => AddColumn::new(table_name, column),
            Node::DropColumn {
                table_name,
                column_name,
            } => DropColumn::new(table_name, column_name),
            Node::ShowTables => ShowTables::new(),
            Node::Insert { table_name, values } => Insert::new(table_name, values),
            Node::Update {
                table_name,
                columns,
                predicate,
            } => Update::new(table_name, columns, predicate),
            Node::Delete {
                table_name,
                predicate,
            } => Delete::new(table_name, predicate),
            query => Select::new(<dyn Source<E>>::build(query)?),
        };
        Ok(executor)
    }
}

impl<E: Engine + 'static> dyn Source<E> {
    pub fn build(node: Node) -> Result<Box<dyn Source<E>>> {
        let source: Box<dyn Source<E>> = match node {
            Node::Scan { table_name } => Scan::new(table_name),
            Node::NestedLoopJoin {
                left,
                right,
                predicate,
            } => NestedLoopJoin::new(Self::build(*left)?, Self::build(*right)?, predicate),
            Node::Filter { source, predicate } => Filter::new(Self::build(*source)?, predicate),
            Node::Order { source, order_by } => Order::new(Self::build(*source)?, order_by),
            Node::Projection { source, columns } => {
                Projection::new(Self::build(*source)?, columns)
            }
            node => {
                return Err(Error::Internal(format!(
                    "plan node {:?} does not produce rows",
                    node
                )));
            }
        };
        Ok(source)
    }
}

/// Execution result set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultSet {
    CreateTable {
        table_name: String,
    },
    Insert {
        table_name: String,
        count: usize,
    },
    Scan {
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
    Update {
        table_name: String,
        count: usize,
    },
    /// UPDATE whose condition matched no row
    NoMatch {
        table_name: String,
    },
    Delete {
        table_name: String,
        count: usize,
    },
    AddColumn {
        table_name: String,
        column_name: String,
    },
    DropColumn {
        table_name: String,
        column_name: String,
    },
    DropTable {
        table_name: String,
    },
    Comment,
}

impl ResultSet {
    /// Rows of a query result, None for status outcomes
    pub fn rows(&self) -> Option<&[Vec<Value>]> {
        match self {
            ResultSet::Scan { rows, .. } => Some(rows),
            _ => None,
        }
    }

    pub fn columns(&self) -> Option<&[String]> {
        match self {
            ResultSet::Scan { columns, .. } => Some(columns),
            _ => None,
        }
    }
}

impl Display for ResultSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultSet::CreateTable { table_name } => {
                write!(f, "table {} created", table_name)
            }
            ResultSet::Insert { table_name, count } => {
                write!(f, "inserted {} row(s) into {}", count, table_name)
            }
            ResultSet::Scan { rows, .. } => write!(f, "{} row(s) returned", rows.len()),
            ResultSet::Update { table_name, count } => {
                write!(f, "updated {} row(s) in {}", count, table_name)
            }
            ResultSet::NoMatch { table_name } => {
                write!(f, "no rows in {} matched the condition", table_name)
            }
            ResultSet::Delete { table_name, count } => {
                write!(f, "deleted {} row(s) from {}", count, table_name)
            }
            ResultSet::AddColumn {
                table_name,
                column_name,
            } => write!(f, "column {} added to {}", column_name, table_name),
            ResultSet::DropColumn {
                table_name,
                column_name,
            } => write!(f, "column {} dropped from {}", column_name, table_name),
            ResultSet::DropTable { table_name } => write!(f, "table {} dropped", table_name),
            ResultSet::Comment => write!(f, "comment ignored"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ResultSet;
    use crate::sql::types::Value;

    #[test]
    fn test_result_set_display() {
        assert_eq!(
            ResultSet::Insert {
                table_name: "users".into(),
                count: 2
            }
            .to_string(),
            "inserted 2 row(s) into users"
        );
        assert_eq!(
            ResultSet::NoMatch {
                table_name: "users".into()
            }
            .to_string(),
            "no rows in users matched the condition"
        );
    }

    #[test]
    fn test_result_set_json() -> Result<(), serde_json::Error> {
        let result = ResultSet::Scan {
            columns: vec!["id".into(), "name".into()],
            rows: vec![vec![Value::Integer(1), Value::from("Ann")]],
        };
        assert_eq!(
            serde_json::to_string(&result)?,
            r#"{"kind":"scan","columns":["id","name"],"rows":[[1,"Ann"]]}"#
        );
        assert_eq!(
            serde_json::to_string(&ResultSet::DropTable {
                table_name: "t".into()
            })?,
            r#"{"kind":"drop_table","table_name":"t"}"#
        );
        Ok(())
    }
}
