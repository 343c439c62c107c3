use crate::{
    config::Config,
    error::Result,
    sql::{
        engine::Engine,
        executor::{Executor, ResultSet},
        parser::ast::{self, ColumnRef, Literal, OrderDirection},
        schema::{Column, Table},
    },
};

use planner::Planner;

mod planner;

/// Execution plan node
#[derive(Debug, PartialEq)]
pub enum Node {
    CreateTable {
        schema: Table,
        /// Replace an existing table of the same name instead of failing
        replace: bool,
    },
    DropTable {
        table_name: String,
    },
    AddColumn {
        table_name: String,
        column: Column,
    },
    DropColumn {
        table_name: String,
        column_name: String,
    },
    ShowTables,
    Insert {
        table_name: String,
        values: Vec<Vec<Literal>>,
    },
    Update {
        table_name: String,
        columns: Vec<(String, Literal)>,
        predicate: Option<ast::Predicate>,
    },
    Delete {
        table_name: String,
        predicate: Option<ast::Predicate>,
    },
    /// Full scan of a single table
    Scan {
        table_name: String,
    },
    /// Inner join of two row sources, cartesian when there is no predicate
    NestedLoopJoin {
        left: Box<Node>,
        right: Box<Node>,
        predicate: Option<ast::Predicate>,
    },
    Filter {
        source: Box<Node>,
        predicate: ast::Predicate,
    },
    Order {
        source: Box<Node>,
        order_by: Vec<(ColumnRef, OrderDirection)>,
    },
    Projection {
        source: Box<Node>,
        columns: Vec<ColumnRef>,
    },
}

/// Execution plan wrapper
#[derive(Debug, PartialEq)]
pub struct Plan(pub Node);

impl Plan {
    /// Builds an execution plan from an AST statement
    pub fn build(stmt: ast::Statement, config: &Config) -> Result<Self> {
        Planner::new(config).build(stmt)
    }

    /// Executes the plan against the given engine
    pub fn execute<E: Engine + 'static>(self, engine: &mut E) -> Result<ResultSet> {
        <dyn Executor<E>>::build(self.0)?.execute(engine)
    }
}
