use crate::{
    config::Config,
    error::Result,
    sql::{
        parser::ast::{self, AlterAction, Projection},
        plan::{Node, Plan},
        schema::{self, Schema, Table},
    },
};

/// Query planner - converts AST into execution plan nodes
pub struct Planner<'a> {
    config: &'a Config,
}

impl<'a> Planner<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Builds an execution plan from an AST statement
    pub fn build(&mut self, stmt: ast::Statement) -> Result<Plan> {
        Ok(Plan(self.build_statement(stmt)?))
    }

    pub fn build_statement(&self, stmt: ast::Statement) -> Result<Node> {
        Ok(match stmt {
            ast::Statement::CreateTable { name, columns } => Node::CreateTable {
                schema: Table::new(
                    name,
                    Schema::new(
                        columns
                            .into_iter()
                            .map(|c| schema::Column::new(c.name, c.declared))
                            .collect(),
                    )?,
                ),
                replace: self.config.replace_existing_tables,
            },
            ast::Statement::Insert { table_name, values } => Node::Insert { table_name, values },
            ast::Statement::Select {
                select,
                from,
                where_clause,
                order_by,
            } => {
                // Joins fold left to right: ((a JOIN b) JOIN c)
                let mut node = Node::Scan {
                    table_name: from.table,
                };
                for join in from.joins {
                    node = Node::NestedLoopJoin {
                        left: Box::new(node),
                        right: Box::new(Node::Scan {
                            table_name: join.table,
                        }),
                        predicate: join.predicate,
                    };
                }

                if let Some(predicate) = where_clause {
                    node = Node::Filter {
                        source: Box::new(node),
                        predicate,
                    };
                }

                // ORDER BY runs before projection so unselected columns can be keys
                if !order_by.is_empty() {
                    node = Node::Order {
                        source: Box::new(node),
                        order_by,
                    };
                }

                if let Projection::Columns(columns) = select {
                    node = Node::Projection {
                        source: Box::new(node),
                        columns,
                    };
                }

                node
            }
            ast::Statement::Update {
                table_name,
                columns,
                where_clause,
            } => Node::Update {
                table_name,
                columns,
                predicate: where_clause,
            },
            ast::Statement::Delete {
                table_name,
                where_clause,
            } => Node::Delete {
                table_name,
                predicate: where_clause,
            },
            ast::Statement::AlterTable { table_name, action } => match action {
                AlterAction::Add { column, declared } => Node::AddColumn {
                    table_name,
                    column: schema::Column::new(column, declared),
                },
                AlterAction::Drop { column } => Node::DropColumn {
                    table_name,
                    column_name: column,
                },
            },
            ast::Statement::DropTable { table_name } => Node::DropTable { table_name },
            ast::Statement::ShowTables => Node::ShowTables,
        })
    }
}
