use tracing::debug;

use crate::{
    error::{Error, Result},
    sql::{
        engine::Engine,
        executor::{Executor, ResultSet},
        parser::ast::{Literal, Predicate},
        schema::{Column, Header},
        types::{ColumnType, Row},
    },
};

/// Checks a literal against the column it is stored into and returns the cell text.
///
/// Integer and decimal columns take unquoted numbers, text columns take quoted
/// strings. `position` is 1-based and only used for the error.
fn check_literal(position: usize, literal: &Literal, column: &Column) -> Result<String> {
    let valid = match column.datatype {
        ColumnType::Integer => !literal.quoted && literal.text.trim().parse::<i64>().is_ok(),
        ColumnType::Decimal => !literal.quoted && literal.text.trim().parse::<f64>().is_ok(),
        ColumnType::Text(_) => literal.quoted,
    };
    if !valid {
        return Err(Error::TypeMismatch {
            position,
            literal: literal.to_string(),
            expected: column.datatype,
        });
    }
    Ok(literal.text.clone())
}

/// INSERT executor
pub struct Insert {
    table_name: String,
    values: Vec<Vec<Literal>>,
}

impl Insert {
    pub fn new(table_name: String, values: Vec<Vec<Literal>>) -> Box<Self> {
        Box::new(Self { table_name, values })
    }
}

impl<E: Engine> Executor<E> for Insert {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        let table = engine.must_get_table_mut(&self.table_name)?;
        let columns = table.schema.columns();

        // Every tuple is checked before the first row is stored
        let mut rows: Vec<Row> = Vec::with_capacity(self.values.len());
        for tuple in &self.values {
            if tuple.len() != columns.len() {
                return Err(Error::ColumnCountMismatch {
                    expected: columns.len(),
                    found: tuple.len(),
                });
            }
            rows.push(
                tuple
                    .iter()
                    .zip(columns)
                    .enumerate()
                    .map(|(i, (literal, column))| check_literal(i + 1, literal, column))
                    .collect::<Result<_>>()?,
            );
        }

        let count = rows.len();
        table.rows.extend(rows);
        debug!(table = %self.table_name, count, "inserted rows");
        Ok(ResultSet::Insert {
            table_name: self.table_name,
            count,
        })
    }
}

/// UPDATE executor
pub struct Update {
    table_name: String,
    columns: Vec<(String, Literal)>,
    predicate: Option<Predicate>,
}

impl Update {
    pub fn new(
        table_name: String,
        columns: Vec<(String, Literal)>,
        predicate: Option<Predicate>,
    ) -> Box<Self> {
        Box::new(Self {
            table_name,
            columns,
            predicate,
        })
    }
}

impl<E: Engine> Executor<E> for Update {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        let table = engine.must_get_table_mut(&self.table_name)?;

        // Resolve and check every assignment before touching a row
        let mut assignments = Vec::with_capacity(self.columns.len());
        for (i, (name, literal)) in self.columns.iter().enumerate() {
            let pos = table.schema.must_get_col_index(name)?;
            let cell = check_literal(i + 1, literal, &table.schema.columns()[pos])?;
            assignments.push((pos, cell));
        }

        let header = Header::from_table(table);
        let mut count = 0;
        for row in table.rows.iter_mut() {
            let matched = match &self.predicate {
                Some(predicate) => predicate.evaluate(row, &header),
                None => true,
            };
            if !matched {
                continue;
            }
            for (pos, cell) in &assignments {
                row[*pos] = cell.clone();
            }
            count += 1;
        }

        debug!(table = %self.table_name, count, "updated rows");
        if count == 0 {
            return Ok(ResultSet::NoMatch {
                table_name: self.table_name,
            });
        }
        Ok(ResultSet::Update {
            table_name: self.table_name,
            count,
        })
    }
}

/// DELETE executor
pub struct Delete {
    table_name: String,
    predicate: Option<Predicate>,
}

impl Delete {
    pub fn new(table_name: String, predicate: Option<Predicate>) -> Box<Self> {
        Box::new(Self {
            table_name,
            predicate,
        })
    }
}

impl<E: Engine> Executor<E> for Delete {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        let table = engine.must_get_table_mut(&self.table_name)?;
        let before = table.rows.len();
        match &self.predicate {
            Some(predicate) => {
                let header = Header::from_table(table);
                table.rows.retain(|row| !predicate.evaluate(row, &header));
            }
            None => table.rows.clear(),
        }
        let count = before - table.rows.len();

        debug!(table = %self.table_name, count, "deleted rows");
        Ok(ResultSet::Delete {
            table_name: self.table_name,
            count,
        })
    }
}
