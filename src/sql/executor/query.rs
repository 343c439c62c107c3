use tracing::trace;

use crate::{
    error::Result,
    sql::{
        engine::Engine,
        executor::{Executor, ResultSet, RowSet, Source},
        parser::ast::{ColumnRef, OrderDirection, Predicate},
        schema::Header,
    },
};

/// Table scan source
pub struct Scan {
    table_name: String,
}

impl Scan {
    pub fn new(table_name: String) -> Box<Self> {
        Box::new(Self { table_name })
    }
}

impl<E: Engine> Source<E> for Scan {
    fn scan(self: Box<Self>, engine: &E) -> Result<RowSet> {
        let table = engine.must_get_table(&self.table_name)?;
        trace!(table = %self.table_name, rows = table.rows.len(), "scan");
        Ok(RowSet {
            header: Header::from_table(table),
            rows: table.rows.clone(),
        })
    }
}

/// WHERE filter
pub struct Filter<E: Engine> {
    source: Box<dyn Source<E>>,
    predicate: Predicate,
}

impl<E: Engine> Filter<E> {
    pub fn new(source: Box<dyn Source<E>>, predicate: Predicate) -> Box<Self> {
        Box::new(Self { source, predicate })
    }
}

impl<E: Engine> Source<E> for Filter<E> {
    fn scan(self: Box<Self>, engine: &E) -> Result<RowSet> {
        let RowSet { header, mut rows } = self.source.scan(engine)?;
        let before = rows.len();
        rows.retain(|row| self.predicate.evaluate(row, &header));
        trace!(predicate = %self.predicate, before, after = rows.len(), "filter");
        Ok(RowSet { header, rows })
    }
}

/// ORDER BY executor - sorts rows by specified columns
pub struct Order<E: Engine> {
    source: Box<dyn Source<E>>,
    order_by: Vec<(ColumnRef, OrderDirection)>,
}

impl<E: Engine> Order<E> {
    pub fn new(
        source: Box<dyn Source<E>>,
        order_by: Vec<(ColumnRef, OrderDirection)>,
    ) -> Box<Self> {
        Box::new(Self { source, order_by })
    }
}

/// Sort key of a numeric cell; unparsable cells sort as zero
fn numeric_key(cell: &str) -> f64 {
    cell.trim().parse().unwrap_or(0.0)
}

impl<E: Engine> Source<E> for Order<E> {
    fn scan(self: Box<Self>, engine: &E) -> Result<RowSet> {
        let RowSet { header, mut rows } = self.source.scan(engine)?;

        let keys = self
            .order_by
            .iter()
            .map(|(col, direction)| header.must_resolve(col).map(|pos| (pos, *direction)))
            .collect::<Result<Vec<_>>>()?;

        // One stable pass per key, last key first, so earlier keys take precedence
        for (pos, direction) in keys.into_iter().rev() {
            let numeric = header.columns[pos].datatype.is_numeric();
            rows.sort_by(|a, b| {
                let x = a.get(pos).map_or("", String::as_str);
                let y = b.get(pos).map_or("", String::as_str);
                let ordering = if numeric {
                    numeric_key(x).total_cmp(&numeric_key(y))
                } else {
                    x.to_lowercase().cmp(&y.to_lowercase())
                };
                match direction {
                    OrderDirection::Asc => ordering,
                    OrderDirection::Desc => ordering.reverse(),
                }
            });
        }

        Ok(RowSet { header, rows })
    }
}

/// Column projection, output columns are labelled as requested
pub struct Projection<E: Engine> {
    source: Box<dyn Source<E>>,
    columns: Vec<ColumnRef>,
}

impl<E: Engine> Projection<E> {
    pub fn new(source: Box<dyn Source<E>>, columns: Vec<ColumnRef>) -> Box<Self> {
        Box::new(Self { source, columns })
    }
}

impl<E: Engine> Source<E> for Projection<E> {
    fn scan(self: Box<Self>, engine: &E) -> Result<RowSet> {
        let RowSet { header, rows } = self.source.scan(engine)?;

        let mut positions = Vec::with_capacity(self.columns.len());
        let mut projected = Header::default();
        for col in &self.columns {
            let pos = header.must_resolve(col)?;
            let mut column = header.columns[pos].clone();
            column.name = col.to_string();
            projected.columns.push(column);
            positions.push(pos);
        }

        let rows = rows
            .into_iter()
            .map(|row| {
                positions
                    .iter()
                    .map(|&pos| row.get(pos).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        Ok(RowSet {
            header: projected,
            rows,
        })
    }
}

/// Top of a SELECT pipeline, converts the cells to typed output values
pub struct Select<E: Engine> {
    source: Box<dyn Source<E>>,
}

impl<E: Engine> Select<E> {
    pub fn new(source: Box<dyn Source<E>>) -> Box<Self> {
        Box::new(Self { source })
    }
}

impl<E: Engine> Executor<E> for Select<E> {
    fn execute(self: Box<Self>, engine: &mut E) -> Result<ResultSet> {
        let RowSet { header, rows } = self.source.scan(engine)?;
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&header.columns)
                    .map(|(cell, column)| column.datatype.coerce(cell))
                    .collect()
            })
            .collect();
        Ok(ResultSet::Scan {
            columns: header.names(),
            rows,
        })
    }
}
