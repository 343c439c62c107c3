use tracing::trace;

use crate::{
    error::Result,
    sql::{
        engine::Engine,
        executor::{RowSet, Source},
        parser::ast::Predicate,
    },
};

/// Nested Loop Join executor
///
/// Every left row is paired with every right row; with a predicate only the
/// pairs satisfying it are kept, without one the result is the Cartesian product.
pub struct NestedLoopJoin<E: Engine> {
    left: Box<dyn Source<E>>,
    right: Box<dyn Source<E>>,
    predicate: Option<Predicate>,
}

impl<E: Engine> NestedLoopJoin<E> {
    pub fn new(
        left: Box<dyn Source<E>>,
        right: Box<dyn Source<E>>,
        predicate: Option<Predicate>,
    ) -> Box<Self> {
        Box::new(Self {
            left,
            right,
            predicate,
        })
    }
}

impl<E: Engine> Source<E> for NestedLoopJoin<E> {
    fn scan(self: Box<Self>, engine: &E) -> Result<RowSet> {
        let left = self.left.scan(engine)?;
        let right = self.right.scan(engine)?;
        let header = left.header.join(&right.header);

        let mut rows = Vec::new();
        for lrow in &left.rows {
            for rrow in &right.rows {
                let mut row = lrow.clone();
                row.extend(rrow.iter().cloned());
                let keep = match &self.predicate {
                    Some(predicate) => predicate.evaluate_join(&row, &header),
                    None => true,
                };
                if keep {
                    rows.push(row);
                }
            }
        }

        trace!(
            left = left.rows.len(),
            right = right.rows.len(),
            joined = rows.len(),
            "nested loop join"
        );
        Ok(RowSet { header, rows })
    }
}
