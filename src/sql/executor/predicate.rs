//! Evaluation of single-comparison predicates against header-described rows

use std::cmp::Ordering;

use tracing::{trace, warn};

use crate::sql::{
    parser::ast::{ColumnRef, Operator, Predicate},
    schema::Header,
};

impl Operator {
    /// Compares numerically when both sides parse as numbers, as text otherwise
    pub fn compare(&self, left: &str, right: &str) -> bool {
        let ordering = match (left.trim().parse::<f64>(), right.trim().parse::<f64>()) {
            (Ok(l), Ok(r)) => l.partial_cmp(&r),
            _ => Some(left.cmp(right)),
        };
        match ordering {
            // NaN on either side only satisfies !=
            None => *self == Operator::NotEqual,
            Some(ordering) => match self {
                Operator::Equal => ordering == Ordering::Equal,
                Operator::NotEqual => ordering != Ordering::Equal,
                Operator::GreaterThan => ordering == Ordering::Greater,
                Operator::GreaterThanOrEqual => ordering != Ordering::Less,
                Operator::LessThan => ordering == Ordering::Less,
                Operator::LessThanOrEqual => ordering != Ordering::Greater,
            },
        }
    }
}

impl Predicate {
    /// Evaluates the predicate against a row.
    ///
    /// A column that does not resolve against the header passes every row.
    pub fn evaluate(&self, row: &[String], header: &Header) -> bool {
        let Some(pos) = header.resolve(&self.column) else {
            warn!(column = %self.column, "condition column not found, row passes");
            return true;
        };
        match row.get(pos) {
            Some(cell) => self.operator.compare(cell, &self.value.text),
            None => true,
        }
    }

    /// Evaluates a join condition against a combined row.
    ///
    /// Both sides resolve strictly: a qualified name only matches a column of
    /// that table, and a column that does not resolve rejects the pair. An
    /// unquoted right-hand side naming a column of the combined row is
    /// compared as that column's value, e.g. `users.id = orders.user_id`;
    /// any other right-hand side is a literal.
    pub fn evaluate_join(&self, row: &[String], header: &Header) -> bool {
        let Some(left) = header.resolve_qualified(&self.column) else {
            trace!(column = %self.column, "join column not found, pair rejected");
            return false;
        };
        let Some(l) = row.get(left) else {
            return false;
        };
        if self.value.quoted {
            return self.operator.compare(l, &self.value.text);
        }
        let other = ColumnRef::parse(&self.value.text);
        match header.resolve_qualified(&other) {
            Some(right) => row
                .get(right)
                .is_some_and(|r| self.operator.compare(l, r)),
            None if other.table.as_deref().is_some_and(|t| header.has_table(t)) => {
                trace!(column = %other, "join column not found, pair rejected");
                false
            }
            None => self.operator.compare(l, &self.value.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::OperatorMatching,
        error::{Error, Result},
        sql::{
            parser::{ast::{Operator, Predicate}, predicate::parse_predicate},
            schema::{Column, Header, Schema, Table},
        },
    };

    fn predicate(text: &str) -> Result<Predicate> {
        parse_predicate(text, OperatorMatching::Longest)?
            .ok_or_else(|| Error::Internal("no predicate".into()))
    }

    fn header() -> Result<Header> {
        let users = Table::new(
            "users",
            Schema::new(vec![Column::new("id", "INT"), Column::new("name", "VARCHAR(20)")])?,
        );
        let orders = Table::new(
            "orders",
            Schema::new(vec![Column::new("user_id", "INT"), Column::new("amount", "DECIMAL")])?,
        );
        Ok(Header::from_table(&users).join(&Header::from_table(&orders)))
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_operator_compare() {
        assert!(Operator::GreaterThan.compare("10", "9"));
        assert!(!Operator::LessThan.compare("10", "9.5"));
        assert!(Operator::Equal.compare("2.0", "2"));
        // text comparison is case-sensitive
        assert!(Operator::LessThan.compare("Bob", "alice"));
        assert!(Operator::NotEqual.compare("a", "A"));
        assert!(Operator::GreaterThanOrEqual.compare("b", "b"));
        assert!(Operator::LessThanOrEqual.compare("", "a"));
        assert!(!Operator::Equal.compare("NaN", "NaN"));
        assert!(Operator::NotEqual.compare("NaN", "1"));
    }

    #[test]
    fn test_predicate_evaluate() -> Result<()> {
        let header = header()?;
        let r = row(&["1", "Ann", "1", "20.5"]);
        assert!(predicate("amount > 20")?.evaluate(&r, &header));
        assert!(predicate("NAME = 'Ann'")?.evaluate(&r, &header));
        assert!(!predicate("users.name = 'ann'")?.evaluate(&r, &header));
        // unresolved column passes
        assert!(predicate("missing = 3")?.evaluate(&r, &header));
        // short row passes
        assert!(predicate("amount = 0")?.evaluate(&row(&["1"]), &header));
        Ok(())
    }

    #[test]
    fn test_predicate_evaluate_join() -> Result<()> {
        let header = header()?;
        let p = predicate("users.id = orders.user_id")?;
        assert!(p.evaluate_join(&row(&["1", "Ann", "1", "5"]), &header));
        assert!(!p.evaluate_join(&row(&["1", "Ann", "2", "5"]), &header));

        // quoted right side stays a literal
        let p = predicate("users.name = 'orders.user_id'")?;
        assert!(!p.evaluate_join(&row(&["1", "Ann", "1", "5"]), &header));

        // unresolved right side falls back to a literal comparison
        let p = predicate("users.id = 1")?;
        assert!(p.evaluate_join(&row(&["1", "Ann", "7", "5"]), &header));
        assert!(!p.evaluate_join(&row(&["2", "Ann", "7", "5"]), &header));
        Ok(())
    }

    #[test]
    fn test_predicate_evaluate_join_strict_columns() -> Result<()> {
        let header = header()?;
        let r = row(&["1", "Ann", "1", "5"]);

        // orders has no id column, so neither side may borrow users.id
        assert!(!predicate("users.id = orders.id")?.evaluate_join(&r, &header));
        assert!(!predicate("orders.id = users.id")?.evaluate_join(&r, &header));
        assert!(!predicate("missing = orders.user_id")?.evaluate_join(&r, &header));
        // the WHERE evaluation still falls back to the bare column name
        assert!(predicate("orders.name = 'Ann'")?.evaluate(&r, &header));
        // unqualified names resolve to the first table exposing them
        assert!(predicate("id = user_id")?.evaluate_join(&r, &header));
        Ok(())
    }
}
