//! SELECT clause splitting and FROM/JOIN parsing

use std::collections::BTreeMap;

use crate::{
    config::OperatorMatching,
    error::{Error, Result},
    sql::parser::{
        ast::{FromClause, Join},
        lexer::{Keyword, Token, tokenize},
        predicate::parse_predicate,
    },
};

/// Clauses of a SELECT statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Clause {
    Select,
    From,
    Where,
    OrderBy,
}

/// Maps each clause present in a SELECT statement to its trimmed body.
///
/// Only the first occurrence of a clause keyword counts. A body runs up to the
/// next clause keyword by position, whatever clause that is.
pub fn split_clauses(stmt: &str) -> Result<BTreeMap<Clause, &str>> {
    let tokens = tokenize(stmt)?;
    // (clause, keyword start, keyword end)
    let mut found: Vec<(Clause, usize, usize)> = Vec::new();

    for (i, spanned) in tokens.iter().enumerate() {
        let clause = match spanned.token {
            Token::Keyword(Keyword::Select) => Clause::Select,
            Token::Keyword(Keyword::From) => Clause::From,
            Token::Keyword(Keyword::Where) => Clause::Where,
            Token::Keyword(Keyword::Order) => match tokens.get(i + 1) {
                Some(next) if next.token == Token::Keyword(Keyword::By) => Clause::OrderBy,
                _ => continue,
            },
            _ => continue,
        };
        if found.iter().any(|(c, _, _)| *c == clause) {
            continue;
        }
        let end = match clause {
            Clause::OrderBy => tokens[i + 1].span.end,
            _ => spanned.span.end,
        };
        found.push((clause, spanned.span.start, end));
    }

    let mut clauses = BTreeMap::new();
    for (n, (clause, _, body_start)) in found.iter().enumerate() {
        let body_end = found.get(n + 1).map_or(stmt.len(), |(_, start, _)| *start);
        clauses.insert(*clause, stmt[*body_start..body_end].trim());
    }
    Ok(clauses)
}

/// Words that belong to a join specification rather than a condition
fn is_join_word(word: &str) -> bool {
    ["JOIN", "INNER", "LEFT", "RIGHT", "FULL", "CROSS", "OUTER"]
        .iter()
        .any(|w| word.eq_ignore_ascii_case(w))
}

/// Splits on whitespace outside quotes, returning each word with its byte range
fn words(text: &str) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut start = None;
    let mut quote: Option<char> = None;
    let mut prev = None;

    for (i, c) in text.char_indices() {
        let escaped = prev == Some('\\');
        prev = Some(c);
        if let Some(q) = quote {
            if c == q && !escaped {
                quote = None;
            }
            continue;
        }
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                out.push((s, i));
            }
            continue;
        }
        if (c == '\'' || c == '"') && !escaped {
            quote = Some(c);
        }
        start.get_or_insert(i);
    }
    if let Some(s) = start {
        out.push((s, text.len()));
    }
    out
}

/// Parses the body of a FROM clause.
///
/// Tables are separated by whitespace, commas or `JOIN`. Join modifiers
/// (`INNER`, `LEFT`, ...) are accepted and ignored; every join is inner. An `ON`
/// condition runs until the next join word and belongs to the table named
/// right before it.
pub fn parse_from(body: &str, matching: OperatorMatching) -> Result<FromClause> {
    let words = words(body);
    let mut tables: Vec<Join> = Vec::new();
    let mut i = 0;

    while i < words.len() {
        let (start, end) = words[i];
        let word = &body[start..end];
        i += 1;

        if word.eq_ignore_ascii_case("JOIN") {
            let (start, end) = *words
                .get(i)
                .ok_or_else(|| Error::Parse("[Parser] JOIN without a table name".into()))?;
            i += 1;
            let table = body[start..end].trim_matches(',');
            if table.is_empty() || is_join_word(table) || table.eq_ignore_ascii_case("ON") {
                return Err(Error::Parse(format!("[Parser] Invalid join table {}", table)));
            }
            tables.push(Join {
                table: table.to_string(),
                predicate: None,
            });
        } else if is_join_word(word) {
            continue;
        } else if word.eq_ignore_ascii_case("ON") {
            let first = i;
            while i < words.len() {
                let next = &body[words[i].0..words[i].1];
                if is_join_word(next) || next.eq_ignore_ascii_case("ON") {
                    break;
                }
                i += 1;
            }
            if first == i {
                return Err(Error::Parse("[Parser] Empty ON condition".into()));
            }
            let condition = &body[words[first].0..words[i - 1].1];
            let join = match tables.len() {
                0 | 1 => None,
                _ => tables.last_mut(),
            }
            .ok_or_else(|| Error::Parse("[Parser] ON without a joined table".into()))?;
            if join.predicate.is_some() {
                return Err(Error::Parse(format!(
                    "[Parser] Duplicate ON condition for table {}",
                    join.table
                )));
            }
            join.predicate = parse_predicate(condition, matching)?;
        } else {
            for table in word.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                tables.push(Join {
                    table: table.to_string(),
                    predicate: None,
                });
            }
        }
    }

    let mut tables = tables.into_iter();
    let first = tables
        .next()
        .ok_or_else(|| Error::Parse("[Parser] FROM clause names no table".into()))?;
    Ok(FromClause {
        table: first.table,
        joins: tables.collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::{Clause, parse_from, split_clauses};
    use crate::{
        config::OperatorMatching,
        error::Result,
        sql::parser::ast::{ColumnRef, Operator},
    };

    #[test]
    fn test_split_clauses() -> Result<()> {
        let clauses = split_clauses(
            "SELECT name, age FROM users WHERE age > 25 ORDER BY age DESC, id",
        )?;
        assert_eq!(clauses.get(&Clause::Select), Some(&"name, age"));
        assert_eq!(clauses.get(&Clause::From), Some(&"users"));
        assert_eq!(clauses.get(&Clause::Where), Some(&"age > 25"));
        assert_eq!(clauses.get(&Clause::OrderBy), Some(&"age DESC, id"));
        Ok(())
    }

    #[test]
    fn test_split_clauses_word_boundaries() -> Result<()> {
        let clauses = split_clauses("select fromage from wherehouse where note = 'from x'")?;
        assert_eq!(clauses.get(&Clause::Select), Some(&"fromage"));
        assert_eq!(clauses.get(&Clause::From), Some(&"wherehouse"));
        assert_eq!(clauses.get(&Clause::Where), Some(&"note = 'from x'"));
        assert_eq!(clauses.get(&Clause::OrderBy), None);

        let clauses = split_clauses("SELECT * FROM t ORDER BY id WHERE id = 1")?;
        assert_eq!(clauses.get(&Clause::OrderBy), Some(&"id"));
        assert_eq!(clauses.get(&Clause::Where), Some(&"id = 1"));
        Ok(())
    }

    #[test]
    fn test_parse_from_single() -> Result<()> {
        let from = parse_from("users", OperatorMatching::Longest)?;
        assert_eq!(from.table, "users");
        assert!(from.joins.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_from_joins() -> Result<()> {
        let from = parse_from(
            "users INNER JOIN orders ON users.id = orders.user_id LEFT OUTER JOIN items",
            OperatorMatching::Longest,
        )?;
        assert_eq!(from.table, "users");
        assert_eq!(from.joins.len(), 2);
        assert_eq!(from.joins[0].table, "orders");
        let predicate = from.joins[0].predicate.clone();
        let predicate = predicate.ok_or_else(|| crate::error::Error::Internal("none".into()))?;
        assert_eq!(predicate.column, ColumnRef::parse("users.id"));
        assert_eq!(predicate.operator, Operator::Equal);
        assert_eq!(predicate.value.text, "orders.user_id");
        assert_eq!(from.joins[1].table, "items");
        assert_eq!(from.joins[1].predicate, None);
        Ok(())
    }

    #[test]
    fn test_parse_from_commas() -> Result<()> {
        let from = parse_from("a, b ,c", OperatorMatching::Longest)?;
        assert_eq!(from.table, "a");
        let names: Vec<_> = from.joins.iter().map(|j| j.table.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
        Ok(())
    }

    #[test]
    fn test_parse_from_errors() {
        let m = OperatorMatching::Longest;
        assert!(parse_from("users JOIN", m).is_err());
        assert!(parse_from("users JOIN orders ON", m).is_err());
        assert!(parse_from("users ON id = 1", m).is_err());
        assert!(parse_from("a JOIN b ON a.x = b.x ON a.y = b.y", m).is_err());
        assert!(parse_from("", m).is_err());
    }
}
