use crate::{
    config::OperatorMatching,
    error::{Error, Result},
    sql::parser::ast::{ColumnRef, Literal, Operator, Predicate},
};

/// Operator search order of the legacy scan
const LEGACY_ORDER: [&str; 6] = ["=", ">", "<", ">=", "<=", "!="];

/// Parses `column <op> literal`. Blank text means no condition.
pub fn parse_predicate(text: &str, matching: OperatorMatching) -> Result<Option<Predicate>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let (pos, symbol) = match matching {
        OperatorMatching::Longest => find_longest(text),
        OperatorMatching::Legacy => find_legacy(text),
    }
    .ok_or_else(|| Error::Parse(format!("[Parser] No comparison operator in condition {}", text)))?;

    let column = text[..pos].trim();
    if column.is_empty() {
        return Err(Error::Parse(format!("[Parser] Missing column in condition {}", text)));
    }
    let operator = Operator::from_symbol(symbol)
        .ok_or_else(|| Error::Internal(format!("unknown operator {}", symbol)))?;

    Ok(Some(Predicate {
        column: ColumnRef::parse(column),
        operator,
        value: Literal::parse(&text[pos + symbol.len()..]),
    }))
}

/// Leftmost operator outside quotes, two-character forms first
fn find_longest(text: &str) -> Option<(usize, &'static str)> {
    let mut quote: Option<char> = None;
    let mut prev = None;
    for (i, c) in text.char_indices() {
        let escaped = prev == Some('\\');
        prev = Some(c);
        match quote {
            Some(q) if c == q && !escaped => quote = None,
            Some(_) => {}
            None if (c == '\'' || c == '"') && !escaped => quote = Some(c),
            None => {
                let rest = &text[i..];
                for symbol in [">=", "<=", "!=", "<>", "=", ">", "<"] {
                    if rest.starts_with(symbol) {
                        return Some((i, symbol));
                    }
                }
            }
        }
    }
    None
}

/// First occurrence of the first operator found, scanning in `LEGACY_ORDER`
fn find_legacy(text: &str) -> Option<(usize, &'static str)> {
    LEGACY_ORDER
        .iter()
        .find_map(|symbol| text.find(symbol).map(|pos| (pos, *symbol)))
}
