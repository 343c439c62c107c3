use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Supported column types
///
/// Parsed from the free-text type of a column definition, so any declaration
/// (`VARCHAR(50)`, `DECIMAL(10,2)`, `BIGINT`, `DATE`) maps onto one of these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Decimal,
    /// Text with its declared width, if any. The width is never enforced.
    Text(Option<u32>),
}

impl ColumnType {
    /// Maps a declared type onto a column type by keyword substring
    pub fn parse(declared: &str) -> Self {
        let upper = declared.to_uppercase();
        if upper.contains("INT") {
            Self::Integer
        } else if upper.contains("VARCHAR") || upper.contains("CHAR") {
            Self::Text(Self::width(&upper))
        } else if ["DECIMAL", "FLOAT", "DOUBLE"].iter().any(|k| upper.contains(k)) {
            Self::Decimal
        } else {
            Self::Text(Self::width(&upper))
        }
    }

    /// First parenthesized integer of a declaration, e.g. 50 in `VARCHAR(50)`
    fn width(declared: &str) -> Option<u32> {
        let start = declared.find('(')? + 1;
        let len = declared[start..].find(|c: char| !c.is_ascii_digit())?;
        declared[start..start + len].parse().ok()
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Decimal)
    }

    /// Converts a stored cell into an output value.
    ///
    /// Cells that do not parse under the column type are returned unchanged as text.
    pub fn coerce(&self, raw: &str) -> Value {
        match self {
            Self::Integer => raw
                .trim()
                .parse()
                .map_or_else(|_| Value::Text(raw.to_string()), Value::Integer),
            Self::Decimal => raw
                .trim()
                .parse()
                .map_or_else(|_| Value::Text(raw.to_string()), Value::Decimal),
            Self::Text(_) => Value::Text(raw.to_string()),
        }
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "INTEGER"),
            ColumnType::Decimal => write!(f, "DECIMAL"),
            ColumnType::Text(_) => write!(f, "TEXT"),
        }
    }
}

/// Output cell of a query result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Decimal(v) => Some(*v),
            Value::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

/// A stored row: one raw text cell per schema column
pub type Row = Vec<String>;

#[cfg(test)]
mod tests {
    use super::{ColumnType, Value};

    #[test]
    fn test_parse_column_type() {
        assert_eq!(ColumnType::parse("INT"), ColumnType::Integer);
        assert_eq!(ColumnType::parse("bigint"), ColumnType::Integer);
        assert_eq!(ColumnType::parse("VARCHAR(50)"), ColumnType::Text(Some(50)));
        assert_eq!(ColumnType::parse("char"), ColumnType::Text(None));
        assert_eq!(ColumnType::parse("DECIMAL(10,2)"), ColumnType::Decimal);
        assert_eq!(ColumnType::parse("double precision"), ColumnType::Decimal);
        assert_eq!(ColumnType::parse("float"), ColumnType::Decimal);
        assert_eq!(ColumnType::parse("DATE"), ColumnType::Text(None));
        // keyword substring match, INT wins over everything else
        assert_eq!(ColumnType::parse("POINT"), ColumnType::Integer);
    }

    #[test]
    fn test_coerce() {
        assert_eq!(ColumnType::Integer.coerce("30"), Value::Integer(30));
        assert_eq!(ColumnType::Integer.coerce(""), Value::Text(String::new()));
        assert_eq!(ColumnType::Decimal.coerce("2.5"), Value::Decimal(2.5));
        assert_eq!(ColumnType::Decimal.coerce("n/a"), Value::Text("n/a".into()));
        assert_eq!(ColumnType::Text(None).coerce("42"), Value::Text("42".into()));
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::from("a").as_str(), Some("a"));
        assert_eq!(Value::Decimal(1.5).as_i64(), None);
        assert_eq!(Value::Decimal(1.5).to_string(), "1.5");
    }
}
