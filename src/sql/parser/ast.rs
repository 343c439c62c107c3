use std::fmt::Display;

/// Abstract Syntax Tree (AST) node definitions for SQL statements
#[derive(Debug, PartialEq)]
pub enum Statement {
    /// CREATE TABLE statement
    CreateTable { name: String, columns: Vec<Column> },
    /// INSERT statement, one literal list per VALUES tuple
    Insert {
        table_name: String,
        values: Vec<Vec<Literal>>,
    },
    /// SELECT statement
    Select {
        select: Projection,
        from: FromClause,
        where_clause: Option<Predicate>,
        order_by: Vec<(ColumnRef, OrderDirection)>,
    },
    /// UPDATE statement, assignments in the order written
    Update {
        table_name: String,
        columns: Vec<(String, Literal)>,
        where_clause: Option<Predicate>,
    },
    /// DELETE statement
    Delete {
        table_name: String,
        where_clause: Option<Predicate>,
    },
    AlterTable {
        table_name: String,
        action: AlterAction,
    },
    DropTable { table_name: String },
    ShowTables,
}

/// Column definition for CREATE TABLE statements
#[derive(Debug, PartialEq)]
pub struct Column {
    pub name: String,
    /// Type text as written, e.g. `DECIMAL(10,2)`
    pub declared: String,
}

#[derive(Debug, PartialEq)]
pub enum AlterAction {
    Add { column: String, declared: String },
    Drop { column: String },
}

/// SELECT list
#[derive(Debug, PartialEq)]
pub enum Projection {
    All,
    Columns(Vec<ColumnRef>),
}

/// FROM clause: the first table followed by the joined ones
#[derive(Debug, PartialEq)]
pub struct FromClause {
    pub table: String,
    pub joins: Vec<Join>,
}

#[derive(Debug, PartialEq)]
pub struct Join {
    pub table: String,
    /// ON condition; None means a cartesian product
    pub predicate: Option<Predicate>,
}

/// Sort direction (ascending or descending)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// A possibly qualified column name, `name` or `table.name`
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    pub table: Option<String>,
    pub name: String,
}

impl ColumnRef {
    /// Splits at the first period
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match text.split_once('.') {
            Some((table, name)) => Self {
                table: Some(table.trim().to_string()),
                name: name.trim().to_string(),
            },
            None => Self {
                table: None,
                name: text.to_string(),
            },
        }
    }
}

impl Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", table, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A literal as written in the statement.
///
/// `quoted` records whether it was enclosed in matching quotes; the quotes
/// themselves are not part of `text`.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub text: String,
    pub quoted: bool,
}

impl Literal {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        for quote in ['\'', '"'] {
            if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
                return Self {
                    text: raw[1..raw.len() - 1].to_string(),
                    quoted: true,
                };
            }
        }
        Self {
            text: raw.to_string(),
            quoted: false,
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.quoted {
            write!(f, "'{}'", self.text)
        } else {
            f.write_str(&self.text)
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl Operator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "=" => Self::Equal,
            "!=" | "<>" => Self::NotEqual,
            ">" => Self::GreaterThan,
            ">=" => Self::GreaterThanOrEqual,
            "<" => Self::LessThan,
            "<=" => Self::LessThanOrEqual,
            _ => return None,
        })
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
        })
    }
}

/// Single comparison used by WHERE and JOIN ON
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: ColumnRef,
    pub operator: Operator,
    pub value: Literal,
}

impl Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.column, self.operator, self.value)
    }
}
