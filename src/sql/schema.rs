use std::collections::HashMap;

use serde::Serialize;

use crate::{
    error::{Error, Result},
    sql::{
        parser::ast::ColumnRef,
        types::{ColumnType, Row},
    },
};

/// Column schema definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub datatype: ColumnType,
    /// Type exactly as written in the definition, e.g. `VARCHAR(50)`
    pub declared: String,
}

impl Column {
    pub fn new(name: impl Into<String>, declared: impl Into<String>) -> Self {
        let declared = declared.into();
        Self {
            name: name.into(),
            datatype: ColumnType::parse(&declared),
            declared,
        }
    }
}

/// Ordered column list of a table.
///
/// Column names are unique ignoring case; lookups go through an index keyed by
/// the uppercased name, rebuilt whenever the column list changes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Schema {
    columns: Vec<Column>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut schema = Self::default();
        for column in columns {
            schema.push(column)?;
        }
        Ok(schema)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the column index for a given column name (case-insensitive)
    pub fn get_col_index(&self, col_name: &str) -> Option<usize> {
        self.index.get(&col_name.to_uppercase()).copied()
    }

    pub fn must_get_col_index(&self, col_name: &str) -> Result<usize> {
        self.get_col_index(col_name)
            .ok_or_else(|| Error::ColumnNotFound(col_name.to_string()))
    }

    /// Appends a column, rejecting a name that already exists
    pub fn push(&mut self, column: Column) -> Result<()> {
        let key = column.name.to_uppercase();
        if self.index.contains_key(&key) {
            return Err(Error::DuplicateColumn(column.name));
        }
        self.index.insert(key, self.columns.len());
        self.columns.push(column);
        Ok(())
    }

    /// Removes a column and returns its former position
    pub fn remove(&mut self, col_name: &str) -> Result<usize> {
        let pos = self.must_get_col_index(col_name)?;
        self.columns.remove(pos);
        self.reindex();
        Ok(pos)
    }

    fn reindex(&mut self) {
        self.index = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.to_uppercase(), i))
            .collect();
    }
}

/// A table: schema plus rows in insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub schema: Schema,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            rows: Vec::new(),
        }
    }

    /// Adds a column to the schema and an empty cell to every row
    pub fn add_column(&mut self, column: Column) -> Result<()> {
        self.schema.push(column)?;
        for row in self.rows.iter_mut() {
            row.push(String::new());
        }
        Ok(())
    }

    /// Removes a column from the schema and its cell from every row
    pub fn drop_column(&mut self, col_name: &str) -> Result<()> {
        let pos = self.schema.remove(col_name)?;
        for row in self.rows.iter_mut() {
            row.remove(pos);
        }
        Ok(())
    }
}

/// One column of an intermediate row set, tagged with the table it came from
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderColumn {
    pub table: String,
    pub name: String,
    pub datatype: ColumnType,
}

/// Column layout of a (possibly joined) row set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    pub columns: Vec<HeaderColumn>,
}

impl Header {
    pub fn from_table(table: &Table) -> Self {
        Self {
            columns: table
                .schema
                .columns()
                .iter()
                .map(|c| HeaderColumn {
                    table: table.name.clone(),
                    name: c.name.clone(),
                    datatype: c.datatype,
                })
                .collect(),
        }
    }

    /// Concatenates two headers, left columns first
    pub fn join(&self, other: &Header) -> Self {
        let mut columns = self.columns.clone();
        columns.extend(other.columns.iter().cloned());
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Position of the first column of `table` (every table when None)
    /// named `name`. Column names match ignoring case, table names exactly.
    fn position(&self, table: Option<&str>, name: &str) -> Option<usize> {
        let key = name.to_uppercase();
        self.columns.iter().position(|c| {
            table.is_none_or(|t| c.table == t) && c.name.to_uppercase() == key
        })
    }

    /// Resolves a column reference the way WHERE conditions do.
    ///
    /// A qualified reference prefers the column of the named table; when no
    /// table matches it falls back to the first column with that name, as do
    /// unqualified references.
    pub fn resolve(&self, column: &ColumnRef) -> Option<usize> {
        column
            .table
            .as_deref()
            .and_then(|table| self.position(Some(table), &column.name))
            .or_else(|| self.position(None, &column.name))
    }

    /// Resolves a column reference, looking only inside the named table when
    /// the reference is qualified.
    pub fn resolve_qualified(&self, column: &ColumnRef) -> Option<usize> {
        self.position(column.table.as_deref(), &column.name)
    }

    /// Whether any column of the header comes from `table`
    pub fn has_table(&self, table: &str) -> bool {
        self.columns.iter().any(|c| c.table == table)
    }

    pub fn must_resolve(&self, column: &ColumnRef) -> Result<usize> {
        self.resolve_qualified(column)
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))
    }
}
