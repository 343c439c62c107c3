use crate::config::OperatorMatching;
use crate::error::{Error, Result};
use crate::sql::parser::ast::{
    AlterAction, Column, ColumnRef, Literal, OrderDirection, Projection, Statement,
};
use crate::sql::parser::batch::{split_top_level, strip_comments};
use crate::sql::parser::clause::{Clause, parse_from, split_clauses};
use crate::sql::parser::lexer::{Keyword, Lexer, Spanned, Token, tokenize};
use crate::sql::parser::predicate::parse_predicate;

pub mod ast;
pub mod batch;
pub mod clause;
pub mod lexer;
pub mod predicate;

/// Kind of statement, decided from its leading keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    CreateTable,
    Insert,
    Delete,
    Select,
    Update,
    AlterTable,
    DropTable,
    ShowTables,
    /// Nothing left after removing comments
    Comment,
    Unknown,
}

/// Classifies a statement by its first two words, ignoring case
pub fn classify(stmt: &str) -> OperationKind {
    let stripped = strip_comments(stmt);
    if stripped.trim().is_empty() {
        return if stmt.trim().is_empty() {
            OperationKind::Unknown
        } else {
            OperationKind::Comment
        };
    }

    let mut keywords = Lexer::new(&stripped).take(2).map(|t| match t {
        Ok(Spanned {
            token: Token::Keyword(k),
            ..
        }) => Some(k),
        _ => None,
    });
    let first = keywords.next().flatten();
    let second = keywords.next().flatten();

    match (first, second) {
        (Some(Keyword::Create), Some(Keyword::Table)) => OperationKind::CreateTable,
        (Some(Keyword::Insert), Some(Keyword::Into)) => OperationKind::Insert,
        (Some(Keyword::Delete), Some(Keyword::From)) => OperationKind::Delete,
        (Some(Keyword::Select), _) => OperationKind::Select,
        (Some(Keyword::Update), _) => OperationKind::Update,
        (Some(Keyword::Alter), Some(Keyword::Table)) => OperationKind::AlterTable,
        (Some(Keyword::Drop), Some(Keyword::Table)) => OperationKind::DropTable,
        (Some(Keyword::Show), Some(Keyword::Tables)) => OperationKind::ShowTables,
        _ => OperationKind::Unknown,
    }
}

/// SQL Parser - Converts a single comment-free statement into an AST
///
/// Keywords and structure come from the token stream; type declarations,
/// literals and conditions are sliced from the original text by token span.
pub struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Spanned>,
    pos: usize,
    matching: OperatorMatching,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given SQL input
    pub fn new(input: &'a str) -> Self {
        Parser {
            input: input.trim().trim_end_matches(';').trim_end(),
            tokens: Vec::new(),
            pos: 0,
            matching: OperatorMatching::default(),
        }
    }

    pub fn operator_matching(mut self, matching: OperatorMatching) -> Self {
        self.matching = matching;
        self
    }

    /// Parses the input SQL statement into an AST
    pub fn parse(mut self) -> Result<Statement> {
        self.tokens = tokenize(self.input)?;
        match self.peek() {
            Some(Token::Keyword(Keyword::Create)) => self.parse_create_table(),
            Some(Token::Keyword(Keyword::Select)) => self.parse_select(),
            Some(Token::Keyword(Keyword::Insert)) => self.parse_insert(),
            Some(Token::Keyword(Keyword::Update)) => self.parse_update(),
            Some(Token::Keyword(Keyword::Delete)) => self.parse_delete(),
            Some(Token::Keyword(Keyword::Alter)) => self.parse_alter_table(),
            Some(Token::Keyword(Keyword::Drop)) => self.parse_drop_table(),
            Some(Token::Keyword(Keyword::Show)) => self.parse_show_tables(),
            Some(t) => Err(Error::Parse(format!("[Parser] Unexpected token {}", t))),
            None => Err(Error::Parse("[Parser] Unexpected end of input".into())),
        }
    }

    /// Parses CREATE TABLE name (col type, ...)
    fn parse_create_table(&mut self) -> Result<Statement> {
        self.next_expect(Token::Keyword(Keyword::Create))?;
        self.next_expect(Token::Keyword(Keyword::Table))?;
        let name = self.next_name()?.to_string();
        let body = self.next_parenthesized()?;
        self.expect_end()?;

        let defs = split_top_level(body, ',');
        if defs.is_empty() {
            return Err(Error::Parse(format!("[Parser] Table {} has no columns", name)));
        }
        let columns = defs
            .into_iter()
            .map(|def| match def.split_once(char::is_whitespace) {
                Some((col, declared)) if !declared.trim().is_empty() => Ok(Column {
                    name: col.to_string(),
                    declared: declared.trim().to_string(),
                }),
                _ => Err(Error::Parse(format!(
                    "[Parser] Missing type in column definition '{}'",
                    def
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Statement::CreateTable { name, columns })
    }

    /// Parses INSERT INTO name VALUES (...), (...)
    fn parse_insert(&mut self) -> Result<Statement> {
        self.next_expect(Token::Keyword(Keyword::Insert))?;
        self.next_expect(Token::Keyword(Keyword::Into))?;
        let table_name = self.next_name()?.to_string();
        if self.peek() == Some(&Token::OpenParen) {
            return Err(Error::Parse(
                "[Parser] INSERT column lists are not supported".into(),
            ));
        }
        self.next_expect(Token::Keyword(Keyword::Values))?;

        let mut values = Vec::new();
        loop {
            let tuple = self.next_parenthesized()?;
            values.push(
                split_top_level(tuple, ',')
                    .into_iter()
                    .map(Literal::parse)
                    .collect(),
            );
            if !self.next_if_token(Token::Comma) {
                break;
            }
        }
        self.expect_end()?;
        Ok(Statement::Insert { table_name, values })
    }

    /// Parses UPDATE name SET col = value, ... [WHERE condition]
    fn parse_update(&mut self) -> Result<Statement> {
        self.next_expect(Token::Keyword(Keyword::Update))?;
        let table_name = self.next_name()?.to_string();
        self.next_expect(Token::Keyword(Keyword::Set))?;

        let input = self.input;
        let set_start = self.offset();
        let where_pos = self.tokens[self.pos..]
            .iter()
            .position(|t| t.token == Token::Keyword(Keyword::Where))
            .map(|i| self.pos + i);
        let set_body = match where_pos {
            Some(i) => &input[set_start..self.tokens[i].span.start],
            None => &input[set_start..],
        };
        self.pos = where_pos.unwrap_or(self.tokens.len());
        let where_clause = self.parse_where_clause()?;

        let assignments = split_top_level(set_body, ',');
        if assignments.is_empty() {
            return Err(Error::Parse("[Parser] UPDATE without assignments".into()));
        }
        let mut columns: Vec<(String, Literal)> = Vec::new();
        for assignment in assignments {
            let (col, value) = assignment
                .split_once('=')
                .map(|(c, v)| (c.trim(), v))
                .filter(|(c, _)| !c.is_empty())
                .ok_or_else(|| {
                    Error::Parse(format!("[Parser] Invalid assignment '{}'", assignment))
                })?;
            if columns.iter().any(|(c, _)| c.to_uppercase() == col.to_uppercase()) {
                return Err(Error::Parse(format!(
                    "[Parser] Duplicate column {} for update",
                    col
                )));
            }
            columns.push((col.to_string(), Literal::parse(value)));
        }

        Ok(Statement::Update {
            table_name,
            columns,
            where_clause,
        })
    }

    /// Parses DELETE FROM name [WHERE condition]
    fn parse_delete(&mut self) -> Result<Statement> {
        self.next_expect(Token::Keyword(Keyword::Delete))?;
        self.next_expect(Token::Keyword(Keyword::From))?;
        let table_name = self.next_name()?.to_string();
        let where_clause = self.parse_where_clause()?;
        Ok(Statement::Delete {
            table_name,
            where_clause,
        })
    }

    /// Parses ALTER TABLE name ADD [COLUMN] col type | DROP [COLUMN] col
    fn parse_alter_table(&mut self) -> Result<Statement> {
        self.next_expect(Token::Keyword(Keyword::Alter))?;
        self.next_expect(Token::Keyword(Keyword::Table))?;
        let table_name = self.next_name()?.to_string();

        let action = match self.next()? {
            Token::Keyword(Keyword::Add) => {
                self.next_if_token(Token::Keyword(Keyword::Column));
                let column = self.next_name()?.to_string();
                let declared = self.next_column_type(&column)?;
                self.expect_end()?;
                AlterAction::Add {
                    column,
                    declared: declared.to_string(),
                }
            }
            Token::Keyword(Keyword::Drop) => {
                self.next_if_token(Token::Keyword(Keyword::Column));
                let column = self.next_name()?.to_string();
                self.expect_end()?;
                AlterAction::Drop { column }
            }
            token => {
                return Err(Error::Parse(format!(
                    "[Parser] Expected ADD or DROP, got {}",
                    token
                )));
            }
        };
        Ok(Statement::AlterTable { table_name, action })
    }

    fn parse_drop_table(&mut self) -> Result<Statement> {
        self.next_expect(Token::Keyword(Keyword::Drop))?;
        self.next_expect(Token::Keyword(Keyword::Table))?;
        let table_name = self.next_name()?.to_string();
        self.expect_end()?;
        Ok(Statement::DropTable { table_name })
    }

    fn parse_show_tables(&mut self) -> Result<Statement> {
        self.next_expect(Token::Keyword(Keyword::Show))?;
        self.next_expect(Token::Keyword(Keyword::Tables))?;
        self.expect_end()?;
        Ok(Statement::ShowTables)
    }

    /// Parses SELECT cols FROM tables [WHERE condition] [ORDER BY keys]
    fn parse_select(&mut self) -> Result<Statement> {
        let clauses = split_clauses(self.input)?;
        let from = clauses
            .get(&Clause::From)
            .ok_or_else(|| Error::MissingClause("FROM".into()))?;
        let from = parse_from(from, self.matching)?;

        let select = match clauses.get(&Clause::Select).copied().unwrap_or_default() {
            "*" => Projection::All,
            "" => return Err(Error::Parse("[Parser] SELECT without columns".into())),
            body => Projection::Columns(
                split_top_level(body, ',')
                    .into_iter()
                    .map(|col| match col {
                        "" => Err(Error::Parse("[Parser] Empty column in SELECT".into())),
                        col => Ok(ColumnRef::parse(col)),
                    })
                    .collect::<Result<_>>()?,
            ),
        };

        let where_clause = match clauses.get(&Clause::Where) {
            Some(body) => parse_predicate(body, self.matching)?,
            None => None,
        };

        let order_by = match clauses.get(&Clause::OrderBy) {
            Some(body) => split_top_level(body, ',')
                .into_iter()
                .map(parse_order_key)
                .collect::<Result<_>>()?,
            None => Vec::new(),
        };

        Ok(Statement::Select {
            select,
            from,
            where_clause,
            order_by,
        })
    }

    /// Parses an optional trailing WHERE clause
    fn parse_where_clause(&mut self) -> Result<Option<ast::Predicate>> {
        match self.peek() {
            None => Ok(None),
            Some(Token::Keyword(Keyword::Where)) => {
                let body = &self.input[self.tokens[self.pos].span.end..];
                self.pos = self.tokens.len();
                match parse_predicate(body, self.matching)? {
                    Some(predicate) => Ok(Some(predicate)),
                    None => Err(Error::Parse("[Parser] Empty WHERE clause".into())),
                }
            }
            Some(token) => Err(Error::Parse(format!("[Parser] Unexpected token {}", token))),
        }
    }

    /// Peeks at the next token
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Byte offset where the next token starts
    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.input.len(), |t| t.span.start)
    }

    /// Consumes and returns the next token
    fn next(&mut self) -> Result<Token> {
        let token = self
            .tokens
            .get(self.pos)
            .map(|t| t.token.clone())
            .ok_or_else(|| Error::Parse("[Parser] Unexpected end of input".into()))?;
        self.pos += 1;
        Ok(token)
    }

    /// Expects a table or column name, returned as written
    fn next_name(&mut self) -> Result<&'a str> {
        let input = self.input;
        match self.tokens.get(self.pos) {
            Some(Spanned {
                token: Token::Keyword(Keyword::Where | Keyword::From | Keyword::Values | Keyword::Set),
                ..
            }) => Err(Error::Parse("[Parser] Expected name, got a clause keyword".into())),
            Some(Spanned {
                token: Token::Ident(_) | Token::Keyword(_),
                span,
            }) => {
                let name = &input[span.clone()];
                self.pos += 1;
                Ok(name)
            }
            Some(t) => Err(Error::Parse(format!(
                "[Parser] Expected name, got token {}",
                t.token
            ))),
            None => Err(Error::Parse("[Parser] Expected name, got end of input".into())),
        }
    }

    /// Expects a specific token, returns error if different
    fn next_expect(&mut self, expect: Token) -> Result<()> {
        let token = self.next()?;
        if token != expect {
            return Err(Error::Parse(format!(
                "[Parser] Expected token {}, got {}",
                expect, token
            )));
        }
        Ok(())
    }

    /// Consumes the next token if it matches
    fn next_if_token(&mut self, token: Token) -> bool {
        if self.peek() == Some(&token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consumes a balanced `( ... )` group and returns the text between the parentheses
    fn next_parenthesized(&mut self) -> Result<&'a str> {
        let input = self.input;
        let open = match self.tokens.get(self.pos) {
            Some(t) if t.token == Token::OpenParen => t.span.end,
            Some(t) => {
                return Err(Error::Parse(format!(
                    "[Parser] Expected token (, got {}",
                    t.token
                )));
            }
            None => return Err(Error::Parse("[Parser] Unexpected end of input".into())),
        };
        let mut depth = 0usize;
        for i in self.pos..self.tokens.len() {
            match self.tokens[i].token {
                Token::OpenParen => depth += 1,
                Token::CloseParen => {
                    depth -= 1;
                    if depth == 0 {
                        let close = self.tokens[i].span.start;
                        self.pos = i + 1;
                        return Ok(&input[open..close]);
                    }
                }
                _ => {}
            }
        }
        Err(Error::Parse("[Parser] Unbalanced parentheses".into()))
    }

    /// Consumes a type name with its optional `( ... )` parameters and returns
    /// the type text as written, e.g. `DECIMAL(10, 2)`
    fn next_column_type(&mut self, column: &str) -> Result<&'a str> {
        let input = self.input;
        let start = match self.tokens.get(self.pos) {
            Some(t) if matches!(t.token, Token::Ident(_)) => t.span.start,
            _ => {
                return Err(Error::Parse(format!(
                    "[Parser] Missing type for column {}",
                    column
                )));
            }
        };
        self.pos += 1;
        if self.peek() == Some(&Token::OpenParen) {
            self.next_parenthesized()?;
        }
        let end = self.tokens[self.pos - 1].span.end;
        Ok(&input[start..end])
    }

    /// No tokens allowed after a complete statement
    fn expect_end(&mut self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(Error::Parse(format!("[Parser] Unexpected token {}", token))),
        }
    }
}

/// Parses one ORDER BY key with its optional trailing direction
fn parse_order_key(key: &str) -> Result<(ColumnRef, OrderDirection)> {
    let (column, direction) = match key.rsplit_once(char::is_whitespace) {
        Some((column, dir)) if dir.eq_ignore_ascii_case("DESC") => (column, OrderDirection::Desc),
        Some((column, dir)) if dir.eq_ignore_ascii_case("ASC") => (column, OrderDirection::Asc),
        _ => (key, OrderDirection::Asc),
    };
    let column = column.trim();
    if column.is_empty() {
        return Err(Error::Parse("[Parser] Empty ORDER BY key".into()));
    }
    Ok((ColumnRef::parse(column), direction))
}
