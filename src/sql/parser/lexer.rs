//! SQL Lexer - Tokenizes SQL input text into a stream of spanned tokens
//!
//! Every token carries the byte range it was scanned from, so the parser can
//! slice raw bodies (column types, literals, predicates) out of the original
//! text instead of re-assembling them from tokens.

use std::{fmt::Display, iter::Peekable, ops::Range, str::CharIndices};

use crate::error::{Error, Result};

/// Represents a single lexical token in the SQL input
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// SQL reserved keyword
    Keyword(Keyword),
    /// Identifier such as table name or column name
    Ident(String),
    /// String literal, without its quotes
    String(String),
    /// Numeric literal (integer or floating-point)
    Number(String),
    OpenParen,
    CloseParen,
    Comma,
    Semicolon,
    Asterisk,
    Period,
    /// Any other character, e.g. comparison operators
    Symbol(char),
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Keyword(keyword) => f.write_str(keyword.to_str()),
            Token::Ident(ident) => f.write_str(ident),
            Token::String(v) => write!(f, "'{}'", v),
            Token::Number(n) => f.write_str(n),
            Token::OpenParen => f.write_str("("),
            Token::CloseParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
            Token::Semicolon => f.write_str(";"),
            Token::Asterisk => f.write_str("*"),
            Token::Period => f.write_str("."),
            Token::Symbol(c) => write!(f, "{}", c),
        }
    }
}

/// SQL reserved keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    // DDL keywords
    Create,
    Table,
    Alter,
    Add,
    Drop,
    Column,
    Show,
    Tables,
    // DML keywords
    Select,
    From,
    Where,
    Order,
    By,
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,
}

impl Keyword {
    /// Attempts to parse a string as a keyword (case-insensitive)
    pub fn from_str(ident: &str) -> Option<Self> {
        Some(match ident.to_uppercase().as_str() {
            "CREATE" => Keyword::Create,
            "TABLE" => Keyword::Table,
            "ALTER" => Keyword::Alter,
            "ADD" => Keyword::Add,
            "DROP" => Keyword::Drop,
            "COLUMN" => Keyword::Column,
            "SHOW" => Keyword::Show,
            "TABLES" => Keyword::Tables,
            "SELECT" => Keyword::Select,
            "FROM" => Keyword::From,
            "WHERE" => Keyword::Where,
            "ORDER" => Keyword::Order,
            "BY" => Keyword::By,
            "INSERT" => Keyword::Insert,
            "INTO" => Keyword::Into,
            "VALUES" => Keyword::Values,
            "UPDATE" => Keyword::Update,
            "SET" => Keyword::Set,
            "DELETE" => Keyword::Delete,
            _ => return None,
        })
    }

    /// Returns the uppercase string representation of the keyword
    pub fn to_str(&self) -> &'static str {
        match self {
            Keyword::Create => "CREATE",
            Keyword::Table => "TABLE",
            Keyword::Alter => "ALTER",
            Keyword::Add => "ADD",
            Keyword::Drop => "DROP",
            Keyword::Column => "COLUMN",
            Keyword::Show => "SHOW",
            Keyword::Tables => "TABLES",
            Keyword::Select => "SELECT",
            Keyword::From => "FROM",
            Keyword::Where => "WHERE",
            Keyword::Order => "ORDER",
            Keyword::By => "BY",
            Keyword::Insert => "INSERT",
            Keyword::Into => "INTO",
            Keyword::Values => "VALUES",
            Keyword::Update => "UPDATE",
            Keyword::Set => "SET",
            Keyword::Delete => "DELETE",
        }
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

/// A token together with the byte range it occupies in the input
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub span: Range<usize>,
}

/// SQL lexical analyzer (lexer/tokenizer)
pub struct Lexer<'a> {
    input: &'a str,
    iter: Peekable<CharIndices<'a>>,
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Spanned>;

    fn next(&mut self) -> Option<Self::Item> {
        self.scan().transpose()
    }
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given SQL text
    pub fn new(sql_text: &'a str) -> Self {
        Self {
            input: sql_text,
            iter: sql_text.char_indices().peekable(),
        }
    }

    /// Byte offset of the next unread character
    fn offset(&mut self) -> usize {
        self.iter.peek().map_or(self.input.len(), |(i, _)| *i)
    }

    /// Consumes the next character if it satisfies the predicate
    fn next_if<F: Fn(char) -> bool>(&mut self, predicate: F) -> Option<char> {
        self.iter.next_if(|&(_, c)| predicate(c)).map(|(_, c)| c)
    }

    /// Consumes consecutive characters while they satisfy the predicate
    fn next_while<F: Fn(char) -> bool>(&mut self, predicate: F) -> Option<String> {
        let mut value = String::new();
        while let Some(c) = self.next_if(&predicate) {
            value.push(c);
        }
        Some(value).filter(|v| !v.is_empty())
    }

    /// Removes whitespace from the input stream
    fn erase_whitespace(&mut self) {
        self.next_while(|c| c.is_whitespace());
    }

    /// Scans and returns the next token
    fn scan(&mut self) -> Result<Option<Spanned>> {
        self.erase_whitespace();
        let start = self.offset();
        let token = match self.iter.peek().map(|(_, c)| *c) {
            Some(q @ ('\'' | '"')) => self.scan_string(q)?,
            Some(c) if c.is_ascii_digit() => self.scan_number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.scan_ident(),
            Some(_) => self.scan_symbol(),
            None => return Ok(None),
        };
        Ok(token.map(|token| Spanned {
            token,
            span: start..self.offset(),
        }))
    }

    /// Scans a string literal; a backslash escapes the character after it
    fn scan_string(&mut self, quote: char) -> Result<Option<Token>> {
        self.iter.next();
        let mut val = String::new();
        loop {
            match self.iter.next() {
                Some((_, '\\')) => {
                    if let Some((_, c)) = self.iter.next() {
                        if c != quote {
                            val.push('\\');
                        }
                        val.push(c);
                    }
                }
                Some((_, c)) if c == quote => break,
                Some((_, c)) => val.push(c),
                None => return Err(Error::Parse("[Lexer] Unexpected end of string".into())),
            }
        }
        Ok(Some(Token::String(val)))
    }

    /// Scans a numeric literal (integer or floating-point)
    fn scan_number(&mut self) -> Option<Token> {
        let mut val = self.next_while(|c| c.is_ascii_digit())?;
        if let Some(sep) = self.next_if(|c| c == '.') {
            val.push(sep);
            while let Some(c) = self.next_if(|c| c.is_ascii_digit()) {
                val.push(c);
            }
        }
        Some(Token::Number(val))
    }

    /// Scans an identifier or keyword
    fn scan_ident(&mut self) -> Option<Token> {
        let val = self.next_while(|c| c.is_alphanumeric() || c == '_')?;
        // Returns Keyword if matched, otherwise returns as a regular Ident
        Some(Keyword::from_str(&val).map_or(Token::Ident(val), Token::Keyword))
    }

    /// Scans a single-character symbol token
    fn scan_symbol(&mut self) -> Option<Token> {
        let (_, c) = self.iter.next()?;
        Some(match c {
            '(' => Token::OpenParen,
            ')' => Token::CloseParen,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            '*' => Token::Asterisk,
            '.' => Token::Period,
            c => Token::Symbol(c),
        })
    }
}

/// Tokenizes the whole input
pub fn tokenize(input: &str) -> Result<Vec<Spanned>> {
    Lexer::new(input).collect()
}
