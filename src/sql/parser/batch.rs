//! Text-level preprocessing: comment removal, batch splitting and
//! quote/parenthesis aware list splitting.

/// Tracks whether a scan position is inside a quoted string literal.
///
/// A quote preceded by a backslash never opens or closes a literal.
#[derive(Default)]
struct QuoteState {
    open: Option<char>,
    prev: Option<char>,
}

impl QuoteState {
    /// Feeds the next character, returns true if it is part of a literal
    fn feed(&mut self, c: char) -> bool {
        let escaped = self.prev == Some('\\');
        self.prev = Some(c);
        match self.open {
            Some(q) if c == q && !escaped => {
                self.open = None;
                true
            }
            Some(_) => true,
            None if (c == '\'' || c == '"') && !escaped => {
                self.open = Some(c);
                true
            }
            None => false,
        }
    }

    fn in_literal(&self) -> bool {
        self.open.is_some()
    }
}

/// Replaces every `-- ...` and `/* ... */` comment with a single space.
///
/// Line comments end before the newline, which is kept. Block comments do not
/// nest; an unterminated block runs to the end of the input.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quotes = QuoteState::default();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if !quotes.in_literal() {
            match (c, chars.peek()) {
                ('-', Some('-')) => {
                    while chars.next_if(|&n| n != '\n').is_some() {}
                    out.push(' ');
                    quotes.prev = None;
                    continue;
                }
                ('/', Some('*')) => {
                    chars.next();
                    let mut prev = None;
                    for n in chars.by_ref() {
                        if prev == Some('*') && n == '/' {
                            break;
                        }
                        prev = Some(n);
                    }
                    out.push(' ');
                    quotes.prev = None;
                    continue;
                }
                _ => {}
            }
        }
        quotes.feed(c);
        out.push(c);
    }
    out
}

/// Splits a batch into statements on `;` outside string literals.
///
/// Comments are stripped first; fragments are trimmed and empty ones dropped.
pub fn split_batch(text: &str) -> Vec<String> {
    let stripped = strip_comments(text);
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quotes = QuoteState::default();

    for c in stripped.chars() {
        if !quotes.feed(c) && c == ';' {
            push_trimmed(&mut statements, &current);
            current.clear();
        } else {
            current.push(c);
        }
    }
    push_trimmed(&mut statements, &current);
    statements
}

fn push_trimmed(out: &mut Vec<String>, fragment: &str) {
    let fragment = fragment.trim();
    if !fragment.is_empty() {
        out.push(fragment.to_string());
    }
}

/// Splits on `sep` where it occurs outside quotes and outside parentheses.
///
/// Pieces are trimmed. Blank input yields no pieces, but blank pieces between
/// separators are kept so callers can report them.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let mut pieces = Vec::new();
    let mut quotes = QuoteState::default();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if quotes.feed(c) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                pieces.push(text[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    pieces.push(text[start..].trim());
    pieces
}

#[cfg(test)]
mod tests {
    use super::{split_batch, split_top_level, strip_comments};

    #[test]
    fn test_strip_line_comments() {
        assert_eq!(
            strip_comments("SELECT * FROM t -- trailing\nWHERE a = 1"),
            "SELECT * FROM t  \nWHERE a = 1"
        );
        assert_eq!(strip_comments("-- only a comment"), " ");
    }

    #[test]
    fn test_strip_block_comments() {
        assert_eq!(strip_comments("SELECT /* cols */ * FROM t"), "SELECT   * FROM t");
        assert_eq!(strip_comments("a /* /* not nested */ b"), "a   b");
        assert_eq!(strip_comments("a /* never closed"), "a  ");
    }

    #[test]
    fn test_strip_keeps_literals() {
        let sql = "INSERT INTO t VALUES ('a -- b', \"/* c */\")";
        assert_eq!(strip_comments(sql), sql);
        let escaped = r"INSERT INTO t VALUES ('it\'s -- here')";
        assert_eq!(strip_comments(escaped), escaped);
    }

    #[test]
    fn test_split_batch() {
        let batch = "
            CREATE TABLE t (a INT); -- first
            INSERT INTO t VALUES (1);;
            /* block; with semicolon */
            INSERT INTO t VALUES ('x;y')
        ";
        assert_eq!(
            split_batch(batch),
            vec![
                "CREATE TABLE t (a INT)".to_string(),
                "INSERT INTO t VALUES (1)".to_string(),
                "INSERT INTO t VALUES ('x;y')".to_string(),
            ]
        );
        assert!(split_batch("  ;  ; -- nothing\n").is_empty());
    }

    #[test]
    fn test_split_top_level() {
        assert_eq!(
            split_top_level("id INT, price DECIMAL(10,2), name VARCHAR(5)", ','),
            vec!["id INT", "price DECIMAL(10,2)", "name VARCHAR(5)"]
        );
        assert_eq!(
            split_top_level("1, 'a, b', \"c,d\"", ','),
            vec!["1", "'a, b'", "\"c,d\""]
        );
        assert_eq!(split_top_level("1,,2", ','), vec!["1", "", "2"]);
        assert!(split_top_level("   ", ',').is_empty());
    }
}
