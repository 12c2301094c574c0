//! Redundant-parenthesis removal for generated WHERE text.
//!
//! The input is lexed (quotes and nested parentheses respected), parsed into
//! an AND/OR tree with AND binding tighter, flattened, and re-rendered with
//! parentheses only where precedence requires them. Anything that is not a
//! top-level AND/OR connective is kept verbatim as an atom. `CASE .. END`
//! brackets like a parenthesized group, and a level joined by XOR, `||` or
//! `&&` is never restructured.

use std::fmt;

/// Remove grouping that is not required to preserve AND-over-OR precedence.
///
/// Idempotent. Input that cannot be parsed (unbalanced parentheses,
/// unterminated quotes, empty operands) is returned trimmed but otherwise
/// unchanged.
#[must_use]
pub fn remove_redundant_parentheses(sql: &str) -> String {
    let sql = sql.trim();
    if sql.is_empty() {
        return String::new();
    }

    match parse(sql) {
        Some(expr) => expr.to_string(),
        None => sql.to_string(),
    }
}

///
/// Expr
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Expr {
    And(Vec<Self>),
    Or(Vec<Self>),
    Atom(String),

    /// Verbatim text joined by a connective other than AND/OR; grouped
    /// whenever it is an operand.
    Opaque(String),
}

impl Expr {
    // Same-operator children are merged; a single child stands alone.
    fn and(items: Vec<Self>) -> Self {
        Self::flatten(items, Self::And, |expr| match expr {
            Self::And(children) => Ok(children),
            other => Err(other),
        })
    }

    fn or(items: Vec<Self>) -> Self {
        Self::flatten(items, Self::Or, |expr| match expr {
            Self::Or(children) => Ok(children),
            other => Err(other),
        })
    }

    fn flatten(
        items: Vec<Self>,
        build: fn(Vec<Self>) -> Self,
        split: fn(Self) -> Result<Vec<Self>, Self>,
    ) -> Self {
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match split(item) {
                Ok(children) => out.extend(children),
                Err(other) => out.push(other),
            }
        }

        if out.len() == 1 {
            out.remove(0)
        } else {
            build(out)
        }
    }

    const fn is_atom(&self) -> bool {
        matches!(self, Self::Atom(_))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (items, sep) = match self {
            Self::Atom(text) | Self::Opaque(text) => return f.write_str(text),
            Self::And(items) => (items, " AND "),
            Self::Or(items) => (items, " OR "),
        };

        // Children are flattened, so any composite child has the other
        // operator and needs grouping.
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            if item.is_atom() {
                write!(f, "{item}")?;
            } else {
                write!(f, "({item})")?;
            }
        }

        Ok(())
    }
}

/// Parse `sql` into a flattened AND/OR tree.
pub(crate) fn parse(sql: &str) -> Option<Expr> {
    let tokens = lex(sql)?;
    let mut parser = Parser {
        src: sql,
        tokens: &tokens,
        pos: 0,
    };
    let expr = parser.parse_expr()?;

    (parser.pos == tokens.len()).then_some(expr)
}

///
/// Token
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum TokenKind {
    Open,
    Close,
    Case,
    End,
    And,
    Or,
    Between,
    // XOR, || and &&
    Operator,
    Word,
}

#[derive(Clone, Copy, Debug)]
struct Token {
    kind: TokenKind,
    start: usize,
    end: usize,
}

// Split into parentheses, `||`/`&&` and whitespace-separated words; quoted
// sections belong to the surrounding word.
fn lex(src: &str) -> Option<Vec<Token>> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        if byte.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if byte == b'(' || byte == b')' {
            let kind = if byte == b'(' {
                TokenKind::Open
            } else {
                TokenKind::Close
            };
            tokens.push(Token {
                kind,
                start: i,
                end: i + 1,
            });
            i += 1;
            continue;
        }
        if is_operator(bytes, i) {
            tokens.push(Token {
                kind: TokenKind::Operator,
                start: i,
                end: i + 2,
            });
            i += 2;
            continue;
        }

        let start = i;
        while i < bytes.len() && !is_operator(bytes, i) {
            match bytes[i] {
                b'(' | b')' => break,
                b if b.is_ascii_whitespace() => break,
                quote @ (b'\'' | b'"' | b'`') => i = skip_quoted(bytes, i, quote)?,
                _ => i += 1,
            }
        }

        let word = &src[start..i];
        let kind = if word.eq_ignore_ascii_case("AND") {
            TokenKind::And
        } else if word.eq_ignore_ascii_case("OR") {
            TokenKind::Or
        } else if word.eq_ignore_ascii_case("BETWEEN") {
            TokenKind::Between
        } else if word.eq_ignore_ascii_case("CASE") {
            TokenKind::Case
        } else if word.eq_ignore_ascii_case("END") {
            TokenKind::End
        } else if word.eq_ignore_ascii_case("XOR") {
            TokenKind::Operator
        } else {
            TokenKind::Word
        };
        tokens.push(Token {
            kind,
            start,
            end: i,
        });
    }

    Some(tokens)
}

fn is_operator(bytes: &[u8], i: usize) -> bool {
    matches!(bytes.get(i..i + 2), Some(b"||" | b"&&"))
}

// Return the index just past the closing quote. A doubled quote is an
// escaped quote; backslash escapes apply inside string literals only.
fn skip_quoted(bytes: &[u8], open: usize, quote: u8) -> Option<usize> {
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if quote != b'`' => i += 2,
            b if b == quote => {
                if bytes.get(i + 1) == Some(&quote) {
                    i += 2;
                } else {
                    return Some(i + 1);
                }
            }
            _ => i += 1,
        }
    }

    None
}

///
/// Parser
///
/// expr    := opaque | or           -- opaque if XOR/||/&& sits at this level
/// or      := and (OR and)*
/// and     := primary (AND primary)*
/// primary := ( group | case | word )+   -- a lone group is re-parsed as expr
///

struct Parser<'a> {
    src: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|token| token.kind)
    }

    fn parse_expr(&mut self) -> Option<Expr> {
        if !self.has_operator()? {
            return self.parse_or();
        }

        let (first, last) = (self.tokens.get(self.pos)?, self.tokens.last()?);
        let text = &self.src[first.start..last.end];
        self.pos = self.tokens.len();

        Some(Expr::Opaque(text.to_string()))
    }

    // Whether an XOR/||/&& sits outside every group from `pos` on.
    fn has_operator(&self) -> Option<bool> {
        let mut i = self.pos;
        while let Some(token) = self.tokens.get(i) {
            match token.kind {
                TokenKind::Open | TokenKind::Case => i = self.closing(i)? + 1,
                TokenKind::Operator => return Some(true),
                _ => i += 1,
            }
        }

        Some(false)
    }

    fn parse_or(&mut self) -> Option<Expr> {
        let mut items = vec![self.parse_and()?];
        while self.peek() == Some(TokenKind::Or) {
            self.pos += 1;
            items.push(self.parse_and()?);
        }

        Some(Expr::or(items))
    }

    fn parse_and(&mut self) -> Option<Expr> {
        let mut items = vec![self.parse_primary()?];
        while self.peek() == Some(TokenKind::And) {
            self.pos += 1;
            items.push(self.parse_primary()?);
        }

        Some(Expr::and(items))
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        let start = self.pos;
        let mut between = false;

        while let Some(kind) = self.peek() {
            match kind {
                TokenKind::Open | TokenKind::Case => self.pos = self.closing(self.pos)? + 1,
                TokenKind::Between => {
                    between = true;
                    self.pos += 1;
                }
                // The AND of `x BETWEEN a AND b` belongs to the atom.
                TokenKind::And if between => {
                    between = false;
                    self.pos += 1;
                }
                TokenKind::Word | TokenKind::End | TokenKind::Operator => self.pos += 1,
                TokenKind::Close | TokenKind::And | TokenKind::Or => break,
            }
        }

        if self.pos == start {
            return None;
        }

        let last = self.pos - 1;
        if self.tokens[start].kind == TokenKind::Open && self.closing(start)? == last {
            let mut inner = Parser {
                src: self.src,
                tokens: &self.tokens[start + 1..last],
                pos: 0,
            };
            let expr = inner.parse_expr()?;
            return (inner.pos == inner.tokens.len()).then_some(expr);
        }

        let text = &self.src[self.tokens[start].start..self.tokens[last].end];
        Some(Expr::Atom(text.to_string()))
    }

    // Index of the token closing the group or CASE region opened at `open`.
    fn closing(&self, open: usize) -> Option<usize> {
        let mut stack: Vec<TokenKind> = Vec::new();
        for (offset, token) in self.tokens[open..].iter().enumerate() {
            match (token.kind, stack.last().copied()) {
                (TokenKind::Open | TokenKind::Case, _) => stack.push(token.kind),
                (TokenKind::Close, Some(TokenKind::Open))
                | (TokenKind::End, Some(TokenKind::Case)) => {
                    stack.pop();
                    if stack.is_empty() {
                        return Some(open + offset);
                    }
                }
                // END directly inside parentheses is an ordinary word.
                (TokenKind::End, Some(TokenKind::Open)) => {}
                (TokenKind::Close | TokenKind::End, _) => return None,
                _ => {}
            }
        }

        None
    }
}
