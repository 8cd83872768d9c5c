//! Statement lexer
//!
//! Tokens carry byte spans so the parser can report positions and slice
//! raw text (JSON bodies, paths) straight from the input. Lexing is
//! on demand: the parser stops pulling tokens where a raw body begins,
//! so a JSON body is never tokenized.

use serde_json::Number;

use super::errors::{ParseError, ParseResult};

/// Characters that end a bare word
const DELIMITERS: [char; 12] = [',', '(', ')', '[', ']', '=', '!', '<', '>', '\'', '"', '*'];

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Keyword, identifier, or bare path
    Word(String),
    /// Quoted string, quotes removed and escapes resolved
    Str(String),
    Number(Number),
    /// One of `=`, `!=`, `>`, `<`, `>=`, `<=`
    Op(&'static str),
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Star,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

impl Token {
    /// Returns true if this is a bare word equal to `keyword`, ignoring case
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(&self.kind, TokenKind::Word(w) if w.eq_ignore_ascii_case(keyword))
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves the cursor; used when the parser takes raw text
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.input.len());
    }

    /// Returns the next token, or `None` at end of input
    pub fn next_token(&mut self) -> ParseResult<Option<Token>> {
        self.skip_whitespace();

        let start = self.pos;
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(None),
        };

        let kind = match c {
            ',' => self.single(TokenKind::Comma),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '*' => self.single(TokenKind::Star),
            '=' => self.single(TokenKind::Op("=")),
            '!' => {
                self.pos += 1;
                if self.peek_char() == Some('=') {
                    self.pos += 1;
                    TokenKind::Op("!=")
                } else {
                    return Err(ParseError::unexpected("'!='", "!", start));
                }
            }
            '>' => self.maybe_eq(">", ">="),
            '<' => self.maybe_eq("<", "<="),
            '\'' | '"' => TokenKind::Str(self.quoted(c)?),
            _ => self.word(),
        };

        Ok(Some(Token {
            kind,
            start,
            end: self.pos,
        }))
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    fn maybe_eq(&mut self, bare: &'static str, with_eq: &'static str) -> TokenKind {
        self.pos += 1;
        if self.peek_char() == Some('=') {
            self.pos += 1;
            TokenKind::Op(with_eq)
        } else {
            TokenKind::Op(bare)
        }
    }

    /// Reads a quoted string. `\\` and a backslash before the enclosing
    /// quote are escapes; any other backslash is kept as written.
    fn quoted(&mut self, quote: char) -> ParseResult<String> {
        let start = self.pos;
        self.pos += quote.len_utf8();

        let mut value = String::new();
        let mut chars = self.input[self.pos..].char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            if c == '\\' {
                if let Some(&(_, next)) = chars.peek() {
                    if next == quote || next == '\\' {
                        value.push(next);
                        chars.next();
                        continue;
                    }
                }
                value.push(c);
            } else if c == quote {
                self.pos += offset + c.len_utf8();
                return Ok(value);
            } else {
                value.push(c);
            }
        }

        Err(ParseError::unbalanced_quote(start))
    }

    fn word(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() || DELIMITERS.contains(&c) {
                break;
            }
            self.pos += c.len_utf8();
        }

        let text = &self.input[start..self.pos];
        match parse_number(text) {
            Some(number) => TokenKind::Number(number),
            None => TokenKind::Word(text.to_string()),
        }
    }
}

/// Parses an integer or finite float literal.
///
/// Only text that starts like a number qualifies, so words such as
/// `inf` or `NaN` stay words.
pub fn parse_number(text: &str) -> Option<Number> {
    let digits = text.strip_prefix(|c| c == '-' || c == '+').unwrap_or(text);
    let starts_numeric = digits
        .chars()
        .next()
        .map(|c| c.is_ascii_digit() || (c == '.' && digits.len() > 1))
        .unwrap_or(false);
    if !starts_numeric {
        return None;
    }

    if let Ok(i) = text.parse::<i64>() {
        return Some(Number::from(i));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}
