//! Parser error types
//!
//! Every parser failure is a syntax error; the code says which rule was
//! broken. Parsing never touches storage, so these errors never carry
//! I/O context.

use std::fmt;

/// Parser-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorCode {
    /// Empty input
    FdbEmptyStatement,
    /// First word is not a known statement or command
    FdbUnknownStatement,
    /// A required clause (FROM, VALUES, a name, a body) is absent
    FdbMissingClause,
    /// A token appeared where the grammar does not allow it
    FdbUnexpectedToken,
    /// Quoted string with no closing quote
    FdbUnbalancedQuote,
    /// Literal that is neither a quoted string nor a number, or a bad JSON body
    FdbMalformedLiteral,
    /// Bracket list that is not `[lit, lit, ...]`
    FdbMalformedList,
    /// Numeric literal required but not parsable
    FdbInvalidNumber,
}

impl ParseErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ParseErrorCode::FdbEmptyStatement => "FDB_EMPTY_STATEMENT",
            ParseErrorCode::FdbUnknownStatement => "FDB_UNKNOWN_STATEMENT",
            ParseErrorCode::FdbMissingClause => "FDB_MISSING_CLAUSE",
            ParseErrorCode::FdbUnexpectedToken => "FDB_UNEXPECTED_TOKEN",
            ParseErrorCode::FdbUnbalancedQuote => "FDB_UNBALANCED_QUOTE",
            ParseErrorCode::FdbMalformedLiteral => "FDB_MALFORMED_LITERAL",
            ParseErrorCode::FdbMalformedList => "FDB_MALFORMED_LIST",
            ParseErrorCode::FdbInvalidNumber => "FDB_INVALID_NUMBER",
        }
    }
}

impl fmt::Display for ParseErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Parse error with the offending token and its byte position
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    code: ParseErrorCode,
    message: String,
    position: usize,
    token: Option<String>,
}

impl ParseError {
    pub fn new(
        code: ParseErrorCode,
        message: impl Into<String>,
        position: usize,
        token: Option<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            position,
            token,
        }
    }

    pub fn empty_statement() -> Self {
        Self::new(ParseErrorCode::FdbEmptyStatement, "Empty statement", 0, None)
    }

    pub fn unknown_statement(word: &str, position: usize) -> Self {
        Self::new(
            ParseErrorCode::FdbUnknownStatement,
            format!("Unknown statement '{}'. Type 'help' for available commands", word),
            position,
            Some(word.to_string()),
        )
    }

    pub fn missing_clause(what: impl Into<String>, position: usize) -> Self {
        Self::new(ParseErrorCode::FdbMissingClause, what, position, None)
    }

    pub fn unexpected(expected: &str, found: &str, position: usize) -> Self {
        Self::new(
            ParseErrorCode::FdbUnexpectedToken,
            format!("Expected {}, found '{}'", expected, found),
            position,
            Some(found.to_string()),
        )
    }

    pub fn unexpected_end(expected: &str, position: usize) -> Self {
        Self::new(
            ParseErrorCode::FdbUnexpectedToken,
            format!("Expected {}, found end of statement", expected),
            position,
            None,
        )
    }

    pub fn unbalanced_quote(position: usize) -> Self {
        Self::new(
            ParseErrorCode::FdbUnbalancedQuote,
            "Unterminated quoted string",
            position,
            None,
        )
    }

    pub fn malformed_literal(reason: impl Into<String>, position: usize, token: Option<String>) -> Self {
        Self::new(ParseErrorCode::FdbMalformedLiteral, reason, position, token)
    }

    pub fn malformed_list(reason: impl Into<String>, position: usize) -> Self {
        Self::new(ParseErrorCode::FdbMalformedList, reason, position, None)
    }

    pub fn invalid_number(token: &str, position: usize) -> Self {
        Self::new(
            ParseErrorCode::FdbInvalidNumber,
            format!("'{}' is not a valid number", token),
            position,
            Some(token.to_string()),
        )
    }

    pub fn code(&self) -> ParseErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte offset of the offending token in the statement
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (at position {}", self.code, self.message, self.position)?;
        if let Some(token) = &self.token {
            write!(f, ", near '{}'", token)?;
        }
        write!(f, ")")
    }
}

impl std::error::Error for ParseError {}

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;
