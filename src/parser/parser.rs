//! Recursive-descent statement parser
//!
//! Grammar (keywords are case-insensitive):
//!
//! ```text
//! SELECT <fields|*> FROM <container> [WHERE <cond> [AND <cond>]*]
//!        [ORDER BY <field> [ASC|DESC]] [LIMIT <n>]
//! INSERT INTO <container> VALUES ('<id>', '<json>')
//! CREATE CONTAINER <name> | DROP CONTAINER <name>
//! show containers | show documents [<container>] | use <container>
//! describe [<container>] | count <container> [WHERE ...]
//! insert|update <container> <id> <json> | delete <container> <id>
//! export [all|<container>] <path> | import [<container>] <path>
//! backup [<path>] | history | help | exit | quit
//!
//! cond := <field> (= | != | > | < | >= | <= | LIKE) <literal>
//!       | <field> IN [<literal>, ...]
//! literal := '<string>' | "<string>" | <number>
//! ```
//!
//! Inside quotes, `\\` is a backslash and `\'` (or `\"`) the quote itself.
//! Quoted JSON bodies are handed to the JSON parser as written, apart from
//! escaped quotes, so JSON escapes like `\\` and `\n` keep their meaning.
//!
//! Conditions combine with AND only; OR, NOT and parentheses are not part
//! of the grammar. The parser performs no I/O and does not check that
//! containers exist.

use std::path::PathBuf;

use serde_json::Value;

use super::ast::{Condition, ExportTarget, Operator, Query, SortDirection, SortSpec, Statement};
use super::errors::{ParseError, ParseResult};
use super::lexer::{parse_number, Lexer, Token, TokenKind};

/// Parses one statement
pub fn parse_statement(input: &str) -> ParseResult<Statement> {
    Parser::new(input).parse()
}

pub struct Parser<'a> {
    input: &'a str,
    lexer: Lexer<'a>,
    peeked: Option<Token>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            lexer: Lexer::new(input),
            peeked: None,
        }
    }

    /// Parses the whole input as a single statement
    pub fn parse(mut self) -> ParseResult<Statement> {
        let first = self.next()?.ok_or_else(ParseError::empty_statement)?;
        let keyword = match &first.kind {
            TokenKind::Word(word) => word.to_ascii_uppercase(),
            _ => return Err(ParseError::unknown_statement(self.text(&first), first.start)),
        };

        let statement = match keyword.as_str() {
            "SELECT" => self.parse_select()?,
            "INSERT" => self.parse_insert()?,
            "UPDATE" => {
                let (container, id, body) = self.parse_target_and_body()?;
                Statement::Update {
                    container,
                    id,
                    body,
                }
            }
            "DELETE" => Statement::Delete {
                container: self.expect_name("container name")?,
                id: self.expect_name("document id")?,
            },
            "CREATE" => {
                self.expect_keyword("CONTAINER")?;
                Statement::CreateContainer {
                    name: self.expect_name("container name")?,
                }
            }
            "DROP" => {
                self.expect_keyword("CONTAINER")?;
                Statement::DropContainer {
                    name: self.expect_name("container name")?,
                }
            }
            "SHOW" => self.parse_show()?,
            "USE" => Statement::Use {
                container: self.expect_name("container name")?,
            },
            "DESCRIBE" => Statement::Describe {
                container: self.optional_name()?,
            },
            "COUNT" => self.parse_count()?,
            "EXPORT" => self.parse_export()?,
            "IMPORT" => self.parse_import()?,
            "BACKUP" => Statement::Backup {
                path: self.optional_name()?.map(PathBuf::from),
            },
            "HISTORY" => Statement::History,
            "HELP" => Statement::Help,
            "EXIT" | "QUIT" => Statement::Exit,
            _ => return Err(ParseError::unknown_statement(self.text(&first), first.start)),
        };

        self.expect_end()?;
        Ok(statement)
    }

    // ------------------------------------------------------------------
    // SELECT / COUNT
    // ------------------------------------------------------------------

    fn parse_select(&mut self) -> ParseResult<Statement> {
        let fields = self.parse_field_list()?;

        match self.next()? {
            Some(token) if token.is_keyword("FROM") => {}
            Some(token) => {
                return Err(ParseError::missing_clause(
                    format!("SELECT requires FROM, found '{}'", self.text(&token)),
                    token.start,
                ))
            }
            None => {
                return Err(ParseError::missing_clause(
                    "SELECT requires FROM",
                    self.input.len(),
                ))
            }
        }

        let mut query = Query::new(self.expect_name("container name")?).select(fields);

        if self.eat_keyword("WHERE")? {
            query.conditions = self.parse_conditions()?;
        }

        if self.eat_keyword("ORDER")? {
            self.expect_keyword("BY")?;
            let field = self.expect_name("ORDER BY field")?;
            let direction = if self.eat_keyword("DESC")? {
                SortDirection::Desc
            } else {
                self.eat_keyword("ASC")?;
                SortDirection::Asc
            };
            query.order_by = Some(SortSpec { field, direction });
        }

        if self.eat_keyword("LIMIT")? {
            query.limit = Some(self.parse_limit()?);
        }

        Ok(Statement::Select(query))
    }

    /// `*` (all fields, returned as an empty list) or `a, b, c`
    fn parse_field_list(&mut self) -> ParseResult<Vec<String>> {
        if matches!(self.peek()?, Some(Token { kind: TokenKind::Star, .. })) {
            self.next()?;
            return Ok(Vec::new());
        }

        let mut fields = Vec::new();
        loop {
            match self.next()? {
                Some(Token {
                    kind: TokenKind::Word(word),
                    ..
                }) if !word.eq_ignore_ascii_case("FROM") => fields.push(word),
                Some(token) => {
                    return Err(ParseError::unexpected(
                        "field name or '*'",
                        self.text(&token),
                        token.start,
                    ))
                }
                None => {
                    return Err(ParseError::unexpected_end(
                        "field name or '*'",
                        self.input.len(),
                    ))
                }
            }

            if matches!(self.peek()?, Some(Token { kind: TokenKind::Comma, .. })) {
                self.next()?;
            } else {
                return Ok(fields);
            }
        }
    }

    fn parse_count(&mut self) -> ParseResult<Statement> {
        let mut query = Query::new(self.expect_name("container name")?);
        if self.eat_keyword("WHERE")? {
            query.conditions = self.parse_conditions()?;
        }
        Ok(Statement::Count(query))
    }

    fn parse_conditions(&mut self) -> ParseResult<Vec<Condition>> {
        let mut conditions = vec![self.parse_condition()?];

        loop {
            if self.eat_keyword("AND")? {
                conditions.push(self.parse_condition()?);
                continue;
            }

            if let Some(token) = self.peek()? {
                if token.is_keyword("OR") || token.is_keyword("NOT") {
                    let token = token.clone();
                    return Err(ParseError::unexpected(
                        "AND (conditions combine with AND only)",
                        self.text(&token),
                        token.start,
                    ));
                }
            }
            return Ok(conditions);
        }
    }

    fn parse_condition(&mut self) -> ParseResult<Condition> {
        let field = match self.next()? {
            Some(Token {
                kind: TokenKind::Word(word) | TokenKind::Str(word),
                ..
            }) => word,
            Some(token) => {
                return Err(ParseError::unexpected(
                    "field name",
                    self.text(&token),
                    token.start,
                ))
            }
            None => return Err(ParseError::unexpected_end("condition", self.input.len())),
        };

        let op = match self.next()? {
            Some(token) => {
                let symbol = match &token.kind {
                    TokenKind::Op(symbol) => Some(*symbol),
                    TokenKind::Word(word) => Some(word.as_str()),
                    _ => None,
                };
                symbol.and_then(Operator::from_symbol).ok_or_else(|| {
                    ParseError::unexpected("comparison operator", self.text(&token), token.start)
                })?
            }
            None => {
                return Err(ParseError::unexpected_end(
                    "comparison operator",
                    self.input.len(),
                ))
            }
        };

        let value = match op {
            Operator::In => self.parse_list()?,
            _ => self.parse_scalar(op)?,
        };

        Ok(Condition::new(field, op, value))
    }

    /// A quoted string or a number. Ordering operators require a number;
    /// a quoted numeric string is accepted and converted.
    fn parse_scalar(&mut self, op: Operator) -> ParseResult<Value> {
        let token = match self.next()? {
            Some(token) => token,
            None => return Err(ParseError::unexpected_end("literal", self.input.len())),
        };

        match token.kind {
            TokenKind::Number(n) => Ok(Value::Number(n)),
            TokenKind::Str(s) if op.is_ordering() => parse_number(s.trim())
                .map(Value::Number)
                .ok_or_else(|| ParseError::invalid_number(&s, token.start)),
            TokenKind::Str(s) => Ok(Value::String(s)),
            TokenKind::LBracket => Err(ParseError::malformed_literal(
                format!("Lists are only allowed with IN, not '{}'", op),
                token.start,
                Some("[".to_string()),
            )),
            TokenKind::Word(_) if op.is_ordering() => {
                Err(ParseError::invalid_number(self.text(&token), token.start))
            }
            _ => Err(ParseError::malformed_literal(
                "Expected a quoted string or a number",
                token.start,
                Some(self.text(&token).to_string()),
            )),
        }
    }

    /// `[lit, lit, ...]`
    fn parse_list(&mut self) -> ParseResult<Value> {
        let open = match self.next()? {
            Some(token) if token.kind == TokenKind::LBracket => token,
            Some(token) => {
                return Err(ParseError::malformed_list(
                    format!("IN requires a bracketed list, found '{}'", self.text(&token)),
                    token.start,
                ))
            }
            None => {
                return Err(ParseError::malformed_list(
                    "IN requires a bracketed list",
                    self.input.len(),
                ))
            }
        };

        let mut items = Vec::new();
        if matches!(self.peek()?, Some(Token { kind: TokenKind::RBracket, .. })) {
            self.next()?;
            return Ok(Value::Array(items));
        }

        loop {
            match self.next()? {
                Some(Token {
                    kind: TokenKind::Str(s),
                    ..
                }) => items.push(Value::String(s)),
                Some(Token {
                    kind: TokenKind::Number(n),
                    ..
                }) => items.push(Value::Number(n)),
                Some(token) => {
                    return Err(ParseError::malformed_list(
                        format!("Unexpected '{}' in list", self.text(&token)),
                        token.start,
                    ))
                }
                None => return Err(ParseError::malformed_list("Unterminated list", open.start)),
            }

            match self.next()? {
                Some(Token {
                    kind: TokenKind::Comma,
                    ..
                }) => continue,
                Some(Token {
                    kind: TokenKind::RBracket,
                    ..
                }) => return Ok(Value::Array(items)),
                Some(token) => {
                    return Err(ParseError::malformed_list(
                        format!("Expected ',' or ']', found '{}'", self.text(&token)),
                        token.start,
                    ))
                }
                None => return Err(ParseError::malformed_list("Unterminated list", open.start)),
            }
        }
    }

    fn parse_limit(&mut self) -> ParseResult<usize> {
        match self.next()? {
            Some(token) => match &token.kind {
                TokenKind::Number(n) => n
                    .as_u64()
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| ParseError::invalid_number(self.text(&token), token.start)),
                _ => Err(ParseError::invalid_number(self.text(&token), token.start)),
            },
            None => Err(ParseError::unexpected_end("LIMIT value", self.input.len())),
        }
    }

    // ------------------------------------------------------------------
    // INSERT / UPDATE bodies
    // ------------------------------------------------------------------

    fn parse_insert(&mut self) -> ParseResult<Statement> {
        if self.eat_keyword("INTO")? {
            return self.parse_insert_values();
        }

        let (container, id, body) = self.parse_target_and_body()?;
        Ok(Statement::Insert {
            container,
            id,
            body,
        })
    }

    /// `INSERT INTO <container> VALUES ('<id>', '<json>')`.
    /// The JSON may also be written unquoted: `VALUES ('id', {"a": 1})`.
    fn parse_insert_values(&mut self) -> ParseResult<Statement> {
        let container = self.expect_name("container name")?;

        match self.next()? {
            Some(token) if token.is_keyword("VALUES") => {}
            Some(token) => {
                return Err(ParseError::missing_clause(
                    format!("INSERT requires VALUES, found '{}'", self.text(&token)),
                    token.start,
                ))
            }
            None => {
                return Err(ParseError::missing_clause(
                    "INSERT requires VALUES",
                    self.input.len(),
                ))
            }
        }

        self.expect_kind(TokenKind::LParen, "'('")?;
        let id = self.expect_name("document id")?;
        self.expect_kind(TokenKind::Comma, "','")?;

        let rest_start = self.lexer.position();
        let remainder = &self.input[rest_start..];
        let trimmed = remainder.trim_start();

        if trimmed.starts_with('{') {
            let body_start = rest_start + (remainder.len() - trimmed.len());
            let close = trimmed.rfind(')').ok_or_else(|| {
                ParseError::missing_clause("VALUES list is missing ')'", self.input.len())
            })?;
            let body = parse_json(trimmed[..close].trim(), body_start)?;
            self.lexer.seek(body_start + close + 1);
            return Ok(Statement::Insert {
                container,
                id,
                body,
            });
        }

        let body = match self.next()? {
            Some(
                token @ Token {
                    kind: TokenKind::Str(_),
                    ..
                },
            ) => {
                let raw = strip_quotes(self.text(&token)).unwrap_or_default();
                parse_json(&raw, token.start)?
            }
            Some(token) => {
                return Err(ParseError::malformed_literal(
                    "Document body must be a quoted JSON string or a JSON object",
                    token.start,
                    Some(self.text(&token).to_string()),
                ))
            }
            None => {
                return Err(ParseError::missing_clause(
                    "VALUES requires a document body",
                    self.input.len(),
                ))
            }
        };
        self.expect_kind(TokenKind::RParen, "')'")?;

        Ok(Statement::Insert {
            container,
            id,
            body,
        })
    }

    /// `<container> <id> <json>` where the JSON is the raw remainder of the
    /// line, optionally wrapped in single or double quotes.
    fn parse_target_and_body(&mut self) -> ParseResult<(String, String, Value)> {
        let container = self.expect_name("container name")?;
        let id = self.expect_name("document id")?;

        let position = self.lexer.position();
        let raw = self.rest().trim();
        if raw.is_empty() {
            return Err(ParseError::missing_clause(
                "A JSON document body is required",
                position,
            ));
        }

        let body = match strip_quotes(raw) {
            Some(inner) => parse_json(&inner, position)?,
            None => parse_json(raw, position)?,
        };
        Ok((container, id, body))
    }

    // ------------------------------------------------------------------
    // Management commands
    // ------------------------------------------------------------------

    fn parse_show(&mut self) -> ParseResult<Statement> {
        match self.next()? {
            Some(token) if token.is_keyword("CONTAINERS") => Ok(Statement::ShowContainers),
            Some(token) if token.is_keyword("DOCUMENTS") => Ok(Statement::ShowDocuments {
                container: self.optional_name()?,
            }),
            Some(token) => Err(ParseError::unexpected(
                "CONTAINERS or DOCUMENTS",
                self.text(&token),
                token.start,
            )),
            None => Err(ParseError::unexpected_end(
                "CONTAINERS or DOCUMENTS",
                self.input.len(),
            )),
        }
    }

    /// `export <path>` exports everything; `export all|<container> <path>`
    fn parse_export(&mut self) -> ParseResult<Statement> {
        let first = self.expect_name("export target or path")?;
        match self.optional_name()? {
            Some(path) => {
                let target = if first.eq_ignore_ascii_case("all") {
                    ExportTarget::All
                } else {
                    ExportTarget::Container(first)
                };
                Ok(Statement::Export {
                    target,
                    path: PathBuf::from(path),
                })
            }
            None => Ok(Statement::Export {
                target: ExportTarget::All,
                path: PathBuf::from(first),
            }),
        }
    }

    /// `import <folder>` or `import <container> <file>`
    fn parse_import(&mut self) -> ParseResult<Statement> {
        let first = self.expect_name("import path or container name")?;
        match self.optional_name()? {
            Some(path) => Ok(Statement::Import {
                container: Some(first),
                path: PathBuf::from(path),
            }),
            None => Ok(Statement::Import {
                container: None,
                path: PathBuf::from(first),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    fn next(&mut self) -> ParseResult<Option<Token>> {
        match self.peeked.take() {
            Some(token) => Ok(Some(token)),
            None => self.lexer.next_token(),
        }
    }

    fn peek(&mut self) -> ParseResult<Option<&Token>> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next_token()?;
        }
        Ok(self.peeked.as_ref())
    }

    fn text(&self, token: &Token) -> &'a str {
        &self.input[token.start..token.end]
    }

    /// Takes the unlexed remainder of the input
    fn rest(&mut self) -> &'a str {
        let start = self
            .peeked
            .take()
            .map(|token| token.start)
            .unwrap_or_else(|| self.lexer.position());
        self.lexer.seek(self.input.len());
        &self.input[start..]
    }

    fn eat_keyword(&mut self, keyword: &str) -> ParseResult<bool> {
        let matched = matches!(self.peek()?, Some(token) if token.is_keyword(keyword));
        if matched {
            self.next()?;
        }
        Ok(matched)
    }

    fn expect_keyword(&mut self, keyword: &str) -> ParseResult<Token> {
        match self.next()? {
            Some(token) if token.is_keyword(keyword) => Ok(token),
            Some(token) => Err(ParseError::unexpected(keyword, self.text(&token), token.start)),
            None => Err(ParseError::unexpected_end(keyword, self.input.len())),
        }
    }

    fn expect_kind(&mut self, kind: TokenKind, expected: &str) -> ParseResult<Token> {
        match self.next()? {
            Some(token) if token.kind == kind => Ok(token),
            Some(token) => Err(ParseError::unexpected(expected, self.text(&token), token.start)),
            None => Err(ParseError::unexpected_end(expected, self.input.len())),
        }
    }

    /// A container name, document id, field or path: a bare word, a number
    /// (kept as written), or a quoted string
    fn expect_name(&mut self, what: &str) -> ParseResult<String> {
        match self.next()? {
            Some(token) => match &token.kind {
                TokenKind::Word(_) | TokenKind::Number(_) => Ok(self.text(&token).to_string()),
                TokenKind::Str(s) => Ok(s.clone()),
                _ => Err(ParseError::unexpected(what, self.text(&token), token.start)),
            },
            None => Err(ParseError::missing_clause(
                format!("Missing {}", what),
                self.input.len(),
            )),
        }
    }

    fn optional_name(&mut self) -> ParseResult<Option<String>> {
        if self.peek()?.is_none() {
            return Ok(None);
        }
        self.expect_name("name").map(Some)
    }

    fn expect_end(&mut self) -> ParseResult<()> {
        match self.next()? {
            None => Ok(()),
            Some(token) => Err(ParseError::unexpected(
                "end of statement",
                self.text(&token),
                token.start,
            )),
        }
    }
}

/// Removes one pair of matching outer quotes, resolving escaped inner quotes
fn strip_quotes(raw: &str) -> Option<String> {
    let quote = raw.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    if raw.len() < 2 || !raw.ends_with(quote) {
        return None;
    }
    let inner = &raw[1..raw.len() - 1];
    Some(inner.replace(&format!("\\{}", quote), &quote.to_string()))
}

fn parse_json(text: &str, position: usize) -> ParseResult<Value> {
    serde_json::from_str(text).map_err(|e| {
        ParseError::malformed_literal(format!("Invalid JSON body: {}", e), position, None)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::errors::ParseErrorCode;
    use serde_json::json;

    fn select(input: &str) -> Query {
        match parse_statement(input).unwrap() {
            Statement::Select(query) => query,
            other => panic!("expected SELECT, got {:?}", other),
        }
    }

    fn error_code(input: &str) -> ParseErrorCode {
        parse_statement(input).unwrap_err().code()
    }

    #[test]
    fn test_select_star() {
        let query = select("SELECT * FROM users");
        assert_eq!(query.container, "users");
        assert!(query.selects_all());
        assert!(query.conditions.is_empty());
        assert_eq!(query.limit, None);
    }

    #[test]
    fn test_select_full_grammar() {
        let query = select(
            "select name, email from users where city = 'New York' and age >= 21 order by age desc limit 10",
        );
        assert_eq!(query.fields, vec!["name", "email"]);
        assert_eq!(
            query.conditions,
            vec![
                Condition::eq("city", json!("New York")),
                Condition::gte("age", json!(21)),
            ]
        );
        assert_eq!(query.order_by, Some(SortSpec::desc("age")));
        assert_eq!(query.limit, Some(10));
    }

    #[test]
    fn test_order_by_defaults_to_ascending() {
        let query = select("SELECT name FROM users ORDER BY age LIMIT 1");
        assert_eq!(query.order_by, Some(SortSpec::asc("age")));
        assert_eq!(query.limit, Some(1));
    }

    #[test]
    fn test_like_and_in_conditions() {
        let query = select("SELECT * FROM docs WHERE city LIKE 'new' AND category IN ['tech', 'science', 3]");
        assert_eq!(query.conditions[0], Condition::like("city", "new"));
        assert_eq!(
            query.conditions[1],
            Condition::is_in("category", vec![json!("tech"), json!("science"), json!(3)])
        );
    }

    #[test]
    fn test_quoted_number_in_numeric_comparison() {
        let query = select("SELECT * FROM users WHERE age > '25'");
        assert_eq!(query.conditions[0], Condition::gt("age", json!(25)));
    }

    #[test]
    fn test_select_errors() {
        assert_eq!(error_code("SELECT * users"), ParseErrorCode::FdbMissingClause);
        assert_eq!(error_code("SELECT *"), ParseErrorCode::FdbMissingClause);
        assert_eq!(error_code("SELECT FROM users"), ParseErrorCode::FdbUnexpectedToken);
        assert_eq!(
            error_code("SELECT * FROM users WHERE name = 'Al"),
            ParseErrorCode::FdbUnbalancedQuote
        );
        assert_eq!(
            error_code("SELECT * FROM users WHERE name = Alice"),
            ParseErrorCode::FdbMalformedLiteral
        );
        assert_eq!(
            error_code("SELECT * FROM users WHERE age > 'old'"),
            ParseErrorCode::FdbInvalidNumber
        );
        assert_eq!(
            error_code("SELECT * FROM users WHERE tag IN ['a' 'b']"),
            ParseErrorCode::FdbMalformedList
        );
        assert_eq!(
            error_code("SELECT * FROM users WHERE tag IN ['a',"),
            ParseErrorCode::FdbMalformedList
        );
        assert_eq!(
            error_code("SELECT * FROM users WHERE tag IN 'a'"),
            ParseErrorCode::FdbMalformedList
        );
        assert_eq!(error_code("SELECT * FROM users LIMIT -1"), ParseErrorCode::FdbInvalidNumber);
        assert_eq!(error_code("SELECT * FROM users LIMIT ten"), ParseErrorCode::FdbInvalidNumber);
        assert_eq!(
            error_code("SELECT * FROM users WHERE a = 1 extra"),
            ParseErrorCode::FdbUnexpectedToken
        );
    }

    #[test]
    fn test_or_is_rejected() {
        let err = parse_statement("SELECT * FROM users WHERE a = 1 OR b = 2").unwrap_err();
        assert_eq!(err.code(), ParseErrorCode::FdbUnexpectedToken);
        assert_eq!(err.token(), Some("OR"));
        assert_eq!(err.position(), 32);
    }

    #[test]
    fn test_unknown_statement() {
        let err = parse_statement("SELEKT * FROM users").unwrap_err();
        assert_eq!(err.code(), ParseErrorCode::FdbUnknownStatement);
        assert_eq!(err.token(), Some("SELEKT"));
        assert_eq!(error_code("   "), ParseErrorCode::FdbEmptyStatement);
    }

    #[test]
    fn test_sql_insert_quoted_body() {
        let statement = parse_statement(
            r#"INSERT INTO users VALUES ('user_1', '{"name": "Alice", "age": 30}')"#,
        )
        .unwrap();
        assert_eq!(
            statement,
            Statement::Insert {
                container: "users".into(),
                id: "user_1".into(),
                body: json!({"name": "Alice", "age": 30}),
            }
        );
    }

    #[test]
    fn test_quoted_body_keeps_json_escapes() {
        let statement = parse_statement(
            r#"INSERT INTO files VALUES ('f1', '{"path": "C:\\temp\\", "note": "it\'s\nok"}')"#,
        )
        .unwrap();
        assert_eq!(
            statement,
            Statement::Insert {
                container: "files".into(),
                id: "f1".into(),
                body: json!({"path": "C:\\temp\\", "note": "it's\nok"}),
            }
        );
    }

    #[test]
    fn test_path_ending_in_backslash() {
        assert_eq!(
            parse_statement(r"export users 'C:\\exports\\'").unwrap(),
            Statement::Export {
                target: ExportTarget::Container("users".into()),
                path: PathBuf::from(r"C:\exports\"),
            }
        );
    }

    #[test]
    fn test_sql_insert_bare_body() {
        let statement =
            parse_statement(r#"insert into users values ("u2", {"note": "a (b)"})"#).unwrap();
        assert_eq!(
            statement,
            Statement::Insert {
                container: "users".into(),
                id: "u2".into(),
                body: json!({"note": "a (b)"}),
            }
        );
    }

    #[test]
    fn test_sql_insert_errors() {
        assert_eq!(
            error_code("INSERT INTO users ('u1', '{}')"),
            ParseErrorCode::FdbMissingClause
        );
        assert_eq!(
            error_code("INSERT INTO users VALUES ('u1', '{broken')"),
            ParseErrorCode::FdbMalformedLiteral
        );
        assert_eq!(
            error_code("INSERT INTO users VALUES ('u1', '{}'"),
            ParseErrorCode::FdbUnexpectedToken
        );
    }

    #[test]
    fn test_flat_insert_and_update() {
        let statement =
            parse_statement(r#"insert users user_123 '{"name": "John", "age": 30}'"#).unwrap();
        assert_eq!(
            statement,
            Statement::Insert {
                container: "users".into(),
                id: "user_123".into(),
                body: json!({"name": "John", "age": 30}),
            }
        );

        let statement = parse_statement(r#"update users 42 {"age": 31}"#).unwrap();
        assert_eq!(
            statement,
            Statement::Update {
                container: "users".into(),
                id: "42".into(),
                body: json!({"age": 31}),
            }
        );

        assert_eq!(error_code("insert users u1"), ParseErrorCode::FdbMissingClause);
        assert_eq!(error_code("update users u1 {oops"), ParseErrorCode::FdbMalformedLiteral);
    }

    #[test]
    fn test_container_commands() {
        assert_eq!(
            parse_statement("CREATE CONTAINER users").unwrap(),
            Statement::CreateContainer {
                name: "users".into()
            }
        );
        assert_eq!(
            parse_statement("drop container users").unwrap(),
            Statement::DropContainer {
                name: "users".into()
            }
        );
        assert_eq!(error_code("CREATE TABLE users"), ParseErrorCode::FdbUnexpectedToken);
        assert_eq!(error_code("DROP CONTAINER"), ParseErrorCode::FdbMissingClause);
    }

    #[test]
    fn test_management_commands() {
        assert_eq!(parse_statement("show containers").unwrap(), Statement::ShowContainers);
        assert_eq!(
            parse_statement("show documents").unwrap(),
            Statement::ShowDocuments { container: None }
        );
        assert_eq!(
            parse_statement("SHOW DOCUMENTS users").unwrap(),
            Statement::ShowDocuments {
                container: Some("users".into())
            }
        );
        assert_eq!(
            parse_statement("use users").unwrap(),
            Statement::Use {
                container: "users".into()
            }
        );
        assert_eq!(
            parse_statement("describe").unwrap(),
            Statement::Describe { container: None }
        );
        assert_eq!(
            parse_statement("delete users u1").unwrap(),
            Statement::Delete {
                container: "users".into(),
                id: "u1".into()
            }
        );
        assert_eq!(parse_statement("history").unwrap(), Statement::History);
        assert_eq!(parse_statement("HELP").unwrap(), Statement::Help);
        assert_eq!(parse_statement("quit").unwrap(), Statement::Exit);
    }

    #[test]
    fn test_count() {
        match parse_statement("count products WHERE price > 100").unwrap() {
            Statement::Count(query) => {
                assert_eq!(query.container, "products");
                assert_eq!(query.conditions, vec![Condition::gt("price", json!(100))]);
            }
            other => panic!("expected COUNT, got {:?}", other),
        }
        assert_eq!(
            error_code("count products LIMIT 1"),
            ParseErrorCode::FdbUnexpectedToken
        );
    }

    #[test]
    fn test_export_import_backup() {
        assert_eq!(
            parse_statement("export all ./data_backup").unwrap(),
            Statement::Export {
                target: ExportTarget::All,
                path: PathBuf::from("./data_backup"),
            }
        );
        assert_eq!(
            parse_statement("export users out/users.json").unwrap(),
            Statement::Export {
                target: ExportTarget::Container("users".into()),
                path: PathBuf::from("out/users.json"),
            }
        );
        assert_eq!(
            parse_statement("export ./everything").unwrap(),
            Statement::Export {
                target: ExportTarget::All,
                path: PathBuf::from("./everything"),
            }
        );
        assert_eq!(
            parse_statement("import ./data_import").unwrap(),
            Statement::Import {
                container: None,
                path: PathBuf::from("./data_import"),
            }
        );
        assert_eq!(
            parse_statement("import users 'my file.json'").unwrap(),
            Statement::Import {
                container: Some("users".into()),
                path: PathBuf::from("my file.json"),
            }
        );
        assert_eq!(
            parse_statement("backup").unwrap(),
            Statement::Backup { path: None }
        );
        assert_eq!(
            parse_statement("backup /tmp/db.tar").unwrap(),
            Statement::Backup {
                path: Some(PathBuf::from("/tmp/db.tar"))
            }
        );
    }
}
