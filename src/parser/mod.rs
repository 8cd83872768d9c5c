//! Statement Parser subsystem for folderdb
//!
//! Turns one line of the query language into a [`Statement`]. The parser
//! is pure: it never reads storage, so "container exists" checks happen
//! at execution time.
//!
//! Keywords are case-insensitive; field names, container names, document
//! ids and string literals are case-sensitive.

mod ast;
mod errors;
mod lexer;
mod parser;

pub use ast::{Condition, ExportTarget, Operator, Query, SortDirection, SortSpec, Statement};
pub use errors::{ParseError, ParseErrorCode, ParseResult};
pub use parser::{parse_statement, Parser};
