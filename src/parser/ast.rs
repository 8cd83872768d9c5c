//! Statement tree and query descriptor
//!
//! A [`Query`] is produced by the parser or built programmatically; the
//! executor treats both the same way.

use std::fmt;
use std::path::PathBuf;

use serde_json::Value;

/// Comparison operators recognized in conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
    Like,
    In,
}

impl Operator {
    /// Returns the operator as written in statements
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::Like => "LIKE",
            Operator::In => "IN",
        }
    }

    /// Parses an operator symbol or keyword (case-insensitive)
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.to_ascii_uppercase().as_str() {
            "=" => Some(Operator::Eq),
            "!=" => Some(Operator::Ne),
            ">" => Some(Operator::Gt),
            "<" => Some(Operator::Lt),
            ">=" => Some(Operator::Gte),
            "<=" => Some(Operator::Lte),
            "LIKE" => Some(Operator::Like),
            "IN" => Some(Operator::In),
            _ => None,
        }
    }

    /// Returns true for `>`, `<`, `>=`, `<=`
    pub fn is_ordering(&self) -> bool {
        matches!(self, Operator::Gt | Operator::Lt | Operator::Gte | Operator::Lte)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single `field op literal` condition
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: Operator,
    /// String, number, or (for `IN`) an array of those
    pub value: Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, op: Operator, value: Value) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, Operator::Eq, value)
    }

    pub fn ne(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, Operator::Ne, value)
    }

    pub fn gt(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, Operator::Gt, value)
    }

    pub fn lt(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, Operator::Lt, value)
    }

    pub fn gte(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, Operator::Gte, value)
    }

    pub fn lte(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, Operator::Lte, value)
    }

    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, Operator::Like, Value::String(pattern.into()))
    }

    pub fn is_in(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::new(field, Operator::In, Value::Array(values))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op, self.value)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Sort specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Query descriptor: what to read from one container
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Target container
    pub container: String,
    /// Projected fields; empty means all fields
    pub fields: Vec<String>,
    /// Conditions, combined with AND
    pub conditions: Vec<Condition>,
    pub order_by: Option<SortSpec>,
    pub limit: Option<usize>,
}

impl Query {
    /// Starts a query that selects every field of every document
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            fields: Vec::new(),
            conditions: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    /// Sets the projected fields
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a condition
    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Adds a condition from its parts
    pub fn where_field(self, field: impl Into<String>, op: Operator, value: Value) -> Self {
        self.filter(Condition::new(field, op, value))
    }

    pub fn order_by(mut self, sort: SortSpec) -> Self {
        self.order_by = Some(sort);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns true if every field is projected
    pub fn selects_all(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Target of an `export` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    All,
    Container(String),
}

/// A parsed statement or management command
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(Query),
    /// `count <container> [WHERE ...]`; only `container` and `conditions` are used
    Count(Query),
    Insert {
        container: String,
        id: String,
        body: Value,
    },
    Update {
        container: String,
        id: String,
        body: Value,
    },
    Delete {
        container: String,
        id: String,
    },
    CreateContainer {
        name: String,
    },
    DropContainer {
        name: String,
    },
    ShowContainers,
    /// Lists a container; `None` means the session's current container
    ShowDocuments {
        container: Option<String>,
    },
    Use {
        container: String,
    },
    Describe {
        container: Option<String>,
    },
    Export {
        target: ExportTarget,
        path: PathBuf,
    },
    /// `None` container: import every `*.json` in a folder
    Import {
        container: Option<String>,
        path: PathBuf,
    },
    Backup {
        path: Option<PathBuf>,
    },
    History,
    Help,
    Exit,
}
