//! Predicate filtering for query execution
//!
//! Conditions are compiled once per query, validating literal types up
//! front, then applied to every document of the scan. Evaluation itself
//! never fails: a value that cannot be compared simply does not match.
//!
//! Comparison rules:
//! - `=`, `!=`, `IN`: numeric when both sides are numeric, otherwise the
//!   stringified forms are compared
//! - `>`, `<`, `>=`, `<=`: numeric only; a non-numeric field never matches
//! - `LIKE`: case-insensitive substring of the stringified field value
//! - an absent field satisfies only `!=` against a non-null literal

use std::cmp::Ordering;

use serde_json::Value;

use super::errors::{ExecutorError, ExecutorResult};
use crate::document::{as_number, stringify, Document};
use crate::parser::{Condition, Operator};

#[derive(Debug, Clone)]
enum Matcher {
    Equals(Value),
    NotEquals(Value),
    Compare(Operator, f64),
    Like(String),
    In(Vec<Value>),
}

#[derive(Debug, Clone)]
struct Predicate {
    field: String,
    matcher: Matcher,
}

/// Compiled WHERE clause; all predicates must match (AND)
#[derive(Debug, Clone, Default)]
pub struct PredicateFilter {
    predicates: Vec<Predicate>,
}

impl PredicateFilter {
    /// A filter that matches every document
    pub fn accept_all() -> Self {
        Self::default()
    }

    /// Compiles conditions, rejecting literals their operator cannot use
    pub fn compile(conditions: &[Condition]) -> ExecutorResult<Self> {
        let predicates = conditions
            .iter()
            .map(compile_condition)
            .collect::<ExecutorResult<Vec<_>>>()?;
        Ok(Self { predicates })
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Checks if a document matches all predicates
    pub fn matches(&self, document: &Document) -> bool {
        self.predicates
            .iter()
            .all(|predicate| predicate_matches(predicate, document))
    }
}

fn compile_condition(condition: &Condition) -> ExecutorResult<Predicate> {
    let literal = &condition.value;
    let invalid = |expected: &'static str| {
        ExecutorError::invalid_literal(&condition.field, condition.op, expected, literal.to_string())
    };

    let matcher = match condition.op {
        Operator::Eq | Operator::Ne => {
            if !is_scalar(literal) {
                return Err(invalid("a string or number"));
            }
            if condition.op == Operator::Eq {
                Matcher::Equals(literal.clone())
            } else {
                Matcher::NotEquals(literal.clone())
            }
        }
        Operator::Gt | Operator::Lt | Operator::Gte | Operator::Lte => {
            let bound = as_number(literal).ok_or_else(|| invalid("a number"))?;
            Matcher::Compare(condition.op, bound)
        }
        Operator::Like => {
            if !is_scalar(literal) || literal.is_null() {
                return Err(invalid("a string pattern"));
            }
            Matcher::Like(stringify(literal).to_lowercase())
        }
        Operator::In => match literal {
            Value::Array(items) if items.iter().all(is_scalar) => Matcher::In(items.clone()),
            _ => return Err(invalid("a list of strings or numbers")),
        },
    };

    Ok(Predicate {
        field: condition.field.clone(),
        matcher,
    })
}

fn predicate_matches(predicate: &Predicate, document: &Document) -> bool {
    let value = match document.get(&predicate.field) {
        Some(value) => value,
        None => {
            return matches!(&predicate.matcher, Matcher::NotEquals(literal) if !literal.is_null())
        }
    };

    match &predicate.matcher {
        Matcher::Equals(literal) => values_equal(value, literal),
        Matcher::NotEquals(literal) => !values_equal(value, literal),
        Matcher::Compare(op, bound) => match as_number(value) {
            Some(n) => compare_matches(*op, n.partial_cmp(bound)),
            None => false,
        },
        Matcher::Like(pattern) => stringify(value).to_lowercase().contains(pattern.as_str()),
        Matcher::In(items) => items.iter().any(|item| values_equal(value, item)),
    }
}

/// Type-aware equality shared by `=`, `!=` and `IN`
pub(crate) fn values_equal(value: &Value, literal: &Value) -> bool {
    match (as_number(value), as_number(literal)) {
        (Some(a), Some(b)) => a == b,
        _ => stringify(value) == stringify(literal),
    }
}

fn compare_matches(op: Operator, ordering: Option<Ordering>) -> bool {
    let ordering = match ordering {
        Some(ordering) => ordering,
        None => return false,
    };
    match op {
        Operator::Gt => ordering == Ordering::Greater,
        Operator::Lt => ordering == Ordering::Less,
        Operator::Gte => ordering != Ordering::Less,
        Operator::Lte => ordering != Ordering::Greater,
        _ => false,
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}
