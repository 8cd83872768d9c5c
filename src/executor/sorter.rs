//! Result sorting for query execution
//!
//! Documents holding the sort field are ordered numbers first (numerically),
//! then everything else by its stringified form. Documents missing the
//! field always come last, whatever the direction. The sort is stable.

use std::cmp::Ordering;

use serde_json::Value;

use crate::document::{as_number, stringify, Document};
use crate::parser::{SortDirection, SortSpec};

/// Sorts result documents
pub struct ResultSorter;

impl ResultSorter {
    pub fn sort(documents: &mut [Document], sort_spec: &SortSpec) {
        documents.sort_by(|a, b| {
            match (a.get(&sort_spec.field), b.get(&sort_spec.field)) {
                (Some(a_val), Some(b_val)) => {
                    let ordering = Self::compare_values(a_val, b_val);
                    match sort_spec.direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
    }

    /// Total order over present values: numeric values before non-numeric
    /// ones, each group in its natural order.
    pub fn compare_values(a: &Value, b: &Value) -> Ordering {
        match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => stringify(a).cmp(&stringify(b)),
        }
    }
}
