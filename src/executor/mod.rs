//! Query Executor subsystem for folderdb
//!
//! Evaluates a [`Query`](crate::parser::Query) against one container:
//! resolve, scan, filter, sort, limit, project. Every query is a full
//! scan; there are no indexes to consult or maintain.

mod errors;
mod executor;
mod filters;
mod result;
mod sorter;

pub use errors::{ExecutorError, ExecutorResult};
pub use executor::QueryExecutor;
pub use filters::PredicateFilter;
pub use result::ExecutionResult;
pub use sorter::ResultSorter;
