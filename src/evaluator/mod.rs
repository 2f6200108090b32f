//! Sequential evaluation of a prompt catalog against several backends.

mod runner;
mod types;

pub use runner::{EvaluationRunner, ProgressFn, DEFAULT_DELAY};
pub use types::{
    QueryResult, Responses, RunEvent, RunMetadata, RunReport, TestResult, ERROR_PREFIX,
    SKIPPED_PREFIX,
};
