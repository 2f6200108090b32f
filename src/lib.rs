//! Side-by-side evaluation of LLM coding assistants.
//!
//! A fixed [`catalog::Catalog`] of prompts is sent to every configured
//! [`backends::Backend`] one after another. Each answer is recorded as a
//! [`evaluator::QueryResult`] and the whole run is written out as JSON plus a
//! Markdown report with empty tables for manual scoring.
//!
//! Backends never fail a run: missing credentials and failed calls come back
//! as `SKIPPED - ...` / `ERROR: ...` responses.

pub mod backends;
pub mod catalog;
pub mod error;
pub mod evaluator;
pub mod report;

pub use backends::{default_backends, Backend};
pub use catalog::{Catalog, Category, TestCase};
pub use error::EvalError;
pub use evaluator::{EvaluationRunner, QueryResult, RunEvent, RunReport, TestResult};
