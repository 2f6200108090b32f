use std::sync::Arc;
use std::time::Duration;

use chrono::Local;

use crate::{backends::Backend, catalog::Catalog, catalog::TestCase, error::EvalError};

use super::types::{Responses, RunEvent, RunMetadata, RunReport, TestResult};

/// Pause after every backend call to stay under provider rate limits.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Observer for run progress.
pub type ProgressFn = dyn for<'a> Fn(RunEvent<'a>) + Send + Sync;

/// Runs catalog test cases against every backend, one call at a time.
///
/// Backends are queried in registration order and results accumulate in
/// run order until they are written out with [`crate::report`].
pub struct EvaluationRunner {
    catalog: Arc<Catalog>,
    backends: Vec<Box<dyn Backend>>,
    results: Vec<TestResult>,
    delay: Duration,
    progress: Option<Box<ProgressFn>>,
}

impl EvaluationRunner {
    /// Creates a runner over the given catalog and backends.
    pub fn new(catalog: Arc<Catalog>, backends: Vec<Box<dyn Backend>>) -> Self {
        Self {
            catalog,
            backends,
            results: Vec::new(),
            delay: DEFAULT_DELAY,
            progress: None,
        }
    }

    /// Sets the pause taken after each backend call.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Registers a callback receiving [`RunEvent`]s.
    pub fn on_progress<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(RunEvent<'a>) + Send + Sync + 'static,
    {
        self.progress = Some(Box::new(f));
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn backend_names(&self) -> Vec<String> {
        self.backends.iter().map(|b| b.name().to_string()).collect()
    }

    /// Sends one test case to every backend and records the result.
    pub async fn run_single_test(&mut self, test: &TestCase) -> &TestResult {
        self.emit(RunEvent::TestStarted { test });
        log::info!("Running test {} ({})", test.id, test.category);

        let mut result = TestResult {
            test_id: test.id.clone(),
            prompt: test.prompt.clone(),
            category: test.category.clone(),
            timestamp: iso_timestamp(),
            responses: Responses::new(),
        };

        for backend in &self.backends {
            self.emit(RunEvent::BackendStarted {
                backend: backend.name(),
            });
            let response = backend.query(&test.prompt).await;
            log::debug!(
                "{} answered {} in {:.2}s ({} tokens)",
                backend.name(),
                test.id,
                response.time,
                response.tokens
            );
            self.emit(RunEvent::BackendFinished {
                backend: backend.name(),
                result: &response,
            });
            result.responses.insert(backend.name(), response);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        self.results.push(result);
        &self.results[self.results.len() - 1]
    }

    /// Runs every test of one catalog category, returning how many ran.
    pub async fn run_category(&mut self, name: &str) -> Result<usize, EvalError> {
        let catalog = Arc::clone(&self.catalog);
        let tests = catalog
            .category(name)
            .ok_or_else(|| EvalError::UnknownCategory {
                name: name.to_string(),
                available: catalog.names(),
            })?;

        self.emit(RunEvent::CategoryStarted {
            name,
            tests: tests.len(),
        });
        for test in tests {
            self.run_single_test(test).await;
        }
        Ok(tests.len())
    }

    /// Runs every category in catalog order.
    pub async fn run_all(&mut self) -> usize {
        let catalog = Arc::clone(&self.catalog);
        let mut total = 0;
        for category in catalog.categories() {
            self.emit(RunEvent::CategoryStarted {
                name: &category.name,
                tests: category.tests.len(),
            });
            for test in &category.tests {
                self.run_single_test(test).await;
                total += 1;
            }
        }
        total
    }

    /// Snapshot of the run in the results-file layout.
    pub fn report(&self) -> RunReport {
        RunReport {
            metadata: RunMetadata {
                timestamp: iso_timestamp(),
                total_tests: self.results.len(),
                systems: self.backend_names(),
            },
            results: self.results.clone(),
        }
    }

    fn emit(&self, event: RunEvent<'_>) {
        if let Some(progress) = &self.progress {
            progress(event);
        }
    }
}

fn iso_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
