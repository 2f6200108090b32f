use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::EvalError;
use crate::evaluator::RunReport;

use super::results_file_name;

/// Writes `report` as pretty JSON and returns the path written.
///
/// Without an explicit `path` the file gets a timestamped name inside `dir`.
pub fn save_results(
    report: &RunReport,
    path: Option<&Path>,
    dir: &Path,
) -> Result<PathBuf, EvalError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => dir.join(results_file_name(Local::now())),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let payload = serde_json::to_vec_pretty(report)?;
    fs::write(&path, payload)?;
    log::info!(
        "Saved {} results to {}",
        report.metadata.total_tests,
        path.display()
    );
    Ok(path)
}

/// Reads a results file written by [`save_results`].
pub fn load_results(path: impl AsRef<Path>) -> Result<RunReport, EvalError> {
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{QueryResult, Responses, RunMetadata, TestResult};

    fn sample_report() -> RunReport {
        let mut responses = Responses::new();
        responses.insert("Claude Code", QueryResult::skipped("No API key"));
        responses.insert(
            "Local Instance",
            QueryResult::success("naïve → ✓", 0, 1.25, "local-mistral"),
        );
        RunReport {
            metadata: RunMetadata {
                timestamp: "2025-01-01T12:00:00.000000".to_string(),
                total_tests: 1,
                systems: vec!["Claude Code".to_string(), "Local Instance".to_string()],
            },
            results: vec![TestResult {
                test_id: "S1".to_string(),
                prompt: "Write a prime check".to_string(),
                category: "Code Generation".to_string(),
                timestamp: "2025-01-01T12:00:00.000000".to_string(),
                responses,
            }],
        }
    }

    #[test]
    fn written_file_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report();
        let path = save_results(&report, None, dir.path()).unwrap();

        assert!(path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap()
            .starts_with("evaluation_results_"));
        let loaded = load_results(&path).unwrap();
        assert_eq!(loaded, report);
        assert_eq!(loaded.metadata.total_tests, loaded.results.len());
    }

    #[test]
    fn keeps_field_names_and_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("out.json");
        let path = save_results(&sample_report(), Some(&target), dir.path()).unwrap();
        assert_eq!(path, target);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("naïve → ✓"));
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["metadata"]["total_tests"], 1);
        assert_eq!(value["metadata"]["systems"][1], "Local Instance");
        let first = &value["results"][0];
        assert_eq!(first["test_id"], "S1");
        assert_eq!(
            first["responses"]["Claude Code"]["response"],
            "SKIPPED - No API key"
        );
        assert_eq!(
            first["responses"]["Local Instance"]["model"],
            "local-mistral"
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_results(dir.path().join("absent.json")),
            Err(EvalError::Io(_))
        ));
    }
}
