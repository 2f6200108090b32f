//! Writing run output: the JSON results file and the Markdown scoring report.

mod json;
mod markdown;

use chrono::{DateTime, Local};

pub use json::{load_results, save_results};
pub use markdown::{generate_report, render_report, RESPONSE_PREVIEW_CHARS, SCORE_COLUMNS};

const FILE_STAMP: &str = "%Y%m%d_%H%M%S";

/// Default results file name, e.g. `evaluation_results_20250101_120000.json`.
pub fn results_file_name(now: DateTime<Local>) -> String {
    format!("evaluation_results_{}.json", now.format(FILE_STAMP))
}

/// Default report file name, e.g. `evaluation_report_20250101_120000.md`.
pub fn report_file_name(now: DateTime<Local>) -> String {
    format!("evaluation_report_{}.md", now.format(FILE_STAMP))
}
