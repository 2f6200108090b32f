use std::fmt::{self, Write};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::EvalError;
use crate::evaluator::TestResult;

use super::report_file_name;

/// Characters of each response shown in the report.
pub const RESPONSE_PREVIEW_CHARS: usize = 500;

/// Manual scoring criteria, each scored 1-5 by the reviewer.
pub const SCORE_COLUMNS: [&str; 6] = [
    "Correctness",
    "Quality",
    "Completeness",
    "Context",
    "Explanation",
    "Total",
];

/// Renders the Markdown scoring report for `results`.
pub fn render_report(results: &[TestResult], generated_at: DateTime<Local>) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_report(&mut out, results, generated_at);
    out
}

/// Writes the report with a timestamped name inside `dir`.
pub fn generate_report(results: &[TestResult], dir: &Path) -> Result<PathBuf, EvalError> {
    let now = Local::now();
    fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(now));
    fs::write(&path, render_report(results, now))?;
    log::info!("Wrote report for {} tests to {}", results.len(), path.display());
    Ok(path)
}

fn write_report(
    out: &mut String,
    results: &[TestResult],
    generated_at: DateTime<Local>,
) -> fmt::Result {
    writeln!(out, "# AI Coding Assistant Evaluation Report")?;
    writeln!(out)?;
    writeln!(out, "**Generated:** {}", generated_at.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out)?;
    writeln!(out, "**Total Tests:** {}", results.len())?;
    writeln!(out)?;
    writeln!(out, "---")?;

    for result in results {
        write_test(out, result)?;
    }
    Ok(())
}

fn write_test(out: &mut String, result: &TestResult) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "## Test {}: {}", result.test_id, result.category)?;
    writeln!(out)?;
    writeln!(out, "**Prompt:**")?;
    write_fenced(out, &result.prompt)?;

    for (name, response) in result.responses.iter() {
        writeln!(out)?;
        writeln!(out, "### {name}")?;
        writeln!(out)?;
        if response.is_sentinel() {
            writeln!(out, "⚠️ {}", response.response)?;
            continue;
        }
        writeln!(out, "**Response:**")?;
        write_fenced(out, &preview(&response.response))?;
        writeln!(out)?;
        writeln!(
            out,
            "**Time:** {:.2}s | **Tokens:** {}",
            response.time, response.tokens
        )?;
    }

    writeln!(out)?;
    writeln!(out, "**Manual Evaluation:** (Score each 1-5)")?;
    writeln!(out)?;
    writeln!(out, "| System | {} |", SCORE_COLUMNS.join(" | "))?;
    write!(out, "|--------|")?;
    for column in SCORE_COLUMNS {
        write!(out, "{}|", "-".repeat(column.len() + 2))?;
    }
    writeln!(out)?;
    for name in result.responses.names() {
        writeln!(out, "| {name} |{}", " - |".repeat(SCORE_COLUMNS.len()))?;
    }
    writeln!(out)?;
    writeln!(out, "---")
}

/// Fences `text` with a backtick run longer than any run inside it, so code
/// blocks in prompts and answers cannot close the fence early.
fn write_fenced(out: &mut String, text: &str) -> fmt::Result {
    let fence = "`".repeat(longest_backtick_run(text).max(2) + 1);
    writeln!(out, "{fence}")?;
    writeln!(out, "{text}")?;
    writeln!(out, "{fence}")
}

fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// First [`RESPONSE_PREVIEW_CHARS`] characters, with `...` when cut.
fn preview(text: &str) -> String {
    match text.char_indices().nth(RESPONSE_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
