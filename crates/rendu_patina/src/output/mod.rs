//! Output formatters for lint diagnostics.

mod text;

pub use text::*;

use rendu_carton::{FxHashMap, LineIndex};
use serde::Serialize;

use crate::diagnostic::{LintDiagnostic, Severity};
use crate::linter::LintResult;

/// Output format for lint results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Rich terminal output with colors and code snippets
    #[default]
    Text,
    /// One line per diagnostic (`file:line:column`)
    Compact,
    /// JSON output for tooling integration
    Json,
}

/// Format lint results according to the specified format
pub fn format_results(
    results: &[LintResult],
    sources: &[(String, String)],
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => format_text(results, sources),
        OutputFormat::Compact => format_compact(results, sources),
        OutputFormat::Json => format_json(results, sources),
    }
}

/// Line indexes for the sources that have diagnostics.
pub(crate) fn line_indexes<'s>(
    results: &[LintResult],
    sources: &'s [(String, String)],
) -> FxHashMap<&'s str, LineIndex> {
    sources
        .iter()
        .filter(|(file, _)| {
            results
                .iter()
                .any(|r| r.filename == *file && r.has_diagnostics())
        })
        .map(|(file, source)| (file.as_str(), LineIndex::new(source)))
        .collect()
}

/// One-based `(line, column, end_line, end_column)` of a diagnostic.
pub(crate) fn position(index: Option<&LineIndex>, diagnostic: &LintDiagnostic) -> (u32, u32, u32, u32) {
    match index {
        Some(index) => {
            let start = index.line_column(diagnostic.start);
            let end = index.line_column(diagnostic.end);
            (start.line + 1, start.column + 1, end.line + 1, end.column + 1)
        }
        // Without the source only offsets are known
        None => (1, diagnostic.start + 1, 1, diagnostic.end + 1),
    }
}

/// JSON output structure for a single file
#[derive(Debug, Serialize)]
pub struct JsonFileResult {
    pub file: String,
    pub messages: Vec<JsonMessage>,
    #[serde(rename = "errorCount")]
    pub error_count: usize,
    #[serde(rename = "warningCount")]
    pub warning_count: usize,
}

/// JSON output structure for a single message
#[derive(Debug, Serialize)]
pub struct JsonMessage {
    #[serde(rename = "ruleId")]
    pub rule_id: &'static str,
    pub severity: u8,
    pub message: String,
    pub line: u32,
    pub column: u32,
    #[serde(rename = "endLine")]
    pub end_line: u32,
    #[serde(rename = "endColumn")]
    pub end_column: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<crate::diagnostic::Fix>,
}

/// Format results as JSON
fn format_json(results: &[LintResult], sources: &[(String, String)]) -> String {
    let indexes = line_indexes(results, sources);
    let json_results: Vec<JsonFileResult> = results
        .iter()
        .map(|r| JsonFileResult {
            file: r.filename.clone(),
            messages: r
                .diagnostics
                .iter()
                .map(|d| {
                    let (line, column, end_line, end_column) =
                        position(indexes.get(r.filename.as_str()), d);
                    JsonMessage {
                        rule_id: d.rule_name,
                        severity: match d.severity {
                            Severity::Error => 2,
                            Severity::Warning => 1,
                        },
                        message: d.message.to_string(),
                        line,
                        column,
                        end_line,
                        end_column,
                        fix: d.fix.clone(),
                    }
                })
                .collect(),
            error_count: r.error_count,
            warning_count: r.warning_count,
        })
        .collect();

    serde_json::to_string_pretty(&json_results).unwrap_or_else(|_| "[]".to_string())
}
