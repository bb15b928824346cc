// CSV export of generated keywords.
//
// One row per keyword across all successful topics, with the same three
// columns the results view shows.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::models::{BatchResult, KeywordMetric};

const HEADER: &str = "Keyword,Search Volume,Difficulty";

/// Default export filename, dated like `tailfinder-keywords-2026-10-15.csv`.
pub fn default_filename(date: chrono::NaiveDate) -> PathBuf {
    PathBuf::from(format!("tailfinder-keywords-{}.csv", date.format("%Y-%m-%d")))
}

/// Render keywords as CSV text (header plus one row per keyword).
pub fn render<'a>(keywords: impl IntoIterator<Item = &'a KeywordMetric>) -> String {
    let mut out = String::from(HEADER);
    for metric in keywords {
        out.push('\n');
        out.push_str(&escape_field(metric.keyword()));
        out.push(',');
        out.push_str(&metric.search_volume().to_string());
        out.push(',');
        out.push_str(&metric.difficulty().to_string());
    }
    out.push('\n');
    out
}

/// Write every keyword in the batch to `path`. Returns the number of rows.
pub fn write_batch(batch: &BatchResult, path: &Path) -> Result<usize> {
    let rows = batch.all_keywords().count();
    fs::write(path, render(batch.all_keywords()))
        .with_context(|| format!("Failed to write CSV to {}", path.display()))?;
    info!(path = %path.display(), rows = rows, "Exported keywords to CSV");
    Ok(rows)
}

/// Quote a field if it contains a delimiter, quote or line break.
fn escape_field(field: &str) -> String {
    if field.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
