//! Machine-readable diff reports (JSON or CSV, picked by extension).

use crate::core::diff::ChangeEvent;
use crate::core::Storage;
use crate::formats::json::to_json_pretty;
use crate::utils::error::{EtlError, Result};
use serde::Serialize;

pub const REPORT_EXTENSIONS: [&str; 2] = ["json", "csv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Csv,
}

impl ReportFormat {
    pub fn from_path(path: &str) -> Result<Self> {
        if path.ends_with(".json") {
            Ok(ReportFormat::Json)
        } else if path.ends_with(".csv") {
            Ok(ReportFormat::Csv)
        } else {
            Err(EtlError::InvalidConfigValueError {
                field: "report".to_string(),
                value: path.to_string(),
                reason: format!(
                    "Unsupported report format. Valid formats: {}",
                    REPORT_EXTENSIONS.join(", ")
                ),
            })
        }
    }
}

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    kind: &'a str,
    recipe: &'a str,
    ingredient: &'a str,
    old: &'a str,
    new: &'a str,
}

impl<'a> From<&'a ChangeEvent> for ReportRow<'a> {
    fn from(event: &'a ChangeEvent) -> Self {
        let (old, new) = event.values().unwrap_or(("", ""));
        Self {
            kind: event.kind(),
            recipe: event.recipe(),
            ingredient: event.ingredient().unwrap_or(""),
            old,
            new,
        }
    }
}

pub fn render_csv(changes: &[ChangeEvent]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if changes.is_empty() {
        // serde 無資料時不會輸出標頭
        writer.write_record(["kind", "recipe", "ingredient", "old", "new"])?;
    }
    for event in changes {
        writer.serialize(ReportRow::from(event))?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))?;
    String::from_utf8(data)
        .map_err(|e| EtlError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// `indent` only applies to JSON reports.
pub fn render(format: ReportFormat, changes: &[ChangeEvent], indent: usize) -> Result<String> {
    match format {
        ReportFormat::Json => {
            let mut text = to_json_pretty(changes, indent)?;
            text.push('\n');
            Ok(text)
        }
        ReportFormat::Csv => render_csv(changes),
    }
}

pub async fn write_report<S: Storage>(
    storage: &S,
    path: &str,
    changes: &[ChangeEvent],
    indent: usize,
) -> Result<()> {
    let format = ReportFormat::from_path(path)?;
    let text = render(format, changes, indent)?;
    tracing::debug!("Writing {:?} report with {} rows to {}", format, changes.len(), path);
    storage.write_file(path, text.as_bytes()).await
}
