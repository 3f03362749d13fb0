//! Tabular projection of audit entries
//!
//! Produces the text of a CSV document; writing it anywhere is the caller's job.

use crate::core::SystemLog;
use crate::error::{DeskError, Result};
use chrono::SecondsFormat;
use csv::{QuoteStyle, WriterBuilder};

/// Column headers, in output order
pub const EXPORT_COLUMNS: [&str; 10] = [
    "Timestamp",
    "Actor",
    "Role",
    "IP",
    "Action",
    "Target",
    "Status",
    "Risk",
    "Details",
    "User Agent",
];

/// Flatten one entry into the exported columns
#[must_use]
pub fn project(log: &SystemLog) -> [String; 10] {
    [
        log.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        log.actor_name.clone(),
        log.role_name.clone(),
        log.ip.clone(),
        log.action_type.to_string(),
        log.target.clone(),
        log.status.to_string(),
        log.risk_level.to_string(),
        details_column(log),
        log.user_agent.clone().unwrap_or_default(),
    ]
}

/// Details text; field changes are appended when present
fn details_column(log: &SystemLog) -> String {
    let changes = log
        .changes
        .iter()
        .map(|c| format!("{}: {} -> {}", c.field, c.old_value, c.new_value))
        .collect::<Vec<_>>()
        .join("; ");

    match (&log.details, changes.is_empty()) {
        (Some(details), true) => details.clone(),
        (Some(details), false) => format!("{details} ({changes})"),
        (None, _) => changes,
    }
}

/// Render entries as CSV with every field quoted
pub fn to_csv<'a>(logs: impl IntoIterator<Item = &'a SystemLog>) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(vec![]);

    writer.write_record(EXPORT_COLUMNS)?;
    for log in logs {
        writer.write_record(project(log))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DeskError::SerializationError(format!("Failed to flush CSV: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| DeskError::SerializationError(format!("Invalid UTF-8 in CSV: {e}")))
}
