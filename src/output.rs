//! Output formatting and persistence for network summaries.
//!
//! Supports pretty-printing, JSON logging, and CSV history append.

use anyhow::Result;
use tracing::{debug, info};

use crate::analyzers::types::{NetworkSummary, SummaryRecord};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs the summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &NetworkSummary) {
    debug!("{:#?}", summary);
}

/// Logs the summary as pretty-printed JSON.
pub fn print_json(summary: &NetworkSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// Appends a [`SummaryRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &SummaryRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending summary history row");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // only on first write
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}
