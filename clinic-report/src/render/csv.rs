//! CSV output for the tabular part of each report

use anyhow::{Context, Result};

/// Write a header plus rows to a CSV string
pub fn to_csv(headers: &[&str], rows: &[Vec<String>]) -> Result<String> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer
        .write_record(headers)
        .context("Failed to write CSV header")?;
    for row in rows {
        writer.write_record(row).context("Failed to write CSV row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}
