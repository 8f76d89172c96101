//! Export the transformed table back to disk

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use indexmap::IndexMap;
use log::debug;

use crate::error::{Result, TabError};
use crate::model::{CellValue, Table};

/// Write the table to `path`, picking the format from the extension
/// (`.json` for an array of records, anything else CSV).
pub fn export(table: &Table, path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => write_json(table, path)?,
        _ => write_csv(table, path)?,
    }
    debug!("exported {} rows to {}", table.row_count(), path.display());
    Ok(())
}

/// Write the table as CSV with a header row
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let mut writer = ::csv::Writer::from_path(path)
        .map_err(|e| TabError::parse(path, format!("cannot create CSV writer: {}", e)))?;

    writer
        .write_record(table.column_names())
        .map_err(|e| TabError::parse(path, e.to_string()))?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|cell| cell.to_string()))
            .map_err(|e| TabError::parse(path, e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| TabError::parse(path, e.to_string()))?;
    Ok(())
}

/// Write the table as a JSON array of records, columns in table order
pub fn write_json(table: &Table, path: &Path) -> Result<()> {
    let names = table.column_names();
    let records: Vec<IndexMap<&str, &CellValue>> = table
        .rows()
        .map(|row| names.iter().copied().zip(row).collect())
        .collect();

    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &records)
        .map_err(|e| TabError::parse(path, e.to_string()))?;
    Ok(())
}
