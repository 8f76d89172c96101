//! Excel workbook loader (xlsx, xls, ods)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime};

use crate::config::Config;
use crate::error::{Result, TabError};
use crate::model::{CellValue, Column, Table};

use super::{open_error, Loader};

/// Loader for spreadsheet workbooks. Reads the sheet named in the config,
/// or the first sheet otherwise.
pub struct ExcelLoader;

impl Loader for ExcelLoader {
    fn load(&self, path: &Path, config: &Config) -> Result<Table> {
        // calamine opens the path itself; probe it first so a missing file
        // surfaces as NotFound like every other loader
        std::fs::File::open(path).map_err(|e| open_error(path, e))?;

        let mut workbook = open_workbook_auto(path)
            .map_err(|e| TabError::parse(path, format!("failed to open workbook: {}", e)))?;

        let sheet_name = match config.sheet {
            Some(ref name) => name.clone(),
            None => {
                let sheets = workbook.sheet_names();
                match sheets.first() {
                    Some(first) => first.clone(),
                    None => return Err(TabError::parse(path, "workbook has no sheets")),
                }
            }
        };

        let range: Range<Data> = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| TabError::parse(path, format!("sheet '{}': {}", sheet_name, e)))?;

        range_to_table(path, range)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext, "xlsx" | "xls" | "ods" | "xlsm")
    }
}

fn range_to_table(path: &Path, range: Range<Data>) -> Result<Table> {
    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| TabError::parse(path, "sheet is empty"))?;

    let columns: Vec<Column> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = header_name(cell);
            if name.is_empty() {
                Column::new(format!("column_{}", i + 1))
            } else {
                Column::new(name)
            }
        })
        .collect();

    let mut table = Table::new(columns);
    for row in rows {
        let cells: Vec<CellValue> = row.iter().map(convert_cell).collect();
        table.push_row(cells);
    }

    table.infer_types();
    Ok(table)
}

fn header_name(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Null
            } else {
                CellValue::Str(s.clone())
            }
        }
        Data::Float(f) => {
            // Whole floats come back as ints so counts stay integral
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => parse_temporal(&dt.to_string()),
        Data::DateTimeIso(s) => parse_temporal(s),
        Data::DurationIso(s) => CellValue::Str(s.clone()),
        Data::Error(e) => CellValue::Str(format!("#{:?}", e)),
    }
}

fn parse_temporal(s: &str) -> CellValue {
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return CellValue::DateTime(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return CellValue::Date(d);
    }
    CellValue::Str(s.to_string())
}
