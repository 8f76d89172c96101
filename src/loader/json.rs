//! JSON array-of-records loader

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use indexmap::IndexSet;
use serde_json::Value;

use crate::config::Config;
use crate::error::{Result, TabError};
use crate::model::{CellValue, Column, Table};

use super::{open_error, Loader};

/// Loader for JSON files holding an array of flat objects
pub struct JsonLoader;

impl Loader for JsonLoader {
    fn load(&self, path: &Path, _config: &Config) -> Result<Table> {
        let file = File::open(path).map_err(|e| open_error(path, e))?;
        let reader = BufReader::new(file);

        let value: Value = serde_json::from_reader(reader)
            .map_err(|e| TabError::parse(path, format!("invalid JSON: {}", e)))?;

        let array = match value {
            Value::Array(arr) => arr,
            Value::Object(_) => vec![value],
            _ => return Err(TabError::parse(path, "JSON must be an array or object")),
        };

        // Union of keys across all objects, in first-seen order
        let mut column_names: IndexSet<String> = IndexSet::new();
        for item in &array {
            if let Value::Object(obj) = item {
                for key in obj.keys() {
                    column_names.insert(key.clone());
                }
            }
        }
        if column_names.is_empty() {
            return Err(TabError::parse(path, "no object keys found in JSON array"));
        }

        let columns: Vec<Column> = column_names.iter().map(Column::new).collect();
        let mut table = Table::new(columns);

        for item in &array {
            let cells: Vec<CellValue> = match item {
                Value::Object(obj) => column_names
                    .iter()
                    .map(|key| json_value_to_cell(obj.get(key)))
                    .collect(),
                other => vec![json_value_to_cell(Some(other))],
            };
            table.push_row(cells);
        }

        table.infer_types();
        Ok(table)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext, "json")
    }
}

fn json_value_to_cell(value: Option<&Value>) -> CellValue {
    match value {
        None | Some(Value::Null) => CellValue::Null,
        Some(Value::Bool(b)) => CellValue::Bool(*b),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                CellValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Str(n.to_string())
            }
        }
        // Strings go through the scalar parser so dates come out typed
        Some(Value::String(s)) => match CellValue::parse(s) {
            CellValue::Date(d) => CellValue::Date(d),
            CellValue::DateTime(dt) => CellValue::DateTime(dt),
            _ => CellValue::Str(s.clone()),
        },
        // Nested structures are kept as their JSON text
        Some(v @ Value::Array(_)) | Some(v @ Value::Object(_)) => {
            CellValue::Str(serde_json::to_string(v).unwrap_or_default())
        }
    }
}
