//! CSV/TSV file loader

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::config::Config;
use crate::error::{Result, TabError};
use crate::model::{CellValue, Column, Table};

use super::{open_error, Loader};

/// Loader for delimiter-separated text files with a header row
pub struct CsvLoader;

impl Loader for CsvLoader {
    fn load(&self, path: &Path, _config: &Config) -> Result<Table> {
        let file = File::open(path).map_err(|e| open_error(path, e))?;
        let reader = BufReader::new(file);

        let delimiter = match path.extension().and_then(|e| e.to_str()) {
            Some("tsv") => b'\t',
            _ => b',',
        };

        let mut csv_reader = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| TabError::parse(path, format!("failed to read header row: {}", e)))?
            .clone();

        let columns: Vec<Column> = headers.iter().map(Column::new).collect();
        let mut table = Table::new(columns);

        for (line_num, record) in csv_reader.records().enumerate() {
            // +2 for 1-indexing and the header line
            let record = record.map_err(|e| {
                TabError::parse(path, format!("bad record on line {}: {}", line_num + 2, e))
            })?;

            let cells: Vec<CellValue> = record.iter().map(CellValue::parse).collect();
            table.push_row(cells);
        }

        table.infer_types();
        Ok(table)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext, "csv" | "tsv" | "txt")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::model::CellType;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn counts_match_file_shape() {
        let f = write_temp("a,b,c\n1,2.5,x\n4,5.0,y\n");
        let table = CsvLoader.load(f.path(), &Config::default()).unwrap();

        assert_eq!(table.column_count(), 3);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns()[0].ctype, CellType::Int);
        assert_eq!(table.columns()[1].ctype, CellType::Float);
        assert_eq!(table.columns()[2].ctype, CellType::Str);
    }

    #[test]
    fn short_rows_are_padded() {
        let f = write_temp("a,b\n1\n2,3\n");
        let table = CsvLoader.load(f.path(), &Config::default()).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, 1), Some(&CellValue::Null));
    }

    #[test]
    fn missing_file_is_not_found() {
        // Both through the factory and the loader itself
        let err = super::super::load(Path::new("no/such/file.csv"), &Config::default())
            .unwrap_err();
        assert!(matches!(err, TabError::NotFound { .. }));

        let err = CsvLoader
            .load(Path::new("no/such/file.csv"), &Config::default())
            .unwrap_err();
        assert!(matches!(err, TabError::NotFound { .. }));
    }
}
