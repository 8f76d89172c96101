//! Loader layer: read flat files into tables

mod csv;
mod excel;
mod json;

use std::path::Path;

use log::debug;

use crate::config::Config;
use crate::error::{Result, TabError};
use crate::model::Table;

pub use self::csv::CsvLoader;
pub use self::excel::ExcelLoader;
pub use self::json::JsonLoader;

/// Trait for reading a tabular file into a Table
pub trait Loader: Send + Sync {
    /// Read the file at `path` into a table
    fn load(&self, path: &Path, config: &Config) -> Result<Table>;

    /// Check whether this loader handles the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Dispatches to the right loader based on file extension, falling back to
/// content sniffing for files without a usable extension.
pub struct LoaderFactory {
    loaders: Vec<Box<dyn Loader>>,
}

impl Default for LoaderFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl LoaderFactory {
    pub fn new() -> Self {
        Self {
            loaders: vec![
                Box::new(CsvLoader),
                Box::new(JsonLoader),
                Box::new(ExcelLoader),
            ],
        }
    }

    /// Pick a loader for the given path
    pub fn get_loader(&self, path: &Path) -> Result<&dyn Loader> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .or_else(|| sniff_format(path).map(str::to_string))
            .unwrap_or_else(|| "csv".to_string());

        self.loaders
            .iter()
            .find(|l| l.supports_extension(&ext))
            .map(|l| l.as_ref())
            .ok_or_else(|| TabError::parse(path, format!("unsupported file format: {}", ext)))
    }

    /// Load a file with the appropriate loader
    pub fn load(&self, path: &Path, config: &Config) -> Result<Table> {
        if !path.exists() {
            return Err(TabError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let loader = self.get_loader(path)?;
        let table = loader.load(path, config)?;
        debug!(
            "loaded {}: {} rows x {} columns",
            path.display(),
            table.row_count(),
            table.column_count()
        );
        Ok(table)
    }
}

/// Load a file using the default factory
pub fn load(path: &Path, config: &Config) -> Result<Table> {
    LoaderFactory::new().load(path, config)
}

/// Map a file-open failure to the loader contract: a missing path is
/// `NotFound`, anything else stays an I/O error. Every loader goes through
/// this so the contract holds even when a loader is called directly.
pub(crate) fn open_error(path: &Path, e: std::io::Error) -> TabError {
    if e.kind() == std::io::ErrorKind::NotFound {
        TabError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        TabError::Io(e)
    }
}

/// Guess a format from leading file content
fn sniff_format(path: &Path) -> Option<&'static str> {
    use std::fs::File;
    use std::io::Read;

    let mut file = File::open(path).ok()?;
    let mut buffer = [0u8; 8];
    let n = file.read(&mut buffer).ok()?;
    if n < 4 {
        return Some("csv");
    }

    // xlsx is a ZIP container, legacy xls is an OLE compound file
    if &buffer[0..4] == b"PK\x03\x04" {
        return Some("xlsx");
    }
    if &buffer[0..4] == b"\xD0\xCF\x11\xE0" {
        return Some("xls");
    }

    let lead = buffer[..n]
        .iter()
        .copied()
        .find(|b| !b.is_ascii_whitespace());
    if matches!(lead, Some(b'[') | Some(b'{')) {
        return Some("json");
    }

    Some("csv")
}
