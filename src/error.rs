//! Error taxonomy for the load/transform/render pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, TabError>;

/// Errors surfaced by the pipeline. There is no recovery path: every
/// failure halts the run and is reported to the caller.
#[derive(Debug, Error)]
pub enum TabError {
    /// The input file does not exist
    #[error("input file not found: {path}")]
    NotFound { path: PathBuf },

    /// The input file exists but could not be parsed
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A transform referenced a column the table does not have
    #[error("column not found: {column}")]
    KeyNotFound { column: String },

    /// Chart generation failed (missing column, bad data, empty table)
    #[error("render failed: {message}")]
    Render { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TabError {
    /// Build a parse error for the given file
    pub fn parse(path: &std::path::Path, message: impl Into<String>) -> Self {
        TabError::Parse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Build a render error
    pub fn render(message: impl Into<String>) -> Self {
        TabError::Render {
            message: message.into(),
        }
    }

    /// Build a missing-column error
    pub fn key_not_found(column: impl Into<String>) -> Self {
        TabError::KeyNotFound {
            column: column.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_strings_name_the_failure() {
        let err = TabError::NotFound {
            path: PathBuf::from("data.csv"),
        };
        assert!(err.to_string().contains("not found"));

        let err = TabError::key_not_found("rating");
        assert_eq!(err.to_string(), "column not found: rating");

        let err = TabError::render("empty table");
        assert_eq!(err.to_string(), "render failed: empty table");

        let err = TabError::parse(std::path::Path::new("x.json"), "bad token");
        assert!(err.to_string().contains("x.json"));
        assert!(err.to_string().contains("bad token"));
    }
}
