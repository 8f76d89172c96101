//! Pipeline configuration

use std::path::PathBuf;

use crate::transform::Transform;

/// Configuration for one pipeline run: where to load from and which
/// transforms to apply, in order.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Path to the input file
    pub input: PathBuf,
    /// For workbooks: which sheet to read (first sheet otherwise)
    pub sheet: Option<String>,
    /// Transforms applied after loading, in order
    pub transforms: Vec<Transform>,
}

impl Config {
    /// Create a config for the given input file
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    /// Set the workbook sheet to read
    pub fn with_sheet(mut self, sheet: Option<String>) -> Self {
        self.sheet = sheet;
        self
    }

    /// Set the transform sequence
    pub fn with_transforms(mut self, transforms: Vec<Transform>) -> Self {
        self.transforms = transforms;
        self
    }

    /// Append one transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }
}
