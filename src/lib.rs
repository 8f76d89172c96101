//! tabchart - load, transform, and chart tabular data
//!
//! A small batch pipeline over flat tabular files (CSV, JSON, Excel):
//! load into an in-memory table, apply declarative transforms, and render
//! a static chart, terminal preview, or summary.

pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod model;
pub mod render;
pub mod report;
pub mod transform;

pub use config::Config;
pub use error::{Result, TabError};
pub use model::Table;
pub use render::{ChartKind, ChartSpec};

/// Load the configured input and run its transforms
pub fn run_pipeline(config: &Config) -> Result<Table> {
    let table = loader::load(&config.input, config)?;
    transform::apply(table, &config.transforms)
}
