//! Terminal output: table preview and summary statistics

mod describe;
mod preview;

pub use describe::{describe, print_describe, ColumnSummary};
pub use preview::print_preview;
