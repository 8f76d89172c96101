//! In-memory tabular data model

mod schema;
mod table;

pub use schema::{CellType, Column};
pub use table::{CellValue, Table};
