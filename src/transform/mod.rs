//! Declarative table transforms
//!
//! Every operation is a pure function from an input table to an output
//! table; referencing a column the table does not have fails with
//! `KeyNotFound`, and the equal-column-length invariant holds on every
//! output.

mod derive;
mod filter;
mod group;

use log::debug;

use crate::error::Result;
use crate::model::{CellValue, Column, Table};

pub use derive::{ArithOp, DeriveSpec, Operand};
pub use filter::{FilterOp, Predicate};
pub use group::{group_by, Aggregate, AggregateSpec};

/// A single declarative operation on a table
#[derive(Debug, Clone)]
pub enum Transform {
    /// Project the named columns, in the given order
    Select { columns: Vec<String> },
    /// Keep rows whose cell satisfies the predicate
    Filter(Predicate),
    /// Group rows by key columns and aggregate value columns
    GroupBy {
        keys: Vec<String>,
        aggregates: Vec<AggregateSpec>,
    },
    /// Append a column computed row-wise from existing columns
    Derive(DeriveSpec),
    /// Sort rows by a column, nulls last
    Sort { column: String, descending: bool },
    /// Keep only the first `rows` rows
    Head { rows: usize },
    /// Drop rows with a null in the given column, or in any column
    DropNulls { column: Option<String> },
    /// Replace nulls in a column with a constant
    FillNulls { column: String, value: CellValue },
}

/// Run a sequence of transforms over a table
pub fn apply(table: Table, transforms: &[Transform]) -> Result<Table> {
    let mut table = table;
    for t in transforms {
        let before = table.row_count();
        table = apply_one(table, t)?;
        debug!(
            "{}: {} rows -> {} rows, {} columns",
            t.name(),
            before,
            table.row_count(),
            table.column_count()
        );
    }
    Ok(table)
}

fn apply_one(table: Table, transform: &Transform) -> Result<Table> {
    match transform {
        Transform::Select { columns } => select(table, columns),
        Transform::Filter(pred) => filter::filter(table, pred),
        Transform::GroupBy { keys, aggregates } => group_by(table, keys, aggregates),
        Transform::Derive(spec) => derive::derive(table, spec),
        Transform::Sort { column, descending } => sort(table, column, *descending),
        Transform::Head { rows } => {
            let mut table = table;
            table.truncate_rows(*rows);
            Ok(table)
        }
        Transform::DropNulls { column } => drop_nulls(table, column.as_deref()),
        Transform::FillNulls { column, value } => fill_nulls(table, column, value),
    }
}

impl Transform {
    fn name(&self) -> &'static str {
        match self {
            Transform::Select { .. } => "select",
            Transform::Filter(_) => "filter",
            Transform::GroupBy { .. } => "group-by",
            Transform::Derive(_) => "derive",
            Transform::Sort { .. } => "sort",
            Transform::Head { .. } => "head",
            Transform::DropNulls { .. } => "drop-nulls",
            Transform::FillNulls { .. } => "fill-nulls",
        }
    }
}

/// Project named columns into a new table
fn select(table: Table, columns: &[String]) -> Result<Table> {
    let indices: Vec<usize> = columns
        .iter()
        .map(|name| table.require_column(name))
        .collect::<Result<_>>()?;

    let out_columns: Vec<Column> = indices.iter().map(|&i| table.columns()[i].clone()).collect();
    let data: Vec<Vec<CellValue>> = indices.iter().map(|&i| table.values(i).to_vec()).collect();

    Ok(Table::from_parts(out_columns, data))
}

/// Sort rows by one column. Cells that do not compare (nulls, mixed types)
/// sink to the end regardless of direction.
fn sort(mut table: Table, column: &str, descending: bool) -> Result<Table> {
    let idx = table.require_column(column)?;

    let mut perm: Vec<usize> = (0..table.row_count()).collect();
    {
        let values = table.values(idx);
        perm.sort_by(|&a, &b| {
            let (va, vb) = (&values[a], &values[b]);
            match (va.is_null(), vb.is_null()) {
                (true, true) => std::cmp::Ordering::Equal,
                (true, false) => std::cmp::Ordering::Greater,
                (false, true) => std::cmp::Ordering::Less,
                (false, false) => {
                    let ord = va.compare(vb).unwrap_or(std::cmp::Ordering::Equal);
                    if descending {
                        ord.reverse()
                    } else {
                        ord
                    }
                }
            }
        });
    }

    table.reorder_rows(&perm);
    Ok(table)
}

fn drop_nulls(mut table: Table, column: Option<&str>) -> Result<Table> {
    let keep: Vec<bool> = match column {
        Some(name) => {
            let idx = table.require_column(name)?;
            table.values(idx).iter().map(|v| !v.is_null()).collect()
        }
        None => table
            .rows()
            .map(|row| row.iter().all(|v| !v.is_null()))
            .collect(),
    };

    table.retain_rows(&keep);
    Ok(table)
}

fn fill_nulls(mut table: Table, column: &str, value: &CellValue) -> Result<Table> {
    let idx = table.require_column(column)?;
    for row in 0..table.row_count() {
        if table.cell(row, idx).is_some_and(CellValue::is_null) {
            table.set_cell(row, idx, value.clone());
        }
    }
    table.infer_types();
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TabError;
    use crate::model::Column;

    fn sample() -> Table {
        let mut t = Table::new(vec![Column::new("name"), Column::new("score")]);
        t.push_row(vec!["carol".into(), CellValue::Int(7)]);
        t.push_row(vec!["alice".into(), CellValue::Null]);
        t.push_row(vec!["bob".into(), CellValue::Int(3)]);
        t.infer_types();
        t
    }

    #[test]
    fn select_projects_in_order() {
        let out = select(sample(), &["score".into(), "name".into()]).unwrap();
        assert_eq!(out.column_names(), vec!["score", "name"]);
        assert_eq!(out.row_count(), 3);
    }

    #[test]
    fn select_unknown_column_fails() {
        let err = select(sample(), &["missing".into()]).unwrap_err();
        assert!(matches!(err, TabError::KeyNotFound { column } if column == "missing"));
    }

    #[test]
    fn sort_puts_nulls_last() {
        let out = sort(sample(), "score", false).unwrap();
        let scores = out.column_values("score").unwrap();
        assert_eq!(scores[0], CellValue::Int(3));
        assert_eq!(scores[1], CellValue::Int(7));
        assert!(scores[2].is_null());
    }

    #[test]
    fn drop_and_fill_nulls() {
        let out = drop_nulls(sample(), Some("score")).unwrap();
        assert_eq!(out.row_count(), 2);

        let out = fill_nulls(sample(), "score", &CellValue::Int(0)).unwrap();
        assert_eq!(out.row_count(), 3);
        assert!(out.column_values("score").unwrap().iter().all(|v| !v.is_null()));
    }

    #[test]
    fn invariant_holds_after_every_transform() {
        let transforms = vec![
            Transform::FillNulls {
                column: "score".into(),
                value: CellValue::Int(0),
            },
            Transform::Sort {
                column: "score".into(),
                descending: true,
            },
            Transform::Head { rows: 2 },
            Transform::Select {
                columns: vec!["name".into()],
            },
        ];

        let mut table = sample();
        for t in &transforms {
            table = apply_one(table, t).unwrap();
            for i in 0..table.column_count() {
                assert_eq!(table.values(i).len(), table.row_count());
            }
        }
    }
}
