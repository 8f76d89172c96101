//! Group-by and aggregation

use std::str::FromStr;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::error::Result;
use crate::model::{CellValue, Column, Table};

/// Aggregate function applied to each group's values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// Non-null count
    Count,
    Sum,
    Mean,
    Min,
    Max,
    /// First value in the group; the identity aggregate
    First,
}

impl std::fmt::Display for Aggregate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Aggregate::Count => write!(f, "count"),
            Aggregate::Sum => write!(f, "sum"),
            Aggregate::Mean => write!(f, "mean"),
            Aggregate::Min => write!(f, "min"),
            Aggregate::Max => write!(f, "max"),
            Aggregate::First => write!(f, "first"),
        }
    }
}

/// An aggregate applied to a named column, e.g. `mean:rating`
#[derive(Debug, Clone)]
pub struct AggregateSpec {
    pub op: Aggregate,
    pub column: String,
}

impl AggregateSpec {
    /// Name of the output column. `first` keeps the source name, so
    /// re-grouping its own output is a no-op.
    pub fn output_name(&self) -> String {
        match self.op {
            Aggregate::First => self.column.clone(),
            op => format!("{}_{}", op, self.column),
        }
    }
}

impl FromStr for AggregateSpec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (op, column) = s
            .split_once(':')
            .ok_or_else(|| format!("aggregate must be op:column, got '{}'", s))?;

        let op = match op.trim() {
            "count" => Aggregate::Count,
            "sum" => Aggregate::Sum,
            "mean" | "avg" => Aggregate::Mean,
            "min" => Aggregate::Min,
            "max" => Aggregate::Max,
            "first" => Aggregate::First,
            other => return Err(format!("unknown aggregate: '{}'", other)),
        };

        let column = column.trim();
        if column.is_empty() {
            return Err(format!("aggregate '{}' is missing a column", s));
        }

        Ok(AggregateSpec {
            op,
            column: column.to_string(),
        })
    }
}

type GroupMap = IndexMap<Vec<CellValue>, Vec<usize>, FxBuildHasher>;

/// Group rows by the key columns (first-seen order) and aggregate
pub fn group_by(table: Table, keys: &[String], aggregates: &[AggregateSpec]) -> Result<Table> {
    let key_indices: Vec<usize> = keys
        .iter()
        .map(|k| table.require_column(k))
        .collect::<Result<_>>()?;
    let agg_indices: Vec<usize> = aggregates
        .iter()
        .map(|a| table.require_column(&a.column))
        .collect::<Result<_>>()?;

    let mut groups: GroupMap = IndexMap::default();
    for r in 0..table.row_count() {
        let key: Vec<CellValue> = key_indices
            .iter()
            .map(|&i| table.values(i)[r].clone())
            .collect();
        groups.entry(key).or_default().push(r);
    }

    let mut columns = Vec::with_capacity(keys.len() + aggregates.len());
    let mut data: Vec<Vec<CellValue>> = Vec::with_capacity(keys.len() + aggregates.len());

    for (pos, name) in keys.iter().enumerate() {
        columns.push(Column::new(name));
        data.push(groups.keys().map(|k| k[pos].clone()).collect());
    }

    for (spec, &idx) in aggregates.iter().zip(&agg_indices) {
        columns.push(Column::new(spec.output_name()));
        let values = table.values(idx);
        data.push(
            groups
                .values()
                .map(|rows| aggregate(spec.op, rows.iter().map(|&r| &values[r])))
                .collect(),
        );
    }

    let mut out = Table::from_parts(columns, data);
    out.infer_types();
    Ok(out)
}

fn aggregate<'a>(op: Aggregate, cells: impl Iterator<Item = &'a CellValue>) -> CellValue {
    match op {
        Aggregate::Count => CellValue::Int(cells.filter(|c| !c.is_null()).count() as i64),
        Aggregate::First => cells
            .into_iter()
            .next()
            .cloned()
            .unwrap_or(CellValue::Null),
        Aggregate::Sum => {
            // All-Int groups accumulate exactly in i64; a float value or an
            // i64 overflow switches the result to f64
            let mut n = 0usize;
            let mut int_sum: Option<i64> = Some(0);
            let mut float_sum = 0.0;
            for c in cells {
                let Some(v) = c.as_f64() else { continue };
                n += 1;
                float_sum += v;
                int_sum = match (int_sum, c) {
                    (Some(acc), CellValue::Int(i)) => acc.checked_add(*i),
                    _ => None,
                };
            }
            match (n, int_sum) {
                (0, _) => CellValue::Null,
                (_, Some(sum)) => CellValue::Int(sum),
                (_, None) => CellValue::Float(float_sum),
            }
        }
        Aggregate::Mean => {
            let mut sum = 0.0;
            let mut n = 0usize;
            for c in cells {
                if let Some(v) = c.as_f64() {
                    sum += v;
                    n += 1;
                }
            }
            if n == 0 {
                CellValue::Null
            } else {
                CellValue::Float(sum / n as f64)
            }
        }
        Aggregate::Min | Aggregate::Max => {
            let mut best: Option<CellValue> = None;
            for c in cells {
                if c.is_null() {
                    continue;
                }
                best = match best {
                    None => Some(c.clone()),
                    Some(b) => match c.compare(&b) {
                        Some(std::cmp::Ordering::Less) if op == Aggregate::Min => Some(c.clone()),
                        Some(std::cmp::Ordering::Greater) if op == Aggregate::Max => {
                            Some(c.clone())
                        }
                        _ => Some(b),
                    },
                };
            }
            best.unwrap_or(CellValue::Null)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TabError;

    fn sample() -> Table {
        let mut t = Table::new(vec![
            Column::new("category"),
            Column::new("installs"),
            Column::new("rating"),
        ]);
        t.push_row(vec!["games".into(), CellValue::Int(100), CellValue::Float(4.0)]);
        t.push_row(vec!["tools".into(), CellValue::Int(50), CellValue::Float(3.5)]);
        t.push_row(vec!["games".into(), CellValue::Int(300), CellValue::Float(4.5)]);
        t.push_row(vec!["tools".into(), CellValue::Int(10), CellValue::Null]);
        t.infer_types();
        t
    }

    fn specs(s: &[&str]) -> Vec<AggregateSpec> {
        s.iter().map(|a| a.parse().unwrap()).collect()
    }

    #[test]
    fn groups_preserve_first_seen_order() {
        let out = group_by(
            sample(),
            &["category".into()],
            &specs(&["sum:installs", "mean:rating", "count:rating"]),
        )
        .unwrap();

        assert_eq!(
            out.column_names(),
            vec!["category", "sum_installs", "mean_rating", "count_rating"]
        );
        assert_eq!(out.row_count(), 2);
        assert_eq!(out.cell(0, 0), Some(&CellValue::Str("games".into())));
        assert_eq!(out.cell(0, 1), Some(&CellValue::Int(400)));
        assert_eq!(out.cell(0, 2), Some(&CellValue::Float(4.25)));
        // Null rating not counted
        assert_eq!(out.cell(1, 3), Some(&CellValue::Int(1)));
    }

    #[test]
    fn min_max_skip_nulls() {
        let out = group_by(
            sample(),
            &["category".into()],
            &specs(&["min:rating", "max:rating"]),
        )
        .unwrap();

        assert_eq!(out.cell(1, 1), Some(&CellValue::Float(3.5)));
        assert_eq!(out.cell(1, 2), Some(&CellValue::Float(3.5)));
    }

    #[test]
    fn unknown_key_column_fails() {
        let err = group_by(sample(), &["nope".into()], &specs(&["sum:installs"])).unwrap_err();
        assert!(matches!(err, TabError::KeyNotFound { .. }));
    }

    #[test]
    fn int_sum_is_exact_beyond_f64_precision() {
        // 2^53 + 1 is not representable as f64; an i64 accumulator keeps it
        let big = 9_007_199_254_740_993i64;
        let mut t = Table::new(vec![Column::new("k"), Column::new("v")]);
        t.push_row(vec!["a".into(), CellValue::Int(big)]);
        t.push_row(vec!["a".into(), CellValue::Int(1)]);
        t.infer_types();

        let out = group_by(t, &["k".into()], &specs(&["sum:v"])).unwrap();
        assert_eq!(out.cell(0, 1), Some(&CellValue::Int(big + 1)));
    }

    #[test]
    fn int_sum_overflow_falls_back_to_float() {
        let mut t = Table::new(vec![Column::new("k"), Column::new("v")]);
        t.push_row(vec!["a".into(), CellValue::Int(i64::MAX)]);
        t.push_row(vec!["a".into(), CellValue::Int(i64::MAX)]);
        t.infer_types();

        let out = group_by(t, &["k".into()], &specs(&["sum:v"])).unwrap();
        match out.cell(0, 1) {
            Some(CellValue::Float(f)) => assert!(*f > i64::MAX as f64),
            other => panic!("expected float sum, got {other:?}"),
        }
    }

    #[test]
    fn first_aggregate_is_idempotent() {
        let keys = vec!["category".to_string()];
        let aggs = specs(&["first:installs"]);

        let once = group_by(sample(), &keys, &aggs).unwrap();
        let twice = group_by(once.clone(), &keys, &aggs).unwrap();

        assert_eq!(once.column_names(), twice.column_names());
        assert_eq!(once.row_count(), twice.row_count());
        for r in 0..once.row_count() {
            assert_eq!(once.row(r), twice.row(r));
        }
    }
}
