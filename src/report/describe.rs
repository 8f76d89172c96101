//! Per-column summary statistics

use rustc_hash::FxHashSet;
use std::hash::{Hash, Hasher};

use tabled::settings::Style;
use tabled::Tabled;

use crate::model::{CellValue, Table};

/// Summary of one column, in display form. Statistics that do not apply
/// (mean of a string column, std of a single value) show as "-".
#[derive(Debug, Tabled)]
pub struct ColumnSummary {
    pub column: String,
    #[tabled(rename = "type")]
    pub ctype: String,
    pub count: usize,
    pub nulls: usize,
    pub distinct: usize,
    pub min: String,
    pub max: String,
    pub mean: String,
    pub std: String,
}

/// Compute summaries for every column
pub fn describe(table: &Table) -> Vec<ColumnSummary> {
    table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, col)| summarize(&col.name, col.ctype.to_string(), table.values(i)))
        .collect()
}

/// Print the summaries as an aligned table
pub fn print_describe(table: &Table) {
    let summaries = describe(table);
    let mut rendered = tabled::Table::new(&summaries);
    rendered.with(Style::sharp());
    println!("{}", rendered);
}

fn summarize(name: &str, ctype: String, values: &[CellValue]) -> ColumnSummary {
    let nulls = values.iter().filter(|v| v.is_null()).count();
    let count = values.len() - nulls;

    let mut seen: FxHashSet<u64> = FxHashSet::default();
    for v in values.iter().filter(|v| !v.is_null()) {
        let mut hasher = rustc_hash::FxHasher::default();
        v.hash(&mut hasher);
        seen.insert(hasher.finish());
    }

    let numeric: Vec<f64> = values.iter().filter_map(CellValue::as_f64).collect();
    let (mean, std) = if numeric.is_empty() {
        (None, None)
    } else {
        let n = numeric.len() as f64;
        let mean = numeric.iter().sum::<f64>() / n;
        // Sample standard deviation, undefined for a single value
        let std = if numeric.len() > 1 {
            let var = numeric.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
            Some(var.sqrt())
        } else {
            None
        };
        (Some(mean), std)
    };

    let mut min: Option<&CellValue> = None;
    let mut max: Option<&CellValue> = None;
    for v in values.iter().filter(|v| !v.is_null()) {
        if min.map_or(true, |m| v.compare(m) == Some(std::cmp::Ordering::Less)) {
            min = Some(v);
        }
        if max.map_or(true, |m| v.compare(m) == Some(std::cmp::Ordering::Greater)) {
            max = Some(v);
        }
    }

    ColumnSummary {
        column: name.to_string(),
        ctype,
        count,
        nulls,
        distinct: seen.len(),
        min: min.map_or_else(|| "-".to_string(), CellValue::to_string),
        max: max.map_or_else(|| "-".to_string(), CellValue::to_string),
        mean: mean.map_or_else(|| "-".to_string(), |v| format!("{:.4}", v)),
        std: std.map_or_else(|| "-".to_string(), |v| format!("{:.4}", v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    #[test]
    fn numeric_column_statistics() {
        let mut t = Table::new(vec![Column::new("v")]);
        for i in [2i64, 4, 4, 4, 5, 5, 7, 9] {
            t.push_row(vec![CellValue::Int(i)]);
        }
        t.infer_types();

        let s = &describe(&t)[0];
        assert_eq!(s.count, 8);
        assert_eq!(s.nulls, 0);
        assert_eq!(s.distinct, 5);
        assert_eq!(s.min, "2");
        assert_eq!(s.max, "9");
        assert_eq!(s.mean, "5.0000");
        // Sample std of the classic example set
        assert_eq!(s.std, "2.1381");
    }

    #[test]
    fn string_column_skips_numeric_stats() {
        let mut t = Table::new(vec![Column::new("name")]);
        t.push_row(vec!["b".into()]);
        t.push_row(vec!["a".into()]);
        t.push_row(vec![CellValue::Null]);
        t.infer_types();

        let s = &describe(&t)[0];
        assert_eq!(s.count, 2);
        assert_eq!(s.nulls, 1);
        assert_eq!(s.min, "a");
        assert_eq!(s.max, "b");
        assert_eq!(s.mean, "-");
        assert_eq!(s.std, "-");
    }
}
