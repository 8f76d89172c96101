//! Row filtering by predicate

use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::Result;
use crate::model::{CellValue, Table};

/// Comparison operator in a filter predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Contains,
}

/// A row predicate: `column op value`
#[derive(Debug, Clone)]
pub struct Predicate {
    pub column: String,
    pub op: FilterOp,
    pub value: CellValue,
}

impl Predicate {
    /// Whether a cell satisfies the predicate. Nulls never match.
    pub fn matches(&self, cell: &CellValue) -> bool {
        if cell.is_null() {
            return false;
        }

        match self.op {
            FilterOp::Contains => match (cell, &self.value) {
                (CellValue::Str(haystack), CellValue::Str(needle)) => haystack.contains(needle),
                (haystack, needle) => haystack.to_string().contains(&needle.to_string()),
            },
            op => match cell.compare(&self.value) {
                Some(ord) => match op {
                    FilterOp::Eq => ord == Ordering::Equal,
                    FilterOp::Ne => ord != Ordering::Equal,
                    FilterOp::Gt => ord == Ordering::Greater,
                    FilterOp::Ge => ord != Ordering::Less,
                    FilterOp::Lt => ord == Ordering::Less,
                    FilterOp::Le => ord != Ordering::Greater,
                    FilterOp::Contains => unreachable!(),
                },
                // Incomparable types only ever match a "not equal" test
                None => op == FilterOp::Ne,
            },
        }
    }
}

impl FromStr for Predicate {
    type Err = String;

    /// Parse predicates of the form `rating >= 4.2` or `name contains foo`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // Two-character operators first so ">=" does not parse as ">"
        const OPS: [(&str, FilterOp); 8] = [
            (" contains ", FilterOp::Contains),
            (">=", FilterOp::Ge),
            ("<=", FilterOp::Le),
            ("!=", FilterOp::Ne),
            ("==", FilterOp::Eq),
            (">", FilterOp::Gt),
            ("<", FilterOp::Lt),
            ("=", FilterOp::Eq),
        ];

        for (token, op) in OPS {
            if let Some(pos) = s.find(token) {
                let column = s[..pos].trim();
                let raw = s[pos + token.len()..].trim();
                if column.is_empty() || raw.is_empty() {
                    return Err(format!("incomplete filter expression: '{}'", s));
                }

                let raw = raw
                    .strip_prefix('"')
                    .and_then(|r| r.strip_suffix('"'))
                    .unwrap_or(raw);
                let value = match op {
                    FilterOp::Contains => CellValue::Str(raw.to_string()),
                    _ => CellValue::parse(raw),
                };

                return Ok(Predicate {
                    column: column.to_string(),
                    op,
                    value,
                });
            }
        }

        Err(format!(
            "no comparison operator in filter expression: '{}'",
            s
        ))
    }
}

/// Keep only rows satisfying the predicate
pub fn filter(mut table: Table, pred: &Predicate) -> Result<Table> {
    let idx = table.require_column(&pred.column)?;
    let keep: Vec<bool> = table.values(idx).iter().map(|v| pred.matches(v)).collect();
    table.retain_rows(&keep);
    Ok(table)
}
