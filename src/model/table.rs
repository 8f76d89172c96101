//! Table and cell value structures

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::{Result, TabError};

use super::schema::{CellType, Column};

/// A single scalar value held by a table cell
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            // Bit comparison keeps Eq consistent with Hash (NaN == NaN)
            (CellValue::Float(a), CellValue::Float(b)) => a.to_bits() == b.to_bits(),
            (CellValue::Str(a), CellValue::Str(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Null => {}
            CellValue::Bool(b) => b.hash(state),
            CellValue::Int(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Str(s) => s.hash(state),
            CellValue::Date(d) => d.hash(state),
            CellValue::DateTime(dt) => dt.hash(state),
        }
    }
}

impl CellValue {
    /// Parse a raw string into the narrowest matching value
    pub fn parse(s: &str) -> CellValue {
        let trimmed = s.trim();

        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed == "NA"
        {
            return CellValue::Null;
        }

        if trimmed.eq_ignore_ascii_case("true") {
            return CellValue::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return CellValue::Bool(false);
        }

        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return CellValue::Float(f);
        }

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return CellValue::Date(date);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
            return CellValue::DateTime(dt);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
            return CellValue::DateTime(dt);
        }

        CellValue::Str(trimmed.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The scalar type of this cell
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Null => CellType::Null,
            CellValue::Bool(_) => CellType::Bool,
            CellValue::Int(_) => CellType::Int,
            CellValue::Float(_) => CellType::Float,
            CellValue::Str(_) => CellType::Str,
            CellValue::Date(_) => CellType::Date,
            CellValue::DateTime(_) => CellType::DateTime,
        }
    }

    /// Ordering between two cells where one exists. Numeric values compare
    /// across Int/Float; nulls and mismatched types do not compare.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        if let (Some(a), Some(b)) = (self.as_f64(), other.as_f64()) {
            return a.partial_cmp(&b);
        }
        match (self, other) {
            (CellValue::Str(a), CellValue::Str(b)) => Some(a.cmp(b)),
            (CellValue::Bool(a), CellValue::Bool(b)) => Some(a.cmp(b)),
            (CellValue::Date(a), CellValue::Date(b)) => Some(a.cmp(b)),
            (CellValue::DateTime(a), CellValue::DateTime(b)) => Some(a.cmp(b)),
            (CellValue::Date(a), CellValue::DateTime(b)) => {
                a.and_hms_opt(0, 0, 0).map(|adt| adt.cmp(b))
            }
            (CellValue::DateTime(a), CellValue::Date(b)) => {
                b.and_hms_opt(0, 0, 0).map(|bdt| a.cmp(&bdt))
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => write!(f, ""),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Str(s) => write!(f, "{}", s),
            CellValue::Date(d) => write!(f, "{}", d),
            CellValue::DateTime(dt) => write!(f, "{}", dt),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Str(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Str(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// An ordered collection of equal-length named columns
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
    /// One value vector per column, all the same length
    data: Vec<Vec<CellValue>>,
}

impl Table {
    /// Create an empty table with the given column definitions
    pub fn new(columns: Vec<Column>) -> Self {
        let data = columns.iter().map(|_| Vec::new()).collect();
        Self { columns, data }
    }

    /// Assemble a table from parallel column vectors. Callers guarantee the
    /// vectors are equal length.
    pub(crate) fn from_parts(columns: Vec<Column>, data: Vec<Vec<CellValue>>) -> Self {
        debug_assert_eq!(columns.len(), data.len());
        debug_assert!(data.windows(2).all(|w| w[0].len() == w[1].len()));
        Self { columns, data }
    }

    /// Append a row. Short rows are padded with nulls, long rows truncated,
    /// so columns stay equal length.
    pub fn push_row(&mut self, mut cells: Vec<CellValue>) {
        cells.resize(self.columns.len(), CellValue::Null);
        for (col, cell) in self.data.iter_mut().zip(cells) {
            col.push(cell);
        }
    }

    pub fn row_count(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Position of a column by name, failing with `KeyNotFound`
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| TabError::key_not_found(name))
    }

    /// Values of the column at `idx`
    pub fn values(&self, idx: usize) -> &[CellValue] {
        &self.data[idx]
    }

    /// Values of a named column, failing with `KeyNotFound`
    pub fn column_values(&self, name: &str) -> Result<&[CellValue]> {
        Ok(&self.data[self.require_column(name)?])
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.data.get(col).and_then(|c| c.get(row))
    }

    /// Borrow one row across all columns
    pub fn row(&self, r: usize) -> Vec<&CellValue> {
        self.data.iter().map(|col| &col[r]).collect()
    }

    /// Iterate rows in order
    pub fn rows(&self) -> impl Iterator<Item = Vec<&CellValue>> + '_ {
        (0..self.row_count()).map(move |r| self.row(r))
    }

    /// Keep only rows flagged true in the mask
    pub fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.row_count());
        for col in &mut self.data {
            let mut i = 0;
            col.retain(|_| {
                let k = keep[i];
                i += 1;
                k
            });
        }
    }

    /// Drop all rows past the first `n`
    pub fn truncate_rows(&mut self, n: usize) {
        for col in &mut self.data {
            col.truncate(n);
        }
    }

    /// Rearrange rows according to a permutation of row indices
    pub fn reorder_rows(&mut self, perm: &[usize]) {
        debug_assert_eq!(perm.len(), self.row_count());
        for col in &mut self.data {
            *col = perm.iter().map(|&i| col[i].clone()).collect();
        }
    }

    /// Append a column. The value vector is padded or truncated to the
    /// current row count.
    pub fn push_column(&mut self, column: Column, mut values: Vec<CellValue>) {
        if !self.columns.is_empty() {
            values.resize(self.row_count(), CellValue::Null);
        }
        self.columns.push(column);
        self.data.push(values);
    }

    /// Replace one cell in place
    pub fn set_cell(&mut self, row: usize, col: usize, value: CellValue) {
        if let Some(c) = self.data.get_mut(col).and_then(|c| c.get_mut(row)) {
            *c = value;
        }
    }

    /// Recompute each column's type by widening over its cells
    pub fn infer_types(&mut self) {
        for (col, values) in self.columns.iter_mut().zip(&self.data) {
            let mut inferred = CellType::Null;
            for v in values {
                inferred = inferred.widen(v.cell_type());
            }
            col.ctype = inferred;
        }
    }
}
