//! Derived column computation

use std::str::FromStr;

use crate::error::Result;
use crate::model::{CellValue, Column, Table};

/// Arithmetic operator in a derive expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    fn eval(self, a: f64, b: f64) -> f64 {
        match self {
            ArithOp::Add => a + b,
            ArithOp::Sub => a - b,
            ArithOp::Mul => a * b,
            ArithOp::Div => a / b,
        }
    }
}

/// Right-hand operand: another column or a numeric literal
#[derive(Debug, Clone)]
pub enum Operand {
    Column(String),
    Literal(f64),
}

/// A derived column: `name = lhs op rhs`, evaluated row-wise
#[derive(Debug, Clone)]
pub struct DeriveSpec {
    pub name: String,
    pub lhs: String,
    pub op: ArithOp,
    pub rhs: Operand,
}

impl FromStr for DeriveSpec {
    type Err = String;

    /// Parse expressions like `size_mb = size_kb / 1024` or
    /// `total = price * quantity`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (name, expr) = s
            .split_once('=')
            .ok_or_else(|| format!("derive must be name = expression, got '{}'", s))?;

        let name = name.trim();
        if name.is_empty() {
            return Err(format!("derive expression has no output name: '{}'", s));
        }

        let tokens: Vec<&str> = expr.split_whitespace().collect();
        let [lhs, op, rhs] = tokens.as_slice() else {
            return Err(format!(
                "derive expression must be 'column op operand', got '{}'",
                expr.trim()
            ));
        };

        let op = match *op {
            "+" => ArithOp::Add,
            "-" => ArithOp::Sub,
            "*" => ArithOp::Mul,
            "/" => ArithOp::Div,
            other => return Err(format!("unknown operator: '{}'", other)),
        };

        let rhs = match rhs.parse::<f64>() {
            Ok(v) => Operand::Literal(v),
            Err(_) => Operand::Column(rhs.to_string()),
        };

        Ok(DeriveSpec {
            name: name.to_string(),
            lhs: lhs.to_string(),
            op,
            rhs,
        })
    }
}

/// Append the derived column. Rows where an operand is null or non-numeric
/// produce a null.
pub fn derive(mut table: Table, spec: &DeriveSpec) -> Result<Table> {
    let lhs_idx = table.require_column(&spec.lhs)?;
    let rhs_idx = match &spec.rhs {
        Operand::Column(name) => Some(table.require_column(name)?),
        Operand::Literal(_) => None,
    };

    let values: Vec<CellValue> = (0..table.row_count())
        .map(|r| {
            let a = table.values(lhs_idx)[r].as_f64();
            let b = match (&spec.rhs, rhs_idx) {
                (Operand::Literal(v), _) => Some(*v),
                (Operand::Column(_), Some(idx)) => table.values(idx)[r].as_f64(),
                (Operand::Column(_), None) => None,
            };
            match (a, b) {
                (Some(a), Some(b)) => CellValue::Float(spec.op.eval(a, b)),
                _ => CellValue::Null,
            }
        })
        .collect();

    table.push_column(Column::new(&spec.name), values);
    table.infer_types();
    Ok(table)
}
