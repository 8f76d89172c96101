//! Column metadata and type information

use serde::Serialize;

/// Scalar type of a column, inferred from its cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum CellType {
    #[default]
    Null,
    Bool,
    Int,
    Float,
    Str,
    Date,
    DateTime,
    Mixed,
}

impl CellType {
    /// Widen the type to accommodate another observed type
    pub fn widen(self, other: CellType) -> CellType {
        if self == other {
            return self;
        }

        match (self, other) {
            (CellType::Null, t) | (t, CellType::Null) => t,
            (CellType::Int, CellType::Float) | (CellType::Float, CellType::Int) => CellType::Float,
            (CellType::Date, CellType::DateTime) | (CellType::DateTime, CellType::Date) => {
                CellType::DateTime
            }
            _ => CellType::Mixed,
        }
    }

    /// Whether cells of this type carry a numeric value usable on a chart axis
    pub fn is_numeric(self) -> bool {
        matches!(self, CellType::Int | CellType::Float)
    }
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellType::Null => write!(f, "null"),
            CellType::Bool => write!(f, "bool"),
            CellType::Int => write!(f, "int"),
            CellType::Float => write!(f, "float"),
            CellType::Str => write!(f, "string"),
            CellType::Date => write!(f, "date"),
            CellType::DateTime => write!(f, "datetime"),
            CellType::Mixed => write!(f, "mixed"),
        }
    }
}

/// Column metadata: header name plus inferred type
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub name: String,
    pub ctype: CellType,
}

impl Column {
    /// Create a column with an as-yet-unknown type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ctype: CellType::Null,
        }
    }

    /// Create a column with a known type
    pub fn with_type(name: impl Into<String>, ctype: CellType) -> Self {
        Self {
            name: name.into(),
            ctype,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.ctype.is_numeric()
    }
}
