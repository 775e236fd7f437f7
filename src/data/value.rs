use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single primitive field in a raw record, or a projected row cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Bool(bool),
    /// Nested values: handle lists, `[sort, text]` date pairs
    List(Vec<FieldValue>),
    Null,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(values) => Some(values),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::List(values) => {
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                Ok(())
            }
            FieldValue::Null => write!(f, ""),
        }
    }
}

/// Total ordering over field values, used for display sorting.
/// Sort-key projectors keep each column's type consistent; the cross-type
/// arms give a deterministic fallback order rather than a panic.
pub fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
        (FieldValue::Str(a), FieldValue::Str(b)) => a.cmp(b),
        (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
        (FieldValue::List(a), FieldValue::List(b)) => {
            for (va, vb) in a.iter().zip(b.iter()) {
                let cmp = compare_values(va, vb);
                if cmp != Ordering::Equal {
                    return cmp;
                }
            }
            a.len().cmp(&b.len())
        }

        // Null sorts before everything
        (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
        (FieldValue::Null, _) => Ordering::Less,
        (_, FieldValue::Null) => Ordering::Greater,

        // Cross-type order: Null < Bool < Int < Str < List
        (FieldValue::Bool(_), _) => Ordering::Less,
        (_, FieldValue::Bool(_)) => Ordering::Greater,
        (FieldValue::Int(_), _) => Ordering::Less,
        (_, FieldValue::Int(_)) => Ordering::Greater,
        (FieldValue::Str(_), _) => Ordering::Less,
        (_, FieldValue::Str(_)) => Ordering::Greater,
    }
}
