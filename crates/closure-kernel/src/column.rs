//! Atomic vectors: the cells of a table and the scalars handed to checks.
//!
//! A [`Column`] is homogeneous. Every element is an `Option`, where `None` is
//! the missing-value marker. A column of length one doubles as a scalar.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// Runtime element type of a column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    /// Fixed-width (32-bit) signed integer.
    Integer,
    /// Floating point.
    Double,
    Character,
    Logical,
}

impl ElementType {
    /// Every numeric type: what a mean or SD argument may be.
    pub const NUMERIC: &'static [ElementType] = &[ElementType::Double, ElementType::Integer];

    /// Human-readable label used in failure messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Double => "floating-point",
            Self::Character => "character",
            Self::Logical => "logical",
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "integer" | "int" => Ok(Self::Integer),
            "double" | "floating-point" | "float" => Ok(Self::Double),
            "character" | "string" => Ok(Self::Character),
            "logical" | "bool" => Ok(Self::Logical),
            _ => Err(format!("unknown element type: {s}")),
        }
    }
}

/// A homogeneous vector with missing-value support.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Integer(Vec<Option<i32>>),
    Double(Vec<Option<f64>>),
    Character(Vec<Option<String>>),
    Logical(Vec<Option<bool>>),
}

impl Column {
    /// A length-one column holding the missing marker.
    pub fn missing(element_type: ElementType) -> Self {
        Self::all_missing(element_type, 1)
    }

    /// `len` missing values of the given type.
    pub fn all_missing(element_type: ElementType, len: usize) -> Self {
        match element_type {
            ElementType::Integer => Self::Integer(vec![None; len]),
            ElementType::Double => Self::Double(vec![None; len]),
            ElementType::Character => Self::Character(vec![None; len]),
            ElementType::Logical => Self::Logical(vec![None; len]),
        }
    }

    /// Infer a column from a JSON scalar or array, the way an untyped
    /// argument arrives from a config file or a request body.
    ///
    /// `null` is missing. Whole numbers in `i32` range are integers, other
    /// numbers are doubles. A lone or all-`null` input is logical. Arrays
    /// mixing strings, booleans, and numbers are coerced to character.
    pub fn from_json(value: &Value) -> Self {
        let items: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        let has = |pred: fn(&Value) -> bool| items.iter().any(|v| pred(*v));
        let kinds = [has(Value::is_string), has(Value::is_boolean), has(Value::is_number)]
            .iter()
            .filter(|present| **present)
            .count();
        let nested = has(|v| v.is_array() || v.is_object());

        if kinds > 1 || nested || has(Value::is_string) {
            return Self::Character(
                items
                    .iter()
                    .map(|v| match v {
                        Value::Null => None,
                        Value::String(s) => Some(s.clone()),
                        other => Some(other.to_string()),
                    })
                    .collect(),
            );
        }
        if has(Value::is_number) {
            let ints: Option<Vec<Option<i32>>> = items
                .iter()
                .map(|v| match v {
                    Value::Number(n) => n.as_i64().and_then(|i| i32::try_from(i).ok()).map(Some),
                    _ => Some(None),
                })
                .collect();
            return match ints {
                Some(ints) => Self::Integer(ints),
                None => Self::Double(items.iter().map(|v| v.as_f64()).collect()),
            };
        }
        Self::Logical(items.iter().map(|v| v.as_bool()).collect())
    }

    /// Integer column without missing values.
    pub fn integers(values: impl IntoIterator<Item = i32>) -> Self {
        Self::Integer(values.into_iter().map(Some).collect())
    }

    /// Double column without missing values.
    pub fn doubles(values: impl IntoIterator<Item = f64>) -> Self {
        Self::Double(values.into_iter().map(Some).collect())
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Integer(_) => ElementType::Integer,
            Self::Double(_) => ElementType::Double,
            Self::Character(_) => ElementType::Character,
            Self::Logical(_) => ElementType::Logical,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Integer(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::Character(v) => v.len(),
            Self::Logical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether element `index` is the missing marker.
    pub fn is_missing_at(&self, index: usize) -> bool {
        match self {
            Self::Integer(v) => matches!(v.get(index), Some(None)),
            Self::Double(v) => matches!(v.get(index), Some(None)),
            Self::Character(v) => matches!(v.get(index), Some(None)),
            Self::Logical(v) => matches!(v.get(index), Some(None)),
        }
    }

    pub fn has_missing(&self) -> bool {
        (0..self.len()).any(|i| self.is_missing_at(i))
    }

    pub fn as_integers(&self) -> Option<&[Option<i32>]> {
        match self {
            Self::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_doubles(&self) -> Option<&[Option<f64>]> {
        match self {
            Self::Double(v) => Some(v),
            _ => None,
        }
    }

    /// Exact equality where NaN equals NaN and missing equals missing.
    ///
    /// `PartialEq` follows IEEE semantics and so never treats a column holding
    /// NaN as equal to itself.
    pub fn identical(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Double(a), Self::Double(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| match (x, y) {
                        (Some(x), Some(y)) => x == y || (x.is_nan() && y.is_nan()),
                        (None, None) => true,
                        _ => false,
                    })
            }
            _ => self == other,
        }
    }

    /// A copy with elements in ascending order, missing values last.
    pub fn sorted(&self) -> Self {
        match self {
            Self::Integer(v) => Self::Integer(sorted_by(v, Ord::cmp)),
            Self::Double(v) => Self::Double(sorted_by(v, f64::total_cmp)),
            Self::Character(v) => Self::Character(sorted_by(v, Ord::cmp)),
            Self::Logical(v) => Self::Logical(sorted_by(v, Ord::cmp)),
        }
    }
}

fn sorted_by<T: Clone>(values: &[Option<T>], cmp: impl Fn(&T, &T) -> Ordering) -> Vec<Option<T>> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    out
}

impl From<i32> for Column {
    fn from(value: i32) -> Self {
        Self::Integer(vec![Some(value)])
    }
}

impl From<f64> for Column {
    fn from(value: f64) -> Self {
        Self::Double(vec![Some(value)])
    }
}

impl From<&str> for Column {
    fn from(value: &str) -> Self {
        Self::Character(vec![Some(value.to_string())])
    }
}

impl From<bool> for Column {
    fn from(value: bool) -> Self {
        Self::Logical(vec![Some(value)])
    }
}

impl From<Vec<i32>> for Column {
    fn from(values: Vec<i32>) -> Self {
        Self::integers(values)
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Self::doubles(values)
    }
}
