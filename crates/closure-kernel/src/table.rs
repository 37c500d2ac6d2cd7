//! Named, ordered collections of equal-length columns.
//!
//! Names and order are part of a table's shape; the attribute map is not.
//! Attributes hold incidental metadata (provenance markers, producer notes)
//! that two independently correct producers may disagree on.

use crate::column::{Column, ElementType};
use crate::error::TableError;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// A data frame: ordered names, one column per name, auxiliary attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableRepr", into = "TableRepr")]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    attributes: BTreeMap<String, Value>,
}

impl Table {
    /// Build a table, rejecting unpaired names and ragged columns.
    pub fn new(names: Vec<String>, columns: Vec<Column>) -> Result<Self, TableError> {
        if names.len() != columns.len() {
            return Err(TableError::NameCount {
                names: names.len(),
                columns: columns.len(),
            });
        }
        if let Some(first) = columns.first() {
            let expected = first.len();
            for (name, column) in names.iter().zip(&columns) {
                if column.len() != expected {
                    return Err(TableError::RaggedColumn {
                        name: name.clone(),
                        expected,
                        actual: column.len(),
                    });
                }
            }
        }
        Ok(Self {
            names,
            columns,
            attributes: BTreeMap::new(),
        })
    }

    /// Build a table from `(name, column)` pairs.
    pub fn from_columns<I, S>(pairs: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (S, Column)>,
        S: Into<String>,
    {
        let (names, columns): (Vec<String>, Vec<Column>) = pairs
            .into_iter()
            .map(|(name, column)| (name.into(), column))
            .unzip();
        Self::new(names, columns)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
    }

    pub fn ncol(&self) -> usize {
        self.columns.len()
    }

    pub fn nrow(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Element type of every column, in order.
    pub fn column_types(&self) -> Vec<ElementType> {
        self.columns.iter().map(Column::element_type).collect()
    }

    /// Whether the names are exactly `expected`, in order.
    pub fn has_names(&self, expected: &[&str]) -> bool {
        self.names.len() == expected.len()
            && self.names.iter().zip(expected).all(|(a, b)| a == b)
    }

    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// A copy without the first column called `name`.
    pub fn without_column(&self, name: &str) -> Self {
        let mut out = self.clone();
        if let Some(i) = out.names.iter().position(|n| n == name) {
            out.names.remove(i);
            out.columns.remove(i);
        }
        out
    }

    /// A copy with the first column called `from` renamed to `to`.
    pub fn with_renamed(&self, from: &str, to: &str) -> Self {
        let mut out = self.clone();
        if let Some(n) = out.names.iter_mut().find(|n| n.as_str() == from) {
            *n = to.to_string();
        }
        out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableRepr {
    columns: Vec<ColumnRepr>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ColumnRepr {
    name: String,
    #[serde(rename = "type")]
    element_type: ElementType,
    values: Vec<Value>,
}

impl TryFrom<TableRepr> for Table {
    type Error = TableError;

    fn try_from(repr: TableRepr) -> Result<Self, Self::Error> {
        let mut names = Vec::with_capacity(repr.columns.len());
        let mut columns = Vec::with_capacity(repr.columns.len());
        for col in repr.columns {
            columns.push(decode_column(&col)?);
            names.push(col.name);
        }
        let mut table = Table::new(names, columns)?;
        table.attributes = repr.attributes;
        Ok(table)
    }
}

impl From<Table> for TableRepr {
    fn from(table: Table) -> Self {
        let columns = table
            .names
            .into_iter()
            .zip(table.columns)
            .map(|(name, column)| ColumnRepr {
                name,
                element_type: column.element_type(),
                values: encode_column(&column),
            })
            .collect();
        Self {
            columns,
            attributes: table.attributes,
        }
    }
}

fn decode_column(repr: &ColumnRepr) -> Result<Column, TableError> {
    let bad = |value: &Value| TableError::ValueType {
        name: repr.name.clone(),
        element_type: repr.element_type,
        value: value.to_string(),
    };

    let column = match repr.element_type {
        ElementType::Integer => Column::Integer(
            repr.values
                .iter()
                .map(|v| match v {
                    Value::Null => Ok(None),
                    Value::Number(n) => n
                        .as_i64()
                        .and_then(|i| i32::try_from(i).ok())
                        .map(Some)
                        .ok_or_else(|| bad(v)),
                    _ => Err(bad(v)),
                })
                .collect::<Result<_, _>>()?,
        ),
        ElementType::Double => Column::Double(
            repr.values
                .iter()
                .map(|v| match v {
                    Value::Null => Ok(None),
                    Value::Number(n) => n.as_f64().map(Some).ok_or_else(|| bad(v)),
                    _ => Err(bad(v)),
                })
                .collect::<Result<_, _>>()?,
        ),
        ElementType::Character => Column::Character(
            repr.values
                .iter()
                .map(|v| match v {
                    Value::Null => Ok(None),
                    Value::String(s) => Ok(Some(s.clone())),
                    _ => Err(bad(v)),
                })
                .collect::<Result<_, _>>()?,
        ),
        ElementType::Logical => Column::Logical(
            repr.values
                .iter()
                .map(|v| match v {
                    Value::Null => Ok(None),
                    Value::Bool(b) => Ok(Some(*b)),
                    _ => Err(bad(v)),
                })
                .collect::<Result<_, _>>()?,
        ),
    };
    Ok(column)
}

// Non-finite doubles have no JSON form and are written as null.
fn encode_column(column: &Column) -> Vec<Value> {
    match column {
        Column::Integer(v) => v.iter().map(|x| x.map_or(Value::Null, Value::from)).collect(),
        Column::Double(v) => v
            .iter()
            .map(|x| {
                x.and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            })
            .collect(),
        Column::Character(v) => v
            .iter()
            .map(|x| x.clone().map_or(Value::Null, Value::String))
            .collect(),
        Column::Logical(v) => v.iter().map(|x| x.map_or(Value::Null, Value::Bool)).collect(),
    }
}
