//! Error types for malformed tables.
//!
//! These are construction errors: a [`Table`](crate::Table) that cannot exist.
//! A table that exists but has the wrong shape is a
//! [`ClosureFailure`](crate::ClosureFailure) instead.

use crate::column::ElementType;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// Names and columns are not paired one to one.
    #[error("name count mismatch: {names} names for {columns} columns")]
    NameCount { names: usize, columns: usize },

    /// A column's length differs from the first column's.
    #[error("column `{name}` has {actual} rows, expected {expected}")]
    RaggedColumn {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// A serialized value does not fit the declared element type.
    #[error("column `{name}` declares type {element_type} but holds {value}")]
    ValueType {
        name: String,
        element_type: ElementType,
        value: String,
    },
}
