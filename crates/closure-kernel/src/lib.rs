//! # CLOSURE Kernel
//!
//! Result-integrity layer for CLOSURE (Complete Listing of Original Samples
//! of Underlying Raw Evidence): the exhaustive enumeration of every integer
//! distribution of responses consistent with a reported sample size, scale
//! bounds, and rounded mean/SD.
//!
//! The kernel does not enumerate anything. It guards the hand-off between the
//! enumeration engine and everything downstream of it:
//!
//! - the tagged shapes the engine and its derived views must produce,
//! - a diagnosis of *why* a table fails to match that shape,
//! - a multiset comparator for cross-checking two independent enumerations.
//!
//! ## Architecture
//!
//! ```text
//! Column / Table            ← Atomic vectors and named frames
//!     │
//! ClosureData               ← Tagged payload: combine | pivot_longer | summarize | plain
//!     │
//! check_closure_*           ← Shape validation with classified diagnosis
//! check_scale / check_value ← Scalar preconditions
//!     │
//! ClosureFailure            ← Kind + structured fields + deterministic id
//!     │
//! CheckReport               ← Accepted / rejected envelope for callers
//! ```
//!
//! Every check is a pure function over borrowed, immutable input and returns
//! `Result<(), ClosureFailure>`.

pub mod column;
pub mod combine;
pub mod compare;
pub mod data;
pub mod error;
pub mod failure;
pub mod report;
pub mod scalar;
pub mod table;
pub mod views;

pub use column::{Column, ElementType};
pub use combine::check_closure_combine;
pub use compare::{
    first_sorted_mismatch, identical_except_attributes, identical_sorted_cols,
    locate_sorted_mismatch,
};
pub use data::{ClosureClass, ClosureData, ClosureInputs, add_class};
pub use error::TableError;
pub use failure::{
    ClosureFailure, FailureKind, abort_closure_data_altered, abort_not_closure_data,
};
pub use report::CheckReport;
pub use scalar::{check_scale, check_value};
pub use table::Table;
pub use views::{
    check_closure_pivot_longer_unaltered, check_closure_summarize_unaltered, is_seq_linear_basic,
};
