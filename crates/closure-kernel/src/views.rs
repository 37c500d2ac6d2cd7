//! Shape checks for the derived views: long format and summary.
//!
//! Unlike the combine check, these only answer pass/fail. Any broken
//! invariant is reported as [`FailureKind::DataAltered`] for the view; the
//! specific invariant is logged at debug level.
//!
//! [`FailureKind::DataAltered`]: crate::FailureKind::DataAltered

use crate::column::ElementType;
use crate::data::ClosureData;
use crate::failure::{ClosureFailure, abort_closure_data_altered};

const PIVOT_KIND: &str = "long-format";
const PIVOT_PRODUCER: &str = "closure_pivot_longer";
const PIVOT_NAMES: [&str; 2] = ["n", "value"];
const PIVOT_TYPES: [ElementType; 2] = [ElementType::Integer, ElementType::Integer];

const SUMMARY_KIND: &str = "summary";
const SUMMARY_PRODUCER: &str = "closure_summarize";
const SUMMARY_NAMES: [&str; 3] = ["value", "f_absolute", "f_relative"];
const SUMMARY_TYPES: [ElementType; 3] = [
    ElementType::Integer,
    ElementType::Integer,
    ElementType::Double,
];

/// Check that `data` is unaltered `closure_pivot_longer()` output: a nested
/// `results` table with integer columns `n` and `value`, in that order.
pub fn check_closure_pivot_longer_unaltered(data: &ClosureData) -> Result<(), ClosureFailure> {
    let ClosureData::PivotLonger { results } = data else {
        return Err(altered_pivot("tag"));
    };
    if !results.has_names(&PIVOT_NAMES) {
        return Err(altered_pivot("column names"));
    }
    if results.column_types() != PIVOT_TYPES {
        return Err(altered_pivot("column types"));
    }
    Ok(())
}

fn altered_pivot(invariant: &str) -> ClosureFailure {
    tracing::debug!(invariant, "long-format view failed shape check");
    abort_closure_data_altered(PIVOT_KIND, PIVOT_PRODUCER)
}

/// Whether `x` has a constant step between neighbours.
///
/// Fewer than three elements always do.
pub fn is_seq_linear_basic<T: Copy + Into<i64>>(x: &[T]) -> bool {
    if x.len() < 3 {
        return true;
    }
    let diff = |a: T, b: T| Into::<i64>::into(b) - Into::<i64>::into(a);
    let step = diff(x[0], x[1]);
    x.windows(2).skip(1).all(|w| diff(w[0], w[1]) == step)
}

/// Check that `data` is unaltered `closure_summarize()` output.
///
/// Invariants: columns `(value, f_absolute, f_relative)` typed
/// `(integer, integer, floating-point)`; no missing values; `value` is the
/// full integer run from its first to its last element with a constant
/// step; `f_relative` sums to exactly 1.
pub fn check_closure_summarize_unaltered(data: &ClosureData) -> Result<(), ClosureFailure> {
    let ClosureData::Summarize { table } = data else {
        return Err(altered_summary("tag"));
    };
    if !table.has_names(&SUMMARY_NAMES) {
        return Err(altered_summary("column names"));
    }
    if table.column_types() != SUMMARY_TYPES {
        return Err(altered_summary("column types"));
    }
    if table.columns().iter().any(|c| c.has_missing()) {
        return Err(altered_summary("missing values"));
    }

    let values: Vec<i32> = table
        .column("value")
        .and_then(|c| c.as_integers())
        .map(|v| v.iter().flatten().copied().collect())
        .unwrap_or_default();
    if !is_full_range(&values) || !is_seq_linear_basic(&values) {
        return Err(altered_summary("value progression"));
    }

    let total = table
        .column("f_relative")
        .and_then(|c| c.as_doubles())
        .map_or(0.0, |v| exact_sum(v.iter().flatten().copied()));
    if total != 1.0 {
        return Err(altered_summary("relative frequency total"));
    }

    Ok(())
}

fn altered_summary(invariant: &str) -> ClosureFailure {
    tracing::debug!(invariant, "summary view failed shape check");
    abort_closure_data_altered(SUMMARY_KIND, SUMMARY_PRODUCER)
}

/// Correctly rounded sum of `values` (Shewchuk's partials, as in Python's
/// `math.fsum`).
///
/// A left-to-right fold of `count / n` terms can land one ulp below 1 even
/// when the true sum of those doubles rounds to exactly 1.
fn exact_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    // Non-overlapping partials, increasing in magnitude; their exact sum is
    // the exact sum of everything seen so far.
    let mut partials: Vec<f64> = Vec::new();
    for mut x in values {
        let mut kept = 0;
        for j in 0..partials.len() {
            let mut y = partials[j];
            if x.abs() < y.abs() {
                std::mem::swap(&mut x, &mut y);
            }
            let hi = x + y;
            let lo = y - (hi - x);
            if lo != 0.0 {
                partials[kept] = lo;
                kept += 1;
            }
            x = hi;
        }
        partials.truncate(kept);
        partials.push(x);
    }

    let Some(mut hi) = partials.pop() else {
        return 0.0;
    };
    let mut lo = 0.0;
    while let Some(y) = partials.pop() {
        let x = hi;
        hi = x + y;
        lo = y - (hi - x);
        if lo != 0.0 {
            break;
        }
    }
    // Round half to even across the remaining partials.
    if let Some(&next) = partials.last() {
        if (lo < 0.0 && next < 0.0) || (lo > 0.0 && next > 0.0) {
            let y = lo * 2.0;
            let x = hi + y;
            if y == x - hi {
                hi = x;
            }
        }
    }
    hi
}

/// Whether `values` equals the inclusive run from its first to its last
/// element (descending when last < first). Empty input is not a run.
fn is_full_range(values: &[i32]) -> bool {
    let (Some(&first), Some(&last)) = (values.first(), values.last()) else {
        return false;
    };
    let (first, last) = (i64::from(first), i64::from(last));
    let dir = if last >= first { 1 } else { -1 };
    let span = (last - first).abs() + 1;
    usize::try_from(span).is_ok_and(|span| span == values.len())
        && values
            .iter()
            .zip(0_i64..)
            .all(|(&v, i)| i64::from(v) == first + dir * i)
}
