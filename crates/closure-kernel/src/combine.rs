//! Shape check for wide `closure_combine()` results.
//!
//! A combine table has one integer column per scale category, named
//! `n1, n2, ..., nk` in exactly that order. When the names are off, the
//! check does not stop at "wrong": it picks the most specific plausible
//! explanation, in this precedence:
//!
//! 1. columns removed
//! 2. unexpected names
//! 3. missing names
//! 4. wrong order
//!
//! The diagnosis is a heuristic. Several edits can leave the same names
//! behind; the precedence fixes which story gets told.

use crate::column::ElementType;
use crate::data::{ClosureData, ClosureInputs};
use crate::failure::{
    ClosureFailure, FailureKind, abort_not_closure_data, names_value, pluralize, quote_names,
    unchanged_hint,
};
use crate::table::Table;
use regex::Regex;
use std::sync::OnceLock;

const PRODUCER: &str = "closure_combine";

fn category_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^n[0-9]+$").expect("category name regex must compile"))
}

/// `n1..n{ncol}`.
pub fn expected_names(ncol: usize) -> Vec<String> {
    (1..=ncol).map(|i| format!("n{i}")).collect()
}

/// Check that `data` is unaltered `closure_combine()` output.
///
/// `allow_pivot` only changes the wording when the tag is missing: it names
/// `closure_pivot_longer()` as a second acceptable origin for callers that
/// take either view.
pub fn check_closure_combine(data: &ClosureData, allow_pivot: bool) -> Result<(), ClosureFailure> {
    let ClosureData::Combine { inputs, table } = data else {
        return Err(abort_not_closure_data(allow_pivot));
    };

    check_integer_columns(table)?;

    let ncol = table.ncol();
    // An inverted recorded scale says nothing about the width.
    let width = inputs
        .as_ref()
        .filter(|inputs| inputs.scale_min <= inputs.scale_max)
        .map(ClosureInputs::categories);
    let expected = expected_names(ncol);

    if table.names() == expected.as_slice() && width.is_none_or(|k| k == ncol) {
        return Ok(());
    }

    let failure = diagnose_names(table.names(), &expected, width);
    tracing::debug!(kind = %failure.kind, ncol, "combine output failed name check");
    Err(failure)
}

fn check_integer_columns(table: &Table) -> Result<(), ClosureFailure> {
    let offending: Vec<&str> = table
        .names()
        .iter()
        .zip(table.column_types())
        .filter(|(_, ty)| *ty != ElementType::Integer)
        .map(|(name, _)| name.as_str())
        .collect();

    if offending.is_empty() {
        return Ok(());
    }

    let count = offending.len();
    Err(ClosureFailure::new(
        FailureKind::NonIntegerColumns,
        format!("All columns of the `{PRODUCER}()` output must be integer."),
    )
    .with_detail(format!(
        "{} {} {} not integer.",
        pluralize(count, "Column", "Columns"),
        quote_names(&offending),
        pluralize(count, "is", "are"),
    ))
    .with_hint(unchanged_hint(PRODUCER))
    .with_field("columns", names_value(&offending)))
}

/// Explain why `actual` differs from `expected` (which is `n1..n{ncol}`).
///
/// `width` is the category count recorded by the producer, if any.
fn diagnose_names(actual: &[String], expected: &[String], width: Option<usize>) -> ClosureFailure {
    let ncol = actual.len();
    let offenders = distinct_not_in(actual, expected);

    // A surviving `n<i>` outside `n1..n{ncol}` means the table is shorter
    // than the names it still carries. A recorded width can tell the same
    // from the column count alone.
    let short_of_width = width.filter(|&k| ncol < k);
    let stray_category = offenders.iter().any(|n| category_name_re().is_match(n));
    if stray_category || short_of_width.is_some() {
        return columns_removed(actual, short_of_width);
    }

    let unexpected = match width {
        Some(k) if ncol > k => surplus(actual, &expected_names(k)),
        _ => offenders,
    };
    if !unexpected.is_empty() {
        let count = unexpected.len();
        return ClosureFailure::new(
            FailureKind::UnexpectedColumnNames,
            format!("The `{PRODUCER}()` output has unexpected column names."),
        )
        .with_detail(format!(
            "Unexpected {}: {}.",
            pluralize(count, "column", "columns"),
            quote_names(&unexpected),
        ))
        .with_hint(unchanged_hint(PRODUCER))
        .with_field("unexpected", names_value(&unexpected));
    }

    let missing = distinct_not_in(expected, actual);
    if !missing.is_empty() {
        let count = missing.len();
        return ClosureFailure::new(
            FailureKind::MissingColumns,
            format!("The `{PRODUCER}()` output is missing columns."),
        )
        .with_detail(format!(
            "Missing {}: {}.",
            pluralize(count, "column", "columns"),
            quote_names(&missing),
        ))
        .with_hint(unchanged_hint(PRODUCER))
        .with_field("missing", names_value(&missing));
    }

    ClosureFailure::new(
        FailureKind::ColumnsMisordered,
        format!("The columns of the `{PRODUCER}()` output are out of order."),
    )
    .with_detail(format!(
        "Columns must run from `n1` to `n{ncol}`, in this order."
    ))
    .with_detail(format!("Found: {}.", quote_names(actual)))
    .with_hint(unchanged_hint(PRODUCER))
    .with_field("actual", names_value(actual))
    .with_field("ncol", ncol)
}

/// `width` is set only when the recorded category count exceeds `ncol`.
fn columns_removed(actual: &[String], width: Option<usize>) -> ClosureFailure {
    let ncol = actual.len();
    let detail = match width {
        Some(k) => format!(
            "The scale has {k} categories (`n1` to `n{k}`), but only {ncol} {} left.",
            pluralize(ncol, "column is", "columns are"),
        ),
        None => format!(
            "{ncol} {} left, but the names no longer run from `n1` to `n{ncol}`.",
            pluralize(ncol, "column is", "columns are"),
        ),
    };
    let failure = ClosureFailure::new(
        FailureKind::ColumnsRemoved,
        format!("Columns were removed from the `{PRODUCER}()` output."),
    )
    .with_detail(detail)
    .with_hint(unchanged_hint(PRODUCER))
    .with_field("actual", names_value(actual))
    .with_field("ncol", ncol);
    match width {
        Some(k) => failure.with_field("categories", k),
        None => failure,
    }
}

/// Names of `xs` absent from `ys`, first occurrence only, in `xs` order.
fn distinct_not_in(xs: &[String], ys: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for x in xs {
        if !ys.contains(x) && !out.contains(x) {
            out.push(x.clone());
        }
    }
    out
}

/// Names of `actual` left over once each name in `reference` has been
/// matched at most once: extras and repeats.
fn surplus(actual: &[String], reference: &[String]) -> Vec<String> {
    let mut available: Vec<Option<&String>> = reference.iter().map(Some).collect();
    let mut out = Vec::new();
    for name in actual {
        match available.iter_mut().find(|slot| slot.is_some_and(|r| r == name)) {
            Some(slot) => *slot = None,
            None => out.push(name.clone()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::data::{ClosureClass, ClosureInputs, add_class};

    fn wide(names: &[&str]) -> Table {
        Table::from_columns(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| (*n, Column::integers([i as i32, 1, 2]))),
        )
        .unwrap()
    }

    fn combine(names: &[&str]) -> ClosureData {
        add_class(wide(names), ClosureClass::ClosureCombineResult)
    }

    fn kind_of(data: &ClosureData) -> FailureKind {
        check_closure_combine(data, false).unwrap_err().kind
    }

    #[test]
    fn accepts_canonical_names_for_any_width() {
        for k in 0..=6 {
            let names = expected_names(k);
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            assert!(check_closure_combine(&combine(&refs), false).is_ok(), "k = {k}");
        }
    }

    #[test]
    fn adjacent_swaps_are_misordered() {
        let names = expected_names(5);
        for i in 0..4 {
            let mut refs: Vec<&str> = names.iter().map(String::as_str).collect();
            refs.swap(i, i + 1);
            assert_eq!(kind_of(&combine(&refs)), FailureKind::ColumnsMisordered);
        }
    }

    #[test]
    fn untagged_data_is_rejected() {
        let data = ClosureData::plain(wide(&["n1", "n2"]));
        let err = check_closure_combine(&data, false).unwrap_err();
        assert!(err.is(FailureKind::NotClosureData));

        let summary = add_class(wide(&["n1"]), ClosureClass::ClosureSummarizeResult);
        let err = check_closure_combine(&summary, true).unwrap_err();
        assert!(err.is(FailureKind::NotClosureData));
        assert!(err.summary.contains("closure_pivot_longer"));
    }

    #[test]
    fn non_integer_columns_are_listed() {
        let table = Table::from_columns([
            ("n1", Column::integers([1])),
            ("n2", Column::doubles([1.0])),
            ("n3", Column::from("a")),
        ])
        .unwrap();
        let err = check_closure_combine(
            &add_class(table, ClosureClass::ClosureCombineResult),
            false,
        )
        .unwrap_err();
        assert!(err.is(FailureKind::NonIntegerColumns));
        assert_eq!(err.field_strings("columns"), vec!["n2", "n3"]);
        assert_eq!(err.details, vec!["Columns `n2`, `n3` are not integer."]);
    }

    #[test]
    fn single_non_integer_column_reads_singular() {
        let table = Table::from_columns([("n1", Column::doubles([1.0]))]).unwrap();
        let err = check_closure_combine(
            &add_class(table, ClosureClass::ClosureCombineResult),
            false,
        )
        .unwrap_err();
        assert_eq!(err.details, vec!["Column `n1` is not integer."]);
    }

    #[test]
    fn type_check_precedes_name_check() {
        let table = Table::from_columns([("x", Column::doubles([1.0]))]).unwrap();
        let data = add_class(table, ClosureClass::ClosureCombineResult);
        assert_eq!(kind_of(&data), FailureKind::NonIntegerColumns);
    }

    #[test]
    fn dropping_first_column_is_removal() {
        let data = combine(&["n2", "n3", "n4", "n5"]);
        assert_eq!(kind_of(&data), FailureKind::ColumnsRemoved);
    }

    #[test]
    fn dropping_middle_column_is_removal() {
        let err = check_closure_combine(&combine(&["n1", "n3"]), false).unwrap_err();
        assert!(err.is(FailureKind::ColumnsRemoved));
        assert_eq!(err.field_strings("actual"), vec!["n1", "n3"]);
        assert_eq!(err.fields["ncol"], 2);
    }

    #[test]
    fn dropping_last_column_is_removal_when_width_is_recorded() {
        let inputs = ClosureInputs {
            mean: 3.0,
            sd: 1.0,
            n: 20,
            scale_min: 1,
            scale_max: 5,
        };
        let full = combine(&["n1", "n2", "n3", "n4", "n5"]).with_inputs(inputs);
        assert!(check_closure_combine(&full, false).is_ok());

        let short = combine(&["n1", "n2", "n3", "n4"]).with_inputs(inputs);
        let err = check_closure_combine(&short, false).unwrap_err();
        assert!(err.is(FailureKind::ColumnsRemoved));
        assert_eq!(err.fields["categories"], 5);
    }

    #[test]
    fn dropping_last_column_without_width_is_indistinguishable() {
        assert!(check_closure_combine(&combine(&["n1", "n2", "n3", "n4"]), false).is_ok());
    }

    #[test]
    fn extra_column_beyond_recorded_width_is_unexpected() {
        let inputs = ClosureInputs {
            mean: 2.0,
            sd: 1.0,
            n: 20,
            scale_min: 1,
            scale_max: 3,
        };
        let data = combine(&["n1", "n2", "n3", "n4"]).with_inputs(inputs);
        let err = check_closure_combine(&data, false).unwrap_err();
        assert!(err.is(FailureKind::UnexpectedColumnNames));
        assert_eq!(err.field_strings("unexpected"), vec!["n4"]);
    }

    #[test]
    fn recorded_width_does_not_hide_a_stray_category_name() {
        let inputs = ClosureInputs {
            mean: 3.0,
            sd: 1.0,
            n: 20,
            scale_min: 1,
            scale_max: 5,
        };
        let names = ["n1", "n2", "n3", "n4", "n6"];
        let bare = check_closure_combine(&combine(&names), false).unwrap_err();
        let recorded = check_closure_combine(&combine(&names).with_inputs(inputs), false)
            .unwrap_err();
        assert!(bare.is(FailureKind::ColumnsRemoved));
        assert_eq!(recorded, bare);
        assert!(recorded.fields.get("categories").is_none());
        assert_eq!(
            recorded.details,
            vec!["5 columns are left, but the names no longer run from `n1` to `n5`."]
        );
    }

    #[test]
    fn inverted_recorded_scale_is_ignored() {
        let inputs = ClosureInputs {
            mean: 4.0,
            sd: 1.0,
            n: 20,
            scale_min: 5,
            scale_max: 3,
        };
        let canonical = combine(&["n1", "n2", "n3"]).with_inputs(inputs);
        assert!(check_closure_combine(&canonical, false).is_ok());

        let swapped = combine(&["n2", "n1", "n3"]).with_inputs(inputs);
        assert_eq!(kind_of(&swapped), FailureKind::ColumnsMisordered);
    }

    #[test]
    fn renamed_column_is_unexpected() {
        let err = check_closure_combine(&combine(&["x1", "n2", "n3"]), false).unwrap_err();
        assert!(err.is(FailureKind::UnexpectedColumnNames));
        assert_eq!(err.field_strings("unexpected"), vec!["x1"]);
        assert_eq!(err.details, vec!["Unexpected column: `x1`."]);
    }

    #[test]
    fn several_renamed_columns_read_plural() {
        let err = check_closure_combine(&combine(&["a", "b", "n3"]), false).unwrap_err();
        assert_eq!(err.details, vec!["Unexpected columns: `a`, `b`."]);
    }

    #[test]
    fn removal_outranks_unexpected_names() {
        // `x` alone would be unexpected; the surviving `n3` signals removal.
        let err = check_closure_combine(&combine(&["x", "n3"]), false).unwrap_err();
        assert!(err.is(FailureKind::ColumnsRemoved));
    }

    #[test]
    fn duplicated_column_is_missing() {
        let err = check_closure_combine(&combine(&["n1", "n1", "n3"]), false).unwrap_err();
        assert!(err.is(FailureKind::MissingColumns));
        assert_eq!(err.field_strings("missing"), vec!["n2"]);
    }

    #[test]
    fn swapped_columns_are_misordered() {
        let err = check_closure_combine(&combine(&["n2", "n1", "n3"]), false).unwrap_err();
        assert!(err.is(FailureKind::ColumnsMisordered));
        assert_eq!(
            err.details[0],
            "Columns must run from `n1` to `n3`, in this order."
        );
    }

    #[test]
    fn every_name_failure_ends_with_the_unchanged_hint() {
        for names in [
            vec!["n1", "n3"],
            vec!["x1", "n2"],
            vec!["n1", "n1"],
            vec!["n2", "n1"],
        ] {
            let err = check_closure_combine(&combine(&names), false).unwrap_err();
            assert_eq!(
                err.hint.as_deref(),
                Some("Please leave the output of `closure_combine()` unchanged.")
            );
        }
    }

    #[test]
    fn surplus_counts_repeats() {
        let actual: Vec<String> = ["n1", "n1", "n2", "z"].iter().map(|s| s.to_string()).collect();
        let reference = expected_names(2);
        assert_eq!(surplus(&actual, &reference), vec!["n1", "z"]);
    }
}
