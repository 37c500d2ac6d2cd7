//! Agreement checks between two enumerations.
//!
//! Two independently correct implementations of the search may list the
//! same distributions in a different order, and may decorate their output
//! with different incidental metadata. These comparators look past both.

use crate::failure::{ClosureFailure, FailureKind, names_value, quote_names};
use crate::table::Table;

/// Exact equality of column contents, ignoring tags, names, and attributes.
pub fn identical_except_attributes<X, Y>(x: &X, y: &Y) -> bool
where
    X: AsRef<Table> + ?Sized,
    Y: AsRef<Table> + ?Sized,
{
    let (x, y) = (x.as_ref(), y.as_ref());
    x.ncol() == y.ncol()
        && x
            .columns()
            .iter()
            .zip(y.columns())
            .all(|(a, b)| a.identical(b))
}

/// 1-based index of the first column whose values differ once each side is
/// sorted independently, or `None` if every column agrees.
///
/// Both tables must have the same column names in the same order.
pub fn first_sorted_mismatch<X, Y>(x: &X, y: &Y) -> Result<Option<usize>, ClosureFailure>
where
    X: AsRef<Table> + ?Sized,
    Y: AsRef<Table> + ?Sized,
{
    let (x, y) = (x.as_ref(), y.as_ref());

    if x.ncol() != y.ncol() {
        return Err(ClosureFailure::new(
            FailureKind::DifferentColumnCount,
            "`x` and `y` must have the same number of columns.",
        )
        .with_detail(format!(
            "`x` has {} columns, `y` has {}.",
            x.ncol(),
            y.ncol()
        ))
        .with_field("xNcol", x.ncol())
        .with_field("yNcol", y.ncol()));
    }

    if x.names() != y.names() {
        return Err(ClosureFailure::new(
            FailureKind::DifferentColumnNames,
            "`x` and `y` must have the same column names, in the same order.",
        )
        .with_detail(format!("`x` has {}.", quote_names(x.names())))
        .with_detail(format!("`y` has {}.", quote_names(y.names())))
        .with_field("xNames", names_value(x.names()))
        .with_field("yNames", names_value(y.names())));
    }

    let mismatch = x
        .columns()
        .iter()
        .zip(y.columns())
        .position(|(a, b)| !a.sorted().identical(&b.sorted()))
        .map(|i| i + 1);
    Ok(mismatch)
}

/// Whether every column holds the same values in both tables, up to order.
///
/// Columns are sorted one at a time, so this certifies equal multisets per
/// column, not equal multisets of rows: tables that pair column values
/// across rows differently still compare equal.
///
/// With `message`, the index of the first differing column is logged.
pub fn identical_sorted_cols<X, Y>(x: &X, y: &Y, message: bool) -> Result<bool, ClosureFailure>
where
    X: AsRef<Table> + ?Sized,
    Y: AsRef<Table> + ?Sized,
{
    Ok(locate_sorted_mismatch(x, y, message)?.is_none())
}

/// [`first_sorted_mismatch`], logging the column found when `message` is set.
///
/// Callers that need both the verdict and the column use this instead of
/// sorting twice through [`identical_sorted_cols`].
pub fn locate_sorted_mismatch<X, Y>(
    x: &X,
    y: &Y,
    message: bool,
) -> Result<Option<usize>, ClosureFailure>
where
    X: AsRef<Table> + ?Sized,
    Y: AsRef<Table> + ?Sized,
{
    let mismatch = first_sorted_mismatch(x, y)?;
    if let (true, Some(column)) = (message, mismatch) {
        tracing::info!(column, "sorted values differ first in column {column}");
    }
    Ok(mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::data::{ClosureClass, add_class};
    use serde_json::json;

    fn table(rows: &[[i32; 3]]) -> Table {
        Table::from_columns((0..3).map(|j| {
            (
                format!("n{}", j + 1),
                Column::integers(rows.iter().map(|r| r[j])),
            )
        }))
        .unwrap()
    }

    #[test]
    fn sorted_comparison_is_reflexive() {
        let t = table(&[[1, 2, 3], [3, 0, 3], [2, 2, 2]]);
        assert!(identical_sorted_cols(&t, &t, false).unwrap());
        let empty = Table::new(vec![], vec![]).unwrap();
        assert!(identical_sorted_cols(&empty, &empty, false).unwrap());
    }

    #[test]
    fn row_order_does_not_matter() {
        let a = table(&[[1, 2, 3], [3, 0, 3], [2, 2, 2]]);
        let b = table(&[[2, 2, 2], [1, 2, 3], [3, 0, 3]]);
        assert!(identical_sorted_cols(&a, &b, true).unwrap());
        assert!(!identical_except_attributes(&a, &b));
    }

    #[test]
    fn one_changed_cell_is_located() {
        let a = table(&[[1, 2, 3], [3, 0, 3]]);
        let b = table(&[[1, 2, 3], [3, 0, 4]]);
        assert!(!identical_sorted_cols(&a, &b, true).unwrap());
        assert_eq!(first_sorted_mismatch(&a, &b).unwrap(), Some(3));

        let c = table(&[[1, 5, 3], [3, 0, 4]]);
        assert_eq!(first_sorted_mismatch(&a, &c).unwrap(), Some(2));
    }

    #[test]
    fn located_mismatch_agrees_with_verdict() {
        let a = table(&[[1, 2, 3], [3, 0, 3]]);
        let b = table(&[[3, 0, 4], [1, 2, 3]]);
        assert_eq!(locate_sorted_mismatch(&a, &b, true).unwrap(), Some(3));
        assert!(!identical_sorted_cols(&a, &b, false).unwrap());

        let shuffled = table(&[[3, 0, 3], [1, 2, 3]]);
        assert_eq!(locate_sorted_mismatch(&a, &shuffled, true).unwrap(), None);
        assert!(identical_sorted_cols(&a, &shuffled, false).unwrap());

        let err = locate_sorted_mismatch(&a, &a.without_column("n1"), false).unwrap_err();
        assert!(err.is(FailureKind::DifferentColumnCount));
    }

    #[test]
    fn per_column_sorting_ignores_row_pairing() {
        let a = table(&[[1, 2, 0], [2, 1, 0]]);
        let b = table(&[[1, 1, 0], [2, 2, 0]]);
        assert!(identical_sorted_cols(&a, &b, false).unwrap());
    }

    #[test]
    fn missing_values_sort_consistently() {
        let a = Table::from_columns([("n1", Column::Integer(vec![None, Some(1)]))]).unwrap();
        let b = Table::from_columns([("n1", Column::Integer(vec![Some(1), None]))]).unwrap();
        assert!(identical_sorted_cols(&a, &b, false).unwrap());
    }

    #[test]
    fn different_shapes_are_errors_not_false() {
        let a = table(&[[1, 2, 3]]);
        let fewer = a.without_column("n3");
        let err = identical_sorted_cols(&a, &fewer, false).unwrap_err();
        assert!(err.is(FailureKind::DifferentColumnCount));
        assert_eq!(err.fields["xNcol"], 3);
        assert_eq!(err.fields["yNcol"], 2);

        let renamed = a.with_renamed("n2", "m2");
        let err = identical_sorted_cols(&a, &renamed, false).unwrap_err();
        assert!(err.is(FailureKind::DifferentColumnNames));
        assert_eq!(err.field_strings("yNames"), vec!["n1", "m2", "n3"]);
    }

    #[test]
    fn attributes_tags_and_names_are_ignored() {
        let a = table(&[[1, 2, 3]]).with_attribute("provenance", json!("rust"));
        let b = table(&[[1, 2, 3]])
            .with_attribute("provenance", json!("reference"))
            .with_renamed("n1", "count_1");
        assert!(identical_except_attributes(&a, &b));

        let tagged = add_class(a.clone(), ClosureClass::ClosureCombineResult);
        assert!(identical_except_attributes(&tagged, &b));
    }

    #[test]
    fn contents_still_matter() {
        let a = table(&[[1, 2, 3]]);
        let b = table(&[[1, 2, 4]]);
        assert!(!identical_except_attributes(&a, &b));

        let retyped = Table::from_columns([
            ("n1", Column::doubles([1.0])),
            ("n2", Column::integers([2])),
            ("n3", Column::integers([3])),
        ])
        .unwrap();
        assert!(!identical_except_attributes(&a, &retyped));
    }
}
