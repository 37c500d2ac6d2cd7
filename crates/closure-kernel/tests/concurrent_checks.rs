//! Checks share no state: the same immutable values can be validated from
//! many threads at once with identical outcomes.

use closure_kernel::{
    ClosureClass, ClosureData, ClosureFailure, Column, FailureKind, Table, add_class,
    check_closure_combine, check_closure_summarize_unaltered, identical_sorted_cols,
};
use std::thread;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn values_and_failures_cross_threads() {
    assert_send_sync::<ClosureData>();
    assert_send_sync::<ClosureFailure>();
    assert_send_sync::<Table>();
}

#[test]
fn parallel_validation_agrees() {
    let valid = add_class(
        Table::from_columns([
            ("n1", Column::integers([1, 0, 2])),
            ("n2", Column::integers([1, 2, 0])),
            ("n3", Column::integers([1, 1, 1])),
        ])
        .unwrap(),
        ClosureClass::ClosureCombineResult,
    );
    let swapped = add_class(
        valid.table().with_renamed("n1", "tmp").with_renamed("n2", "n1").with_renamed("tmp", "n2"),
        ClosureClass::ClosureCombineResult,
    );
    let summary = add_class(
        Table::from_columns([
            ("value", Column::integers([1, 2, 3])),
            ("f_absolute", Column::integers([3, 3, 3])),
            ("f_relative", Column::doubles([0.25, 0.5, 0.25])),
        ])
        .unwrap(),
        ClosureClass::ClosureSummarizeResult,
    );

    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    let ok = check_closure_combine(&valid, false).is_ok();
                    let kind = check_closure_combine(&swapped, false).map_err(|f| f.kind);
                    let summary_ok = check_closure_summarize_unaltered(&summary).is_ok();
                    let same = identical_sorted_cols(&valid, &valid, false).unwrap();
                    (ok, kind, summary_ok, same)
                })
            })
            .collect();
        for handle in handles {
            let (ok, kind, summary_ok, same) = handle.join().unwrap();
            assert!(ok);
            assert_eq!(kind, Err(FailureKind::ColumnsMisordered));
            assert!(summary_ok);
            assert!(same);
        }
    });
}
