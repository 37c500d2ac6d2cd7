use crate::support::{finish_report, read_data_or_exit};
use closure_kernel::{CheckReport, check_closure_combine};

pub fn run(input: String, allow_pivot: bool, json_output: bool) {
    let data = read_data_or_exit(&input);
    let report = CheckReport::from_result(
        "check_closure_combine",
        check_closure_combine(&data, allow_pivot),
    );

    let class = data
        .class()
        .map_or_else(|| "none".to_string(), |c| c.to_string());
    finish_report(
        "check-combine",
        &[
            ("Input", input),
            ("Class", class),
            ("Columns", data.table().ncol().to_string()),
            ("Rows", data.table().nrow().to_string()),
        ],
        &report,
        json_output,
    );
}
