use crate::support::{finish_report, read_data_or_exit};
use closure_kernel::{CheckReport, check_closure_summarize_unaltered};

pub fn run(input: String, json_output: bool) {
    let data = read_data_or_exit(&input);
    let report = CheckReport::from_result(
        "check_closure_summarize_unaltered",
        check_closure_summarize_unaltered(&data),
    );
    finish_report(
        "check-summarize",
        &[("Input", input), ("Rows", data.table().nrow().to_string())],
        &report,
        json_output,
    );
}
