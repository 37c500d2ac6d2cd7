use crate::support::{finish_report, read_json_file_or_exit};
use closure_kernel::{CheckReport, ClosureInputs};
use serde_json::{Map, Value};

pub fn run(input: String, json_output: bool) {
    let args: Map<String, Value> = read_json_file_or_exit(&input, "arguments");
    let parsed = ClosureInputs::from_arguments(&args);

    let mut context = vec![("Input", input)];
    if let Ok(inputs) = &parsed {
        context.push((
            "Scale",
            format!(
                "{} to {} ({} categories)",
                inputs.scale_min,
                inputs.scale_max,
                inputs.categories()
            ),
        ));
    }
    let report = CheckReport::from_result("check_inputs", parsed.map(|_| ()));
    finish_report("check-inputs", &context, &report, json_output);
}
