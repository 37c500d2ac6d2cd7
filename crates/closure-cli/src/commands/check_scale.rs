use crate::support::finish_report;
use closure_kernel::{CheckReport, check_scale};

pub fn run(scale_min: f64, scale_max: f64, mean: Option<f64>, json_output: bool) {
    let report = CheckReport::from_result("check_scale", check_scale(scale_min, scale_max, mean));

    let mut context = vec![("Scale", format!("{scale_min} to {scale_max}"))];
    if let Some(mean) = mean {
        context.push(("Mean", mean.to_string()));
    }
    finish_report("check-scale", &context, &report, json_output);
}
