use closure_kernel::{CheckReport, ClosureData};
use serde::Serialize;
use std::fs;

pub const EXIT_REJECTED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

pub fn read_json_file_or_exit<T>(path: &str, label: &str) -> T
where
    T: serde::de::DeserializeOwned,
{
    let bytes = fs::read(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {label} at {path}: {e}");
        std::process::exit(EXIT_ERROR);
    });
    serde_json::from_slice::<T>(&bytes).unwrap_or_else(|e| {
        eprintln!("error: failed to parse {label} JSON at {path}: {e}");
        std::process::exit(EXIT_ERROR);
    })
}

pub fn read_data_or_exit(path: &str) -> ClosureData {
    read_json_file_or_exit(path, "CLOSURE data")
}

pub fn print_json_or_exit<T: Serialize>(value: &T) {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|err| {
        eprintln!("error: failed to render JSON: {err}");
        std::process::exit(EXIT_ERROR);
    });
    println!("{rendered}");
}

/// Print `report` and exit non-zero if it was rejected.
///
/// `context` lines are printed under the title in human mode.
pub fn finish_report(
    title: &str,
    context: &[(&str, String)],
    report: &CheckReport,
    json_output: bool,
) {
    if json_output {
        print_json_or_exit(report);
    } else {
        println!("closure {title}");
        for (label, value) in context {
            println!("  {label}: {value}");
        }
        println!("  Result: {}", report.result);
        if let Some(failure) = &report.failure {
            println!("  Failure: {} ({})", failure.kind, failure.failure_id);
            for line in failure.render().lines() {
                println!("    {line}");
            }
        }
    }

    if !report.is_accepted() {
        std::process::exit(EXIT_REJECTED);
    }
}

pub fn yes_no(ok: bool) -> &'static str {
    if ok { "yes" } else { "no" }
}
