use crate::support::{
    EXIT_ERROR, EXIT_REJECTED, print_json_or_exit, read_data_or_exit, yes_no,
};
use closure_kernel::{identical_except_attributes, locate_sorted_mismatch};
use serde_json::json;

pub struct Args {
    pub left: String,
    pub right: String,
    pub sorted: bool,
    pub message: bool,
    pub json: bool,
}

pub fn run(args: Args) {
    let left = read_data_or_exit(&args.left);
    let right = read_data_or_exit(&args.right);

    let (mode, identical, first_mismatch) = if args.sorted {
        match locate_sorted_mismatch(&left, &right, args.message) {
            Ok(mismatch) => ("sorted", mismatch.is_none(), mismatch),
            Err(failure) => {
                if args.json {
                    print_json_or_exit(&json!({ "comparison": "sorted", "failure": failure }));
                } else {
                    eprintln!("error: {}", failure.render());
                }
                std::process::exit(EXIT_ERROR);
            }
        }
    } else {
        ("exact", identical_except_attributes(&left, &right), None)
    };

    if args.json {
        print_json_or_exit(&json!({
            "comparison": mode,
            "left": args.left,
            "right": args.right,
            "identical": identical,
            "firstMismatchColumn": first_mismatch,
        }));
    } else {
        println!("closure compare ({mode})");
        println!("  Left: {}", args.left);
        println!("  Right: {}", args.right);
        println!("  Identical: {}", yes_no(identical));
        if let Some(column) = first_mismatch {
            println!("  First differing column: {column}");
        }
    }

    if !identical {
        std::process::exit(EXIT_REJECTED);
    }
}
