use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "closure",
    about = "CLOSURE: shape and agreement checks for enumerated response distributions",
    version
)]
pub struct Cli {
    /// Path to a TOML config file (default: ./closure.toml when present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that a file holds unaltered `closure_combine()` output
    CheckCombine {
        /// Path to tagged CLOSURE data (JSON)
        input: String,

        /// Also name `closure_pivot_longer()` as a valid origin in failures
        #[arg(long)]
        allow_pivot: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that a file holds unaltered `closure_pivot_longer()` output
    CheckPivotLonger {
        /// Path to tagged CLOSURE data (JSON)
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that a file holds unaltered `closure_summarize()` output
    CheckSummarize {
        /// Path to tagged CLOSURE data (JSON)
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check scale bounds and, optionally, the mean against them
    CheckScale {
        /// Lowest scale value
        #[arg(long, allow_negative_numbers = true)]
        scale_min: f64,

        /// Highest scale value
        #[arg(long, allow_negative_numbers = true)]
        scale_max: f64,

        /// Reported mean
        #[arg(long, allow_negative_numbers = true)]
        mean: Option<f64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check untyped enumeration arguments (mean, sd, n, scale_min, scale_max)
    CheckInputs {
        /// Path to a JSON object of arguments
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare two enumerations
    Compare {
        /// Path to the first table (tagged CLOSURE data, JSON)
        left: String,

        /// Path to the second table (tagged CLOSURE data, JSON)
        right: String,

        /// Compare each column as a sorted multiset instead of exactly
        #[arg(long)]
        sorted: bool,

        /// Log the first differing column (with --sorted)
        #[arg(long)]
        message: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
