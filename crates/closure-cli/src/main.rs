//! CLOSURE CLI: the `closure` command.

mod cli;
mod commands;
mod config;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let config = config::load(cli.config.as_deref()).unwrap_or_else(|err| {
        eprintln!("error: {err}");
        std::process::exit(support::EXIT_ERROR);
    });

    let wants_message = matches!(cli.command, Commands::Compare { message: true, .. })
        || config.compare.message;
    init_tracing(&config.log.filter, wants_message);
    tracing::debug!(
        allow_pivot = config.check.allow_pivot,
        compare_message = config.compare.message,
        "configuration loaded"
    );

    match cli.command {
        Commands::CheckCombine {
            input,
            allow_pivot,
            json,
        } => commands::check_combine::run(input, allow_pivot || config.check.allow_pivot, json),

        Commands::CheckPivotLonger { input, json } => {
            commands::check_pivot_longer::run(input, json)
        }

        Commands::CheckSummarize { input, json } => commands::check_summarize::run(input, json),

        Commands::CheckScale {
            scale_min,
            scale_max,
            mean,
            json,
        } => commands::check_scale::run(scale_min, scale_max, mean, json),

        Commands::CheckInputs { input, json } => commands::check_inputs::run(input, json),

        Commands::Compare {
            left,
            right,
            sorted,
            message,
            json,
        } => commands::compare::run(commands::compare::Args {
            left,
            right,
            sorted,
            message: message || config.compare.message,
            json,
        }),
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
///
/// `CLOSURE_LOG` wins over the config file. A requested compare message is
/// an info event from the kernel, so it is let through on top of the filter.
fn init_tracing(filter: &str, wants_message: bool) {
    let mut env_filter = EnvFilter::try_from_env(config::LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(filter));
    if wants_message {
        if let Ok(directive) = "closure_kernel=info".parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
