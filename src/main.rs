use std::{path::Path, process::ExitCode};

use clap::Parser;
use stackcalc::{
    driver::{self, RunOptions},
    interpreter::evaluator::core::MAX_DEPTH,
    source::Source,
};

/// stackcalc evaluates semicolon-terminated arithmetic statements and prints
/// the value of each one.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Treat SOURCE as program text instead of a file path.
    #[arg(short, long)]
    expression: bool,

    /// Skip a failing statement and continue with the next one.
    #[arg(short, long)]
    keep_going: bool,

    /// Print the token stream instead of evaluating it.
    #[arg(short, long)]
    tokens: bool,

    /// Do not print statement results.
    #[arg(short, long)]
    quiet: bool,

    /// Maximum number of pending operands or operators per statement.
    #[arg(long, default_value_t = MAX_DEPTH)]
    max_depth: usize,

    source: String,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let options = RunOptions { keep_going:  args.keep_going,
                               dump_tokens: args.tokens,
                               quiet:       args.quiet,
                               max_depth:   args.max_depth, };

    if args.expression {
        let source = Source::from_text("<expression>", args.source);
        driver::run_to_exit_code(&source, &options)
    } else {
        driver::run(Path::new(&args.source), &options)
    }
}
