//! Command-line arguments.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "ia-m-uv")]
#[command(about = "Walk through the Gemini wrapper using an example problem")]
pub struct Args {
    /// Example problem to solve.
    #[arg(short = 'p', long = "problema", visible_alias = "problem", value_name = "PROBLEM")]
    pub problem: String,
}

/// Parse the process arguments, exiting with usage on failure.
pub fn parse_args() -> Args {
    Args::parse()
}
