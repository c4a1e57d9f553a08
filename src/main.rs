//! CLI front-end for the timetable solver.
//!
//! Exit codes: 0 when a schedule was found or infeasibility was proven
//! and documented, 2 for malformed input or usage errors, 1 for
//! internal errors.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use termtable::driver::{self, DriverOptions, SolveError, SolveStatus};
use termtable::logging::Verbosity;

#[derive(Parser)]
#[command(name = "termtable")]
#[command(about = "Week-aware feasible timetable construction")]
struct Cli {
    /// Input problem document (JSON)
    input: PathBuf,

    /// Output solution document (JSON)
    #[arg(default_value = "timetable_output.json")]
    output: PathBuf,

    /// Increase log detail (-v placements, -vv diagnostics, -vvv search internals)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Wall-clock budget per strategy run, in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let opts = DriverOptions {
        verbosity: Verbosity::from_flag_count(cli.verbose),
        timeout: cli.timeout_ms.map(Duration::from_millis),
    };

    match driver::solve_file(&cli.input, &cli.output, &opts) {
        Ok(report) => {
            match report.status {
                SolveStatus::Success => {
                    eprintln!(
                        "success: {} event(s) scheduled, wrote {}",
                        report.document.meta.events_scheduled,
                        cli.output.display()
                    );
                }
                SolveStatus::Infeasible => {
                    eprintln!("failure: no feasible schedule, wrote {}", cli.output.display());
                }
                SolveStatus::Timeout => {
                    eprintln!("failure: search timed out, wrote {}", cli.output.display());
                }
            }
            ExitCode::SUCCESS
        }
        Err(err @ (SolveError::Parse(_) | SolveError::Problem(_))) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}
