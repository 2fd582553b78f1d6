//! Chore CLI - personal task tracking with projects and due dates

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = chore_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
