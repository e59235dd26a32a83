//! daybook - local-first notes, tasks and habits

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = daybook::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
