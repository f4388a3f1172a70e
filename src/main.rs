mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run_from_env() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Failures before logger setup still need to reach the user
            if log::max_level() == log::LevelFilter::Off {
                eprintln!("Error: {:#}", err);
            } else {
                log::error!("{:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}
