//! finddup - Duplicate File Finder
//!
//! Entry point for the finddup CLI application.

use clap::Parser;
use finddup::{cli::Cli, error::ExitCode, logging::init_logging};

fn main() -> std::process::ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Nothing sensible to do if the terminal itself is gone
            let _ = err.print();
            return ExitCode::from_parse_error(&err).into();
        }
    };

    init_logging(cli.verbose, cli.quiet);

    match finddup::run_app(cli) {
        Ok(code) => code.into(),
        Err(err) => {
            let exit_code = ExitCode::GeneralError;
            eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            exit_code.into()
        }
    }
}
