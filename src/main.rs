//! dupels - Duplicate-Aware Recursive File Lister
//!
//! Entry point for the dupels CLI application.

use clap::Parser;
use dupels::{cli::Cli, error::ExitCode, logging};

fn main() {
    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet);

    match dupels::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            log::error!("{err:#}");
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    }
}
