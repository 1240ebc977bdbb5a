use crate::baryon::run_baryon_from_cli;
use crate::error::BaryonResult;
use clap::Parser;
use cli::CliArguments;
use log::error;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::process::ExitCode;

mod baryon;
mod cli;
mod config;
mod error;
mod parser;
mod render;
mod tool;

fn main() -> ExitCode {
    match error_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("Error in {} stage:\n{}", error.stage(), error);
            ExitCode::FAILURE
        }
    }
}

fn error_main() -> BaryonResult<()> {
    // Parse cli arguments
    let cli_arguments = CliArguments::parse();

    // Init logging, stdout is reserved for the output
    TermLogger::init(
        cli_arguments.log_level(),
        Default::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .expect("Could not initialize logging");

    // Run baryon
    let output = run_baryon_from_cli(&cli_arguments)?;
    print!("{}", output);
    Ok(())
}
