//! baryon's high-level mode of operation.

use crate::cli::CliArguments;
use crate::error::{BaryonError, BaryonResult};
use crate::parser::RoxygenParser;
use log::info;
use std::fs::File;
use std::io::{self, Read};

/// Runs baryon with the given cli-arguments and returns the rendered output.
/// This is the entrypoint into baryons business logic.
pub fn run_baryon_from_cli(cli_arguments: &CliArguments) -> BaryonResult<String> {
    let input = read_input(cli_arguments)?;
    if input.is_empty() {
        return Err(BaryonError::NoInput);
    }

    info!("Parsing roxygen documentation");
    let tool = RoxygenParser::new(cli_arguments.parser_config()).parse(&input)?;

    info!("Rendering {:?} output", cli_arguments.mode);
    cli_arguments.mode.renderer().render(&tool)
}

fn read_input(cli_arguments: &CliArguments) -> BaryonResult<Vec<u8>> {
    let mut input = Vec::new();
    match cli_arguments.input_path() {
        Some(path) => {
            info!("Reading {:?}", path);
            File::open(path)?.read_to_end(&mut input)?;
        }
        None => {
            info!("Reading stdin");
            io::stdin().read_to_end(&mut input)?;
        }
    }
    Ok(input)
}
