//! The command line interface of baryon.

use crate::config::{ParserConfig, UnknownInstructionPolicy, UntypedParamPolicy};
use crate::render::OutputMode;
use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::path::PathBuf;

/// Turns roxygen-documented R functions into Galaxy tools and wrapper scripts.
#[derive(Parser, Debug)]
#[command(version, author = "baryon contributors")]
pub struct CliArguments {
    /// The R file to read. Reads stdin if absent or `-`.
    pub input: Option<PathBuf>,

    /// The kind of output to produce.
    #[arg(short, long, value_enum, default_value_t = OutputMode::Xml)]
    pub mode: OutputMode,

    /// Fail on unknown instructions inside @param directives instead of skipping them.
    #[arg(long)]
    pub strict_params: bool,

    /// Fail on @param entries without a type while parsing instead of while rendering.
    #[arg(long)]
    pub require_param_types: bool,

    /// Log more. May be given multiple times.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log nothing.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl CliArguments {
    /// Returns the input path, or `None` for stdin.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input
            .as_ref()
            .filter(|path| path.as_os_str() != "-")
    }

    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            unknown_param_instructions: if self.strict_params {
                UnknownInstructionPolicy::Fail
            } else {
                UnknownInstructionPolicy::Skip
            },
            untyped_params: if self.require_param_types {
                UntypedParamPolicy::FailAtParse
            } else {
                UntypedParamPolicy::FailAtRender
            },
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Off;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let arguments = CliArguments::parse_from(["baryon"]);
        assert_eq!(arguments.input_path(), None);
        assert_eq!(arguments.mode, OutputMode::Xml);
        assert_eq!(arguments.parser_config(), ParserConfig::default());
        assert_eq!(arguments.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn test_stdin_dash() {
        let arguments = CliArguments::parse_from(["baryon", "-", "--mode", "python"]);
        assert_eq!(arguments.input_path(), None);
        assert_eq!(arguments.mode, OutputMode::Python);
    }

    #[test]
    fn test_strict_flags() {
        let arguments = CliArguments::parse_from([
            "baryon",
            "tool.R",
            "--strict-params",
            "--require-param-types",
            "-vv",
        ]);
        assert_eq!(arguments.input_path(), Some(&PathBuf::from("tool.R")));
        assert_eq!(
            arguments.parser_config(),
            ParserConfig {
                unknown_param_instructions: UnknownInstructionPolicy::Fail,
                untyped_params: UntypedParamPolicy::FailAtParse,
            }
        );
        assert_eq!(arguments.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_unknown_mode() {
        CliArguments::try_parse_from(["baryon", "--mode", "perl"]).unwrap_err();
    }
}
