//! Parsing of roxygen documentation into a [`ToolDescription`].

use crate::config::{ParserConfig, UnknownInstructionPolicy};
use crate::error::{BaryonError, BaryonResult};
use crate::parser::comment::{extract_comment, tokenize, Entry};
use crate::parser::instruction::Registries;
use crate::tool::{Creator, Outputs, Param, Person, ToolDescription};
use log::debug;
use nom::error::{ErrorKind, ParseError};
use std::fmt::{Display, Formatter};

pub mod comment;
pub mod instruction;


pub type ParserResult<'a, T> = Result<(&'a str, T), nom::Err<ParserError>>;

#[derive(Debug, Eq, Clone, PartialEq, Default)]
pub struct ParserError {
    nom_errors: Vec<(String, ErrorKind)>,
    message: String,
}

impl Display for ParserError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.nom_errors.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(
                f,
                "nom_errors: {:?}, message: {}",
                self.nom_errors, self.message
            )
        }
    }
}

impl From<String> for ParserError {
    fn from(message: String) -> Self {
        Self {
            message,
            ..Default::default()
        }
    }
}

impl<'a> ParseError<&'a str> for ParserError {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        Self {
            nom_errors: vec![(input.to_owned(), kind)],
            message: "".to_string(),
        }
    }

    fn append(input: &'a str, kind: ErrorKind, mut other: Self) -> Self {
        other.nom_errors.push((input.to_owned(), kind));
        other
    }
}

/// Parses roxygen-documented R code into tool descriptions.
///
/// The parser holds no state between calls: each call to [`RoxygenParser::parse`] builds a
/// fresh model, and the instruction registries are only ever read.
#[derive(Default)]
pub struct RoxygenParser {
    registries: Registries,
    config: ParserConfig,
}

impl RoxygenParser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            registries: Registries::default(),
            config,
        }
    }

    /// Parses the roxygen comment lines of `input`.
    ///
    /// Fails if the input has no roxygen lines, or if a `@description` or `@return` directive
    /// cannot be resolved completely.
    pub fn parse(&self, input: &[u8]) -> BaryonResult<ToolDescription> {
        let comment = extract_comment(input);
        if comment.is_empty() {
            return Err(BaryonError::NoDocumentation);
        }

        let (_, entries) = tokenize(&comment)?;
        let mut builder = ToolBuilder::new(&self.registries, &self.config);
        for entry in entries {
            builder.apply(&entry)?;
        }
        Ok(builder.finish())
    }
}

/// Accumulates the tool description of one parse.
struct ToolBuilder<'p> {
    registries: &'p Registries,
    config: &'p ParserConfig,
    tool: ToolDescription,
}

impl<'p> ToolBuilder<'p> {
    fn new(registries: &'p Registries, config: &'p ParserConfig) -> Self {
        Self {
            registries,
            config,
            tool: ToolDescription::default(),
        }
    }

    fn apply(&mut self, entry: &Entry) -> BaryonResult<()> {
        debug!("Processing @{} entry", entry.tag);
        match entry.tag {
            "param" => self.param(entry.body),
            "description" => self.description(entry.body),
            "author" => {
                self.author(entry.body);
                Ok(())
            }
            "return" => self.output(entry.body),
            _ => {
                debug!("Skipping unsupported tag @{}", entry.tag);
                Ok(())
            }
        }
    }

    fn param(&mut self, body: &str) -> BaryonResult<()> {
        let body = body.trim_start();
        let (name, help) = body
            .split_once(char::is_whitespace)
            .unwrap_or((body, ""));
        if name.is_empty() {
            return Ok(());
        }

        let mut param = Param::new(name, "");
        let help = self.registries.param.resolve(
            help,
            &mut param,
            self.config.unknown_param_instructions,
        )?;
        param.help = help;
        param.validate(self.config.untyped_params)?;

        debug!("Adding param {:?} of type {:?}", param.name, param.type_name);
        self.tool
            .inputs
            .get_or_insert_with(Default::default)
            .params
            .push(param);
        Ok(())
    }

    fn description(&mut self, body: &str) -> BaryonResult<()> {
        let description = self.registries.description.resolve(
            body,
            &mut self.tool,
            UnknownInstructionPolicy::Fail,
        )?;
        self.tool.description = description;
        Ok(())
    }

    fn author(&mut self, body: &str) {
        let creator = self.tool.creator.get_or_insert_with(Creator::default);
        creator.persons.extend(
            body.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(|name| Person {
                    name: name.to_owned(),
                }),
        );
    }

    /// The text of a `@return` is not part of the model, only its directive is.
    fn output(&mut self, body: &str) -> BaryonResult<()> {
        let mut outputs = Outputs::default();
        self.registries
            .output
            .resolve(body, &mut outputs, UnknownInstructionPolicy::Fail)?;
        if !outputs.data.is_empty() {
            self.tool
                .outputs
                .get_or_insert_with(Outputs::default)
                .data
                .append(&mut outputs.data);
        }
        Ok(())
    }

    fn finish(self) -> ToolDescription {
        self.tool
    }
}
