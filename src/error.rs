//! The error types of baryon.

use crate::parser::instruction::InstructionContext;
use nom::{Err, Needed};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// An alias of `std::result::Result` with `BaryonError` as error type.
pub type BaryonResult<T> = Result<T, BaryonError>;

/// The pipeline stage an error originates from.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Stage {
    /// Reading the input.
    Io,
    /// Extracting the roxygen comment block.
    Extract,
    /// Splitting the comment block into tagged entries.
    Tokenize,
    /// Resolving `$B{...}` directives.
    Resolve,
    /// Building and validating the tool model.
    Build,
    /// Rendering the tool model.
    Render,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Io => "io",
            Stage::Extract => "extract",
            Stage::Tokenize => "tokenize",
            Stage::Resolve => "resolve",
            Stage::Build => "build",
            Stage::Render => "render",
        };
        write!(f, "{}", name)
    }
}

/// The main error type of baryon, wrapping all error types that may occur.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum BaryonError {
    #[error("No input provided.")]
    /// The input was empty.
    NoInput,

    #[error("No roxygen documentation found.")]
    /// The input contains no `#'` comment lines.
    NoDocumentation,

    #[error("Could not parse documentation: {0}")]
    /// An error that occurred in one of the nom parsers.
    ParserError(String),

    #[error("Unknown {context} instruction {name:?}.")]
    /// A directive names an instruction that is not registered for its context.
    UnknownInstruction {
        context: InstructionContext,
        name: String,
    },

    #[error("Malformed {context} instruction {instruction:?}.")]
    /// A directive contains something that is not an instruction.
    MalformedInstruction {
        context: InstructionContext,
        instruction: String,
    },

    #[error("{context} instruction {name:?} failed: {message}")]
    /// An instruction was found, but its arguments could not be applied.
    InstructionError {
        context: InstructionContext,
        name: String,
        message: String,
    },

    #[error("Invalid {entity}: field {field:?} {message}")]
    /// A model entity violates one of its invariants.
    ValidationError {
        entity: &'static str,
        field: &'static str,
        message: String,
    },

    #[error("Cannot render {target} script: the tool has no command.")]
    /// A script renderer was asked to render a tool without command.
    MissingCommand { target: &'static str },

    #[error("Unknown type {type_name:?} of param {param:?}.")]
    /// A param's type is not one of the known Galaxy types.
    UnknownType { param: String, type_name: String },

    #[error("Unsupported container type {container_type:?}, only docker is supported.")]
    /// A container of a type other than docker reached a renderer.
    UnsupportedContainer { container_type: String },

    #[error("Could not serialize tool as XML: {0}")]
    /// An error reported by the XML serializer.
    XmlError(String),

    #[error("Could not format output.")]
    /// Writing rendered text failed.
    FormatError(#[from] std::fmt::Error),

    #[error("I/O error: {0}")]
    /// An I/O error.
    IoError(#[from] ::std::io::Error),
}

impl BaryonError {
    /// Returns the pipeline stage this error was raised in.
    pub fn stage(&self) -> Stage {
        match self {
            Self::NoInput | Self::IoError(_) => Stage::Io,
            Self::NoDocumentation => Stage::Extract,
            Self::ParserError(_) => Stage::Tokenize,
            Self::UnknownInstruction { .. }
            | Self::MalformedInstruction { .. }
            | Self::InstructionError { .. } => Stage::Resolve,
            Self::ValidationError { .. } => Stage::Build,
            Self::MissingCommand { .. }
            | Self::UnknownType { .. }
            | Self::UnsupportedContainer { .. }
            | Self::XmlError(_)
            | Self::FormatError(_) => Stage::Render,
        }
    }

    pub(crate) fn validation(
        entity: &'static str,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::ValidationError {
            entity,
            field,
            message: message.into(),
        }
    }
}

impl<ErrorType: ToString> From<nom::Err<ErrorType>> for BaryonError {
    fn from(err: Err<ErrorType>) -> Self {
        match err {
            Err::Incomplete(needed) => match needed {
                Needed::Unknown => {
                    Self::ParserError("missing an unknown number of characters".to_owned())
                }
                Needed::Size(size) => Self::ParserError(format!("missing {} characters", size)),
            },
            Err::Error(e) => {
                Self::ParserError(format!("parser had a recoverable error: {}", e.to_string()))
            }
            Err::Failure(e) => Self::ParserError(format!(
                "parser had an unrecoverable error: {}",
                e.to_string()
            )),
        }
    }
}
