//! Resolution of `$B{...}` directives.
//!
//! A directive is a `;`-separated list of instructions, each a name made of letters or `!`,
//! optionally followed by a parenthesized, comma-separated argument list:
//!
//! ```text
//! $B{type(integer); value(3); !}
//! ```
//!
//! Arguments are raw text. There is no nesting and no escaping of `;`, `,` or `)`.
//! Instructions are dispatched by name to the handlers of a read-only [`InstructionRegistry`].

use crate::config::UnknownInstructionPolicy;
use crate::error::{BaryonError, BaryonResult};
use crate::parser::ParserResult;
use crate::tool::{
    Command, Container, Data, Outputs, Param, ParamOption, Requirements, ToolDescription,
    VolumeMapping, DEFAULT_CONTAINER_TYPE,
};
use log::{trace, warn};
use nom::bytes::complete::{tag, take_till, take_until, take_while1};
use nom::character::complete::{char, space0};
use nom::combinator::opt;
use nom::sequence::delimited;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// The tag a directive appears in. Each context has its own set of instructions.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InstructionContext {
    Param,
    Description,
    Return,
}

impl Display for InstructionContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InstructionContext::Param => "param",
            InstructionContext::Description => "description",
            InstructionContext::Return => "return",
        };
        write!(f, "{}", name)
    }
}

/// A directive found in a text.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Directive<'a> {
    /// The text with the directive removed, trimmed.
    pub text: String,
    /// The content between `$B{` and `}`.
    pub content: &'a str,
}

impl<'a> Directive<'a> {
    /// Locates the first directive in `text`.
    /// Returns `None` if there is none, which is not an error.
    pub fn find(text: &'a str) -> Option<Self> {
        let (after, (before, content)) = directive_span(text).ok()?;
        Some(Self {
            text: format!("{}{}", before, after).trim().to_owned(),
            content,
        })
    }

    /// The non-empty instructions of the directive, trimmed, in order.
    pub fn instructions(&self) -> impl Iterator<Item = &'a str> {
        self.content
            .split(';')
            .map(str::trim)
            .filter(|instruction| !instruction.is_empty())
    }
}

fn directive_span(s: &str) -> ParserResult<(&str, &str)> {
    let (s, before) = take_until("$B{")(s)?;
    let (s, content) = delimited(tag("$B{"), take_till(|c: char| c == '}'), char('}'))(s)?;
    Ok((s, (before, content)))
}

/// One parsed instruction.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct Instruction<'a> {
    pub name: &'a str,
    /// The raw text between the parentheses, empty if there were none.
    pub arguments: &'a str,
}

impl<'a> Instruction<'a> {
    /// Parses an instruction. Text following the argument list is ignored.
    pub fn parse(instruction: &'a str) -> Option<Self> {
        nom_instruction(instruction).ok().map(|(_, instruction)| instruction)
    }

    /// The raw arguments, trimmed.
    pub fn argument(&self) -> &'a str {
        self.arguments.trim()
    }

    /// The comma-separated arguments, each trimmed.
    /// An instruction without arguments has an empty argument list.
    pub fn argument_list(&self) -> Vec<&'a str> {
        if self.argument().is_empty() {
            Vec::new()
        } else {
            self.arguments.split(',').map(str::trim).collect()
        }
    }
}

fn nom_instruction(s: &str) -> ParserResult<Instruction> {
    let (s, name) = take_while1(|c: char| c.is_ascii_alphabetic() || c == '!')(s)?;
    let (s, _) = space0(s)?;
    let (s, arguments) = opt(delimited(
        char('('),
        take_till(|c: char| c == ')'),
        opt(char(')')),
    ))(s)?;
    Ok((
        s,
        Instruction {
            name,
            arguments: arguments.unwrap_or_default(),
        },
    ))
}

/// A function applying one instruction to its target.
pub type InstructionHandler<T> = fn(&mut T, &Instruction) -> BaryonResult<()>;

/// Maps instruction names to handlers for one context.
/// A registry is assembled once and never modified afterwards, so parsers can share it freely.
pub struct InstructionRegistry<T> {
    context: InstructionContext,
    handlers: BTreeMap<&'static str, InstructionHandler<T>>,
}

impl<T> InstructionRegistry<T> {
    pub fn new(context: InstructionContext) -> Self {
        Self {
            context,
            handlers: BTreeMap::new(),
        }
    }

    /// Adds a handler. Only used while assembling the registry.
    pub fn with(mut self, name: &'static str, handler: InstructionHandler<T>) -> Self {
        self.handlers.insert(name, handler);
        self
    }

    pub fn get(&self, name: &str) -> Option<InstructionHandler<T>> {
        self.handlers.get(name).copied()
    }

    /// Resolves the first directive of `text` against `target`.
    /// Returns the text without the directive, trimmed.
    /// Text without a directive is returned trimmed and nothing is applied.
    pub fn resolve(
        &self,
        text: &str,
        target: &mut T,
        policy: UnknownInstructionPolicy,
    ) -> BaryonResult<String> {
        let directive = match Directive::find(text) {
            Some(directive) => directive,
            None => return Ok(text.trim().to_owned()),
        };

        for raw_instruction in directive.instructions() {
            let instruction = match Instruction::parse(raw_instruction) {
                Some(instruction) => instruction,
                None => {
                    self.reject(
                        policy,
                        BaryonError::MalformedInstruction {
                            context: self.context,
                            instruction: raw_instruction.to_owned(),
                        },
                    )?;
                    continue;
                }
            };
            let handler = match self.get(instruction.name) {
                Some(handler) => handler,
                None => {
                    self.reject(
                        policy,
                        BaryonError::UnknownInstruction {
                            context: self.context,
                            name: instruction.name.to_owned(),
                        },
                    )?;
                    continue;
                }
            };
            trace!(
                "Applying {} instruction {:?} with arguments {:?}",
                self.context,
                instruction.name,
                instruction.arguments
            );
            handler(target, &instruction)?;
        }

        Ok(directive.text)
    }

    fn reject(&self, policy: UnknownInstructionPolicy, error: BaryonError) -> BaryonResult<()> {
        match policy {
            UnknownInstructionPolicy::Skip => {
                warn!("{} Continuing.", error);
                Ok(())
            }
            UnknownInstructionPolicy::Fail => Err(error),
        }
    }
}

/// The instruction registries of all contexts.
pub struct Registries {
    pub param: InstructionRegistry<Param>,
    pub description: InstructionRegistry<ToolDescription>,
    pub output: InstructionRegistry<Outputs>,
}

impl Default for Registries {
    fn default() -> Self {
        Self {
            param: param_registry(),
            description: description_registry(),
            output: return_registry(),
        }
    }
}

fn instruction_error(
    context: InstructionContext,
    instruction: &Instruction,
    message: impl Into<String>,
) -> BaryonError {
    BaryonError::InstructionError {
        context,
        name: instruction.name.to_owned(),
        message: message.into(),
    }
}

fn param_registry() -> InstructionRegistry<Param> {
    fn required(param: &mut Param, _: &Instruction) -> BaryonResult<()> {
        param.optional = false;
        Ok(())
    }

    InstructionRegistry::<Param>::new(InstructionContext::Param)
        .with("!", required)
        .with("required", required)
        .with("type", |param, instruction| {
            param.type_name = instruction.argument().to_owned();
            Ok(())
        })
        .with("value", |param, instruction| {
            param.value = instruction.argument().to_owned();
            Ok(())
        })
        .with("options", |param, instruction| {
            param.options.extend(
                instruction
                    .argument_list()
                    .into_iter()
                    .filter(|option| !option.is_empty())
                    .map(ParamOption::new),
            );
            Ok(())
        })
}

fn description_registry() -> InstructionRegistry<ToolDescription> {
    const CONTEXT: InstructionContext = InstructionContext::Description;

    InstructionRegistry::<ToolDescription>::new(CONTEXT)
        .with("container", |tool, instruction| {
            let arguments = instruction.argument_list();
            let container = Container {
                value: arguments.first().copied().unwrap_or_default().to_owned(),
                container_type: arguments
                    .get(1)
                    .copied()
                    .unwrap_or(DEFAULT_CONTAINER_TYPE)
                    .to_owned(),
                volumes: Vec::new(),
            };
            container.validate()?;
            tool.requirements
                .get_or_insert_with(Requirements::default)
                .containers
                .push(container);
            Ok(())
        })
        .with("command", |tool, instruction| {
            let value = instruction.argument();
            if value.is_empty() {
                return Err(instruction_error(CONTEXT, instruction, "empty command"));
            }
            tool.command = Some(Command {
                value: value.to_owned(),
            });
            Ok(())
        })
        .with("volume", |tool, instruction| {
            let volume: VolumeMapping = instruction.argument().parse()?;
            let containers = match tool.requirements.as_mut() {
                Some(requirements) if !requirements.containers.is_empty() => {
                    &mut requirements.containers
                }
                _ => {
                    return Err(instruction_error(
                        CONTEXT,
                        instruction,
                        "no container declared before the volume",
                    ))
                }
            };
            for container in containers {
                container.volumes.push(volume.clone());
            }
            Ok(())
        })
}

fn return_registry() -> InstructionRegistry<Outputs> {
    InstructionRegistry::<Outputs>::new(InstructionContext::Return).with("data", |outputs, instruction| {
        let arguments = instruction.argument_list();
        if arguments.len() < 2 {
            return Err(instruction_error(
                InstructionContext::Return,
                instruction,
                "expected a name and a format",
            ));
        }
        let data = Data {
            name: arguments[0].to_owned(),
            format: arguments[1].to_owned(),
            label: arguments.get(2).copied().unwrap_or_default().to_owned(),
        };
        data.validate()?;
        outputs.data.push(data);
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_directive() {
        let directive = Directive::find("some help $B{type(integer);!} trailing").unwrap();
        assert_eq!(directive.text, "some help  trailing");
        assert_eq!(directive.content, "type(integer);!");
        assert_eq!(
            directive.instructions().collect::<Vec<_>>(),
            vec!["type(integer)", "!"]
        );
    }

    #[test]
    fn test_only_first_directive_is_found() {
        let directive = Directive::find("$B{a} and $B{b}").unwrap();
        assert_eq!(directive.content, "a");
        assert_eq!(directive.text, "and $B{b}");
    }

    #[test]
    fn test_no_directive() {
        assert_eq!(Directive::find("plain help"), None);
        assert_eq!(Directive::find("unterminated $B{type(integer)"), None);
    }

    #[test]
    fn test_empty_instructions_are_dropped() {
        let directive = Directive::find("$B{ ; required ;; }").unwrap();
        assert_eq!(directive.instructions().collect::<Vec<_>>(), vec!["required"]);
    }

    #[test]
    fn test_parse_instruction() {
        assert_eq!(
            Instruction::parse("type (integer)"),
            Some(Instruction {
                name: "type",
                arguments: "integer",
            })
        );
        assert_eq!(
            Instruction::parse("!"),
            Some(Instruction {
                name: "!",
                arguments: "",
            })
        );
        assert_eq!(
            Instruction::parse("command(echo $x"),
            Some(Instruction {
                name: "command",
                arguments: "echo $x",
            })
        );
        assert_eq!(Instruction::parse("(integer)"), None);
        assert_eq!(Instruction::parse("42"), None);
    }

    #[test]
    fn test_argument_list() {
        let instruction = Instruction::parse("data(out1, txt , Output File)").unwrap();
        assert_eq!(instruction.argument_list(), vec!["out1", "txt", "Output File"]);
        assert!(Instruction::parse("required()").unwrap().argument_list().is_empty());
    }

    #[test]
    fn test_resolve_param_instructions() {
        let registries = Registries::default();
        let mut param = Param::new("x", "");
        let help = registries
            .param
            .resolve(
                "pick one $B{type(select); options(a, b,, c); value(b); required}",
                &mut param,
                UnknownInstructionPolicy::Fail,
            )
            .unwrap();
        assert_eq!(help, "pick one");
        assert_eq!(param.type_name, "select");
        assert_eq!(param.value, "b");
        assert!(!param.optional);
        assert_eq!(
            param.options,
            vec![
                ParamOption::new("a"),
                ParamOption::new("b"),
                ParamOption::new("c")
            ]
        );
    }

    #[test]
    fn test_unknown_instruction_policy() {
        let registries = Registries::default();
        let mut param = Param::new("x", "");
        registries
            .param
            .resolve(
                "$B{frobnicate(1); type(float)}",
                &mut param,
                UnknownInstructionPolicy::Skip,
            )
            .unwrap();
        assert_eq!(param.type_name, "float");

        let error = registries
            .param
            .resolve(
                "$B{frobnicate(1); type(float)}",
                &mut Param::new("x", ""),
                UnknownInstructionPolicy::Fail,
            )
            .unwrap_err();
        assert!(matches!(
            error,
            BaryonError::UnknownInstruction {
                context: InstructionContext::Param,
                ..
            }
        ));
    }

    #[test]
    fn test_container_and_volume() {
        let registries = Registries::default();
        let mut tool = ToolDescription::default();
        registries
            .description
            .resolve(
                "$B{container(first); container(second, singularity); volume(/in:/data)}",
                &mut tool,
                UnknownInstructionPolicy::Fail,
            )
            .unwrap();
        let containers = tool.containers();
        assert_eq!(containers.len(), 2);
        assert_eq!(containers[0].container_type, "docker");
        assert_eq!(containers[1].container_type, "singularity");
        for container in containers {
            assert_eq!(
                container.volumes,
                vec![VolumeMapping {
                    host_path: "/in".into(),
                    guest_path: "/data".into(),
                }]
            );
        }
    }

    #[test]
    fn test_volume_without_container() {
        let registries = Registries::default();
        let error = registries
            .description
            .resolve(
                "$B{volume(/in:/data)}",
                &mut ToolDescription::default(),
                UnknownInstructionPolicy::Fail,
            )
            .unwrap_err();
        assert!(matches!(error, BaryonError::InstructionError { .. }));
    }

    #[test]
    fn test_malformed_volume() {
        let registries = Registries::default();
        registries
            .description
            .resolve(
                "$B{container(image); volume(/in)}",
                &mut ToolDescription::default(),
                UnknownInstructionPolicy::Fail,
            )
            .unwrap_err();
    }

    #[test]
    fn test_empty_command() {
        let registries = Registries::default();
        registries
            .description
            .resolve(
                "$B{command()}",
                &mut ToolDescription::default(),
                UnknownInstructionPolicy::Fail,
            )
            .unwrap_err();
    }

    #[test]
    fn test_data_needs_two_arguments() {
        let registries = Registries::default();
        let mut outputs = Outputs::default();
        registries
            .output
            .resolve("$B{data(out1)}", &mut outputs, UnknownInstructionPolicy::Fail)
            .unwrap_err();
        registries
            .output
            .resolve("$B{data(out1, txt)}", &mut outputs, UnknownInstructionPolicy::Fail)
            .unwrap();
        assert_eq!(
            outputs.data,
            vec![Data {
                name: "out1".into(),
                format: "txt".into(),
                label: String::new(),
            }]
        );
    }
}
