use crate::error::BaryonResult;
use crate::render::{container_prefix, require_command, supported_containers, Renderer};
use crate::tool::kind::{ParamKind, FLOAT_PATTERN, INTEGER_PATTERN};
use crate::tool::{Param, ToolDescription, RESERVED_PARAM_PREFIX};
use std::fmt::Write;

/// Prints the flags of the script by reading its own argument parsers.
const USAGE_FLAGS: &str = r#"    sed -n 's/^ *\(--[A-Za-z0-9_]*\)=\*) # \(.*\)$/  \1=value  \2/p' "$0""#;

/// Renders the tool as a Bash script taking `--name=value` arguments.
pub struct BashRenderer;

impl Renderer for BashRenderer {
    fn render(&self, tool: &ToolDescription) -> BaryonResult<String> {
        let command = require_command(tool, "bash")?;
        let containers = supported_containers(tool)?;

        let mut script = String::from("#!/bin/bash\n");
        if !tool.description.is_empty() {
            script.push_str("#\n");
            for line in tool.description.lines() {
                writeln!(script, "# {}", line)?;
            }
        }
        script.push('\n');

        writeln!(script, "INTEGER_PATTERN={}", quote(INTEGER_PATTERN))?;
        writeln!(script, "FLOAT_PATTERN={}", quote(FLOAT_PATTERN))?;
        script.push('\n');

        script.push_str("usage() {\n");
        for line in tool.description.lines() {
            writeln!(script, "    echo {}", quote(line))?;
        }
        script.push_str("    echo\n");
        script.push_str("    echo \"Usage: $(basename \"$0\") [--name=value ...]\"\n");
        script.push_str("    echo\n");
        script.push_str(USAGE_FLAGS);
        script.push_str("\n}\n\n");

        let arg = loop_variable();
        writeln!(script, "for {arg} in \"$@\"; do")?;
        writeln!(script, "    case \"${{{arg}}}\" in")?;
        script.push_str(concat!(
            "        -h|--help)\n",
            "            usage\n",
            "            exit 0\n",
            "            ;;\n",
            "    esac\n",
            "done\n\n",
        ));

        for param in tool.params() {
            script.push_str(&param_block(param)?);
            script.push('\n');
        }

        if containers.is_empty() {
            writeln!(script, "{}", command.value)?;
        }
        for container in containers {
            writeln!(script, "{} {}", container_prefix(container), command.value)?;
        }
        Ok(script)
    }
}

/// Parses `--name=value` into a variable named like the param and checks its value.
fn param_block(param: &Param) -> BaryonResult<String> {
    let kind = param.resolve_type()?.kind();
    let name = &param.name;
    let help = param.help.split_whitespace().collect::<Vec<_>>().join(" ");
    let arg = loop_variable();

    let mut block = String::new();
    writeln!(block, "# --{}: {}", name, help)?;
    writeln!(block, "{}={}", name, quote(&param.value))?;
    writeln!(block, "for {arg} in \"$@\"; do")?;
    writeln!(block, "    case \"${{{arg}}}\" in")?;
    writeln!(block, "        --{}=*) # {}", name, help)?;
    writeln!(block, "            {}=\"${{{arg}#*=}}\"", name)?;
    writeln!(block, "            ;;")?;
    writeln!(block, "    esac")?;
    writeln!(block, "done")?;
    writeln!(block, "if {}; then", predicate(kind, name))?;
    if param.optional {
        writeln!(
            block,
            "    echo \"warning: --{name} should be {}, got '${{{name}}}'\" >&2",
            kind.expectation()
        )?;
    } else {
        writeln!(
            block,
            "    echo \"error: --{name} must be {}, got '${{{name}}}'\" >&2",
            kind.expectation()
        )?;
        writeln!(block, "    usage >&2")?;
        writeln!(block, "    exit 1")?;
    }
    writeln!(block, "fi")?;
    Ok(block)
}

/// The variable the argument loops iterate with, out of reach of param names.
fn loop_variable() -> String {
    format!("{}_arg", RESERVED_PARAM_PREFIX)
}

/// A test that succeeds if the variable holds an invalid value.
pub(super) fn predicate(kind: ParamKind, variable: &str) -> String {
    let value = format!("\"${{{}}}\"", variable);
    match kind {
        ParamKind::String | ParamKind::Enum => format!("[[ -z {} ]]", value),
        ParamKind::Int => format!("[[ ! {} =~ ${{INTEGER_PATTERN}} ]]", value),
        ParamKind::Float => format!("[[ ! {} =~ ${{FLOAT_PATTERN}} ]]", value),
        ParamKind::Bool => format!("[[ {0} != \"true\" && {0} != \"false\" ]]", value),
        ParamKind::File => format!("[[ ! -f {} ]]", value),
    }
}

/// Quotes a string for the shell using single quotes.
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
