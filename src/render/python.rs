use crate::error::BaryonResult;
use crate::render::{container_prefix, require_command, supported_containers, Renderer};
use crate::tool::kind::{ParamKind, FLOAT_PATTERN, INTEGER_PATTERN};
use crate::tool::{Param, ToolDescription};
use std::fmt::Write;

const PARSE_ARGUMENTS: &str = r#"def parse_arguments(argv):
    """Collects --name=value arguments into a dict."""
    arguments = {}
    for argument in argv:
        if argument.startswith("--") and "=" in argument:
            name, value = argument[2:].split("=", 1)
            arguments[name] = value
    return arguments
"#;

/// Renders the tool as a Python script taking `--name=value` arguments.
pub struct PythonRenderer;

impl Renderer for PythonRenderer {
    fn render(&self, tool: &ToolDescription) -> BaryonResult<String> {
        let command = require_command(tool, "python")?;
        let containers = supported_containers(tool)?;

        let mut script = String::from("#!/usr/bin/env python3\n");
        writeln!(script, "\"\"\"{}\"\"\"", docstring(&tool.description))?;
        script.push_str("\nimport os\nimport re\nimport subprocess\nimport sys\n\n");
        writeln!(script, "INTEGER_PATTERN = r\"{}\"", INTEGER_PATTERN)?;
        writeln!(script, "FLOAT_PATTERN = r\"{}\"", FLOAT_PATTERN)?;
        script.push_str("\n\n");
        script.push_str(PARSE_ARGUMENTS);
        script.push_str("\n\ndef main(argv):\n");
        script.push_str("    arguments = parse_arguments(argv)\n\n");

        for param in tool.params() {
            script.push_str(&param_block(param)?);
            script.push('\n');
        }

        let command = interpolate(&command.value, tool.params());
        if containers.is_empty() {
            writeln!(script, "    {}", run(&command))?;
        }
        for container in containers {
            let prefix = fstring_literal(&container_prefix(container));
            writeln!(script, "    {}", run(&format!("{} {}", prefix, command)))?;
        }

        script.push_str("\n\nif __name__ == \"__main__\":\n    main(sys.argv[1:])\n");
        Ok(script)
    }
}

/// Reads the param from the arguments, falling back to its default value, and checks it.
fn param_block(param: &Param) -> BaryonResult<String> {
    let kind = param.resolve_type()?.kind();
    let name = &param.name;
    let value = format!("arguments[\"{}\"]", name);

    let help = param.help.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut block = String::new();
    writeln!(block, "    # --{}: {}", name, help)?;
    writeln!(
        block,
        "    arguments.setdefault(\"{}\", {})",
        name,
        string_literal(&param.value)
    )?;
    writeln!(block, "    if {}:", predicate(kind, &value))?;
    // Only a required param aborts the script, an optional one warns like in the Bash script.
    if param.optional {
        writeln!(
            block,
            "        print(\"warning: --{} should be {}, got %r\" % {}, file=sys.stderr)",
            name,
            kind.expectation(),
            value
        )?;
    } else {
        writeln!(
            block,
            "        raise ValueError(\"--{} must be {}, got %r\" % {})",
            name,
            kind.expectation(),
            value
        )?;
    }
    Ok(block)
}

/// An expression that is true if `value` is invalid.
pub(super) fn predicate(kind: ParamKind, value: &str) -> String {
    match kind {
        ParamKind::String | ParamKind::Enum => format!("not {}", value),
        ParamKind::Int => format!("re.fullmatch(INTEGER_PATTERN, {}) is None", value),
        ParamKind::Float => format!("re.fullmatch(FLOAT_PATTERN, {}) is None", value),
        ParamKind::Bool => format!("{} not in (\"true\", \"false\")", value),
        ParamKind::File => format!("not os.path.isfile({})", value),
    }
}

/// Turns the command into the body of an f-string.
/// `$name` tokens naming a param become references to its value, all other tokens are
/// kept literally. Tokens are joined by single spaces.
fn interpolate(command: &str, params: &[Param]) -> String {
    command
        .split_whitespace()
        .map(|token| {
            let referenced = token
                .strip_prefix('$')
                .map(Param::galaxy_name)
                .filter(|name| params.iter().any(|param| &param.name == name));
            match referenced {
                Some(name) => format!("{{arguments['{}']}}", name),
                None => fstring_literal(token),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn run(command: &str) -> String {
    format!("subprocess.run(f\"{}\", shell=True, check=True)", command)
}

/// Escapes text for use inside a double-quoted f-string.
fn fstring_literal(s: &str) -> String {
    escape(s).replace('{', "{{").replace('}', "}}")
}

fn string_literal(s: &str) -> String {
    format!("\"{}\"", escape(s))
}

fn escape(s: &str) -> String {
    s.replace('\\', r"\\")
        .replace('"', "\\\"")
        .replace('\n', r"\n")
}

fn docstring(s: &str) -> String {
    s.replace('\\', r"\\").replace('"', "\\\"")
}
