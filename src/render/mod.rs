//! Renderers turning a finished [`ToolDescription`] into target text.

use crate::error::{BaryonError, BaryonResult};
use crate::tool::{Command, Container, ToolDescription};

mod bash;
mod python;
mod xml;


pub use bash::BashRenderer;
pub use python::PythonRenderer;
pub use xml::XmlRenderer;

/// A renderer of tool descriptions.
pub trait Renderer {
    /// Renders the tool. The tool is only read.
    fn render(&self, tool: &ToolDescription) -> BaryonResult<String>;
}

/// The kinds of output baryon can produce.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum OutputMode {
    /// A Galaxy tool XML file.
    #[default]
    Xml,
    /// A Bash wrapper script.
    Bash,
    /// A Python wrapper script.
    Python,
}

impl OutputMode {
    pub fn renderer(self) -> Box<dyn Renderer> {
        match self {
            OutputMode::Xml => Box::new(XmlRenderer),
            OutputMode::Bash => Box::new(BashRenderer),
            OutputMode::Python => Box::new(PythonRenderer),
        }
    }
}

/// Returns the command of the tool, which every script needs.
fn require_command<'t>(tool: &'t ToolDescription, target: &'static str) -> BaryonResult<&'t Command> {
    tool.command
        .as_ref()
        .ok_or(BaryonError::MissingCommand { target })
}

/// Returns the containers of the tool, failing on the first one no script can run.
fn supported_containers(tool: &ToolDescription) -> BaryonResult<&[Container]> {
    let containers = tool.containers();
    if let Some(container) = containers.iter().find(|container| !container.is_supported()) {
        return Err(BaryonError::UnsupportedContainer {
            container_type: container.container_type.clone(),
        });
    }
    Ok(containers)
}

/// The shell command line starting `container`, to be followed by the tool's command.
fn container_prefix(container: &Container) -> String {
    let mut prefix = String::from("docker run --rm");
    for volume in &container.volumes {
        prefix.push_str(&format!(
            " -v \"{}:{}\"",
            volume.host_path, volume.guest_path
        ));
    }
    prefix.push(' ');
    prefix.push_str(&container.value);
    prefix
}
