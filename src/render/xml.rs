use crate::error::{BaryonError, BaryonResult};
use crate::render::Renderer;
use crate::tool::ToolDescription;
use quick_xml::se::Serializer;
use serde::Serialize;

/// Serializes the tool as Galaxy tool XML.
/// Unlike the script renderers, this works without a command.
pub struct XmlRenderer;

impl Renderer for XmlRenderer {
    fn render(&self, tool: &ToolDescription) -> BaryonResult<String> {
        let mut buffer = String::new();
        let mut serializer = Serializer::new(&mut buffer);
        serializer.indent('\t', 1);
        tool.serialize(serializer)
            .map_err(|error| BaryonError::XmlError(error.to_string()))?;
        buffer.push('\n');
        Ok(buffer)
    }
}
