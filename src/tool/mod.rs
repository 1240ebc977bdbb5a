//! The canonical tool model, shared between the parser and the renderers.
//!
//! Element and attribute names follow the Galaxy tool XML schema
//! (<https://docs.galaxyproject.org/en/master/dev/schema.html>), so the model can be
//! handed to the XML serializer as is.

use crate::config::UntypedParamPolicy;
use crate::error::{BaryonError, BaryonResult};
use serde::Serialize;
use std::str::FromStr;

pub mod kind;

use kind::GalaxyType;

/// The container type assumed when a `container(...)` instruction does not name one.
pub const DEFAULT_CONTAINER_TYPE: &str = "docker";

/// Param names the generated scripts cannot use as variables.
/// Names starting with [`RESERVED_PARAM_PREFIX`] are taken as well.
pub const RESERVED_PARAM_NAMES: &[&str] = &[
    "BASH_ENV",
    "CDPATH",
    "ENV",
    "FLOAT_PATTERN",
    "HOME",
    "IFS",
    "INTEGER_PATTERN",
    "LANG",
    "LC_ALL",
    "LD_LIBRARY_PATH",
    "LD_PRELOAD",
    "OLDPWD",
    "PATH",
    "PS4",
    "PWD",
    "SHELL",
    "SHELLOPTS",
    "TMPDIR",
    "USER",
];

/// Prefix of the variables the generated scripts use internally.
pub const RESERVED_PARAM_PREFIX: &str = "__baryon";

/// A tool description.
/// This is the root of the model produced by the parser.
/// Renderers only ever see it by shared reference.
#[derive(Serialize, Default, Eq, PartialEq, Debug, Clone)]
#[serde(rename = "tool")]
pub struct ToolDescription {
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<Creator>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Requirements>,

    /// The command line of the tool, possibly referencing params as `$name`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Command>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Inputs>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Outputs>,
}

impl ToolDescription {
    /// The declared params, in declaration order.
    pub fn params(&self) -> &[Param] {
        self.inputs
            .as_ref()
            .map(|inputs| inputs.params.as_slice())
            .unwrap_or_default()
    }

    /// The declared containers, in declaration order.
    pub fn containers(&self) -> &[Container] {
        self.requirements
            .as_ref()
            .map(|requirements| requirements.containers.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Serialize, Default, Eq, PartialEq, Debug, Clone)]
pub struct Creator {
    #[serde(rename = "person")]
    pub persons: Vec<Person>,
}

#[derive(Serialize, Default, Eq, PartialEq, Debug, Clone)]
pub struct Person {
    #[serde(rename = "@name")]
    pub name: String,
}

#[derive(Serialize, Default, Eq, PartialEq, Debug, Clone)]
pub struct Requirements {
    #[serde(rename = "container")]
    pub containers: Vec<Container>,
}

/// An execution environment of the tool.
#[derive(Serialize, Default, Eq, PartialEq, Debug, Clone)]
pub struct Container {
    /// Only `docker` can be rendered, but other types are kept in the model.
    #[serde(rename = "@type")]
    pub container_type: String,

    /// The container image.
    #[serde(rename = "$text")]
    pub value: String,

    /// Not part of the Galaxy schema.
    #[serde(skip)]
    pub volumes: Vec<VolumeMapping>,
}

impl Container {
    pub fn validate(&self) -> BaryonResult<()> {
        if self.value.is_empty() {
            return Err(BaryonError::validation(
                "container",
                "value",
                "must name an image",
            ));
        }
        if self.container_type.is_empty() {
            return Err(BaryonError::validation("container", "type", "must not be empty"));
        }
        Ok(())
    }

    /// Returns true if renderers know how to run this container.
    pub fn is_supported(&self) -> bool {
        self.container_type == DEFAULT_CONTAINER_TYPE
    }
}

#[derive(Default, Eq, PartialEq, Debug, Clone)]
pub struct VolumeMapping {
    pub host_path: String,
    pub guest_path: String,
}

impl FromStr for VolumeMapping {
    type Err = BaryonError;

    /// Parses a `host:guest` pair.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        match parts.as_slice() {
            [host_path, guest_path] if !host_path.is_empty() && !guest_path.is_empty() => {
                Ok(Self {
                    host_path: host_path.to_string(),
                    guest_path: guest_path.to_string(),
                })
            }
            _ => Err(BaryonError::validation(
                "volume",
                "mapping",
                format!("{:?} is not of the form host:guest", s),
            )),
        }
    }
}

#[derive(Serialize, Default, Eq, PartialEq, Debug, Clone)]
pub struct Command {
    #[serde(rename = "$text")]
    pub value: String,
}

#[derive(Serialize, Default, Eq, PartialEq, Debug, Clone)]
pub struct Inputs {
    #[serde(rename = "param")]
    pub params: Vec<Param>,
}

/// An input parameter of the tool.
#[derive(Serialize, Eq, PartialEq, Debug, Clone)]
pub struct Param {
    /// Never contains a dot, see [`Param::galaxy_name`].
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "@type")]
    pub type_name: String,

    #[serde(rename = "@value", skip_serializing_if = "String::is_empty")]
    pub value: String,

    #[serde(rename = "@optional")]
    pub optional: bool,

    #[serde(rename = "@help")]
    pub help: String,

    #[serde(rename = "option")]
    pub options: Vec<ParamOption>,
}

impl Default for Param {
    fn default() -> Self {
        Self {
            name: String::new(),
            type_name: String::new(),
            value: String::new(),
            optional: true,
            help: String::new(),
            options: Vec::new(),
        }
    }
}

impl Param {
    /// Creates an optional, untyped param.
    pub fn new(name: &str, help: impl Into<String>) -> Self {
        Self {
            name: Self::galaxy_name(name),
            help: help.into(),
            ..Default::default()
        }
    }

    /// Galaxy does not allow dots in param names, R code is full of them.
    pub fn galaxy_name(name: &str) -> String {
        name.replace('.', "__")
    }

    /// Returns the Galaxy type of this param, if it has a known one.
    pub fn galaxy_type(&self) -> Option<GalaxyType> {
        self.type_name.parse().ok()
    }

    /// Like [`Param::galaxy_type`], but an unknown or missing type is an error.
    pub fn resolve_type(&self) -> BaryonResult<GalaxyType> {
        self.galaxy_type().ok_or_else(|| BaryonError::UnknownType {
            param: self.name.clone(),
            type_name: self.type_name.clone(),
        })
    }

    /// `[A-Za-z_][A-Za-z0-9_]*`, valid both as a Galaxy param name and as a shell variable.
    fn is_identifier(name: &str) -> bool {
        let mut chars = name.chars();
        chars
            .next()
            .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    pub fn validate(&self, untyped_params: UntypedParamPolicy) -> BaryonResult<()> {
        if self.name.is_empty() {
            return Err(BaryonError::validation("param", "name", "must not be empty"));
        }
        if !Self::is_identifier(&self.name) {
            return Err(BaryonError::validation(
                "param",
                "name",
                format!(
                    "{:?} must consist of letters, digits and underscores, and not start with a digit",
                    self.name
                ),
            ));
        }
        if RESERVED_PARAM_NAMES.contains(&self.name.as_str())
            || self.name.starts_with(RESERVED_PARAM_PREFIX)
        {
            return Err(BaryonError::validation(
                "param",
                "name",
                format!("{:?} is reserved by the generated scripts", self.name),
            ));
        }
        if self.type_name.is_empty() {
            return match untyped_params {
                UntypedParamPolicy::FailAtRender => Ok(()),
                UntypedParamPolicy::FailAtParse => Err(BaryonError::validation(
                    "param",
                    "type",
                    format!("of {:?} is missing", self.name),
                )),
            };
        }
        if self.galaxy_type().is_none() {
            return Err(BaryonError::validation(
                "param",
                "type",
                format!("{:?} of {:?} is not a Galaxy type", self.type_name, self.name),
            ));
        }
        Ok(())
    }
}

/// A choice of a `select` param.
#[derive(Serialize, Default, Eq, PartialEq, Debug, Clone)]
pub struct ParamOption {
    #[serde(rename = "@value")]
    pub value: String,

    /// Currently always equal to `value`.
    #[serde(rename = "$text")]
    pub canonical_name: String,
}

impl ParamOption {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_owned(),
            canonical_name: value.to_owned(),
        }
    }
}

#[derive(Serialize, Default, Eq, PartialEq, Debug, Clone)]
pub struct Outputs {
    #[serde(rename = "data")]
    pub data: Vec<Data>,
}

/// An output dataset of the tool.
#[derive(Serialize, Default, Eq, PartialEq, Debug, Clone)]
pub struct Data {
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "@format")]
    pub format: String,

    #[serde(rename = "@label", skip_serializing_if = "String::is_empty")]
    pub label: String,
}

impl Data {
    pub fn validate(&self) -> BaryonResult<()> {
        if self.name.is_empty() {
            return Err(BaryonError::validation("data", "name", "must not be empty"));
        }
        if self.format.is_empty() {
            return Err(BaryonError::validation(
                "data",
                "format",
                format!("of {:?} must not be empty", self.name),
            ));
        }
        Ok(())
    }
}
