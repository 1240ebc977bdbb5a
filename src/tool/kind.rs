//! The Galaxy param types and the kinds of validation they map to.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Matches an integer with optional sign.
/// Every renderer emits this exact pattern, so all targets agree on what an integer is.
pub const INTEGER_PATTERN: &str = r"^[+-]?[0-9]+$";

/// Matches a decimal number with optional sign.
pub const FLOAT_PATTERN: &str = r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)$";

/// The closed set of param types Galaxy knows.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GalaxyType {
    Text,
    BaseUrl,
    Color,
    File,
    FtpFile,
    Hidden,
    HiddenData,
    Integer,
    Float,
    Boolean,
    GenomeBuild,
    Select,
    DataColumn,
    Data,
    DataCollection,
    DrillDown,
}

impl GalaxyType {
    pub const ALL: [GalaxyType; 16] = [
        GalaxyType::Text,
        GalaxyType::BaseUrl,
        GalaxyType::Color,
        GalaxyType::File,
        GalaxyType::FtpFile,
        GalaxyType::Hidden,
        GalaxyType::HiddenData,
        GalaxyType::Integer,
        GalaxyType::Float,
        GalaxyType::Boolean,
        GalaxyType::GenomeBuild,
        GalaxyType::Select,
        GalaxyType::DataColumn,
        GalaxyType::Data,
        GalaxyType::DataCollection,
        GalaxyType::DrillDown,
    ];

    /// The name of the type as written in tool XML and in `type(...)` instructions.
    pub fn name(self) -> &'static str {
        match self {
            GalaxyType::Text => "text",
            GalaxyType::BaseUrl => "baseurl",
            GalaxyType::Color => "color",
            GalaxyType::File => "file",
            GalaxyType::FtpFile => "ftpfile",
            GalaxyType::Hidden => "hidden",
            GalaxyType::HiddenData => "hidden_data",
            GalaxyType::Integer => "integer",
            GalaxyType::Float => "float",
            GalaxyType::Boolean => "boolean",
            GalaxyType::GenomeBuild => "genomebuild",
            GalaxyType::Select => "select",
            GalaxyType::DataColumn => "data_column",
            GalaxyType::Data => "data",
            GalaxyType::DataCollection => "data_collection",
            GalaxyType::DrillDown => "drill_down",
        }
    }

    /// The kind of value check a script performs for params of this type.
    pub fn kind(self) -> ParamKind {
        match self {
            GalaxyType::Text
            | GalaxyType::BaseUrl
            | GalaxyType::Color
            | GalaxyType::File
            | GalaxyType::FtpFile
            | GalaxyType::Hidden
            | GalaxyType::HiddenData => ParamKind::String,
            GalaxyType::Integer => ParamKind::Int,
            GalaxyType::Float => ParamKind::Float,
            GalaxyType::Boolean => ParamKind::Bool,
            GalaxyType::GenomeBuild | GalaxyType::Select => ParamKind::Enum,
            GalaxyType::DataColumn
            | GalaxyType::Data
            | GalaxyType::DataCollection
            | GalaxyType::DrillDown => ParamKind::File,
        }
    }
}

impl FromStr for GalaxyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GalaxyType::ALL
            .iter()
            .copied()
            .find(|galaxy_type| galaxy_type.name() == s)
            .ok_or_else(|| format!("unknown type {:?}", s))
    }
}

impl Display for GalaxyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The canonical kinds of value checks.
/// A generated script rejects a value if the predicate of its kind holds.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ParamKind {
    /// Rejects empty values.
    String,
    /// Rejects values not matching [`INTEGER_PATTERN`].
    Int,
    /// Rejects values not matching [`FLOAT_PATTERN`].
    Float,
    /// Rejects everything but `true` and `false`.
    Bool,
    /// Rejects empty values.
    Enum,
    /// Rejects values that are not paths of existing files.
    File,
}

impl ParamKind {
    /// Describes the values a param of this kind accepts, for error messages.
    pub fn expectation(self) -> &'static str {
        match self {
            ParamKind::String => "a non-empty string",
            ParamKind::Int => "an integer",
            ParamKind::Float => "a decimal number",
            ParamKind::Bool => "true or false",
            ParamKind::Enum => "a selection",
            ParamKind::File => "an existing file",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for galaxy_type in GalaxyType::ALL {
            assert_eq!(galaxy_type.name().parse::<GalaxyType>(), Ok(galaxy_type));
        }
    }

    #[test]
    fn test_unknown_names() {
        "".parse::<GalaxyType>().unwrap_err();
        "Integer".parse::<GalaxyType>().unwrap_err();
        "int".parse::<GalaxyType>().unwrap_err();
    }

    #[test]
    fn test_kinds() {
        assert_eq!(GalaxyType::HiddenData.kind(), ParamKind::String);
        assert_eq!(GalaxyType::Integer.kind(), ParamKind::Int);
        assert_eq!(GalaxyType::Float.kind(), ParamKind::Float);
        assert_eq!(GalaxyType::Boolean.kind(), ParamKind::Bool);
        assert_eq!(GalaxyType::GenomeBuild.kind(), ParamKind::Enum);
        assert_eq!(GalaxyType::DrillDown.kind(), ParamKind::File);
    }
}
