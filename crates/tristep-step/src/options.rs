//! Export options.

use crate::error::StepError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Application protocol written to `FILE_SCHEMA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Schema {
    /// AP203, `CONFIG_CONTROL_DESIGN`.
    #[default]
    #[serde(rename = "ap203", alias = "config_control_design")]
    ConfigControlDesign,
    /// AP214, `AUTOMOTIVE_DESIGN`.
    #[serde(rename = "ap214", alias = "automotive_design")]
    AutomotiveDesign,
}

impl Schema {
    /// Schema identifier inside `FILE_SCHEMA((...))`.
    pub fn file_schema(self) -> &'static str {
        match self {
            Schema::ConfigControlDesign => "CONFIG_CONTROL_DESIGN",
            Schema::AutomotiveDesign => "AUTOMOTIVE_DESIGN { 1 0 10303 214 1 1 1 1 }",
        }
    }

    /// `APPLICATION_CONTEXT` application text.
    pub fn application(self) -> &'static str {
        match self {
            Schema::ConfigControlDesign => {
                "configuration controlled 3D designs of mechanical parts and assemblies"
            }
            Schema::AutomotiveDesign => "core data for automotive mechanical design processes",
        }
    }

    /// Schema name and year for `APPLICATION_PROTOCOL_DEFINITION`.
    pub fn protocol(self) -> (&'static str, i64) {
        match self {
            Schema::ConfigControlDesign => ("config_control_design", 1994),
            Schema::AutomotiveDesign => ("automotive_design", 2000),
        }
    }
}

impl FromStr for Schema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ap203" | "config_control_design" => Ok(Schema::ConfigControlDesign),
            "ap214" | "automotive_design" => Ok(Schema::AutomotiveDesign),
            other => Err(format!("unknown schema '{other}' (expected ap203 or ap214)")),
        }
    }
}

/// Length unit declared in the representation context.
///
/// Coordinates are written as given; the unit only tells readers how to
/// interpret them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    /// Millimetres.
    #[default]
    #[serde(rename = "mm")]
    Millimetre,
    /// Centimetres.
    #[serde(rename = "cm")]
    Centimetre,
    /// Metres.
    #[serde(rename = "m")]
    Metre,
}

impl LengthUnit {
    /// SI prefix enumeration, `None` for the bare metre.
    pub fn si_prefix(self) -> Option<&'static str> {
        match self {
            LengthUnit::Millimetre => Some("MILLI"),
            LengthUnit::Centimetre => Some("CENTI"),
            LengthUnit::Metre => None,
        }
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mm" | "millimetre" | "millimeter" => Ok(LengthUnit::Millimetre),
            "cm" | "centimetre" | "centimeter" => Ok(LengthUnit::Centimetre),
            "m" | "metre" | "meter" => Ok(LengthUnit::Metre),
            other => Err(format!("unknown length unit '{other}' (expected mm, cm or m)")),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LengthUnit::Millimetre => "mm",
            LengthUnit::Centimetre => "cm",
            LengthUnit::Metre => "m",
        })
    }
}

/// STEP export options: header metadata and product naming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepOptions {
    /// Name of the produced file, also written to `FILE_NAME`.
    pub file_name: String,
    /// `FILE_DESCRIPTION` text.
    pub description: String,
    /// Author name for file metadata.
    pub author: String,
    /// Organization name for file metadata.
    pub organization: String,
    /// Preprocessor (tool name and version).
    pub preprocessor: String,
    /// System that originated the geometry.
    pub originating_system: String,
    /// Authorization field of `FILE_NAME`.
    pub authorization: String,
    /// Product id and name.
    pub product_name: String,
    /// Product description.
    pub product_description: String,
    /// Application protocol.
    pub schema: Schema,
    /// Length unit of the coordinates.
    pub unit: LengthUnit,
    /// Fixed `FILE_NAME` timestamp; the current UTC time when unset.
    pub timestamp: Option<String>,
}

impl Default for StepOptions {
    fn default() -> Self {
        Self {
            file_name: "model.step".to_string(),
            description: "tristep export".to_string(),
            author: "tristep".to_string(),
            organization: String::new(),
            preprocessor: concat!("tristep v", env!("CARGO_PKG_VERSION")).to_string(),
            originating_system: "tristep".to_string(),
            authorization: String::new(),
            product_name: "Model".to_string(),
            product_description: String::new(),
            schema: Schema::default(),
            unit: LengthUnit::default(),
            timestamp: None,
        }
    }
}

impl StepOptions {
    /// Parse options from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, StepError> {
        Ok(toml::from_str(s)?)
    }
}
