//! The four supported text formats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// A supported serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Xml,
    Yaml,
    Csv,
}

impl Format {
    /// Every format, in detection priority order.
    pub const ALL: [Format; 4] = [Format::Xml, Format::Json, Format::Yaml, Format::Csv];

    /// Lowercase name as used in routes and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
            Format::Yaml => "yaml",
            Format::Csv => "csv",
        }
    }

    /// HTTP `Content-Type` for a response body in this format.
    pub fn content_type(self) -> &'static str {
        match self {
            Format::Json => "application/json; charset=utf-8",
            Format::Xml => "application/xml; charset=utf-8",
            Format::Yaml => "application/x-yaml; charset=utf-8",
            Format::Csv => "text/csv; charset=utf-8",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Json => "JSON",
            Format::Xml => "XML",
            Format::Yaml => "YAML",
            Format::Csv => "CSV",
        };
        f.write_str(name)
    }
}

impl FromStr for Format {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "xml" => Ok(Format::Xml),
            "yaml" | "yml" => Ok(Format::Yaml),
            "csv" => Ok(Format::Csv),
            _ => Err(ConvertError::UnsupportedFormat(s.to_string())),
        }
    }
}
