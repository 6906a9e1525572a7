//! Error types for parsing, serializing and routing conversions.

use thiserror::Error;

use crate::format::Format;

/// Errors that can occur during a conversion.
///
/// The facade wraps every failure in [`ConvertError::Conversion`] (or
/// [`ConvertError::AutoConversion`]) so the rendered message names the
/// direction, e.g. `Error converting CSV to XML: CSV parse error: ...`.
/// Use [`ConvertError::root_cause`] to get at the underlying kind.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The input was empty or whitespace-only.
    #[error("Invalid {0} data")]
    InvalidInput(String),

    /// The source text does not conform to its format's grammar.
    #[error("{format} parse error: {message}")]
    Parse { format: Format, message: String },

    /// The parsed value does not fit the shape the target format requires.
    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    /// Auto-detection could not classify the input.
    #[error("Could not detect input format")]
    FormatUndetected,

    /// The requested format name is not one of json, xml, yaml, csv.
    #[error("Unsupported format: '{0}'. Supported formats: json, xml, yaml, csv")]
    UnsupportedFormat(String),

    /// The requested (source, target) pair has no conversion.
    #[error("Conversion from {from} to {to} is not supported")]
    UnsupportedConversion { from: Format, to: Format },

    /// Nesting went past the configured recursion ceiling.
    #[error("Maximum nesting depth of {limit} exceeded")]
    DepthExceeded { limit: usize },

    /// A failure inside one directed conversion.
    #[error("Error converting {from} to {to}: {source}")]
    Conversion {
        from: Format,
        to: Format,
        #[source]
        source: Box<ConvertError>,
    },

    /// A failure inside auto-detect-then-convert.
    #[error("Error during auto-conversion: {source}")]
    AutoConversion {
        #[source]
        source: Box<ConvertError>,
    },
}

impl ConvertError {
    pub(crate) fn parse(format: Format, message: impl ToString) -> Self {
        ConvertError::Parse {
            format,
            message: message.to_string(),
        }
    }

    /// Strip the direction wrappers and return the error that actually failed.
    pub fn root_cause(&self) -> &ConvertError {
        match self {
            ConvertError::Conversion { source, .. } | ConvertError::AutoConversion { source } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

/// Convenience alias used throughout transform-core.
pub type Result<T> = std::result::Result<T, ConvertError>;
