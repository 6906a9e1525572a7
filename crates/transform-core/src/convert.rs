//! Conversion facade.
//!
//! Every directed pair is `parse(source)` followed by `serialize(target)`.
//! Pairs that don't involve JSON go through JSON as a pivot: the source is
//! rendered as compact JSON text and that text is parsed again before the
//! target serializer runs. `xml_to_csv(x)` is therefore exactly
//! `json_to_csv(xml_to_json(x))` with zero indentation.
//!
//! All failures come back wrapped in [`ConvertError::Conversion`] naming the
//! direction, or [`ConvertError::AutoConversion`] for [`auto_convert`].

use log::debug;

use crate::detect::detect_format;
use crate::error::{ConvertError, Result};
use crate::format::Format;
use crate::options::ConvertOptions;
use crate::value::Value;
use crate::{csv, json, xml, yaml};

/// Convert `input` from one format to another.
///
/// Fails with [`ConvertError::UnsupportedConversion`] when `from == to`.
///
/// ```
/// use transform_core::{convert, ConvertOptions, Format};
///
/// let opts = ConvertOptions::default().with_indentation(0);
/// let out = convert(Format::Csv, Format::Json, "id,name\n1,Alice", &opts).unwrap();
/// assert_eq!(out, r#"[{"id":1,"name":"Alice"}]"#);
/// ```
pub fn convert(from: Format, to: Format, input: &str, options: &ConvertOptions) -> Result<String> {
    if from == to {
        return Err(ConvertError::UnsupportedConversion { from, to });
    }
    convert_pair(from, to, input, options).map_err(|source| ConvertError::Conversion {
        from,
        to,
        source: Box::new(source),
    })
}

fn convert_pair(from: Format, to: Format, input: &str, options: &ConvertOptions) -> Result<String> {
    if input.trim().is_empty() {
        return Err(ConvertError::InvalidInput(from.to_string()));
    }

    let mut value = parse(from, input, options.max_depth)?;
    if from != Format::Json && to != Format::Json {
        let pivot = json::serialize(&value, 0)?;
        debug!("{from} -> {to}: pivoting through {} bytes of JSON", pivot.len());
        value = json::parse(&pivot, options.max_depth)?;
    }
    serialize(to, &value, options)
}

/// Detect the input's format, then convert it to `target`.
///
/// Input already in the target format is returned unchanged.
pub fn auto_convert(input: &str, target: Format, options: &ConvertOptions) -> Result<String> {
    auto_convert_inner(input, target, options).map_err(|source| ConvertError::AutoConversion {
        source: Box::new(source),
    })
}

fn auto_convert_inner(input: &str, target: Format, options: &ConvertOptions) -> Result<String> {
    if input.trim().is_empty() {
        return Err(ConvertError::InvalidInput("input".to_string()));
    }
    let source = detect_format(input)?;
    if source == target {
        debug!("input is already {target}, returning it unchanged");
        return Ok(input.to_string());
    }
    convert(source, target, input, options)
}

/// Parse text in `format` into a [`Value`].
pub fn parse(format: Format, input: &str, max_depth: usize) -> Result<Value> {
    match format {
        Format::Json => json::parse(input, max_depth),
        Format::Xml => xml::parse(input, max_depth),
        Format::Yaml => yaml::parse(input, max_depth),
        Format::Csv => csv::parse(input, max_depth),
    }
}

/// Serialize a [`Value`] as `format`.
///
/// `indentation` is honored by JSON and XML; `root_name` only by XML.
pub fn serialize(format: Format, value: &Value, options: &ConvertOptions) -> Result<String> {
    match format {
        Format::Json => json::serialize(value, options.indentation),
        Format::Xml => xml::serialize(value, &options.root_name, options.indentation),
        Format::Yaml => yaml::serialize(value),
        Format::Csv => csv::serialize(value),
    }
}

// ============================================================================
// Named pair conversions
// ============================================================================

pub fn json_to_xml(input: &str, options: &ConvertOptions) -> Result<String> {
    convert(Format::Json, Format::Xml, input, options)
}

pub fn json_to_yaml(input: &str, options: &ConvertOptions) -> Result<String> {
    convert(Format::Json, Format::Yaml, input, options)
}

pub fn json_to_csv(input: &str, options: &ConvertOptions) -> Result<String> {
    convert(Format::Json, Format::Csv, input, options)
}

pub fn xml_to_json(input: &str, options: &ConvertOptions) -> Result<String> {
    convert(Format::Xml, Format::Json, input, options)
}

pub fn xml_to_yaml(input: &str, options: &ConvertOptions) -> Result<String> {
    convert(Format::Xml, Format::Yaml, input, options)
}

pub fn xml_to_csv(input: &str, options: &ConvertOptions) -> Result<String> {
    convert(Format::Xml, Format::Csv, input, options)
}

pub fn yaml_to_json(input: &str, options: &ConvertOptions) -> Result<String> {
    convert(Format::Yaml, Format::Json, input, options)
}

pub fn yaml_to_xml(input: &str, options: &ConvertOptions) -> Result<String> {
    convert(Format::Yaml, Format::Xml, input, options)
}

pub fn yaml_to_csv(input: &str, options: &ConvertOptions) -> Result<String> {
    convert(Format::Yaml, Format::Csv, input, options)
}

pub fn csv_to_json(input: &str, options: &ConvertOptions) -> Result<String> {
    convert(Format::Csv, Format::Json, input, options)
}

pub fn csv_to_xml(input: &str, options: &ConvertOptions) -> Result<String> {
    convert(Format::Csv, Format::Xml, input, options)
}

pub fn csv_to_yaml(input: &str, options: &ConvertOptions) -> Result<String> {
    convert(Format::Csv, Format::Yaml, input, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_pair_is_unsupported() {
        let err = convert(Format::Yaml, Format::Yaml, "a: 1", &ConvertOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "Conversion from YAML to YAML is not supported");
    }

    #[test]
    fn failures_name_the_direction() {
        let err = csv_to_xml("   ", &ConvertOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "Error converting CSV to XML: Invalid CSV data");
        assert!(matches!(err.root_cause(), ConvertError::InvalidInput(_)));
    }

    #[test]
    fn auto_convert_passes_through_same_format() {
        let input = "  {\"a\": 1}  ";
        let out = auto_convert(input, Format::Json, &ConvertOptions::default()).unwrap();
        assert_eq!(out, input);
    }
}
