//! Heuristic input format detection.
//!
//! Each format has a probe that looks for a cheap textual signature and then
//! confirms it with a real parse. Probes run in a fixed order (XML, JSON,
//! YAML, CSV) and the first hit wins, so ambiguous inputs always resolve the
//! same way. CSV is the fallback and is never parsed.

use log::debug;

use crate::error::{ConvertError, Result};
use crate::format::Format;
use crate::options::DEFAULT_MAX_DEPTH;
use crate::{json, xml, yaml};

/// Classify raw text as one of the four formats.
///
/// Fails with [`ConvertError::InvalidInput`] for blank input and
/// [`ConvertError::FormatUndetected`] when no probe matches.
///
/// ```
/// use transform_core::{detect_format, Format};
///
/// assert_eq!(detect_format(r#"{"a":1}"#).unwrap(), Format::Json);
/// assert_eq!(detect_format("<a><b>1</b></a>").unwrap(), Format::Xml);
/// assert_eq!(detect_format("name: Alice").unwrap(), Format::Yaml);
/// assert_eq!(detect_format("a,b\n1,2").unwrap(), Format::Csv);
/// ```
pub fn detect_format(input: &str) -> Result<Format> {
    let text = input.trim();
    if text.is_empty() {
        return Err(ConvertError::InvalidInput("input".to_string()));
    }

    for format in Format::ALL {
        if probe(format, text) {
            debug!("detected {format} input ({} bytes)", text.len());
            return Ok(format);
        }
    }
    debug!("no format matched input ({} bytes)", text.len());
    Err(ConvertError::FormatUndetected)
}

fn probe(format: Format, text: &str) -> bool {
    match format {
        Format::Xml => looks_like_xml(text) && confirms(format, xml::parse(text, DEFAULT_MAX_DEPTH)),
        Format::Json => looks_like_json(text) && confirms(format, json::parse(text, DEFAULT_MAX_DEPTH)),
        Format::Yaml => looks_like_yaml(text) && confirms(format, yaml::parse(text, DEFAULT_MAX_DEPTH)),
        Format::Csv => looks_like_csv(text),
    }
}

/// A failed confirmation parse is an expected outcome, not an error.
fn confirms<T>(format: Format, parsed: Result<T>) -> bool {
    match parsed {
        Ok(_) => true,
        Err(err) => {
            debug!("{format} probe rejected input: {err}");
            false
        }
    }
}

fn looks_like_xml(text: &str) -> bool {
    text.starts_with('<') && text.contains("</")
}

fn looks_like_json(text: &str) -> bool {
    (text.starts_with('{') && text.ends_with('}')) || (text.starts_with('[') && text.ends_with(']'))
}

fn looks_like_yaml(text: &str) -> bool {
    text.contains(':') && !text.contains(['<', '{', '['])
}

fn looks_like_csv(text: &str) -> bool {
    text.contains(',') && text.contains('\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xml_declaration_is_accepted() {
        let doc = "<?xml version=\"1.0\"?>\n<root><a>1</a></root>";
        assert_eq!(detect_format(doc).unwrap(), Format::Xml);
    }

    #[test]
    fn broken_xml_falls_through() {
        // Not XML, not JSON, not YAML (has '<'), no comma: nothing matches.
        assert!(matches!(
            detect_format("<a></b>"),
            Err(ConvertError::FormatUndetected)
        ));
    }

    #[test]
    fn invalid_json_with_newline_and_comma_is_csv() {
        assert_eq!(detect_format("[1,\n2").unwrap(), Format::Csv);
    }

    #[test]
    fn yaml_wins_over_csv_when_both_fit() {
        assert_eq!(detect_format("a: 1, 2\nb: 3").unwrap(), Format::Yaml);
    }

    #[test]
    fn plain_word_is_undetected() {
        assert!(matches!(
            detect_format("hello"),
            Err(ConvertError::FormatUndetected)
        ));
    }

    #[test]
    fn blank_is_invalid_input() {
        assert!(matches!(
            detect_format("  \n"),
            Err(ConvertError::InvalidInput(_))
        ));
    }
}
