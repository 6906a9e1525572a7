//! # transform-core
//!
//! Conversion engine for **JSON, XML, YAML and CSV**.
//!
//! Every format is parsed into one shared tree, [`Value`], and serialized back
//! out of it. Conversions between two non-JSON formats pivot through compact
//! JSON text, so each format only needs a parser and a serializer instead of a
//! direct transcoder per pair.
//!
//! ## Quick start
//!
//! ```rust
//! use transform_core::{convert, detect_format, ConvertOptions, Format};
//!
//! // JSON → XML
//! let xml = convert(Format::Json, Format::Xml, r#"{"id":1,"name":"Alice"}"#, &ConvertOptions::default()).unwrap();
//! assert_eq!(
//!     xml,
//!     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root>\n  <id>1</id>\n  <name>Alice</name>\n</root>"
//! );
//!
//! // Detection drives auto-conversion
//! assert_eq!(detect_format(&xml).unwrap(), Format::Xml);
//! ```
//!
//! ## Modules
//!
//! - [`value`] — `Value` tree and its ordered `Map`
//! - [`json`], [`xml`], [`yaml`], [`csv`] — one parser and one serializer per format
//! - [`detect`] — heuristic format detection
//! - [`convert`] — the facade: 12 directed pairs, `convert`, `auto_convert`
//! - [`endpoint`] — the HTTP call contract (routes, status codes, content types)
//! - [`options`] — `ConvertOptions` (indentation, root name, depth limit)
//! - [`error`] — `ConvertError` taxonomy

pub mod convert;
pub mod csv;
pub mod detect;
pub mod endpoint;
pub mod error;
pub mod format;
pub mod json;
pub mod options;
pub mod value;
pub mod xml;
pub mod yaml;

pub use convert::{
    auto_convert, convert, csv_to_json, csv_to_xml, csv_to_yaml, json_to_csv, json_to_xml,
    json_to_yaml, xml_to_csv, xml_to_json, xml_to_yaml, yaml_to_csv, yaml_to_json, yaml_to_xml,
};
pub use detect::detect_format;
pub use error::{ConvertError, Result};
pub use format::Format;
pub use options::ConvertOptions;
pub use value::{Map, Value};
