//! JSON ⇄ [`Value`].
//!
//! Parsing goes through `serde_json::Value` (with `preserve_order`, so member
//! order survives) and is then lowered into the crate's own tree with a depth
//! guard. Serialization lifts back into `serde_json::Value`, dropping
//! null-valued object members on the way (null array elements stay).
//!
//! # Example
//! ```
//! use transform_core::json;
//!
//! let value = json::parse(r#"{"id":1,"note":null,"tags":[null,"a"]}"#, 100).unwrap();
//! assert_eq!(json::serialize(&value, 0).unwrap(), r#"{"id":1,"tags":[null,"a"]}"#);
//! ```

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::{ConvertError, Result};
use crate::format::Format;
use crate::value::{guard_depth, Map, Value};

/// Parse JSON text into a [`Value`].
///
/// Integer literals that fit in `i64` become [`Value::Integer`]; every other
/// number becomes [`Value::Float`]. Malformed input fails with
/// [`ConvertError::Parse`], whose message carries serde_json's line/column.
pub fn parse(input: &str, max_depth: usize) -> Result<Value> {
    let raw: serde_json::Value =
        serde_json::from_str(input).map_err(|e| ConvertError::parse(Format::Json, e))?;
    from_json_value(raw, max_depth)
}

/// Lower an already-parsed `serde_json::Value`.
pub fn from_json_value(value: serde_json::Value, max_depth: usize) -> Result<Value> {
    lower(value, 0, max_depth)
}

fn lower(value: serde_json::Value, depth: usize, max_depth: usize) -> Result<Value> {
    Ok(match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            guard_depth(depth + 1, max_depth)?;
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(lower(item, depth + 1, max_depth)?);
            }
            Value::Array(out)
        }
        serde_json::Value::Object(members) => {
            guard_depth(depth + 1, max_depth)?;
            let mut out = Map::with_capacity(members.len());
            for (key, member) in members {
                out.insert(key, lower(member, depth + 1, max_depth)?);
            }
            Value::Object(out)
        }
    })
}

/// Lift a [`Value`] into `serde_json::Value`, skipping null object members.
///
/// Non-finite floats have no JSON spelling and become `null`.
pub fn to_json_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_json_value).collect()),
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, member) in map.iter() {
                if member.is_null() {
                    continue;
                }
                out.insert(key.to_string(), to_json_value(member));
            }
            serde_json::Value::Object(out)
        }
    }
}

/// Serialize a [`Value`] as JSON text.
///
/// `indentation == 0` produces the compact single-line form; otherwise output
/// is pretty-printed with `indentation` spaces per level. Non-ASCII text is
/// written as-is rather than `\u`-escaped.
pub fn serialize(value: &Value, indentation: usize) -> Result<String> {
    let json = to_json_value(value);
    if indentation == 0 {
        return serde_json::to_string(&json).map_err(|e| ConvertError::InvalidStructure(e.to_string()));
    }
    let indent = " ".repeat(indentation);
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    json.serialize(&mut ser)
        .map_err(|e| ConvertError::InvalidStructure(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| ConvertError::InvalidStructure(e.to_string()))
}
