//! YAML ⇄ [`Value`].
//!
//! Parsing is delegated to `serde_yaml` and bridged into the value tree.
//! Output is produced by a small block-style emitter instead of
//! `serde_yaml::to_string`, because the converter's YAML indents sequences
//! under their key and omits null mapping members:
//!
//! ```yaml
//! name: Alice
//! tags:
//!   - admin
//!   - ops
//! ```
//!
//! Scalars are written plain when that reads back as the same value, and as
//! double-quoted strings otherwise. Quoted strings use JSON-style escapes,
//! plus YAML's `\N`, `\L` and `\P` for the characters a YAML reader treats
//! as line breaks.

use crate::error::{ConvertError, Result};
use crate::format::Format;
use crate::value::{format_float, guard_depth, Map, Value};

const INDENT: &str = "  ";

// ============================================================================
// Parsing
// ============================================================================

/// Parse a YAML document into a [`Value`].
///
/// Tags are dropped, keeping the tagged value. Scalar mapping keys are
/// stringified (`1: a` has key `"1"`); sequence or mapping keys fail with
/// [`ConvertError::Parse`].
pub fn parse(input: &str, max_depth: usize) -> Result<Value> {
    let raw: serde_yaml::Value =
        serde_yaml::from_str(input).map_err(|e| ConvertError::parse(Format::Yaml, e))?;
    lower(raw, 0, max_depth)
}

fn lower(value: serde_yaml::Value, depth: usize, max_depth: usize) -> Result<Value> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => lower_number(&n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            guard_depth(depth + 1, max_depth)?;
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(lower(item, depth + 1, max_depth)?);
            }
            Value::Array(out)
        }
        serde_yaml::Value::Mapping(members) => {
            guard_depth(depth + 1, max_depth)?;
            let mut out = Map::with_capacity(members.len());
            for (key, member) in members {
                out.insert(mapping_key(key)?, lower(member, depth + 1, max_depth)?);
            }
            Value::Object(out)
        }
        serde_yaml::Value::Tagged(tagged) => lower(tagged.value, depth, max_depth)?,
    })
}

fn lower_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        return Value::Integer(i);
    }
    Value::Float(n.as_f64().unwrap_or(f64::NAN))
}

fn mapping_key(key: serde_yaml::Value) -> Result<String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => mapping_key(tagged.value),
        serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => Err(ConvertError::parse(
            Format::Yaml,
            "sequence and mapping keys are not supported",
        )),
    }
}

// ============================================================================
// Serialization
// ============================================================================

/// Serialize a [`Value`] as a block-style YAML document ending in a newline.
///
/// Null mapping members are left out entirely; null sequence items are
/// written as `null`.
pub fn serialize(value: &Value) -> Result<String> {
    let mut out = String::new();
    match value {
        Value::Object(map) if has_visible_members(map) => write_mapping(map, 0, &mut out),
        Value::Array(items) if !items.is_empty() => write_sequence(items, 0, &mut out),
        _ => {
            out.push_str(&inline_value(value));
            out.push('\n');
        }
    }
    Ok(out)
}

fn write_mapping(map: &Map, depth: usize, out: &mut String) {
    let indent = INDENT.repeat(depth);
    for (key, member) in map.iter() {
        if member.is_null() {
            continue;
        }
        out.push_str(&indent);
        out.push_str(&scalar_string(key));
        out.push(':');
        write_member_value(member, depth, out);
    }
}

/// Write what follows `key:` — either ` scalar\n` or a newline and a nested block.
fn write_member_value(member: &Value, depth: usize, out: &mut String) {
    match member {
        Value::Object(map) if has_visible_members(map) => {
            out.push('\n');
            write_mapping(map, depth + 1, out);
        }
        Value::Array(items) if !items.is_empty() => {
            out.push('\n');
            write_sequence(items, depth + 1, out);
        }
        _ => {
            out.push(' ');
            out.push_str(&inline_value(member));
            out.push('\n');
        }
    }
}

fn write_sequence(items: &[Value], depth: usize, out: &mut String) {
    let indent = INDENT.repeat(depth);
    for item in items {
        out.push_str(&indent);
        out.push_str("- ");
        match item {
            Value::Object(map) if has_visible_members(map) => {
                // First member shares the "- " line; the rest align under it.
                let mut block = String::new();
                write_mapping(map, 0, &mut block);
                push_hanging_block(&block, depth + 1, out);
            }
            Value::Array(inner) if !inner.is_empty() => {
                let mut block = String::new();
                write_sequence(inner, 0, &mut block);
                push_hanging_block(&block, depth + 1, out);
            }
            _ => {
                out.push_str(&inline_value(item));
                out.push('\n');
            }
        }
    }
}

/// Append a block rendered at depth 0 so that its first line continues the
/// current line and later lines are indented to `depth`.
fn push_hanging_block(block: &str, depth: usize, out: &mut String) {
    let indent = INDENT.repeat(depth);
    for (i, line) in block.lines().enumerate() {
        if i > 0 {
            out.push_str(&indent);
        }
        out.push_str(line);
        out.push('\n');
    }
}

fn has_visible_members(map: &Map) -> bool {
    map.values().any(|v| !v.is_null())
}

/// Single-line form of a value: scalars, or `{}` / `[]` for empty collections.
fn inline_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => format_yaml_float(*f),
        Value::String(s) => scalar_string(s),
        Value::Array(_) => "[]".to_string(),
        Value::Object(_) => "{}".to_string(),
    }
}

fn format_yaml_float(f: f64) -> String {
    if f.is_nan() {
        ".nan".to_string()
    } else if f.is_infinite() {
        let spelled = if f > 0.0 { ".inf" } else { "-.inf" };
        spelled.to_string()
    } else {
        format_float(f)
    }
}

/// Emit a string plain when safe, otherwise double-quoted.
fn scalar_string(s: &str) -> String {
    if needs_quoting(s) {
        double_quoted(s)
    } else {
        s.to_string()
    }
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{85}' => out.push_str("\\N"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            c if is_unprintable(c) => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Characters a YAML reader rejects or reads as a line break when unescaped.
fn is_unprintable(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{FEFF}')
}

/// Determine if a string must be quoted to read back as the same string.
///
/// A string MUST be quoted if it:
/// - Is empty or has leading/trailing whitespace
/// - Is a YAML 1.1 boolean/null word (`yes`, `Off`, `~`, ...)
/// - Looks numeric (including `.inf`, `0x1F`, `05`)
/// - Starts with an indicator character (`-`, `?`, `:`, `[`, `{`, `#`, `&`, `*`, ...)
/// - Contains `: ` or ` #`, ends with `:`, or holds unprintable characters
fn needs_quoting(s: &str) -> bool {
    if s.is_empty() || s != s.trim() {
        return true;
    }
    if is_reserved_word(s) || looks_numeric(s) {
        return true;
    }
    if s.starts_with(|c: char| "-?:,[]{}#&*!|>'\"%@`".contains(c)) {
        return true;
    }
    if s.contains(": ") || s.contains(" #") || s.ends_with(':') {
        return true;
    }
    s.chars().any(is_unprintable)
}

fn is_reserved_word(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "true" | "false" | "yes" | "no" | "on" | "off" | "y" | "n" | "null" | "~"
    )
}

/// Check if a string would be read as a number by a YAML 1.1 or 1.2 reader.
fn looks_numeric(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    let unsigned = lower.trim_start_matches(['+', '-']);
    if matches!(unsigned, ".inf" | ".nan" | "inf" | "nan" | "infinity") {
        return true;
    }
    if unsigned.starts_with("0x") || unsigned.starts_with("0o") || unsigned.starts_with("0b") {
        return true;
    }
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return false;
    }
    // Covers ints, floats, exponents, and sexagesimal/underscored YAML 1.1 forms.
    unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | '+' | '-' | '_' | ':'))
        && unsigned.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoting_rules() {
        for plain in ["hello", "hello world", "a:b", "user@example.com", "C#"] {
            assert!(!needs_quoting(plain), "{plain} should be plain");
        }
        for quoted in [
            "", " x", "yes", "No", "~", "42", "3.14", "05", "1e5", ".inf", "0x1F", "- item",
            "key: value", "# note", "[a]", "{a}", "trailing:", "two\nlines", "1:30",
        ] {
            assert!(needs_quoting(quoted), "{quoted:?} should be quoted");
        }
    }

    #[test]
    fn quoted_strings_use_json_escapes() {
        assert_eq!(scalar_string("two\nlines"), r#""two\nlines""#);
        assert_eq!(scalar_string("true"), r#""true""#);
        assert_eq!(scalar_string("say \"hi\"\t\\"), r#""say \"hi\"\t\\""#);
    }

    #[test]
    fn yaml_line_breaks_are_escaped() {
        assert_eq!(scalar_string("a\u{2028}b"), r#""a\Lb""#);
        assert_eq!(scalar_string("a\u{2029}"), r#""a\P""#);
        assert_eq!(scalar_string("a\u{85}b"), r#""a\Nb""#);
        assert_eq!(scalar_string("\u{FEFF}"), r#""\uFEFF""#);
        assert_eq!(scalar_string("bell\u{7}"), r#""bell\u0007""#);
    }

    #[test]
    fn floats_keep_fraction_and_special_values() {
        assert_eq!(format_yaml_float(2.0), "2.0");
        assert_eq!(format_yaml_float(f64::INFINITY), ".inf");
        assert_eq!(format_yaml_float(f64::NEG_INFINITY), "-.inf");
    }
}
