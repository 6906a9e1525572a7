//! XML ⇄ [`Value`].
//!
//! XML has attributes and repeated siblings where JSON/YAML have neither, so
//! both directions apply an overlay:
//!
//! - a leaf element without attributes becomes its text (always a string),
//! - a leaf element with attributes becomes `{"#text": .., "@attr": ..}`,
//! - an element whose children are all one repeated name becomes an array,
//! - otherwise an object keyed by child name, repeated names collapsing into
//!   arrays, attributes as `@name` and non-blank mixed text as `#text`.
//!
//! Serialization reverses the overlay. Array items are named by singularizing
//! the parent (`employees` → `employee`), else from an object item's
//! `type`/`name`/`id`/`key` string, else `item`.
//!
//! # Example
//! ```
//! use transform_core::{json, xml};
//!
//! let value = json::parse(r#"{"id":1,"name":"Alice"}"#, 100).unwrap();
//! let out = xml::serialize(&value, "root", 2).unwrap();
//! assert_eq!(
//!     out,
//!     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root>\n  <id>1</id>\n  <name>Alice</name>\n</root>"
//! );
//! ```

use std::io::Write;

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{ConvertError, Result};
use crate::format::Format;
use crate::value::{guard_depth, Map, Value};

/// Key under which an element's text is stored when it also has attributes.
pub const TEXT_KEY: &str = "#text";

/// Prefix marking an attribute member.
pub const ATTRIBUTE_PREFIX: char = '@';

/// Object members consulted, in order, to name an array item element.
const ITEM_NAME_FIELDS: [&str; 4] = ["type", "name", "id", "key"];

const FALLBACK_ITEM_NAME: &str = "item";
const FALLBACK_ELEMENT_NAME: &str = "element";

// ============================================================================
// Parsing
// ============================================================================

/// An element as read from the document, before the overlay is applied.
#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

/// Parse an XML document into a [`Value`] describing its root element.
///
/// The root element's own name is dropped; only its content is returned.
/// Fails with [`ConvertError::Parse`] when the document is not well-formed and
/// with [`ConvertError::DepthExceeded`] when elements nest past `max_depth`.
pub fn parse(input: &str, max_depth: usize) -> Result<Value> {
    let root = read_document(input, max_depth)?;
    Ok(element_to_value(root))
}

fn read_document(input: &str, max_depth: usize) -> Result<Element> {
    let mut reader = Reader::from_str(input);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(tag)) => {
                ensure_single_root(&stack, &root)?;
                stack.push(open_element(&tag)?);
                guard_depth(stack.len(), max_depth)?;
            }
            Ok(Event::Empty(tag)) => {
                ensure_single_root(&stack, &root)?;
                guard_depth(stack.len() + 1, max_depth)?;
                let element = open_element(&tag)?;
                close_element(element, &mut stack, &mut root);
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| parse_error("closing tag without a matching opening tag"))?;
                close_element(element, &mut stack, &mut root);
            }
            Ok(Event::Text(text)) => {
                let text = text.unescape().map_err(parse_error)?;
                // Whitespace-only runs are layout between tags, not content.
                if text.trim().is_empty() {
                    continue;
                }
                append_text(&mut stack, &text)?;
            }
            Ok(Event::CData(data)) => {
                let text = String::from_utf8_lossy(&data).into_owned();
                append_text(&mut stack, &text)?;
            }
            Ok(Event::Eof) => break,
            // Declarations, comments, processing instructions, doctypes.
            Ok(_) => {}
            Err(err) => {
                return Err(parse_error(format!(
                    "{err} (at byte {})",
                    reader.buffer_position()
                )))
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(parse_error(format!("unclosed tag <{}>", open.name)));
    }
    root.ok_or_else(|| parse_error("document has no root element"))
}

fn open_element(tag: &BytesStart<'_>) -> Result<Element> {
    let name = utf8(tag.local_name().as_ref())?;
    let mut attributes = Vec::new();
    for attr in tag.attributes() {
        let attr = attr.map_err(parse_error)?;
        let raw_key = attr.key.as_ref();
        if raw_key == b"xmlns" || raw_key.starts_with(b"xmlns:") {
            continue;
        }
        let key = utf8(attr.key.local_name().as_ref())?;
        let value = attr.unescape_value().map_err(parse_error)?.into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        ..Element::default()
    })
}

fn close_element(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn ensure_single_root(stack: &[Element], root: &Option<Element>) -> Result<()> {
    if stack.is_empty() && root.is_some() {
        return Err(parse_error("multiple root elements"));
    }
    Ok(())
}

fn append_text(stack: &mut [Element], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(current) => {
            current.text.push_str(text);
            Ok(())
        }
        None => Err(parse_error("text outside the root element")),
    }
}

fn element_to_value(element: Element) -> Value {
    let Element {
        attributes,
        text,
        children,
        ..
    } = element;

    if children.is_empty() {
        if attributes.is_empty() {
            return Value::String(text);
        }
        let mut map = Map::with_capacity(attributes.len() + 1);
        map.insert(TEXT_KEY, Value::String(text));
        insert_attributes(&mut map, attributes);
        return Value::Object(map);
    }

    let groups = group_by_name(children);

    // <list><x/><x/></list> is the list itself, not an object holding one key.
    if groups.len() == 1 && groups[0].1.len() > 1 {
        let (_, members) = groups.into_iter().next().unwrap_or_default();
        return Value::Array(members.into_iter().map(element_to_value).collect());
    }

    let mut map = Map::with_capacity(groups.len() + attributes.len());
    for (name, mut members) in groups {
        let value = if members.len() > 1 {
            Value::Array(members.into_iter().map(element_to_value).collect())
        } else {
            match members.pop() {
                Some(only) => element_to_value(only),
                None => continue,
            }
        };
        map.insert(name, value);
    }
    insert_attributes(&mut map, attributes);
    if !text.trim().is_empty() {
        map.insert(TEXT_KEY, Value::String(text));
    }
    Value::Object(map)
}

/// Group sibling elements by name, keeping first-appearance order.
fn group_by_name(children: Vec<Element>) -> Vec<(String, Vec<Element>)> {
    let mut groups: Vec<(String, Vec<Element>)> = Vec::new();
    for child in children {
        match groups.iter_mut().find(|(name, _)| *name == child.name) {
            Some((_, members)) => members.push(child),
            None => groups.push((child.name.clone(), vec![child])),
        }
    }
    groups
}

fn insert_attributes(map: &mut Map, attributes: Vec<(String, String)>) {
    for (key, value) in attributes {
        map.insert(format!("{ATTRIBUTE_PREFIX}{key}"), Value::String(value));
    }
}

fn utf8(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(parse_error)
}

fn parse_error(message: impl ToString) -> ConvertError {
    ConvertError::parse(Format::Xml, message)
}

// ============================================================================
// Serialization
// ============================================================================

/// Serialize a [`Value`] as an XML document wrapped in `root_name`.
///
/// Always starts with the `<?xml ...?>` declaration. With `indentation > 0`
/// every element sits on its own line, indented that many spaces per level;
/// `0` writes the whole document on one line.
pub fn serialize(value: &Value, root_name: &str, indentation: usize) -> Result<String> {
    let mut writer = if indentation > 0 {
        Writer::new_with_indent(Vec::new(), b' ', indentation)
    } else {
        Writer::new(Vec::new())
    };
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    write_element(&mut writer, &sanitize_name(root_name), value)?;
    String::from_utf8(writer.into_inner())
        .map_err(|e| ConvertError::InvalidStructure(format!("XML output is not UTF-8: {e}")))
}

fn write_element<W: Write>(writer: &mut Writer<W>, name: &str, value: &Value) -> Result<()> {
    match value {
        Value::Object(map) => write_object(writer, name, map),
        Value::Array(items) if items.is_empty() => emit(writer, Event::Empty(BytesStart::new(name))),
        Value::Array(items) => {
            emit(writer, Event::Start(BytesStart::new(name)))?;
            for item in items {
                let item_name = array_item_name(name, item);
                write_element(writer, &item_name, item)?;
            }
            emit(writer, Event::End(BytesEnd::new(name)))
        }
        Value::Null => emit(writer, Event::Empty(BytesStart::new(name))),
        scalar => {
            let text = scalar.scalar_text().unwrap_or_default();
            emit(writer, Event::Start(BytesStart::new(name)))?;
            write_text(writer, &text)?;
            emit(writer, Event::End(BytesEnd::new(name)))
        }
    }
}

fn write_object<W: Write>(writer: &mut Writer<W>, name: &str, map: &Map) -> Result<()> {
    let mut start = BytesStart::new(name);
    let mut text: Option<String> = None;
    let mut children = Vec::with_capacity(map.len());

    for (key, member) in map.iter() {
        if member.is_scalar() {
            if let Some(attr) = key.strip_prefix(ATTRIBUTE_PREFIX) {
                if is_valid_name(attr) {
                    if let Some(attr_value) = member.scalar_text() {
                        start.push_attribute((attr, attr_value.as_str()));
                    }
                    continue;
                }
            }
            if key == TEXT_KEY {
                text = member.scalar_text();
                continue;
            }
        }
        children.push((key, member));
    }

    let text = text.filter(|t| !t.is_empty());
    if children.is_empty() && text.is_none() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    if let Some(text) = text {
        write_text(writer, &text)?;
    }
    for (key, member) in children {
        write_element(writer, &sanitize_name(key), member)?;
    }
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn write_text<W: Write>(writer: &mut Writer<W>, text: &str) -> Result<()> {
    emit(writer, Event::Text(BytesText::from_escaped(partial_escape(text))))
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| ConvertError::InvalidStructure(format!("XML write error: {e}")))
}

/// Pick the element name for one item of an array held under `parent`.
///
/// 1. `parent` longer than one character and ending in `s`: drop the `s`.
/// 2. Object item with a `type`/`name`/`id`/`key` string that is a legal name.
/// 3. `item`.
pub fn array_item_name(parent: &str, item: &Value) -> String {
    if parent.chars().count() > 1 && (parent.ends_with('s') || parent.ends_with('S')) {
        return parent[..parent.len() - 1].to_string();
    }
    if let Value::Object(map) = item {
        for field in ITEM_NAME_FIELDS {
            if let Some(Value::String(candidate)) = map.get(field) {
                if is_valid_name(candidate) {
                    return candidate.clone();
                }
            }
        }
    }
    FALLBACK_ITEM_NAME.to_string()
}

/// Make `name` a legal element name: illegal characters become `_`, and a
/// name not starting with a letter or `_` gets a `_` prefix.
pub fn sanitize_name(name: &str) -> String {
    if name.is_empty() {
        return FALLBACK_ELEMENT_NAME.to_string();
    }
    let cleaned: String = name
        .chars()
        .map(|c| if is_name_char(c) { c } else { '_' })
        .collect();
    match cleaned.chars().next() {
        Some(first) if is_name_start_char(first) => cleaned,
        _ => format!("_{cleaned}"),
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

fn is_name_start_char(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '.' || c == '-' || c == '_'
}
