//! CSV ⇄ [`Value`].
//!
//! CSV is strictly tabular, so both directions reshape:
//!
//! - **Reading**: the first row is the header; every later row becomes an
//!   object keyed by header name. Cells are type-inferred (JSON object/array
//!   text, then boolean, integer, float, else string); blank cells are null.
//! - **Writing**: the value must be an object or an array containing objects.
//!   The columns are the sorted union of all record keys; missing keys and
//!   nulls are empty cells; nested objects/arrays are embedded as compact JSON.
//!
//! # Example
//! ```
//! use transform_core::csv;
//!
//! let rows = csv::parse("id,name\n1,Alice\n2,Bob", 100).unwrap();
//! assert_eq!(csv::serialize(&rows).unwrap(), "id,name\n1,Alice\n2,Bob\n");
//! ```

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{ConvertError, Result};
use crate::format::Format;
use crate::json;
use crate::value::{Map, Value};

/// Name given to a blank header cell.
const BLANK_HEADER: &str = "Column";

/// Nesting already used by the row array and the row object around a cell.
const ROW_DEPTH: usize = 2;

/// Delimiters considered by detection, in tie-break order.
const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

// ============================================================================
// Parsing
// ============================================================================

/// Parse CSV text into an array of row objects.
///
/// The delimiter is detected from the header line. Rows shorter than the
/// header simply lack the trailing keys; extra cells are ignored. Fails with
/// [`ConvertError::Parse`] only when the header row cannot be read.
pub fn parse(input: &str, max_depth: usize) -> Result<Value> {
    let delimiter = detect_delimiter(input);
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(::csv::Trim::All)
        .delimiter(delimiter)
        .from_reader(input.as_bytes());

    let raw_headers = reader
        .headers()
        .map_err(|e| parse_error(format!("failed to read CSV headers: {e}")))?
        .clone();
    if raw_headers.is_empty() {
        return Err(parse_error("CSV has no valid headers"));
    }
    let headers = unique_headers(raw_headers.iter());
    let cell_depth = max_depth.saturating_sub(ROW_DEPTH);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(parse_error)?;
        let mut row = Map::with_capacity(headers.len());
        for (header, cell) in headers.iter().zip(record.iter()) {
            let value = infer_cell(cell, cell_depth).map_err(|err| match err {
                ConvertError::DepthExceeded { .. } => ConvertError::DepthExceeded { limit: max_depth },
                other => other,
            })?;
            row.insert(header.as_str(), value);
        }
        rows.push(Value::Object(row));
    }
    Ok(Value::Array(rows))
}

/// Infer the type of one cell, in priority order:
///
/// 1. blank → null
/// 2. text wrapped in `{}` or `[]` that parses as JSON within `max_depth`
///    levels → that structure
/// 3. `true`/`false` (any case) → boolean
/// 4. fits `i64` → integer
/// 5. finite float → float
/// 6. anything else → the trimmed string
pub fn infer_cell(raw: &str, max_depth: usize) -> Result<Value> {
    let cell = raw.trim();
    if cell.is_empty() {
        return Ok(Value::Null);
    }
    if (cell.starts_with('{') && cell.ends_with('}')) || (cell.starts_with('[') && cell.ends_with(']')) {
        match json::parse(cell, max_depth) {
            Ok(value) => return Ok(value),
            Err(err @ ConvertError::DepthExceeded { .. }) => return Err(err),
            Err(_) => {}
        }
    }
    if cell.eq_ignore_ascii_case("true") {
        return Ok(Value::Bool(true));
    }
    if cell.eq_ignore_ascii_case("false") {
        return Ok(Value::Bool(false));
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Ok(Value::Integer(i));
    }
    if let Ok(f) = cell.parse::<f64>() {
        if f.is_finite() && cell.chars().any(|c| c.is_ascii_digit()) {
            return Ok(Value::Float(f));
        }
    }
    Ok(Value::String(cell.to_string()))
}

/// Make header names unique: blanks become `Column`, and repeats get `_1`,
/// `_2`, … in order of appearance (skipping suffixes already taken).
fn unique_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut repeats: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::new();
    for header in raw {
        let base = if header.trim().is_empty() {
            BLANK_HEADER
        } else {
            header
        };
        if taken.insert(base.to_string()) {
            out.push(base.to_string());
            continue;
        }
        let counter = repeats.entry(base.to_string()).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{base}_{counter}");
            if taken.insert(candidate.clone()) {
                out.push(candidate);
                break;
            }
        }
    }
    out
}

/// Pick the delimiter occurring most often in the header line outside quotes.
fn detect_delimiter(input: &str) -> u8 {
    let header = input
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or_default();

    let mut counts = [0usize; DELIMITERS.len()];
    let mut in_quotes = false;
    for byte in header.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some(idx) = DELIMITERS.iter().position(|d| *d == byte) {
            counts[idx] += 1;
        }
    }

    let mut best = 0;
    for idx in 1..DELIMITERS.len() {
        if counts[idx] > counts[best] {
            best = idx;
        }
    }
    DELIMITERS[best]
}

fn parse_error(message: impl ToString) -> ConvertError {
    ConvertError::parse(Format::Csv, message)
}

// ============================================================================
// Serialization
// ============================================================================

/// Serialize a [`Value`] as CSV with a header row and `\n` line endings.
///
/// Accepts an object (one row) or an array; array elements that are not
/// objects are skipped. Fails with [`ConvertError::InvalidStructure`] for
/// scalars and for arrays without any object element.
pub fn serialize(value: &Value) -> Result<String> {
    let records = collect_records(value)?;

    let columns: Vec<&str> = records
        .iter()
        .copied()
        .flat_map(Map::keys)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(&columns).map_err(write_error)?;
    for record in &records {
        let row: Vec<String> = columns
            .iter()
            .map(|column| record.get(column).map(cell_text).unwrap_or_default())
            .collect();
        writer.write_record(&row).map_err(write_error)?;
    }

    let bytes = writer.into_inner().map_err(write_error)?;
    String::from_utf8(bytes).map_err(write_error)
}

fn collect_records(value: &Value) -> Result<Vec<&Map>> {
    match value {
        Value::Object(map) => Ok(vec![map]),
        Value::Array(items) => {
            let records: Vec<&Map> = items.iter().filter_map(Value::as_object).collect();
            if records.is_empty() {
                return Err(ConvertError::InvalidStructure(
                    "data doesn't contain any object records".to_string(),
                ));
            }
            Ok(records)
        }
        _ => Err(ConvertError::InvalidStructure(
            "CSV needs an object or an array of objects".to_string(),
        )),
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Array(_) | Value::Object(_) => json::to_json_value(value).to_string(),
        scalar => scalar.scalar_text().unwrap_or_default(),
    }
}

fn write_error(err: impl std::fmt::Display) -> ConvertError {
    ConvertError::InvalidStructure(format!("CSV write error: {err}"))
}
