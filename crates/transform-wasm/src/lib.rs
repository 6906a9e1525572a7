//! WASM bindings for transform-core.
//!
//! Exposes `convert`, `autoConvert` and `detectFormat` as `#[wasm_bindgen]`
//! functions for the browser conversion tool. Format names are the lowercase
//! route names (`json`, `xml`, `yaml`, `csv`); every failure throws a JS
//! string carrying the error message.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p transform-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/pkg/ \
//!   target/wasm32-unknown-unknown/release/transform_wasm.wasm
//! ```

use transform_core::{ConvertOptions, Format};
use wasm_bindgen::prelude::*;

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn options(indentation: Option<usize>, root_name: Option<String>) -> ConvertOptions {
    let mut opts = ConvertOptions::default();
    if let Some(indentation) = indentation {
        opts = opts.with_indentation(indentation);
    }
    if let Some(root_name) = root_name {
        opts = opts.with_root_name(root_name);
    }
    opts
}

/// Convert `input` from one format to another.
///
/// `indentation` (default 2) applies to JSON/XML output, `root_name`
/// (default `"root"`) to XML output.
#[wasm_bindgen]
pub fn convert(
    from: &str,
    to: &str,
    input: &str,
    indentation: Option<usize>,
    root_name: Option<String>,
) -> Result<String, JsValue> {
    let from: Format = from.parse().map_err(js_error)?;
    let to: Format = to.parse().map_err(js_error)?;
    transform_core::convert(from, to, input, &options(indentation, root_name)).map_err(js_error)
}

/// Detect the input format and convert it to `target`.
#[wasm_bindgen(js_name = autoConvert)]
pub fn auto_convert(
    input: &str,
    target: &str,
    indentation: Option<usize>,
    root_name: Option<String>,
) -> Result<String, JsValue> {
    let target: Format = target.parse().map_err(js_error)?;
    transform_core::auto_convert(input, target, &options(indentation, root_name)).map_err(js_error)
}

/// Return `"json"`, `"xml"`, `"yaml"` or `"csv"`, or throw if undetectable.
#[wasm_bindgen(js_name = detectFormat)]
pub fn detect_format(input: &str) -> Result<String, JsValue> {
    transform_core::detect_format(input)
        .map(|format| format.as_str().to_string())
        .map_err(js_error)
}
