//! Framework-free rendition of the HTTP conversion API.
//!
//! An HTTP host routes `POST /api/convert/...` here with the request path,
//! the decoded query parameters and the raw body, and writes back the
//! returned [`Response`]. Routing, status codes, content types and error
//! bodies are decided here so every host behaves the same.
//!
//! | route | query | success |
//! |-------|-------|---------|
//! | `/api/convert/{src}-to-{dst}` | `indentation`, `rootName` | 200, `dst` content type |
//! | `/api/convert/auto` | `targetFormat`, `indentation`, `rootName` | 200, target content type |
//!
//! Every conversion failure is `400` with the error message as plain text.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::convert::{auto_convert, convert};
use crate::format::Format;
use crate::options::{ConvertOptions, DEFAULT_INDENTATION, DEFAULT_ROOT_NAME};

/// Path prefix shared by all conversion routes.
pub const ROUTE_PREFIX: &str = "/api/convert/";

/// Body of the `400` returned when the auto route gets a bad `targetFormat`.
pub const INVALID_TARGET_MESSAGE: &str = "Invalid target format. Supported formats: json, xml, yaml, csv";

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// A response ready to be written by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Response {
    fn ok(format: Format, body: String) -> Self {
        Self {
            status: 200,
            content_type: format.content_type(),
            body,
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: 400,
            content_type: TEXT_PLAIN,
            body: message.into(),
        }
    }

    fn not_found() -> Self {
        Self {
            status: 404,
            content_type: TEXT_PLAIN,
            body: "Not Found".to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Query parameters accepted by the conversion routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertQuery {
    pub indentation: usize,
    pub root_name: String,
    /// Only read by the auto route.
    pub target_format: Option<String>,
}

impl Default for ConvertQuery {
    fn default() -> Self {
        Self {
            indentation: DEFAULT_INDENTATION,
            root_name: DEFAULT_ROOT_NAME.to_string(),
            target_format: None,
        }
    }
}

impl ConvertQuery {
    /// Build from already-decoded `key=value` pairs, ignoring unknown keys.
    ///
    /// Fails when `indentation` is not a non-negative integer.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key {
                "indentation" => {
                    query.indentation = value
                        .trim()
                        .parse()
                        .map_err(|_| QueryError::Indentation(value.to_string()))?;
                }
                "rootName" => query.root_name = value.to_string(),
                "targetFormat" => query.target_format = Some(value.to_string()),
                _ => {}
            }
        }
        Ok(query)
    }

    pub fn options(&self) -> ConvertOptions {
        ConvertOptions::default()
            .with_indentation(self.indentation)
            .with_root_name(self.root_name.clone())
    }
}

/// A query parameter that could not be bound.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid indentation value: '{0}'")]
    Indentation(String),
}

impl From<QueryError> for Response {
    fn from(err: QueryError) -> Self {
        Response::bad_request(err.to_string())
    }
}

/// A matched conversion route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Pair { from: Format, to: Format },
    Auto,
}

/// Match a request path against the conversion routes.
///
/// Format names are lowercase (`/api/convert/csv-to-json`); identity pairs
/// and unknown names don't match.
pub fn route(path: &str) -> Option<Route> {
    let rest = path.strip_prefix(ROUTE_PREFIX)?.trim_end_matches('/');
    if rest == "auto" {
        return Some(Route::Auto);
    }
    let (from, to) = rest.split_once("-to-")?;
    let from = route_format(from)?;
    let to = route_format(to)?;
    (from != to).then_some(Route::Pair { from, to })
}

fn route_format(segment: &str) -> Option<Format> {
    Format::ALL.into_iter().find(|f| f.as_str() == segment)
}

/// Handle one `POST` to a conversion route.
pub fn handle(path: &str, query: &ConvertQuery, body: &str) -> Response {
    match route(path) {
        Some(Route::Pair { from, to }) => handle_pair(from, to, query, body),
        Some(Route::Auto) => handle_auto(query, body),
        None => {
            warn!("no conversion route for {path}");
            Response::not_found()
        }
    }
}

fn handle_pair(from: Format, to: Format, query: &ConvertQuery, body: &str) -> Response {
    if body.trim().is_empty() {
        warn!("rejected {from} to {to}: empty body");
        return Response::bad_request(format!("Invalid {from} data"));
    }
    match convert(from, to, body, &query.options()) {
        Ok(out) => {
            info!("converted {from} to {to}: {} -> {} bytes", body.len(), out.len());
            Response::ok(to, out)
        }
        Err(err) => {
            warn!("rejected {from} to {to}: {err}");
            Response::bad_request(err.to_string())
        }
    }
}

fn handle_auto(query: &ConvertQuery, body: &str) -> Response {
    if body.trim().is_empty() {
        warn!("rejected auto conversion: empty body");
        return Response::bad_request("Invalid input data");
    }
    let Some(target) = query
        .target_format
        .as_deref()
        .and_then(|name| route_format(&name.to_ascii_lowercase()))
    else {
        warn!("rejected auto conversion: target {:?}", query.target_format);
        return Response::bad_request(INVALID_TARGET_MESSAGE);
    };
    match auto_convert(body, target, &query.options()) {
        Ok(out) => {
            info!("auto-converted to {target}: {} -> {} bytes", body.len(), out.len());
            Response::ok(target, out)
        }
        Err(err) => {
            warn!("rejected auto conversion to {target}: {err}");
            Response::bad_request(err.to_string())
        }
    }
}
