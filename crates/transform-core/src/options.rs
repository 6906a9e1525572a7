//! Conversion settings shared by the facade, the CLI and the HTTP contract.

use serde::{Deserialize, Serialize};

/// Spaces per nesting level for JSON and XML output.
pub const DEFAULT_INDENTATION: usize = 2;

/// Element name wrapping XML output.
pub const DEFAULT_ROOT_NAME: &str = "root";

/// Recursion ceiling applied by every parser.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Settings for a single conversion.
///
/// Deserializes from camelCase keys with every field optional, so a query
/// string like `?indentation=4&rootName=data` binds directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertOptions {
    /// `0` gives compact output; `N > 0` indents N spaces per level.
    /// Only JSON and XML targets honor it.
    pub indentation: usize,
    /// Root element name for XML targets.
    pub root_name: String,
    /// Deepest nesting a parser accepts before failing with `DepthExceeded`.
    pub max_depth: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            indentation: DEFAULT_INDENTATION,
            root_name: DEFAULT_ROOT_NAME.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ConvertOptions {
    pub fn with_indentation(mut self, indentation: usize) -> Self {
        self.indentation = indentation;
        self
    }

    pub fn with_root_name(mut self, root_name: impl Into<String>) -> Self {
        self.root_name = root_name.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
