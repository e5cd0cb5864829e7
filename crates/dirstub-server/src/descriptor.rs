//! Descriptor types and loading.
//!
//! A descriptor is the `$<METHOD>.json` file inside a matched pattern's
//! directory: one default content specification plus an ordered list of
//! predicate-guarded handler rules. Descriptors are parsed per request and
//! predicate patterns are compiled at load time, so a bad regex or bad
//! JSON is reported against the descriptor instead of surfacing (or being
//! ignored) mid-match.

use crate::error::StubError;
use crate::store::ContentStore;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Descriptor file name for a method, e.g. `$GET.json`.
pub fn descriptor_file_name(method: &str) -> String {
    format!("${}.json", method.to_uppercase())
}

/// Store path of the descriptor for a pattern and method.
pub fn descriptor_path(pattern: &str, method: &str) -> String {
    format!("{pattern}/{}", descriptor_file_name(method))
}

/// Status, headers, cookies, and body reference to serve for one outcome.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentSpec {
    #[serde(default)]
    pub body: String,
    #[serde(default = "default_status")]
    pub status: u16,
    #[serde(default)]
    pub header: HashMap<String, String>,
    #[serde(default)]
    pub cookie: HashMap<String, String>,
}

fn default_status() -> u16 {
    200
}

impl Default for ContentSpec {
    fn default() -> Self {
        Self {
            body: String::new(),
            status: default_status(),
            header: HashMap::new(),
            cookie: HashMap::new(),
        }
    }
}

/// Wire shape of a descriptor file.
#[derive(Debug, Default, Deserialize)]
struct RawDescriptor {
    #[serde(default)]
    default: ContentSpec,
    #[serde(default)]
    handlers: Vec<RawHandler>,
}

#[derive(Debug, Default, Deserialize)]
struct RawHandler {
    #[serde(default)]
    content: ContentSpec,
    #[serde(default)]
    path: HashMap<String, String>,
    #[serde(default)]
    header: HashMap<String, String>,
    #[serde(default)]
    param: HashMap<String, String>,
}

/// A handler rule with its predicate patterns compiled.
#[derive(Debug)]
pub struct HandlerRule {
    pub content: ContentSpec,
    pub path: Vec<(String, Regex)>,
    pub header: Vec<(String, Regex)>,
    pub param: Vec<(String, Regex)>,
}

impl HandlerRule {
    /// A rule with no predicates at all never matches; see the rule engine.
    pub fn has_predicates(&self) -> bool {
        !(self.path.is_empty() && self.header.is_empty() && self.param.is_empty())
    }
}

/// Parsed, compiled descriptor for one pattern and method.
#[derive(Debug)]
pub struct Descriptor {
    pub default: ContentSpec,
    pub handlers: Vec<HandlerRule>,
}

/// Load and compile `<pattern>/$<METHOD>.json` from the content store.
pub fn load_descriptor(
    store: &dyn ContentStore,
    pattern: &str,
    method: &str,
) -> Result<Descriptor, StubError> {
    let path = descriptor_path(pattern, method);
    let bytes = store
        .read(&path)
        .map_err(|_| StubError::DescriptorUnreadable { path: path.clone() })?;
    parse_descriptor(&bytes, &path)
}

/// Parse descriptor bytes and compile every predicate pattern.
pub fn parse_descriptor(bytes: &[u8], path: &str) -> Result<Descriptor, StubError> {
    let raw: RawDescriptor =
        serde_json::from_slice(bytes).map_err(|e| StubError::DescriptorMalformed {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

    let mut handlers = Vec::with_capacity(raw.handlers.len());
    for (idx, handler) in raw.handlers.into_iter().enumerate() {
        handlers.push(HandlerRule {
            content: handler.content,
            path: compile_predicates(handler.path, idx, "path", path)?,
            header: compile_predicates(handler.header, idx, "header", path)?,
            param: compile_predicates(handler.param, idx, "param", path)?,
        });
    }

    Ok(Descriptor {
        default: raw.default,
        handlers,
    })
}

fn compile_predicates(
    map: HashMap<String, String>,
    handler_idx: usize,
    dimension: &str,
    descriptor_path: &str,
) -> Result<Vec<(String, Regex)>, StubError> {
    let mut predicates: Vec<(String, String)> = map.into_iter().collect();
    // Predicates are ANDed, so order never changes the outcome; sort by
    // name for stable Debug output and error reporting.
    predicates.sort_by(|a, b| a.0.cmp(&b.0));

    predicates
        .into_iter()
        .map(|(name, pattern)| {
            let regex = Regex::new(&pattern).map_err(|e| StubError::DescriptorMalformed {
                path: descriptor_path.to_string(),
                reason: format!("handlers[{handler_idx}].{dimension}.{name}: {e}"),
            })?;
            Ok((name, regex))
        })
        .collect()
}
