//! Content resolution.
//!
//! Turns a selected content spec into the final HTTP response: resolve the
//! body reference against the content store, then layer headers, cookies,
//! the default content type and CORS allowance, and the status code.

use crate::config::Config;
use crate::descriptor::ContentSpec;
use crate::response::ResponseBuilder;
use crate::store::ContentStore;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use tracing::warn;

/// Store path the spec's body reference resolves to.
///
/// A rooted reference (leading `/`) resolves against the configured output
/// root; anything else is relative to the matched pattern's directory.
pub fn body_path(config: &Config, pattern: &str, spec: &ContentSpec) -> String {
    if spec.body.starts_with('/') {
        format!("{}{}", config.body_root(), spec.body)
    } else {
        format!("{pattern}/{}", spec.body)
    }
}

/// Build the response for a selected content spec.
///
/// An unreadable body file is a soft failure: the response keeps the
/// intended status and headers and carries an empty body. That keeps a
/// half-built fixture tree servable while the gap is still visible in the
/// logs.
pub fn resolve_content(
    store: &dyn ContentStore,
    config: &Config,
    pattern: &str,
    spec: &ContentSpec,
) -> Response<Full<Bytes>> {
    let path = body_path(config, pattern, spec);
    let body = match store.read(&path) {
        Ok(bytes) => Bytes::from(bytes),
        Err(e) => {
            warn!(path = %path, error = %e, "body file unreadable, serving empty body");
            Bytes::new()
        }
    };

    let status = StatusCode::from_u16(spec.status).unwrap_or_else(|_| {
        warn!(status = spec.status, "invalid status in content spec, using 200");
        StatusCode::OK
    });

    let mut builder = ResponseBuilder::new(status).body(body);
    for (name, value) in sorted(&spec.header) {
        builder = builder.header(name, value);
    }
    for (name, value) in sorted(&spec.cookie) {
        builder = builder.append_header("Set-Cookie", &format!("{name}={value}"));
    }
    builder
        .default_header("Content-Type", "application/json")
        .default_header("Access-Control-Allow-Origin", "*")
        .build()
}

/// Map iteration order is random; sort so repeated responses are identical.
fn sorted(map: &std::collections::HashMap<String, String>) -> Vec<(&String, &String)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}
