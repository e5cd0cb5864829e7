//! Per-request stub pipeline.
//!
//! Route index -> route matcher -> descriptor loader -> rule engine ->
//! content resolver, one pass per request. Nothing is cached between
//! requests; the directory tree is authoritative on every call.

use crate::config::Config;
use crate::descriptor::load_descriptor;
use crate::error::StubError;
use crate::resolver::resolve_content;
use crate::response::ResponseBuilder;
use crate::routing::{build_route_table, match_route};
use crate::rules::select_content;
use crate::store::ContentStore;
use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;
use std::collections::HashMap;
use tracing::{debug, info};

/// A request as the pipeline sees it, detached from the transport.
#[derive(Debug, Clone, Default)]
pub struct StubRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Header names lower-cased by the transport layer.
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

/// Run the full pipeline, converting pipeline errors into responses.
pub fn handle_stub_request(
    store: &dyn ContentStore,
    config: &Config,
    request: &StubRequest,
) -> Response<Full<Bytes>> {
    match run_pipeline(store, config, request) {
        Ok(response) => response,
        Err(err) => {
            info!(method = %request.method, path = %request.path, error = %err, "stub request failed");
            ResponseBuilder::new(err.status())
                .body(err.to_string())
                .build()
        }
    }
}

fn run_pipeline(
    store: &dyn ContentStore,
    config: &Config,
    request: &StubRequest,
) -> Result<Response<Full<Bytes>>, StubError> {
    let method = request.method.to_uppercase();

    let table = build_route_table(store, &config.route_root(), &method);
    let store_path = config.rewrite_request_path(&request.path);
    let matched = match_route(&table, &store_path).ok_or_else(|| StubError::RouteNotFound {
        path: request.path.clone(),
    })?;
    info!(
        method = %method,
        path = %request.path,
        pattern = matched.pattern.as_str(),
        "matched stub route"
    );

    let descriptor = load_descriptor(store, matched.pattern.as_str(), &method)?;

    let request_params = request_parameters(&method, request.query.as_deref(), &request.body);
    debug!(path_params = ?matched.params, request_params = ?request_params, "request context");

    let spec = select_content(&descriptor, &matched.params, &request.headers, &request_params);
    Ok(resolve_content(store, config, matched.pattern.as_str(), spec))
}

/// Request parameters for predicate matching.
///
/// Sourced from the query string for GET/HEAD/DELETE and from a JSON
/// request body for POST; other methods carry none.
pub fn request_parameters(method: &str, query: Option<&str>, body: &[u8]) -> HashMap<String, String> {
    match method {
        "GET" | "HEAD" | "DELETE" => query.map_or_else(HashMap::new, parse_query_string),
        "POST" => parse_json_parameters(body),
        _ => HashMap::new(),
    }
}

/// Parse a query string, URL-decoding both keys and values.
pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let decoded_key = urlencoding::decode(key).unwrap_or_default().into_owned();
            let decoded_value = urlencoding::decode(value).unwrap_or_default().into_owned();
            Some((decoded_key, decoded_value))
        })
        .collect()
}

/// Top-level fields of a JSON object body, stringified.
///
/// Strings keep their value verbatim; other scalars (and any nested
/// values) use their JSON text. A body that is not a JSON object yields
/// no parameters, matching how an absent body behaves.
fn parse_json_parameters(body: &[u8]) -> HashMap<String, String> {
    let Ok(fields) = serde_json::from_slice::<HashMap<String, serde_json::Value>>(body) else {
        return HashMap::new();
    };
    fields
        .into_iter()
        .map(|(name, value)| {
            let text = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (name, text)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_parameters_for_get() {
        let params = request_parameters("GET", Some("a=1&b=two"), b"");
        assert_eq!(params.get("a").map(String::as_str), Some("1"));
        assert_eq!(params.get("b").map(String::as_str), Some("two"));
    }

    #[test]
    fn test_query_parameters_url_decoded() {
        let params = request_parameters("DELETE", Some("tag=a%2Cb"), b"");
        assert_eq!(params.get("tag").map(String::as_str), Some("a,b"));
    }

    #[test]
    fn test_post_parameters_from_json_body() {
        let body = br#"{"kind": "x", "count": 3, "flag": true}"#;
        let params = request_parameters("POST", None, body);
        assert_eq!(params.get("kind").map(String::as_str), Some("x"));
        assert_eq!(params.get("count").map(String::as_str), Some("3"));
        assert_eq!(params.get("flag").map(String::as_str), Some("true"));
    }

    #[test]
    fn test_post_with_invalid_body_has_no_parameters() {
        assert!(request_parameters("POST", None, b"not json").is_empty());
        assert!(request_parameters("POST", None, b"[1, 2]").is_empty());
    }

    #[test]
    fn test_other_methods_have_no_parameters() {
        assert!(request_parameters("PUT", Some("a=1"), b"{\"a\": 1}").is_empty());
    }
}
