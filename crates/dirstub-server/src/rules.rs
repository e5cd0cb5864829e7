//! Handler rule selection.
//!
//! Rules are evaluated in descriptor order; the first rule whose
//! predicates all pass supplies the content, otherwise the default does.
//! Predicate evaluation is an unanchored regex search against the target
//! value, with a missing value standing in as the empty string. A rule
//! with no predicates at all never matches, so an empty rule cannot
//! shadow the default.

use crate::descriptor::{ContentSpec, Descriptor, HandlerRule};
use std::collections::HashMap;
use tracing::debug;

/// Select the content spec for a request.
///
/// `headers` must be keyed by lower-cased header name; header predicate
/// names are lower-cased at lookup so `X-Api-Key` and `x-api-key` in a
/// descriptor behave alike.
pub fn select_content<'a>(
    descriptor: &'a Descriptor,
    path_params: &HashMap<String, String>,
    headers: &HashMap<String, String>,
    request_params: &HashMap<String, String>,
) -> &'a ContentSpec {
    for (idx, handler) in descriptor.handlers.iter().enumerate() {
        if handler_matches(handler, path_params, headers, request_params) {
            debug!(handler = idx, body = %handler.content.body, "handler rule matched");
            return &handler.content;
        }
    }
    debug!(body = %descriptor.default.body, "no handler rule matched, using default");
    &descriptor.default
}

fn handler_matches(
    handler: &HandlerRule,
    path_params: &HashMap<String, String>,
    headers: &HashMap<String, String>,
    request_params: &HashMap<String, String>,
) -> bool {
    if !handler.has_predicates() {
        return false;
    }
    for (name, pattern) in &handler.path {
        if !pattern.is_match(lookup(path_params, name)) {
            return false;
        }
    }
    for (name, pattern) in &handler.header {
        if !pattern.is_match(lookup(headers, &name.to_ascii_lowercase())) {
            return false;
        }
    }
    for (name, pattern) in &handler.param {
        if !pattern.is_match(lookup(request_params, name)) {
            return false;
        }
    }
    true
}

fn lookup<'a>(map: &'a HashMap<String, String>, name: &str) -> &'a str {
    map.get(name).map_or("", String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::parse_descriptor;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let json = br#"{
            "default": {"body": "default.json"},
            "handlers": [
                {"content": {"body": "one.json"}, "path": {"id": "^1$"}},
                {"content": {"body": "any.json"}, "path": {"id": "."}}
            ]
        }"#;
        let desc = parse_descriptor(json, "/users/:id/$GET.json").unwrap();
        let empty = HashMap::new();

        let spec = select_content(&desc, &params(&[("id", "1")]), &empty, &empty);
        assert_eq!(spec.body, "one.json");

        let spec = select_content(&desc, &params(&[("id", "2")]), &empty, &empty);
        assert_eq!(spec.body, "any.json");
    }

    #[test]
    fn test_falls_through_to_default() {
        let json = br#"{
            "default": {"body": "default.json", "status": 200},
            "handlers": [{"content": {"body": "one.json", "status": 201}, "path": {"id": "^1$"}}]
        }"#;
        let desc = parse_descriptor(json, "/users/:id/$GET.json").unwrap();
        let empty = HashMap::new();

        let spec = select_content(&desc, &params(&[("id", "2")]), &empty, &empty);
        assert_eq!(spec.body, "default.json");
        assert_eq!(spec.status, 200);
    }

    #[test]
    fn test_rule_without_predicates_never_matches() {
        let json = br#"{
            "default": {"body": "default.json"},
            "handlers": [{"content": {"body": "never.json"}}]
        }"#;
        let desc = parse_descriptor(json, "/a/$GET.json").unwrap();
        let empty = HashMap::new();

        let spec = select_content(&desc, &empty, &empty, &empty);
        assert_eq!(spec.body, "default.json");
    }

    #[test]
    fn test_all_groups_must_pass() {
        let json = br#"{
            "default": {"body": "default.json"},
            "handlers": [{
                "content": {"body": "both.json"},
                "path": {"id": "^1$"},
                "header": {"X-Flag": "on"}
            }]
        }"#;
        let desc = parse_descriptor(json, "/users/:id/$GET.json").unwrap();
        let empty = HashMap::new();

        let headers = params(&[("x-flag", "on")]);
        let spec = select_content(&desc, &params(&[("id", "1")]), &headers, &empty);
        assert_eq!(spec.body, "both.json");

        // Header group passes but path group fails.
        let spec = select_content(&desc, &params(&[("id", "2")]), &headers, &empty);
        assert_eq!(spec.body, "default.json");

        // Path group passes but header is absent.
        let spec = select_content(&desc, &params(&[("id", "1")]), &empty, &empty);
        assert_eq!(spec.body, "default.json");
    }

    #[test]
    fn test_unanchored_search() {
        let json = br#"{
            "default": {"body": "default.json"},
            "handlers": [{"content": {"body": "hit.json"}, "header": {"X-Tag": "abc"}}]
        }"#;
        let desc = parse_descriptor(json, "/a/$GET.json").unwrap();
        let empty = HashMap::new();

        let headers = params(&[("x-tag", "xabcxyz")]);
        assert_eq!(select_content(&desc, &empty, &headers, &empty).body, "hit.json");

        let headers = params(&[("x-tag", "xyz")]);
        assert_eq!(
            select_content(&desc, &empty, &headers, &empty).body,
            "default.json"
        );
    }

    #[test]
    fn test_request_param_predicate() {
        let json = br#"{
            "default": {"body": "default.json"},
            "handlers": [{"content": {"body": "kind.json"}, "param": {"kind": "^x$"}}]
        }"#;
        let desc = parse_descriptor(json, "/a/$POST.json").unwrap();
        let empty = HashMap::new();

        let req_params = params(&[("kind", "x")]);
        assert_eq!(
            select_content(&desc, &empty, &empty, &req_params).body,
            "kind.json"
        );
        assert_eq!(
            select_content(&desc, &empty, &empty, &empty).body,
            "default.json"
        );
    }
}
