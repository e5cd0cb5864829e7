//! Path matching against candidate route patterns.

use std::collections::HashMap;

/// Directory name prefix marking a parameter segment (`:id`).
pub const PARAM_SIGIL: char = ':';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
}

/// A slash-delimited route pattern such as `/users/:id`.
///
/// Identity is the string form; two patterns are equal iff their segment
/// lists are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(raw: &str) -> Self {
        let segments = raw
            .split('/')
            .map(|s| match s.strip_prefix(PARAM_SIGIL) {
                Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
                _ => Segment::Literal(s.to_string()),
            })
            .collect();
        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Match a concrete request path, capturing parameter segments.
    ///
    /// The pattern must have the same number of segments as the path; each
    /// position must be literally equal or be a parameter segment.
    pub fn match_path(&self, path: &str) -> Option<HashMap<String, String>> {
        let path_segments: Vec<&str> = path.split('/').collect();
        if path_segments.len() != self.segments.len() {
            return None;
        }
        let mut params = HashMap::new();
        for (segment, value) in self.segments.iter().zip(&path_segments) {
            match segment {
                Segment::Literal(lit) => {
                    if lit.as_str() != *value {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), (*value).to_string());
                }
            }
        }
        Some(params)
    }
}

/// The chosen pattern plus its captured path parameters.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub pattern: RoutePattern,
    pub params: HashMap<String, String>,
}

/// Resolve a request path against the candidate table.
///
/// When several candidates match, the last one in table order wins. That
/// is a deliberate, documented tie-break inherited from the discovery
/// walk; it is not a specificity ranking and callers must not assume
/// most-specific-wins.
pub fn match_route(table: &[String], request_path: &str) -> Option<MatchResult> {
    let mut found = None;
    for raw in table {
        let pattern = RoutePattern::parse(raw);
        if let Some(params) = pattern.match_path(request_path) {
            found = Some(MatchResult { pattern, params });
        }
    }
    found
}
