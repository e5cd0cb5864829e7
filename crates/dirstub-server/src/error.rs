//! Per-request error taxonomy.
//!
//! Every variant maps to a user-visible response; none of them are fatal to
//! the server process. Malformed descriptors are reported instead of being
//! silently replaced with an empty descriptor.

use hyper::StatusCode;

/// Error types for stub request handling
#[derive(Debug, thiserror::Error)]
pub enum StubError {
    #[error("Not found path content ({path})")]
    RouteNotFound { path: String },
    #[error("Invalid path content ({path})")]
    DescriptorUnreadable { path: String },
    #[error("Malformed descriptor ({path}): {reason}")]
    DescriptorMalformed { path: String, reason: String },
}

impl StubError {
    /// HTTP status the error surfaces as.
    pub fn status(&self) -> StatusCode {
        match self {
            StubError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            StubError::DescriptorUnreadable { .. } => StatusCode::BAD_REQUEST,
            StubError::DescriptorMalformed { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = StubError::RouteNotFound {
            path: "/unknown/path".to_string(),
        };
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("/unknown/path"));

        let err = StubError::DescriptorUnreadable {
            path: "/users/:id/$GET.json".to_string(),
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("/users/:id/$GET.json"));
    }

    #[test]
    fn test_malformed_is_distinct_from_unreadable() {
        let malformed = StubError::DescriptorMalformed {
            path: "/a/$GET.json".to_string(),
            reason: "expected value at line 1".to_string(),
        };
        let unreadable = StubError::DescriptorUnreadable {
            path: "/a/$GET.json".to_string(),
        };
        assert_ne!(malformed.to_string(), unreadable.to_string());
    }
}
