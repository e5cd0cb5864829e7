//! Server configuration.
//!
//! Dirstub has no config file: everything is provided on the command line
//! and threaded through the pipeline as an explicit value. The output
//! subpath shifts both route discovery and rooted body resolution under a
//! subdirectory of the content store, mirroring running the server from a
//! project checkout while keeping fixtures in e.g. `tests/`.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port the stub listener binds on.
    pub port: u16,
    /// Directory the content store is rooted at.
    pub root_dir: PathBuf,
    /// Optional subpath (relative to `root_dir`) that all route discovery
    /// and rooted body paths are resolved under.
    pub output_path: Option<String>,
}

impl Config {
    pub fn new(port: u16, root_dir: impl Into<PathBuf>, output_path: Option<String>) -> Self {
        // Normalize "tests/" or "/tests" to a bare segment sequence.
        let output_path = output_path
            .map(|p| p.trim_matches('/').to_string())
            .filter(|p| !p.is_empty());
        Self {
            port,
            root_dir: root_dir.into(),
            output_path,
        }
    }

    /// Store path route discovery starts from, with a trailing slash.
    pub fn route_root(&self) -> String {
        match &self.output_path {
            Some(p) => format!("/{p}/"),
            None => "/".to_string(),
        }
    }

    /// Store path rooted body references (`/foo.json`) resolve against.
    pub fn body_root(&self) -> String {
        match &self.output_path {
            Some(p) => format!("/{p}"),
            None => String::new(),
        }
    }

    /// Rewrite a request path into store coordinates before matching.
    pub fn rewrite_request_path(&self, request_path: &str) -> String {
        match &self.output_path {
            Some(p) => format!("/{p}{request_path}"),
            None => request_path.to_string(),
        }
    }
}
