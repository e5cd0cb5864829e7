// Library exports for integration tests and the dirstub-lint crate.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod handler;
pub mod resolver;
pub mod response;
pub mod routing;
pub mod rules;
pub mod server;
pub mod store;

pub use config::Config;
pub use error::StubError;
pub use store::{ContentStore, DiskStore};
