//! Route discovery and path matching.

mod index;
mod matcher;

pub use index::build_route_table;
pub use matcher::{match_route, MatchResult, RoutePattern, Segment};
