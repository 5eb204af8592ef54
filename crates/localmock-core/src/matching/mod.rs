//! Request matching utilities.

mod pattern;
mod query;
mod route;

pub use pattern::{compile, CompiledPattern, PathParams, PatternError, WILDCARD};
pub use query::parse_query_string;
pub use route::{match_route, target_from_path, RouteMatch};
