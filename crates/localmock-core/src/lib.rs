//! Route matching and mock resolution for local development servers.
//!
//! A request is matched against a route table of path patterns, its query, body
//! and path parameters are merged, and the matching mock definition is resolved
//! into a JSON payload. Anything that is not a mock is left to the host.

pub mod config;
pub mod expression;
pub mod matching;
pub mod mocks;
pub mod params;
pub mod types;

pub use config::{ConfigError, MockOptions};
pub use mocks::{MockEngine, MockOutcome, MockResponse, MockService};
pub use params::ParameterSet;
pub use types::node::MockNode;
pub use types::request::RequestContext;
pub use types::route::{HttpMethod, RouteEntry, RouteTable};
