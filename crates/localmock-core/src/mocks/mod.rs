//! Mock resolution.
//!
//! - [`loader`]: where definitions come from ([`DefinitionLoader`])
//! - [`routes`]: where the route table comes from ([`RouteTableProvider`])
//! - [`resolver`]: turns a definition tree into a concrete payload
//! - [`emitter`]: applies latency and serializes the payload
//! - [`engine`]: ties the above together per request

pub mod emitter;
pub mod engine;
pub mod loader;
pub mod resolver;
pub mod routes;

pub use emitter::{delay_millis, effective_delay, emit, MockResponse};
pub use engine::{MockEngine, MockOutcome, MockService};
pub use loader::{DefinitionLoader, FsDefinitionLoader, LoadError, StaticDefinitions};
pub use resolver::{resolve, ResolveError};
pub use routes::{FsRouteTable, RouteTableProvider, StaticRouteTable};
