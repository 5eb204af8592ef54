//! Request to mock response pipeline.
//!
//! `match -> merge -> resolve -> emit`, with every failure degrading to
//! [`MockOutcome::NotAMock`] so the host can fall through to its next handler.

use crate::config::MockOptions;
use crate::matching::{match_route, parse_query_string, target_from_path, PathParams};
use crate::mocks::emitter::{effective_delay, emit, MockResponse};
use crate::mocks::loader::{DefinitionLoader, FsDefinitionLoader};
use crate::mocks::resolver::resolve;
use crate::mocks::routes::{FsRouteTable, RouteTableProvider};
use crate::params::{merge_params, parse_body};
use crate::types::request::RequestContext;
use crate::types::route::RouteTable;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Result of resolving one request.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOutcome {
    /// The request is mocked
    Handled {
        /// Target identifier the definition was loaded from
        target: String,
        /// Resolved payload, reserved keys included
        payload: Value,
        /// Latency to apply before responding
        delay: Duration,
    },
    /// Not a mock route; the host should pass the request on
    NotAMock,
}

impl MockOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, MockOutcome::Handled { .. })
    }
}

/// Resolves requests against a route table and a definition loader.
///
/// Holds no per-request state; one engine can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct MockEngine<L> {
    loader: L,
}

impl<L: DefinitionLoader> MockEngine<L> {
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Resolve a raw request line (`METHOD URL [VERSION]`) with an optional body.
    pub fn resolve_mock_response(
        &self,
        request_line: &str,
        table: &RouteTable,
        body: Option<&str>,
        configured_delay: Duration,
    ) -> MockOutcome {
        let Some(mut request) = RequestContext::parse(request_line) else {
            debug!(request_line, "unparsable request line");
            return MockOutcome::NotAMock;
        };
        if let Some(body) = body {
            request = request.with_body(body);
        }
        self.resolve_request(&request, table, configured_delay)
    }

    /// Resolve a request.
    ///
    /// Without a matching route the request path itself is the target identifier.
    pub fn resolve_request(
        &self,
        request: &RequestContext,
        table: &RouteTable,
        configured_delay: Duration,
    ) -> MockOutcome {
        let (target, path_params) = match match_route(table, request.path(), request.http_method())
        {
            Some(found) => (found.target, found.params),
            None => (target_from_path(request.path()), PathParams::new()),
        };

        let definition = match self.loader.load(&target) {
            Ok(Some(definition)) => definition,
            Ok(None) => {
                trace!(mock_target = %target, "no mock definition");
                return MockOutcome::NotAMock;
            }
            Err(error) => {
                warn!(mock_target = %target, %error, "mock definition failed to load");
                return MockOutcome::NotAMock;
            }
        };

        if !definition.is_mock() {
            debug!(mock_target = %target, "definition is not marked as a mock");
            return MockOutcome::NotAMock;
        }

        let params = merge_params(
            parse_query_string(request.query()),
            parse_body(request.body()),
            path_params,
        );

        match resolve(&definition, &params) {
            Ok(payload) => {
                let delay = effective_delay(&payload, configured_delay);
                debug!(
                    method = request.method(),
                    path = request.path(),
                    mock_target = %target,
                    "request mocked"
                );
                MockOutcome::Handled {
                    target,
                    payload,
                    delay,
                }
            }
            Err(error) => {
                warn!(mock_target = %target, %error, "mock definition failed to resolve");
                MockOutcome::NotAMock
            }
        }
    }
}

/// Engine bundled with its options and route table source.
#[derive(Debug, Clone)]
pub struct MockService<R, L> {
    options: MockOptions,
    routes: R,
    engine: MockEngine<L>,
}

impl MockService<FsRouteTable, FsDefinitionLoader> {
    /// Service reading definitions and the route table from `<root>/<dir>`.
    pub fn from_options(root: &Path, options: MockOptions) -> Self {
        let routes = FsRouteTable::from_options(root, &options);
        let loader = FsDefinitionLoader::from_options(root, &options);
        Self::new(options, routes, loader)
    }
}

impl<R: RouteTableProvider, L: DefinitionLoader> MockService<R, L> {
    pub fn new(options: MockOptions, routes: R, loader: L) -> Self {
        Self {
            options,
            routes,
            engine: MockEngine::new(loader),
        }
    }

    pub fn options(&self) -> &MockOptions {
        &self.options
    }

    pub fn engine(&self) -> &MockEngine<L> {
        &self.engine
    }

    /// Current route table from the provider.
    pub fn route_table(&self) -> RouteTable {
        self.routes.route_table()
    }

    /// Resolve without delivering; disabled services never mock.
    pub fn resolve(&self, request: &RequestContext) -> MockOutcome {
        if !self.options.enable {
            trace!("mocking disabled");
            return MockOutcome::NotAMock;
        }
        let table = self.routes.route_table();
        self.engine
            .resolve_request(request, &table, self.options.delay())
    }

    /// Handle a request end to end.
    ///
    /// `None` means the request is not mocked and the host should pass it on.
    pub async fn handle(&self, request: &RequestContext) -> Option<MockResponse> {
        match self.resolve(request) {
            MockOutcome::Handled { payload, .. } => Some(emit(&payload, self.options.delay()).await),
            MockOutcome::NotAMock => None,
        }
    }
}
