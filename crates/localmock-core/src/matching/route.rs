//! Route table lookup.

use crate::matching::pattern::{compile, PathParams};
use crate::types::route::{HttpMethod, RouteEntry, RouteTable};
use tracing::{trace, warn};

/// First route table entry matching a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Target identifier of the matched entry
    pub target: String,
    /// Parameters captured from the path
    pub params: PathParams,
}

/// Find the first entry of `table` matching `path`.
///
/// Entries are compiled on every call. Entries restricted to a method only match
/// requests carrying that method; an unknown request method never matches them.
/// Entries whose pattern fails to compile are skipped.
pub fn match_route(
    table: &RouteTable,
    path: &str,
    method: Option<HttpMethod>,
) -> Option<RouteMatch> {
    table
        .iter()
        .filter(|entry| method_allows(entry, method))
        .find_map(|entry| {
            let compiled = match compile(&entry.url) {
                Ok(compiled) => compiled,
                Err(error) => {
                    warn!(pattern = %entry.url, %error, "skipping route with invalid pattern");
                    return None;
                }
            };
            let params = compiled.extract(path)?;
            trace!(pattern = %entry.url, mock_target = %entry.path, "route matched");
            Some(RouteMatch {
                target: entry.path.clone(),
                params,
            })
        })
}

/// Target identifier derived from the URL alone: the path without its query string.
pub fn target_from_path(url: &str) -> String {
    url.split(['?', '#']).next().unwrap_or_default().to_owned()
}

fn method_allows(entry: &RouteEntry, method: Option<HttpMethod>) -> bool {
    match entry.method {
        None => true,
        Some(required) => method == Some(required),
    }
}
