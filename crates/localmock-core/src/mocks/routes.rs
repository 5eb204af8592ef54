//! Route table providers.

use crate::config::parser::{find_config_file, load_config};
use crate::config::MockOptions;
use crate::mocks::loader::LoadError;
use crate::types::route::RouteTable;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

/// Source of the route table for the current request.
///
/// Implementations never fail: a table that cannot be produced is empty.
pub trait RouteTableProvider: Send + Sync {
    fn route_table(&self) -> RouteTable;
}

impl<T: RouteTableProvider + ?Sized> RouteTableProvider for &T {
    fn route_table(&self) -> RouteTable {
        (**self).route_table()
    }
}

impl<T: RouteTableProvider + ?Sized> RouteTableProvider for std::sync::Arc<T> {
    fn route_table(&self) -> RouteTable {
        (**self).route_table()
    }
}

/// Reads `<dir>/<name>.{yaml,yml,json,jsonc}` on every call.
#[derive(Debug, Clone)]
pub struct FsRouteTable {
    dir: PathBuf,
    name: Option<String>,
}

impl FsRouteTable {
    pub fn new(dir: impl Into<PathBuf>, name: Option<String>) -> Self {
        Self {
            dir: dir.into(),
            name,
        }
    }

    pub fn from_options(root: &Path, options: &MockOptions) -> Self {
        Self::new(
            options.mock_dir(root),
            options.route_table_name().map(str::to_owned),
        )
    }

    /// Load the table, surfacing read and parse errors.
    ///
    /// No configured name or no file on disk both give an empty table.
    pub fn try_load(&self) -> Result<RouteTable, LoadError> {
        let Some(name) = self.name.as_deref() else {
            return Ok(RouteTable::default());
        };
        let Some(file) = find_config_file(&self.dir, Path::new(name)) else {
            trace!(route_table = name, dir = %self.dir.display(), "no route table file");
            return Ok(RouteTable::default());
        };
        load_config(&file).map_err(LoadError::RouteTable)
    }
}

impl RouteTableProvider for FsRouteTable {
    fn route_table(&self) -> RouteTable {
        self.try_load().unwrap_or_else(|error| {
            warn!(%error, "using an empty route table");
            RouteTable::default()
        })
    }
}

/// Fixed route table.
#[derive(Debug, Clone, Default)]
pub struct StaticRouteTable(RouteTable);

impl StaticRouteTable {
    pub fn new(table: RouteTable) -> Self {
        Self(table)
    }
}

impl RouteTableProvider for StaticRouteTable {
    fn route_table(&self) -> RouteTable {
        self.0.clone()
    }
}
