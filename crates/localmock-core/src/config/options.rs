//! Engine options.

use crate::config::error::ConfigError;
use crate::config::parser::load_config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Options recognised by the mock engine.
///
/// Every field is optional in config files; missing fields fall back to
/// [`MockOptions::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MockOptions {
    /// Directory holding mock definitions, relative to the project root
    pub dir: PathBuf,
    /// When `false` every request passes through unmocked
    pub enable: bool,
    /// File stem (inside `dir`) of the route table, e.g. `routes` for `mock/routes.yaml`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_map_config: Option<String>,
    /// Default response latency in milliseconds, overridden per response by `__delay`
    pub delay: u64,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("mock"),
            enable: true,
            path_map_config: None,
            delay: 0,
        }
    }
}

impl MockOptions {
    /// Load options from a YAML/JSON/JSONC file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        load_config(path)
    }

    /// Default response latency.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay)
    }

    /// Absolute (or root-relative) directory holding mock definitions.
    pub fn mock_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.dir)
    }

    /// Route table file stem, ignoring blank values.
    pub fn route_table_name(&self) -> Option<&str> {
        self.path_map_config
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
