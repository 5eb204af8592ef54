//! Mock definition loaders.
//!
//! A loader maps a target identifier (a route table `path`, or a request path when
//! no route matched) to a definition tree. Loaders are consulted on every request
//! and must return the freshest definition they have.

use crate::config::error::ConfigError;
use crate::config::parser::{find_config_file, load_config};
use crate::config::MockOptions;
use crate::types::node::MockNode;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to load mock definition '{target}': {source}")]
    Definition {
        target: String,
        #[source]
        source: ConfigError,
    },
    #[error("Failed to load route table: {0}")]
    RouteTable(#[source] ConfigError),
}

/// Source of mock definitions.
pub trait DefinitionLoader: Send + Sync {
    /// `Ok(None)` when no definition exists for `target`.
    fn load(&self, target: &str) -> Result<Option<MockNode>, LoadError>;
}

impl<T: DefinitionLoader + ?Sized> DefinitionLoader for &T {
    fn load(&self, target: &str) -> Result<Option<MockNode>, LoadError> {
        (**self).load(target)
    }
}

impl<T: DefinitionLoader + ?Sized> DefinitionLoader for std::sync::Arc<T> {
    fn load(&self, target: &str) -> Result<Option<MockNode>, LoadError> {
        (**self).load(target)
    }
}

/// Loads `<dir>/<target>.{yaml,yml,json,jsonc}`, re-reading the file on every call.
#[derive(Debug, Clone)]
pub struct FsDefinitionLoader {
    dir: PathBuf,
}

impl FsDefinitionLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_options(root: &Path, options: &MockOptions) -> Self {
        Self::new(options.mock_dir(root))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DefinitionLoader for FsDefinitionLoader {
    fn load(&self, target: &str) -> Result<Option<MockNode>, LoadError> {
        let Some(relative) = relative_target(target) else {
            trace!(mock_target = target, "target is not a relative definition path");
            return Ok(None);
        };
        let Some(file) = find_config_file(&self.dir, &relative) else {
            trace!(mock_target = target, dir = %self.dir.display(), "no definition file");
            return Ok(None);
        };

        let value: Value = load_config(&file).map_err(|source| LoadError::Definition {
            target: target.to_owned(),
            source,
        })?;
        Ok(Some(MockNode::from_definition(value)))
    }
}

/// Turn a target identifier into a path confined to the definitions directory.
fn relative_target(target: &str) -> Option<PathBuf> {
    let trimmed = target.trim_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    let path = Path::new(trimmed);
    path.components()
        .all(|c| matches!(c, Component::Normal(_)))
        .then(|| path.to_path_buf())
}

/// In-memory definitions, typically built in code with native callables.
#[derive(Debug, Clone, Default)]
pub struct StaticDefinitions {
    definitions: HashMap<String, MockNode>,
}

impl StaticDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition; leading and trailing slashes of `target` are ignored.
    pub fn insert(&mut self, target: &str, definition: MockNode) -> Option<MockNode> {
        self.definitions.insert(normalize_key(target), definition)
    }

    pub fn with(mut self, target: &str, definition: MockNode) -> Self {
        self.insert(target, definition);
        self
    }
}

impl DefinitionLoader for StaticDefinitions {
    fn load(&self, target: &str) -> Result<Option<MockNode>, LoadError> {
        Ok(self.definitions.get(&normalize_key(target)).cloned())
    }
}

fn normalize_key(target: &str) -> String {
    target.trim_matches('/').to_owned()
}
