//! Request parameter merging.
//!
//! Query string, body and path parameters are flattened into a single
//! [`ParameterSet`]. On key collisions path parameters win over body fields,
//! which win over query parameters.

use crate::expression::object_to_variable;
use crate::matching::PathParams;
use jmespath::Rcvar;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

/// Merged request parameters handed to mock callables.
#[derive(Clone, Default)]
pub struct ParameterSet {
    map: Map<String, Value>,
    /// JMESPath view of `map`, built on first use and dropped on every write
    variable: OnceLock<Rcvar>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    /// String value of a parameter, `None` for missing or non-string values.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.map.get(key).and_then(Value::as_str)
    }

    /// Insert a parameter, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.variable.take();
        self.map.insert(key.into(), value)
    }

    /// Overlay `other` on top of this set.
    pub fn extend(&mut self, other: Map<String, Value>) {
        self.variable.take();
        self.map.extend(other);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.map
    }

    /// Parameters as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.map.clone())
    }

    /// Parameters as JMESPath data, converted once and shared by every expression.
    pub fn variable(&self) -> &Rcvar {
        self.variable.get_or_init(|| object_to_variable(&self.map))
    }
}

impl PartialEq for ParameterSet {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl fmt::Debug for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ParameterSet").field(&self.map).finish()
    }
}

impl From<Map<String, Value>> for ParameterSet {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            map,
            variable: OnceLock::new(),
        }
    }
}

impl FromIterator<(String, Value)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Map<String, Value>>())
    }
}

/// Parse a request body into parameters.
///
/// Missing, blank, malformed or non-object bodies yield no parameters.
pub fn parse_body(body: Option<&str>) -> Map<String, Value> {
    let Some(body) = body.map(str::trim).filter(|b| !b.is_empty()) else {
        return Map::new();
    };

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => {
            debug!(kind = json_kind(&other), "ignoring non-object request body");
            Map::new()
        }
        Err(error) => {
            debug!(%error, "ignoring malformed request body");
            Map::new()
        }
    }
}

/// Merge parameters; `path` overrides `body`, which overrides `query`.
pub fn merge_params(
    query: Map<String, Value>,
    body: Map<String, Value>,
    path: PathParams,
) -> ParameterSet {
    let mut params = ParameterSet::from(query);
    params.extend(body);
    for (name, value) in path {
        params.insert(name, value.map(Value::String).unwrap_or(Value::Null));
    }
    params
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
