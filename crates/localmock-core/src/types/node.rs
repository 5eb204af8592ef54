//! Mock definition tree.

use crate::expression::{evaluate_jmespath_variable, extract_expression};
use crate::params::ParameterSet;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Root key marking a definition as an active mock.
pub const MOCK_KEY: &str = "__mock";

/// Signature of a computed mock value.
pub type CallableFn = dyn Fn(&ParameterSet) -> MockNode + Send + Sync;

/// A value computed from the request parameters at resolution time.
#[derive(Clone)]
pub struct Callable(Arc<CallableFn>);

impl Callable {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ParameterSet) -> MockNode + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Callable evaluating a JMESPath expression against the parameters.
    ///
    /// Expressions that fail to compile or evaluate produce `null`.
    pub fn expression(expression: impl Into<String>) -> Self {
        let expression = expression.into();
        Self::new(move |params| {
            MockNode::Value(
                evaluate_jmespath_variable(&expression, params.variable()).unwrap_or_default(),
            )
        })
    }

    pub fn call(&self, params: &ParameterSet) -> MockNode {
        (self.0)(params)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callable(..)")
    }
}

/// Node of a mock definition.
///
/// `Value` holds static JSON that resolves to itself; the container variants exist
/// so callables can appear anywhere in the tree.
#[derive(Debug, Clone)]
pub enum MockNode {
    /// No value. Dropped from mappings and rendered as `null` inside sequences.
    Undefined,
    /// Static JSON
    Value(Value),
    /// Ordered sequence
    Seq(Vec<MockNode>),
    /// Key to value mapping with unique keys
    Map(Vec<(String, MockNode)>),
    /// Computed value
    Callable(Callable),
}

impl MockNode {
    /// Wrap a closure as a callable node.
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&ParameterSet) -> MockNode + Send + Sync + 'static,
    {
        MockNode::Callable(Callable::new(f))
    }

    /// Build a mapping node; a repeated key replaces the earlier value in place.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, MockNode)>,
    {
        let mut map: Vec<(String, MockNode)> = Vec::new();
        for (key, node) in entries {
            let key = key.into();
            match map.iter_mut().find(|(existing, _)| *existing == key) {
                Some(slot) => slot.1 = node,
                None => map.push((key, node)),
            }
        }
        MockNode::Map(map)
    }

    /// Build a sequence node.
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = MockNode>,
    {
        MockNode::Seq(items.into_iter().collect())
    }

    /// Convert a parsed definition file into a node tree.
    ///
    /// String leaves of the form `${expr}` become expression callables.
    pub fn from_definition(value: Value) -> Self {
        match value {
            Value::String(s) => match extract_expression(&s) {
                Some(expr) => MockNode::Callable(Callable::expression(expr)),
                None => MockNode::Value(Value::String(s)),
            },
            Value::Array(items) => {
                MockNode::Seq(items.into_iter().map(MockNode::from_definition).collect())
            }
            Value::Object(map) => MockNode::Map(
                map.into_iter()
                    .map(|(k, v)| (k, MockNode::from_definition(v)))
                    .collect(),
            ),
            other => MockNode::Value(other),
        }
    }

    /// Look up a direct child of a mapping node.
    pub fn get(&self, key: &str) -> Option<MockNode> {
        match self {
            MockNode::Map(entries) => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, node)| node.clone()),
            MockNode::Value(Value::Object(map)) => map.get(key).cloned().map(MockNode::Value),
            _ => None,
        }
    }

    /// Whether the root carries a truthy `__mock` marker.
    pub fn is_mock(&self) -> bool {
        self.get(MOCK_KEY).is_some_and(|marker| marker.is_truthy())
    }

    /// Truthiness of a marker value: `false`, `0`, `""`, `null` and undefined are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            MockNode::Undefined => false,
            MockNode::Value(Value::Null) => false,
            MockNode::Value(Value::Bool(b)) => *b,
            MockNode::Value(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
            MockNode::Value(Value::String(s)) => !s.is_empty(),
            MockNode::Value(_) | MockNode::Seq(_) | MockNode::Map(_) | MockNode::Callable(_) => {
                true
            }
        }
    }
}

impl From<Value> for MockNode {
    fn from(value: Value) -> Self {
        MockNode::Value(value)
    }
}

impl From<Callable> for MockNode {
    fn from(callable: Callable) -> Self {
        MockNode::Callable(callable)
    }
}
