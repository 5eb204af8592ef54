//! Mock definition resolution.
//!
//! Walks a [`MockNode`] tree and replaces every callable with the resolved result
//! of invoking it. Keys are copied verbatim, reserved ones included.

use crate::params::ParameterSet;
use crate::types::node::MockNode;
use serde_json::{Map, Value};
use thiserror::Error;

/// Default nesting limit of [`resolve`].
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Nesting limit hit, usually a callable that keeps returning callables
    #[error("Mock definition nested deeper than {limit} levels")]
    DepthExceeded { limit: usize },
}

/// Resolve a definition into concrete JSON.
///
/// An undefined root resolves to `null`.
pub fn resolve(node: &MockNode, params: &ParameterSet) -> Result<Value, ResolveError> {
    resolve_with_limit(node, params, MAX_DEPTH)
}

/// [`resolve`] with a custom nesting limit.
pub fn resolve_with_limit(
    node: &MockNode,
    params: &ParameterSet,
    limit: usize,
) -> Result<Value, ResolveError> {
    Ok(resolve_node(node, params, 0, limit)?.unwrap_or(Value::Null))
}

/// `None` stands for an undefined value.
fn resolve_node(
    node: &MockNode,
    params: &ParameterSet,
    depth: usize,
    limit: usize,
) -> Result<Option<Value>, ResolveError> {
    if depth > limit {
        return Err(ResolveError::DepthExceeded { limit });
    }

    match node {
        MockNode::Undefined => Ok(None),
        MockNode::Value(value) => Ok(Some(value.clone())),
        MockNode::Seq(items) => {
            let values = items
                .iter()
                .map(|item| {
                    resolve_node(item, params, depth + 1, limit).map(|v| v.unwrap_or(Value::Null))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(Value::Array(values)))
        }
        MockNode::Map(entries) => {
            let mut map = Map::new();
            for (key, child) in entries {
                if let Some(value) = resolve_node(child, params, depth + 1, limit)? {
                    map.insert(key.clone(), value);
                }
            }
            Ok(Some(Value::Object(map)))
        }
        MockNode::Callable(callable) => {
            // Recurse on what the callable produced, not on the callable itself
            let produced = callable.call(params);
            resolve_node(&produced, params, depth + 1, limit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::node::Callable;
    use rstest::rstest;
    use serde_json::json;

    fn params(value: Value) -> ParameterSet {
        match value {
            Value::Object(map) => ParameterSet::from(map),
            _ => panic!("expected an object"),
        }
    }

    #[rstest]
    fn test_structure_preserving() {
        let definition = MockNode::object([
            ("x", MockNode::from(json!(1))),
            (
                "y",
                MockNode::array([
                    MockNode::from(json!(2)),
                    MockNode::callable(|_| MockNode::from(json!(3))),
                ]),
            ),
        ]);

        for p in [json!({}), json!({"x": "ignored"})] {
            assert_eq!(
                resolve(&definition, &params(p)).unwrap(),
                json!({"x": 1, "y": [2, 3]})
            );
        }
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!(true))]
    #[case(json!(3.5))]
    #[case(json!("text"))]
    #[case(json!([1, [2, {"a": null}]]))]
    #[case(json!({"__mock": true, "__delay": 20, "data": {"items": []}}))]
    fn test_static_definitions_are_idempotent(#[case] definition: Value) {
        let p = params(json!({"id": "1"}));
        let once = resolve(&MockNode::from_definition(definition.clone()), &p).unwrap();
        let twice = resolve(&MockNode::from_definition(once.clone()), &p).unwrap();
        assert_eq!(once, definition);
        assert_eq!(twice, once);
    }

    #[rstest]
    fn test_callables_receive_params() {
        let definition = MockNode::object([
            ("__mock", MockNode::from(json!(true))),
            (
                "id",
                MockNode::callable(|p| MockNode::from(p.get("id").cloned().unwrap_or_default())),
            ),
            ("active", MockNode::Callable(Callable::expression("active"))),
        ]);

        let result = resolve(&definition, &params(json!({"id": "42", "active": "true"}))).unwrap();
        assert_eq!(result, json!({"__mock": true, "id": "42", "active": "true"}));
    }

    #[rstest]
    fn test_callable_returning_container_is_resolved() {
        let definition = MockNode::callable(|p| {
            let count = p.get_str("count").and_then(|c| c.parse::<usize>().ok()).unwrap_or(0);
            MockNode::array((0..count).map(|i| {
                MockNode::object([
                    ("index", MockNode::from(json!(i))),
                    ("label", MockNode::callable(move |_| MockNode::from(json!(format!("item-{i}"))))),
                ])
            }))
        });

        let result = resolve(&definition, &params(json!({"count": "2"}))).unwrap();
        assert_eq!(
            result,
            json!([{"index": 0, "label": "item-0"}, {"index": 1, "label": "item-1"}])
        );
    }

    #[rstest]
    fn test_undefined_values() {
        let definition = MockNode::object([
            ("kept", MockNode::from(json!(1))),
            ("dropped", MockNode::callable(|_| MockNode::Undefined)),
            ("list", MockNode::array([MockNode::Undefined, MockNode::from(json!(2))])),
        ]);

        let result = resolve(&definition, &ParameterSet::new()).unwrap();
        assert_eq!(result, json!({"kept": 1, "list": [null, 2]}));
        assert_eq!(resolve(&MockNode::Undefined, &ParameterSet::new()).unwrap(), Value::Null);
    }

    #[rstest]
    fn test_reserved_keys_are_copied() {
        let definition = MockNode::from_definition(json!({"__mock": true, "__delay": 50, "ok": "${ok}"}));
        let result = resolve(&definition, &params(json!({"ok": "yes"}))).unwrap();
        assert_eq!(result, json!({"__mock": true, "__delay": 50, "ok": "yes"}));
    }

    fn endless(_: &ParameterSet) -> MockNode {
        MockNode::callable(endless)
    }

    #[rstest]
    fn test_runaway_callable_hits_depth_limit() {
        let definition = MockNode::object([("loop", MockNode::callable(endless))]);
        assert_eq!(
            resolve_with_limit(&definition, &ParameterSet::new(), 16),
            Err(ResolveError::DepthExceeded { limit: 16 })
        );
    }

    #[rstest]
    fn test_depth_limit_allows_nesting_up_to_limit() {
        let mut node = MockNode::from(json!("leaf"));
        for _ in 0..8 {
            node = MockNode::array([node]);
        }
        assert!(resolve_with_limit(&node, &ParameterSet::new(), 8).is_ok());
        assert!(resolve_with_limit(&node, &ParameterSet::new(), 7).is_err());
    }
}
