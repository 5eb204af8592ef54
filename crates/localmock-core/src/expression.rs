//! JMESPath expression utilities for computed mock values.
//!
//! Definition files cannot carry closures, so a string leaf written as
//! `${<expression>}` is evaluated against the request parameters instead.

use jmespath::{Rcvar, Variable};
use serde_json::{Map, Value};

/// Check whether a string is an expression of the form `${...}`.
pub fn is_expression(s: &str) -> bool {
    s.len() > 3 && s.starts_with("${") && s.ends_with('}')
}

/// Extract the expression body from `${...}`, if the string is an expression.
pub fn extract_expression(s: &str) -> Option<&str> {
    if !is_expression(s) {
        return None;
    }
    s.strip_prefix("${")
        .and_then(|s| s.strip_suffix('}'))
        .map(str::trim)
        .filter(|expr| !expr.is_empty())
}

/// Convert serde_json::Value to jmespath::Variable.
pub fn value_to_variable(value: &Value) -> Rcvar {
    match value {
        Value::Null => Rcvar::new(Variable::Null),
        Value::Bool(b) => Rcvar::new(Variable::Bool(*b)),
        Value::Number(n) => Rcvar::new(Variable::Number(n.clone())),
        Value::String(s) => Rcvar::new(Variable::String(s.clone())),
        Value::Array(arr) => {
            let vars: Vec<Rcvar> = arr.iter().map(value_to_variable).collect();
            Rcvar::new(Variable::Array(vars))
        }
        Value::Object(obj) => object_to_variable(obj),
    }
}

/// Convert a JSON object to jmespath::Variable without wrapping it in a `Value` first.
pub fn object_to_variable(obj: &Map<String, Value>) -> Rcvar {
    let map: std::collections::BTreeMap<String, Rcvar> = obj
        .iter()
        .map(|(k, v)| (k.clone(), value_to_variable(v)))
        .collect();
    Rcvar::new(Variable::Object(map))
}

/// Convert jmespath::Variable to serde_json::Value.
pub fn variable_to_value(var: &Rcvar) -> Result<Value, String> {
    match var.as_ref() {
        Variable::Null => Ok(Value::Null),
        Variable::Bool(b) => Ok(Value::Bool(*b)),
        Variable::Number(n) => Ok(Value::Number(n.clone())),
        Variable::String(s) => Ok(Value::String(s.clone())),
        Variable::Array(arr) => {
            let values: Result<Vec<Value>, String> = arr.iter().map(variable_to_value).collect();
            Ok(Value::Array(values?))
        }
        Variable::Object(obj) => {
            let map: Result<serde_json::Map<String, Value>, String> = obj
                .iter()
                .map(|(k, v)| variable_to_value(v).map(|val| (k.clone(), val)))
                .collect();
            Ok(Value::Object(map?))
        }
        Variable::Expref(_) => Err("Expression references not supported".to_string()),
    }
}

/// Evaluate JMESPath expression on data and return the result as Value.
///
/// Returns `None` when the expression does not compile or fails at runtime.
pub fn evaluate_jmespath(expression: &str, data: &Value) -> Option<Value> {
    evaluate_jmespath_variable(expression, &value_to_variable(data))
}

/// [`evaluate_jmespath`] over data that is already converted.
pub fn evaluate_jmespath_variable(expression: &str, data: &Rcvar) -> Option<Value> {
    let expr = jmespath::compile(expression).ok()?;
    let result = expr.search(data.clone()).ok()?;
    variable_to_value(&result).ok()
}
