//! Query string decoding.

use serde_json::{Map, Value};

/// Bracket segments decoded into nested objects; anything deeper stays one literal segment.
pub const MAX_QUERY_DEPTH: usize = 5;

/// Parse a raw query string (without `?`) into parameters.
///
/// - `a=1&a=2` and `a[]=1` produce arrays
/// - `filter[status]=open` produces nested objects, up to [`MAX_QUERY_DEPTH`] levels
/// - a plain value and a bracketed key sharing a base are both kept, in an array
/// - `+` decodes to a space, `%XX` sequences are percent-decoded
/// - a key without `=` maps to `null`, `key=` maps to an empty string
pub fn parse_query_string(query: &str) -> Map<String, Value> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut result = Map::new();

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }

        let (raw_key, raw_value) = match pair.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (pair, None),
        };

        let key = decode_component(raw_key);
        if key.is_empty() {
            continue;
        }
        let value = raw_value
            .map(|v| Value::String(decode_component(v)))
            .unwrap_or(Value::Null);

        let (base, path) = split_key(&key);
        assign(&mut result, base, &path, value);
    }

    result
}

fn decode_component(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(raw)
}

/// Split `base[a][b]` into `base` and `["a", "b"]`.
///
/// Keys with unbalanced or trailing brackets are kept verbatim. Past
/// [`MAX_QUERY_DEPTH`] segments the remainder, brackets included, is a single segment.
fn split_key(key: &str) -> (&str, Vec<String>) {
    let Some(open) = key.find('[') else {
        return (key, Vec::new());
    };
    if open == 0 {
        return (key, Vec::new());
    }

    let (base, mut rest) = key.split_at(open);
    let mut path = Vec::new();
    while let Some(inner) = rest.strip_prefix('[') {
        if path.len() == MAX_QUERY_DEPTH {
            path.push(rest.to_owned());
            return (base, path);
        }
        let Some(close) = inner.find(']') else {
            return (key, Vec::new());
        };
        path.push(inner[..close].to_owned());
        rest = &inner[close + 1..];
    }

    if rest.is_empty() {
        (base, path)
    } else {
        (key, Vec::new())
    }
}

fn assign(map: &mut Map<String, Value>, key: &str, path: &[String], value: Value) {
    let Some((head, rest)) = path.split_first() else {
        append(map, key, value);
        return;
    };

    if head.is_empty() {
        let item = if rest.is_empty() {
            value
        } else {
            let mut inner = Map::new();
            assign(&mut inner, &rest[0], &rest[1..], value);
            Value::Object(inner)
        };
        match map.get_mut(key) {
            Some(Value::Array(items)) => items.push(item),
            Some(existing) => {
                let previous = existing.take();
                *existing = Value::Array(vec![previous, item]);
            }
            None => {
                map.insert(key.to_owned(), Value::Array(vec![item]));
            }
        }
        return;
    }

    match map.get_mut(key) {
        Some(Value::Object(inner)) => assign(inner, head, rest, value),
        // `a[]=1&a[b]=2`: fill the trailing object of the array, or start one
        Some(Value::Array(items)) => match items.last_mut() {
            Some(Value::Object(inner)) => assign(inner, head, rest, value),
            _ => items.push(nested(head, rest, value)),
        },
        // `a=1&a[b]=2`: keep the plain value next to the object
        Some(existing) => {
            let previous = existing.take();
            *existing = Value::Array(vec![previous, nested(head, rest, value)]);
        }
        None => {
            map.insert(key.to_owned(), nested(head, rest, value));
        }
    }
}

fn nested(head: &str, rest: &[String], value: Value) -> Value {
    let mut inner = Map::new();
    assign(&mut inner, head, rest, value);
    Value::Object(inner)
}

/// Insert a plain key; repeated keys collect into an array.
fn append(map: &mut Map<String, Value>, key: &str, value: Value) {
    match map.get_mut(key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let previous = existing.take();
            *existing = Value::Array(vec![previous, value]);
        }
        None => {
            map.insert(key.to_owned(), value);
        }
    }
}
