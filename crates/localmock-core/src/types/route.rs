//! Route table types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// HTTP method for route matching
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            _ => Err(format!("Unsupported HTTP method: {}", s)),
        }
    }
}

/// One route table entry mapping a URL pattern to a mock target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteEntry {
    /// URL pattern (supports `:param`, `:param?` and `*` placeholders)
    pub url: String,
    /// Target identifier of the mock definition
    pub path: String,
    /// Restrict the entry to one HTTP method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
}

impl RouteEntry {
    pub fn new(url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
            method: None,
        }
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }
}

/// Ordered route table; the first matching entry wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new(entries: Vec<RouteEntry>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, entry: RouteEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RouteEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<RouteEntry>> for RouteTable {
    fn from(entries: Vec<RouteEntry>) -> Self {
        Self::new(entries)
    }
}

impl FromIterator<RouteEntry> for RouteTable {
    fn from_iter<I: IntoIterator<Item = RouteEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a RouteEntry;
    type IntoIter = std::slice::Iter<'a, RouteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Value of a pattern key in the mapping form of a route table.
#[derive(Deserialize)]
#[serde(untagged)]
enum RouteTarget {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        method: Option<HttpMethod>,
    },
}

impl<'de> Deserialize<'de> for RouteTable {
    /// Accepts either a list of entries or a mapping keyed by URL pattern.
    /// Mapping order is the match order.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Array(_) => serde_json::from_value::<Vec<RouteEntry>>(value)
                .map(RouteTable::new)
                .map_err(serde::de::Error::custom),
            Value::Object(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (url, target) in map {
                    let target: RouteTarget =
                        serde_json::from_value(target).map_err(serde::de::Error::custom)?;
                    let entry = match target {
                        RouteTarget::Path(path) => RouteEntry::new(url, path),
                        RouteTarget::Detailed { path, method } => RouteEntry { url, path, method },
                    };
                    entries.push(entry);
                }
                Ok(RouteTable::new(entries))
            }
            Value::Null => Ok(RouteTable::default()),
            _ => Err(serde::de::Error::custom(
                "Route table must be either a list of routes or a mapping of URL patterns",
            )),
        }
    }
}
