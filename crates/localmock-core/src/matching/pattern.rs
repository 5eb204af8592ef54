//! Express-style URL pattern compilation.
//!
//! Supported segments:
//! - `/users` literal, case-insensitive
//! - `/:id` required parameter, one path segment
//! - `/:id?` optional parameter, the whole segment may be missing
//! - `/:file.json` parameter followed by a literal suffix
//! - `/*` wildcard tail captured under the name `*`, `/*?` when optional
//!
//! A trailing slash on the request path is accepted.

use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

/// Name under which a wildcard tail is captured.
pub const WILDCARD: &str = "*";

/// Path parameters extracted by a match; `None` for groups that captured nothing.
pub type PathParams = HashMap<String, Option<String>>;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Route pattern '{pattern}' could not be compiled: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Compiled URL pattern: a regex plus the ordered names of its capture groups.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    param_names: Vec<String>,
}

impl CompiledPattern {
    /// Parameter names in capture-group order.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Raw captured strings in parameter order, `None` when the path does not match.
    pub fn captures(&self, path: &str) -> Option<Vec<Option<String>>> {
        let caps = self.regex.captures(path)?;
        Some(
            (1..=self.param_names.len())
                .map(|i| caps.get(i).map(|m| m.as_str().to_owned()))
                .collect(),
        )
    }

    /// Percent-decoded parameters keyed by name.
    ///
    /// Empty captures count as missing. With duplicate names the last group wins.
    pub fn extract(&self, path: &str) -> Option<PathParams> {
        let captures = self.captures(path)?;
        Some(
            self.param_names
                .iter()
                .cloned()
                .zip(captures)
                .map(|(name, value)| {
                    let value = value.filter(|v| !v.is_empty()).map(|v| decode_segment(&v));
                    (name, value)
                })
                .collect(),
        )
    }
}

/// Compile an Express-style pattern.
pub fn compile(pattern: &str) -> Result<CompiledPattern, PatternError> {
    let mut param_names = Vec::new();
    let mut regex_str = String::from("(?i)^");

    for segment in pattern.split('/').filter(|s| !s.is_empty()) {
        if let Some(rest) = segment.strip_prefix('*') {
            param_names.push(WILDCARD.to_owned());
            regex_str.push_str(if rest.starts_with('?') {
                "(?:/(.*))?"
            } else {
                "/(.*)"
            });
        } else if let Some(body) = segment.strip_prefix(':') {
            let name_end = body.find(['?', '.']).unwrap_or(body.len());
            let (name, modifiers) = body.split_at(name_end);
            let optional = modifiers.contains('?');
            let suffix: String = modifiers.chars().filter(|c| *c != '?').collect();

            param_names.push(name.to_owned());
            if suffix.is_empty() {
                regex_str.push_str(if optional {
                    "(?:/([^/]+?))?"
                } else {
                    "/([^/]+?)"
                });
            } else {
                regex_str.push_str("/([^/]+?)");
                if optional {
                    regex_str.push('?');
                }
                regex_str.push_str(&regex::escape(&suffix));
            }
        } else {
            regex_str.push('/');
            regex_str.push_str(&regex::escape(segment));
        }
    }

    regex_str.push_str("/?$");

    let regex = Regex::new(&regex_str).map_err(|source| PatternError::InvalidRegex {
        pattern: pattern.to_owned(),
        source,
    })?;

    Ok(CompiledPattern { regex, param_names })
}

fn decode_segment(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_owned())
}
