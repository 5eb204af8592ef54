//! Configuration file parsing (YAML/JSON/JSONC) and file discovery.

use crate::config::error::ConfigError;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Extensions probed when looking up a file by stem, in priority order.
pub const CONFIG_EXTENSIONS: [&str; 4] = ["yaml", "yml", "json", "jsonc"];

/// Config file type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFileType {
    Yaml,
    Json,
    Jsonc,
    Unknown,
}

/// Get config file type from path extension
pub fn get_file_type(path: &str) -> ConfigFileType {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "yaml" | "yml" => ConfigFileType::Yaml,
        "json" => ConfigFileType::Json,
        "jsonc" => ConfigFileType::Jsonc,
        _ => ConfigFileType::Unknown,
    }
}

/// Strip comments from JSONC content
pub fn strip_json_comments(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                result.push(c);
            }
            ('/', Some('/')) => {
                // Keep the newline so line numbers in parse errors stay meaningful
                while let Some(&next) = chars.peek() {
                    if next == '\n' || next == '\r' {
                        break;
                    }
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => result.push(c),
        }
    }

    result
}

/// Parse JSON content
pub fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    serde_json::from_str(content).map_err(ConfigError::from)
}

/// Parse JSONC content (JSON with comments)
pub fn parse_jsonc<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let stripped = strip_json_comments(content);
    serde_json::from_str(&stripped).map_err(ConfigError::from)
}

/// Parse YAML content
pub fn parse_yaml<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    serde_yaml::from_str(content).map_err(ConfigError::from)
}

/// Parse config content based on file type
pub fn parse_config<T: DeserializeOwned>(content: &str, path: &str) -> Result<T, ConfigError> {
    match get_file_type(path) {
        ConfigFileType::Yaml => parse_yaml(content),
        ConfigFileType::Json => parse_json(content),
        ConfigFileType::Jsonc => parse_jsonc(content),
        ConfigFileType::Unknown => Err(ConfigError::UnknownFileType(path.to_string())),
    }
}

/// Read and parse a config file, picking the format from its extension.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let display = path.to_string_lossy().into_owned();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: display.clone(),
        source,
    })?;
    parse_config(&content, &display)
}

/// Find `<dir>/<stem>.<ext>` for any supported extension.
///
/// When several formats exist side by side the order of [`CONFIG_EXTENSIONS`] decides.
pub fn find_config_file(dir: &Path, stem: &Path) -> Option<PathBuf> {
    let base = dir.join(stem);
    let base_name = base.file_name()?.to_os_string();
    let pattern = format!("{}.*", glob::Pattern::escape(&base.to_string_lossy()));

    let mut candidates: Vec<(usize, PathBuf)> = glob::glob(&pattern)
        .ok()?
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .filter(|path| path.file_stem() == Some(base_name.as_os_str()))
        .filter_map(|path| {
            let ext = path.extension()?.to_str()?.to_lowercase();
            let rank = CONFIG_EXTENSIONS.iter().position(|e| *e == ext)?;
            Some((rank, path))
        })
        .collect();

    candidates.sort_by_key(|(rank, _)| *rank);
    candidates.into_iter().next().map(|(_, path)| path)
}
