//! Desired-state configuration loading.
//!
//! The document is read once before the pipeline starts and is read-only
//! afterwards. List order is preserved exactly as declared.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Delimiter between the added and the replaced item in a dock replace entry.
pub const DOCK_REPLACE_DELIMITER: char = '|';

/// Packages and settings the workstation should end up with.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DesiredState {
    #[serde(deserialize_with = "string_list")]
    pub casks: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub formulae: Vec<String>,
    #[serde(rename = "appStore", deserialize_with = "string_list")]
    pub app_store_items: Vec<String>,
    #[serde(rename = "defaultSettings", deserialize_with = "string_list")]
    pub default_setting_commands: Vec<String>,
    /// Entries of the form `<add-path>|<remove-path>`.
    #[serde(rename = "dockReplace", deserialize_with = "string_list")]
    pub dock_replacements: Vec<String>,
    #[serde(rename = "dockAdd", deserialize_with = "string_list")]
    pub dock_additions: Vec<String>,
    #[serde(rename = "dockRemove", deserialize_with = "string_list")]
    pub dock_removals: Vec<String>,
}

/// Load the desired state from a YAML document on disk.
pub fn load_config(path: &Path) -> Result<DesiredState> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    parse_config(&text).with_context(|| format!("load config {}", path.display()))
}

/// Parse a desired-state YAML document.
pub fn parse_config(text: &str) -> Result<DesiredState> {
    // An empty document deserializes as null, which is not a mapping.
    if text.trim().is_empty() {
        return Ok(DesiredState::default());
    }
    let state: DesiredState = serde_yaml::from_str(text).context("parse config YAML")?;
    Ok(state)
}

/// Split a dock replace entry into its `(add, remove)` halves.
///
/// Entries without exactly one delimiter are rejected.
pub fn parse_replace_pair(entry: &str) -> Option<(&str, &str)> {
    let mut parts = entry.split(DOCK_REPLACE_DELIMITER);
    let add = parts.next()?;
    let remove = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((add, remove))
}

/// Accept a YAML sequence of scalars, keeping numbers and booleans as text.
///
/// App Store IDs are usually written unquoted, so YAML resolves them as
/// integers.
fn string_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_strings(value).map_err(serde::de::Error::custom)
}

fn scalar_strings(value: Value) -> Result<Vec<String>> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(items) => items,
        other => return Err(anyhow!("expected a list, got {}", kind(&other))),
    };
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::String(text) => Ok(text),
            Value::Number(number) => Ok(number.to_string()),
            Value::Bool(flag) => Ok(flag.to_string()),
            other => Err(anyhow!(
                "list entry {idx} must be a scalar, got {}",
                kind(&other)
            )),
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
