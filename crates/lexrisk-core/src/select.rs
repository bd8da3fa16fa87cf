//! Single-select option lists, either static or loaded from a remote URL.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::profile::PRACTICE_AREAS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Where a select gets its options from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionSource {
    Static(Vec<SelectOption>),
    /// Fetched from `url` (absolute, or relative to the API base URL).
    ///
    /// When `data_key` is set the options are read from that key of the
    /// response object; items that are objects are mapped with `label_key`
    /// and `value_key`.
    Remote {
        url: String,
        data_key: Option<String>,
        label_key: String,
        value_key: String,
    },
}

impl OptionSource {
    pub fn remote(url: impl Into<String>) -> Self {
        OptionSource::Remote {
            url: url.into(),
            data_key: None,
            label_key: "label".to_string(),
            value_key: "value".to_string(),
        }
    }

    pub fn with_data_key(self, key: impl Into<String>) -> Self {
        match self {
            OptionSource::Remote {
                url,
                label_key,
                value_key,
                ..
            } => OptionSource::Remote {
                url,
                data_key: Some(key.into()),
                label_key,
                value_key,
            },
            other => other,
        }
    }
}

pub fn practice_area_options() -> Vec<SelectOption> {
    PRACTICE_AREAS
        .iter()
        .map(|area| SelectOption::new(*area, *area))
        .collect()
}

/// Map a remote response into options.
///
/// Strings become `label == value`; objects are read through the key names;
/// numbers and booleans are stringified. Anything else is skipped.
pub fn options_from_json(
    body: &Value,
    data_key: Option<&str>,
    label_key: &str,
    value_key: &str,
) -> Vec<SelectOption> {
    let list = match data_key {
        Some(key) => body.get(key),
        None => Some(body),
    };
    let Some(Value::Array(items)) = list else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(SelectOption::new(s.clone(), s.clone())),
            Value::Number(_) | Value::Bool(_) => {
                let s = item.to_string();
                Some(SelectOption::new(s.clone(), s))
            }
            Value::Object(map) => {
                let value = map.get(value_key).map(scalar_to_string)?;
                let label = map
                    .get(label_key)
                    .map(scalar_to_string)
                    .unwrap_or_else(|| value.clone());
                Some(SelectOption { label, value })
            }
            _ => None,
        })
        .collect()
}

fn scalar_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
