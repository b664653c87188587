// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use anyhow::bail;

use crate::{filter::FilterSet, prelude::*};

mod _core {
    pub(super) use filtersync_core::validate::{RawInput, RawValue, Sanitized, ValidationError};
}

/// A rejected value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub field: String,

    /// Machine-readable identifier of the violated rule.
    pub rule: String,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl From<_core::ValidationError> for ValidationError {
    fn from(from: _core::ValidationError) -> Self {
        let _core::ValidationError { field, rule, value } = from;
        Self {
            field: field.name().to_owned(),
            rule: rule.code().to_owned(),
            message: rule.to_string(),
            value,
        }
    }
}

/// Outcome of the tolerant validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// `true` if all values have been accepted unmodified.
    pub valid: bool,

    pub filters: FilterSet,
    pub rejected_values: Vec<ValidationError>,
    pub original_count: usize,
    pub validated_count: usize,
}

impl From<_core::Sanitized> for ValidationReport {
    fn from(from: _core::Sanitized) -> Self {
        let _core::Sanitized {
            filters,
            rejected,
            original_count,
            validated_count,
        } = from;
        Self {
            valid: rejected.is_empty(),
            filters: filters.into(),
            rejected_values: rejected.into_iter().map(Into::into).collect(),
            original_count,
            validated_count,
        }
    }
}

fn raw_list_item(item: serde_json::Value) -> anyhow::Result<String> {
    match item {
        serde_json::Value::String(item) => Ok(item),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        item => bail!("unsupported list item: {item}"),
    }
}

/// Convert a JSON request body into untrusted input.
///
/// The body must be an object. Nested objects are rejected and `null`
/// values are treated as absent.
pub fn raw_input_from_json(json: serde_json::Value) -> anyhow::Result<_core::RawInput> {
    let serde_json::Value::Object(object) = json else {
        bail!("expected a JSON object");
    };
    let mut input = _core::RawInput::new();
    for (key, value) in object {
        let value = match value {
            serde_json::Value::Null => continue,
            serde_json::Value::Bool(flag) => _core::RawValue::Bool(flag),
            serde_json::Value::Number(number) => {
                if let Some(number) = number.as_i64() {
                    _core::RawValue::Int(number)
                } else {
                    _core::RawValue::Text(number.to_string())
                }
            }
            serde_json::Value::String(text) => _core::RawValue::Text(text),
            serde_json::Value::Array(items) => _core::RawValue::List(
                items
                    .into_iter()
                    .map(raw_list_item)
                    .collect::<anyhow::Result<_>>()?,
            ),
            serde_json::Value::Object(_) => bail!("unsupported value of \"{key}\""),
        };
        input.insert(key, value);
    }
    Ok(input)
}
