// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Bidirectional mapping between filter sets and URL query parameters.
//!
//! All parameters are namespaced with [`URL_PARAM_PREFIX`]. Fields with
//! default values are omitted to keep shared URLs short.

use url::form_urlencoded;

use crate::{
    filter::{ActiveTab, Field, FieldValue, FilterSet, PAGE_MIN},
    registry::EntityRegistry,
    util::string::LIST_SEPARATOR,
    validate::{RawInput, Sanitized, Validator},
};

pub const URL_PARAM_PREFIX: &str = "cr_";

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams(Vec<(String, String)>);

impl UrlParams {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// The value of the first parameter with the given key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<(String, String)> {
        self.0
    }

    /// URL-encoded query string without a leading `?`.
    #[must_use]
    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for UrlParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("item {item:?} of {field} contains the list separator")]
    SeparatorInItem { field: Field, item: String },
}

fn param_key(field: Field) -> String {
    format!("{URL_PARAM_PREFIX}{name}", name = field.name())
}

/// The field that is addressed by a namespaced parameter.
///
/// Presentation-only fields are never part of an URL.
fn field_of_param(key: &str) -> Option<Field> {
    key.strip_prefix(URL_PARAM_PREFIX)
        .and_then(Field::from_name)
        .filter(|field| !field.is_ui_only())
}

/// Encode all non-default fields as URL parameters.
///
/// The `active_tab` and `page` arguments override the corresponding
/// fields of `filters`.
pub fn encode(
    filters: &FilterSet,
    active_tab: ActiveTab,
    page: u32,
) -> Result<UrlParams, EncodeError> {
    let mut params = UrlParams::new();
    for field in Field::iter_all().filter(|field| !field.is_ui_only()) {
        let value = match field {
            Field::ActiveTab => {
                if active_tab == ActiveTab::default() {
                    continue;
                }
                FieldValue::Text(active_tab.as_str().to_owned())
            }
            Field::Page => {
                if page <= PAGE_MIN {
                    continue;
                }
                FieldValue::Number(page)
            }
            _ => {
                if filters.is_default(field) {
                    continue;
                }
                filters.value(field)
            }
        };
        if let FieldValue::List(items) = &value {
            if let Some(item) = items.iter().find(|item| item.contains(LIST_SEPARATOR)) {
                return Err(EncodeError::SeparatorInItem {
                    field,
                    item: item.clone(),
                });
            }
        }
        params.push(param_key(field), value.to_param_value());
    }
    Ok(params)
}

/// Encode the filters with their own tab and page as a query string.
pub fn encode_query(filters: &FilterSet) -> Result<String, EncodeError> {
    encode(filters, filters.active_tab, filters.page).map(|params| params.to_query())
}

/// Collect all recognized parameters.
///
/// Unrelated and unknown parameters are ignored. Values are not
/// validated yet.
#[must_use]
pub fn decode(params: &UrlParams) -> RawInput {
    let mut input = RawInput::new();
    for (key, value) in params.iter() {
        let name = key.strip_suffix("[]").unwrap_or(key);
        if field_of_param(name).is_none() {
            continue;
        }
        input.push_param(key, value.to_owned());
    }
    input
}

#[must_use]
pub fn decode_query(query: &str) -> RawInput {
    decode(&UrlParams::from_query(query))
}

/// Decode a query string into a complete filter set.
///
/// Never fails. Invalid values are replaced by their defaults and
/// reported as rejected.
#[must_use]
pub fn decode_filters<R>(query: &str, validator: &Validator<'_, R>) -> Sanitized
where
    R: EntityRegistry + ?Sized,
{
    validator.validate_safe(&decode_query(query))
}

/// Checks if the query contains any recognized parameters.
#[must_use]
pub fn has_params(query: &str) -> bool {
    UrlParams::from_query(query)
        .iter()
        .any(|(key, _)| field_of_param(key.strip_suffix("[]").unwrap_or(key)).is_some())
}

/// Replace all namespaced parameters of an existing query.
///
/// Unrelated parameters are preserved in their original order.
#[must_use]
pub fn merge_into_query(existing_query: &str, params: &UrlParams) -> String {
    let unrelated = UrlParams::from_query(existing_query)
        .into_inner()
        .into_iter()
        .filter(|(key, _)| !key.starts_with(URL_PARAM_PREFIX));
    let merged: UrlParams = unrelated
        .chain(params.iter().map(|(k, v)| (k.to_owned(), v.to_owned())))
        .collect();
    merged.to_query()
}
