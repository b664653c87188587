// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{collections::BTreeMap, fmt};

use url::form_urlencoded;

use crate::{
    filter::{Field, KEYWORD_ALIAS},
    url_codec::URL_PARAM_PREFIX,
};

/// Untrusted, untyped input value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    List(Vec<String>),
    Bool(bool),
    Int(i64),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::List(items) => f.write_str(&items.join(",")),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Int(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for RawValue {
    fn from(from: &str) -> Self {
        Self::Text(from.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(from: String) -> Self {
        Self::Text(from)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(from: Vec<String>) -> Self {
        Self::List(from)
    }
}

impl From<bool> for RawValue {
    fn from(from: bool) -> Self {
        Self::Bool(from)
    }
}

impl From<i64> for RawValue {
    fn from(from: i64) -> Self {
        Self::Int(from)
    }
}

/// Untrusted input parameters, keyed by name.
///
/// Both plain and `cr_`-prefixed names may be present at the same time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInput {
    params: BTreeMap<String, RawValue>,
}

impl RawInput {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            params: BTreeMap::new(),
        }
    }

    /// Parse an URL-encoded query string.
    ///
    /// Repeated keys and keys with a trailing `[]` are collected into lists.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut input = Self::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            input.push_param(&key, value.into_owned());
        }
        input
    }

    /// Add a single query parameter.
    ///
    /// Repeated keys and keys with a trailing `[]` are collected into lists.
    pub fn push_param(&mut self, key: &str, value: String) {
        let (key, is_list) = key
            .strip_suffix("[]")
            .map_or((key, false), |key| (key, true));
        match self.params.get_mut(key) {
            Some(RawValue::List(items)) => items.push(value),
            Some(existing) => {
                let first = existing.to_string();
                *existing = RawValue::List(vec![first, value]);
            }
            None => {
                let value = if is_list {
                    RawValue::List(vec![value])
                } else {
                    RawValue::Text(value)
                };
                self.params.insert(key.to_owned(), value);
            }
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.params.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.params.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.params.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Find the value of a field.
    ///
    /// The `cr_`-prefixed parameters take precedence over the plain ones.
    /// Aliases are resolved after the canonical name in both groups.
    #[must_use]
    pub fn lookup(&self, field: Field) -> Option<&RawValue> {
        let alias = (field == Field::Keyword).then_some(KEYWORD_ALIAS);
        let names = [Some(field.name()), alias];
        names
            .iter()
            .flatten()
            .find_map(|name| self.params.get(&format!("{URL_PARAM_PREFIX}{name}")))
            .or_else(|| names.iter().flatten().find_map(|name| self.params.get(*name)))
    }
}

impl<K, V> FromIterator<(K, V)> for RawInput
where
    K: Into<String>,
    V: Into<RawValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let params = iter
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self { params }
    }
}
