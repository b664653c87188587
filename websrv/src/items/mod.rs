// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{cmp::Ordering, fs, path::Path};

use anyhow::Context as _;
use jiff::{Zoned, civil::Date};
use serde_json::Value;

use filtersync_backend_webapi_json::source::{Item, ItemSource};
use filtersync_core::filter::{COUNTRY_ALL, COUNTRY_DEFAULT, DateFilter, Field, FilterSet, SortBy};

const TITLE_KEY: &str = "title";
const DESCRIPTION_KEY: &str = "description";
const COUNTRY_KEY: &str = "country";
const FORMAT_KEY: &str = "format";
const IS_ADULT_KEY: &str = "isAdult";
const CREATED_AT_KEY: &str = "createdAt";
const LAST_SEEN_AT_KEY: &str = "lastSeenAt";
const POPULARITY_KEY: &str = "popularity";

/// Items loaded into memory from a JSON array.
///
/// Items are matched by their well-known properties. Multi-select
/// filters match properties named like the field, holding either a
/// single string or an array of strings.
#[derive(Debug, Default)]
pub(crate) struct JsonItemSource {
    items: Vec<Item>,
}

impl JsonItemSource {
    pub(crate) const fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub(crate) fn load_file(path: &Path) -> anyhow::Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("reading items from {}", path.display()))?;
        let items: Vec<Item> = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing items from {}", path.display()))?;
        Ok(Self::new(items))
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    fn matching(&self, filters: &FilterSet, today: Date) -> Vec<&Item> {
        let mut matching: Vec<_> = self
            .items
            .iter()
            .filter(|item| is_match(item, filters, today))
            .collect();
        matching.sort_by(|lhs, rhs| compare_descending(lhs, rhs, filters.sort_by));
        matching
    }
}

fn today() -> Date {
    Zoned::now().date()
}

fn text<'a>(item: &'a Item, key: &str) -> Option<&'a str> {
    item.get(key).and_then(Value::as_str)
}

fn date(item: &Item, key: &str) -> Option<Date> {
    text(item, key)?.get(..10)?.parse().ok()
}

fn contains_keyword(item: &Item, keyword: &str) -> bool {
    let keyword = keyword.to_lowercase();
    [TITLE_KEY, DESCRIPTION_KEY]
        .into_iter()
        .filter_map(|key| text(item, key))
        .any(|text| text.to_lowercase().contains(&keyword))
}

fn is_within(item: &Item, key: &str, filter: &DateFilter, today: Date) -> bool {
    let Some((start, end)) = filter.resolve(today) else {
        return true;
    };
    date(item, key).is_some_and(|date| start <= date && date <= end)
}

fn is_match(item: &Item, filters: &FilterSet, today: Date) -> bool {
    if !filters.keyword.is_empty() && !contains_keyword(item, &filters.keyword) {
        return false;
    }
    if filters.country != COUNTRY_DEFAULT
        && filters.country != COUNTRY_ALL
        && text(item, COUNTRY_KEY) != Some(filters.country.as_str())
    {
        return false;
    }
    if filters.only_adult && item.get(IS_ADULT_KEY).and_then(Value::as_bool) != Some(true) {
        return false;
    }
    if text(item, FORMAT_KEY).is_some_and(|format| format != filters.active_tab.as_str()) {
        return false;
    }
    if !is_within(item, CREATED_AT_KEY, &filters.date_creation, today)
        || !is_within(item, LAST_SEEN_AT_KEY, &filters.period_display, today)
    {
        return false;
    }
    Field::iter_all()
        .filter(|field| field.is_multi_select())
        .all(|field| {
            let Some(selected) = filters.multi_select(field).filter(|s| !s.is_empty()) else {
                return true;
            };
            match item.get(field.name()) {
                Some(Value::String(value)) => selected.contains(value),
                Some(Value::Array(values)) => values
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|value| selected.contains(value)),
                _ => false,
            }
        })
}

/// Newest or most popular items first.
fn compare_descending(lhs: &Item, rhs: &Item, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Creation => text(rhs, CREATED_AT_KEY).cmp(&text(lhs, CREATED_AT_KEY)),
        SortBy::Activity => text(rhs, LAST_SEEN_AT_KEY).cmp(&text(lhs, LAST_SEEN_AT_KEY)),
        SortBy::Popularity => {
            let popularity = |item: &Item| {
                item.get(POPULARITY_KEY)
                    .and_then(Value::as_f64)
                    .unwrap_or_default()
            };
            popularity(rhs).total_cmp(&popularity(lhs))
        }
    }
}

impl ItemSource for JsonItemSource {
    fn count(&self, filters: &FilterSet) -> anyhow::Result<u64> {
        Ok(self.matching(filters, today()).len() as u64)
    }

    fn load(&self, filters: &FilterSet, offset: u64, limit: u32) -> anyhow::Result<Vec<Item>> {
        let offset = usize::try_from(offset)?;
        let items = self
            .matching(filters, today())
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(items)
    }
}

#[cfg(test)]
mod tests;
