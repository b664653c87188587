// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use filtersync_core::filter::DatePreset;
use serde_json::json;
use test_log::test;

use super::*;

fn source() -> JsonItemSource {
    JsonItemSource::new(vec![
        json!({
            "id": 1,
            "title": "Summer Sale",
            "country": "US",
            "format": "push",
            "languages": ["en", "es"],
            "createdAt": "2026-10-15T08:00:00Z",
            "popularity": 3,
        }),
        json!({
            "id": 2,
            "title": "Winter sale",
            "country": "DE",
            "format": "push",
            "languages": "de",
            "isAdult": true,
            "createdAt": "2026-09-01",
            "popularity": 7.5,
        }),
        json!({
            "id": 3,
            "title": "Native teaser",
            "country": "US",
            "format": "inpage",
            "createdAt": "2026-10-16",
        }),
    ])
}

fn ids(items: &[&Item]) -> Vec<u64> {
    items
        .iter()
        .filter_map(|item| item.get("id").and_then(Value::as_u64))
        .collect()
}

fn today() -> Date {
    jiff::civil::date(2026, 10, 16)
}

#[test]
fn default_filters_match_the_active_tab_newest_first() {
    let source = source();
    let matching = source.matching(&FilterSet::default(), today());
    assert_eq!(vec![1, 2], ids(&matching));
}

#[test]
fn keyword_is_case_insensitive() {
    let source = source();
    let filters = FilterSet {
        keyword: "SALE".to_owned(),
        ..Default::default()
    };
    assert_eq!(2, source.matching(&filters, today()).len());
}

#[test]
fn country_and_adult_flag() {
    let source = source();
    let filters = FilterSet {
        country: "DE".to_owned(),
        ..Default::default()
    };
    assert_eq!(vec![2], ids(&source.matching(&filters, today())));
    let filters = FilterSet {
        only_adult: true,
        ..Default::default()
    };
    assert_eq!(vec![2], ids(&source.matching(&filters, today())));
}

#[test]
fn multi_select_matches_strings_and_arrays() {
    let source = source();
    let mut filters = FilterSet::default();
    filters.languages = ["es", "de"].into_iter().collect();
    assert_eq!(vec![1, 2], ids(&source.matching(&filters, today())));
    filters.languages = ["fr"].into_iter().collect();
    assert!(source.matching(&filters, today()).is_empty());
}

#[test]
fn date_preset_restricts_creation_date() {
    let source = source();
    let filters = FilterSet {
        date_creation: DateFilter::Preset(DatePreset::Last7),
        ..Default::default()
    };
    assert_eq!(vec![1], ids(&source.matching(&filters, today())));
}

#[test]
fn sort_by_popularity() {
    let source = source();
    let filters = FilterSet {
        sort_by: SortBy::Popularity,
        ..Default::default()
    };
    assert_eq!(vec![2, 1], ids(&source.matching(&filters, today())));
}

#[test]
fn load_page_with_offset() -> anyhow::Result<()> {
    let source = source();
    let filters = FilterSet::default();
    assert_eq!(2, source.count(&filters)?);
    let page = source.load(&filters, 1, 12)?;
    assert_eq!(1, page.len());
    assert!(source.load(&filters, 5, 12)?.is_empty());
    Ok(())
}
