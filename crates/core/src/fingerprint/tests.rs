// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::*;
use crate::filter::{DateFilter, DatePreset, SortBy};

#[test]
fn display_as_lowercase_hex() {
    let fingerprint = FilterSet::default().fingerprint();
    let encoded = fingerprint.to_string();
    assert_eq!(32, encoded.len());
    assert!(
        encoded
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    );
    assert_eq!(Ok(fingerprint), encoded.parse());
    assert_eq!(Ok(fingerprint), encoded.to_uppercase().parse());
    assert_eq!(
        Err(ParseFingerprintError),
        encoded[..30].parse::<Fingerprint>()
    );
    assert_eq!(Err(ParseFingerprintError), "xyz".parse::<Fingerprint>());
}

#[test]
fn deterministic() {
    let filters = FilterSet {
        keyword: "shoes".to_owned(),
        sort_by: SortBy::Activity,
        ..Default::default()
    };
    assert_eq!(filters.fingerprint(), filters.clone().fingerprint());
    assert_ne!(FilterSet::default().fingerprint(), filters.fingerprint());
}

#[test]
fn invariant_under_permutation_of_items() {
    let lhs = FilterSet {
        languages: ["en", "de", "ru"].into_iter().collect(),
        ..Default::default()
    };
    let rhs = FilterSet {
        languages: ["ru", "en", "de"].into_iter().collect(),
        ..Default::default()
    };
    assert_eq!(lhs.fingerprint(), rhs.fingerprint());
}

#[test]
fn presentation_fields_are_ignored() {
    let filters = FilterSet {
        is_detailed_visible: true,
        saved_settings: ["columns"].into_iter().collect(),
        ..Default::default()
    };
    assert_eq!(FilterSet::default().fingerprint(), filters.fingerprint());
}

#[test]
fn tab_and_page_override_the_filter_set() {
    let filters = FilterSet::default();
    let next_page = fingerprint(&filters, ActiveTab::Push, 2);
    assert_ne!(filters.fingerprint(), next_page);
    let on_next_page = FilterSet {
        page: 2,
        ..Default::default()
    };
    assert_eq!(on_next_page.fingerprint(), next_page);
    assert_eq!(
        fingerprint(&on_next_page, ActiveTab::Tiktok, 1),
        FilterSet {
            active_tab: ActiveTab::Tiktok,
            ..Default::default()
        }
        .fingerprint()
    );
}

#[test]
fn no_ambiguity_between_fields() {
    // The same text in different fields
    let lhs = FilterSet {
        date_creation: DateFilter::Preset(DatePreset::Today),
        ..Default::default()
    };
    let rhs = FilterSet {
        period_display: DateFilter::Preset(DatePreset::Today),
        ..Default::default()
    };
    assert_ne!(lhs.fingerprint(), rhs.fingerprint());
    // Item boundaries are preserved
    let lhs = FilterSet {
        browsers: ["ab", "c"].into_iter().collect(),
        ..Default::default()
    };
    let rhs = FilterSet {
        browsers: ["a", "bc"].into_iter().collect(),
        ..Default::default()
    };
    assert_ne!(lhs.fingerprint(), rhs.fingerprint());
}
