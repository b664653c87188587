// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use jiff::civil::date;
use test_log::test;

use super::*;
use crate::{
    filter::{DatePreset, PER_PAGE_DEFAULT, PER_PAGE_OPTIONS},
    registry::RegistrySnapshot,
};

fn registry() -> RegistrySnapshot {
    RegistrySnapshot::default()
        .with_codes(EntityKind::Country, ["US", "DE", "FR"])
        .with_codes(EntityKind::Language, ["en", "de", "ru"])
        .with_codes(EntityKind::AdvertisingNetwork, ["facebook", "google"])
        .with_codes(EntityKind::OperatingSystem, ["android", "ios"])
        .with_codes(EntityKind::Browser, ["chrome", "firefox"])
        .with_codes(EntityKind::Device, ["mobile", "desktop"])
}

const TODAY: Date = date(2026, 3, 15);

#[test]
fn empty_input_resolves_to_defaults() {
    let registry = registry();
    let validator = Validator::new(&registry, TODAY);
    let sanitized = validator.validate_safe(&RawInput::new());
    assert_eq!(FilterSet::default(), sanitized.filters);
    assert!(sanitized.is_clean());
    assert_eq!(0, sanitized.original_count);
    assert_eq!(0, sanitized.validated_count);
    assert_eq!(
        Ok(FilterSet::default()),
        validator.validate_strict(&RawInput::new())
    );
}

#[test]
fn accept_valid_input() {
    let registry = registry();
    let validator = Validator::new(&registry, TODAY);
    let input = RawInput::new()
        .with("searchKeyword", "  summer <b>sale</b> ")
        .with("country", "US")
        .with("dateCreation", "last7")
        .with("sortBy", "byPopularity")
        .with("onlyAdult", "yes")
        .with("languages", "en, de,,ru")
        .with("devices", vec!["mobile".to_owned()])
        .with("activeTab", "facebook")
        .with("page", 3_i64)
        .with("perPage", "24")
        .with("isDetailedVisible", true);
    let filters = validator.validate_strict(&input).unwrap();
    assert_eq!("summer sale", filters.keyword);
    assert_eq!("US", filters.country);
    assert_eq!(DateFilter::Preset(DatePreset::Last7), filters.date_creation);
    assert_eq!(SortBy::Popularity, filters.sort_by);
    assert!(filters.only_adult);
    assert_eq!(["en", "de", "ru"], filters.languages.iter().collect::<Vec<_>>()[..]);
    assert!(filters.devices.contains("mobile"));
    assert_eq!(ActiveTab::Facebook, filters.active_tab);
    assert_eq!(3, filters.page);
    assert_eq!(24, filters.per_page);
    assert!(filters.is_detailed_visible);
}

#[test]
fn prefixed_params_take_precedence() {
    let registry = registry();
    let validator = Validator::new(&registry, TODAY);
    let input = RawInput::new()
        .with("country", "DE")
        .with("cr_country", "FR")
        .with("keyword", "alias");
    let sanitized = validator.validate_safe(&input);
    assert_eq!("FR", sanitized.filters.country);
    assert_eq!("alias", sanitized.filters.keyword);
    // Each field is counted once
    assert_eq!(2, sanitized.original_count);
    assert_eq!(2, sanitized.validated_count);
}

#[test]
fn unknown_country_is_rejected_in_strict_mode() {
    let registry = registry();
    let validator = Validator::new(&registry, TODAY);
    let input = RawInput::new().with("country", "ZZ");
    let errors = validator.validate_strict(&input).unwrap_err();
    assert_eq!(
        vec![ValidationError::new(
            Field::Country,
            Rule::Inactive,
            Some("ZZ".to_owned())
        )],
        errors
    );
    // Codes are case-sensitive
    assert!(
        validator
            .validate_strict(&RawInput::new().with("country", "us"))
            .is_err()
    );
}

#[test]
fn unknown_country_falls_back_to_default_in_safe_mode() {
    let registry = registry();
    let validator = Validator::new(&registry, TODAY);
    let input = RawInput::new().with("country", "ZZ").with("page", 2_i64);
    let sanitized = validator.validate_safe(&input);
    assert_eq!(COUNTRY_DEFAULT, sanitized.filters.country);
    assert_eq!(2, sanitized.filters.page);
    assert_eq!(vec![Field::Country], sanitized.rejected_fields().collect::<Vec<_>>());
    assert_eq!(2, sanitized.original_count);
    assert_eq!(1, sanitized.validated_count);
}

#[test]
fn country_sentinels_are_always_accepted() {
    let registry = RegistrySnapshot::default();
    let validator = Validator::new(&registry, TODAY);
    let filters = validator
        .validate_strict(&RawInput::new().with("country", "all"))
        .unwrap();
    assert_eq!(COUNTRY_ALL, filters.country);
    let filters = validator
        .validate_strict(&RawInput::new().with("country", "default"))
        .unwrap();
    assert_eq!(COUNTRY_DEFAULT, filters.country);
}

#[test]
fn invalid_list_items_are_dropped_individually() {
    let registry = registry();
    let validator = Validator::new(&registry, TODAY);
    let input = RawInput::from_query("cr_languages=en,ru,xx");
    let sanitized = validator.validate_safe(&input);
    assert_eq!(["en", "ru"], sanitized.filters.languages.iter().collect::<Vec<_>>()[..]);
    assert_eq!(
        vec![ValidationError::new(
            Field::Languages,
            Rule::Inactive,
            Some("xx".to_owned())
        )],
        sanitized.rejected
    );
    let errors = validator.validate_strict(&input).unwrap_err();
    assert_eq!(1, errors.len());
}

#[test]
fn list_items_are_checked_for_length_and_allowed_values() {
    let registry = registry();
    let validator = Validator::new(&registry, TODAY);
    let input = RawInput::new()
        .with("languages", "english,en")
        .with("imageSizes", "16x9,7x7");
    let sanitized = validator.validate_safe(&input);
    assert_eq!(["en"], sanitized.filters.languages.iter().collect::<Vec<_>>()[..]);
    assert_eq!(["16x9"], sanitized.filters.image_sizes.iter().collect::<Vec<_>>()[..]);
    assert_eq!(
        vec![Rule::TooLong { max: 3 }, Rule::NotAllowed],
        sanitized
            .rejected
            .iter()
            .map(|err| err.rule)
            .collect::<Vec<_>>()
    );
}

#[test]
fn too_many_items_are_truncated_in_safe_mode() {
    let registry = RegistrySnapshot::default().with_codes(
        EntityKind::Device,
        (0..12).map(|i| format!("device{i:02}")),
    );
    let validator = Validator::new(&registry, TODAY);
    let devices = (0..12)
        .map(|i| format!("device{i:02}"))
        .collect::<Vec<_>>()
        .join(",");
    let input = RawInput::new().with("devices", devices);
    let sanitized = validator.validate_safe(&input);
    assert_eq!(10, sanitized.filters.devices.len());
    assert!(sanitized.filters.devices.contains("device09"));
    assert!(!sanitized.filters.devices.contains("device10"));
    assert_eq!(Rule::TooManyItems { max: 10 }, sanitized.rejected[0].rule);
    assert!(validator.validate_strict(&input).is_err());
}

#[test]
fn saved_settings_are_not_checked_against_the_registry() {
    let registry = RegistrySnapshot::default();
    let validator = Validator::new(&registry, TODAY);
    let filters = validator
        .validate_strict(&RawInput::new().with("savedSettings", "columns,preview"))
        .unwrap();
    assert_eq!(2, filters.saved_settings.len());
}

#[test]
fn keyword_too_long() {
    let registry = registry();
    let validator = Validator::new(&registry, TODAY);
    let input = RawInput::new().with("searchKeyword", "k".repeat(KEYWORD_MAX_CHARS + 1));
    let errors = validator.validate_strict(&input).unwrap_err();
    assert_eq!(
        Rule::TooLong {
            max: KEYWORD_MAX_CHARS
        },
        errors[0].rule
    );
    let sanitized = validator.validate_safe(&input);
    assert!(sanitized.filters.keyword.is_empty());
    // Exactly at the limit is fine
    let input = RawInput::new().with("searchKeyword", "k".repeat(KEYWORD_MAX_CHARS));
    assert!(validator.validate_strict(&input).is_ok());
}

#[test]
fn page_and_per_page_are_normalized() {
    let registry = registry();
    let validator = Validator::new(&registry, TODAY);
    let input = RawInput::new().with("page", 0_i64).with("perPage", "9");
    let sanitized = validator.validate(&input, ValidationMode::Strict).unwrap();
    assert_eq!(PAGE_MIN, sanitized.filters.page);
    assert_eq!(12, sanitized.filters.per_page);
    assert_eq!(
        vec![
            Rule::OutOfRange {
                min: PAGE_MIN.into(),
                max: PAGE_MAX.into()
            },
            Rule::PageSize
        ],
        sanitized
            .rejected
            .iter()
            .map(|err| err.rule)
            .collect::<Vec<_>>()
    );
    assert_eq!(0, sanitized.validated_count);
    let filters = validator
        .validate_strict(&RawInput::new().with("page", 20_000_i64))
        .unwrap();
    assert_eq!(PAGE_MAX, filters.page);
}

#[test]
fn extreme_integers_are_normalized() {
    let registry = registry();
    let validator = Validator::new(&registry, TODAY);
    for (query, page, per_page) in [
        ("cr_perPage=-9223372036854775808", PAGE_MIN, 6),
        ("cr_perPage=9223372036854775807", PAGE_MIN, 96),
        ("cr_perPage=-99999999999999999999", PAGE_MIN, 6),
        ("cr_perPage=99999999999999999999", PAGE_MIN, 96),
        ("cr_page=-9223372036854775808", PAGE_MIN, PER_PAGE_DEFAULT),
        ("cr_page=9223372036854775807", PAGE_MAX, PER_PAGE_DEFAULT),
        ("cr_page=99999999999999999999", PAGE_MAX, PER_PAGE_DEFAULT),
        ("cr_page=-99999999999999999999", PAGE_MIN, PER_PAGE_DEFAULT),
    ] {
        let input = RawInput::from_query(query);
        let sanitized = validator.validate_safe(&input);
        assert_eq!(page, sanitized.filters.page, "{query}");
        assert_eq!(per_page, sanitized.filters.per_page, "{query}");
        // Adjusted, not invalid
        let filters = validator.validate_strict(&input).unwrap();
        assert_eq!(sanitized.filters, filters, "{query}");
    }
    for (page, per_page) in [(i64::MIN, i64::MIN), (i64::MAX, i64::MAX), (i64::MIN, i64::MAX)] {
        let input = RawInput::new().with("page", page).with("perPage", per_page);
        let sanitized = validator.validate_safe(&input);
        assert!((PAGE_MIN..=PAGE_MAX).contains(&sanitized.filters.page));
        assert!(PER_PAGE_OPTIONS.contains(&sanitized.filters.per_page));
    }
}

#[test]
fn non_numeric_page_is_invalid() {
    let registry = registry();
    let validator = Validator::new(&registry, TODAY);
    let input = RawInput::new().with("page", "two").with("perPage", true);
    let errors = validator.validate_strict(&input).unwrap_err();
    assert_eq!(
        vec![
            ValidationError::new(Field::Page, Rule::InvalidFormat, Some("two".to_owned())),
            ValidationError::new(Field::PerPage, Rule::InvalidType, Some("true".to_owned())),
        ],
        errors
    );
    let sanitized = validator.validate_safe(&input);
    assert_eq!(PAGE_MIN, sanitized.filters.page);
    assert_eq!(PER_PAGE_DEFAULT, sanitized.filters.per_page);
}

#[test]
fn custom_date_ranges() {
    let registry = registry();
    let validator = Validator::new(&registry, TODAY);
    let filters = validator
        .validate_strict(
            &RawInput::new().with("periodDisplay", "custom_2026-01-01_to_2026-01-31"),
        )
        .unwrap();
    assert!(matches!(filters.period_display, DateFilter::Custom(_)));
    let errors = validator
        .validate_strict(
            &RawInput::new().with("dateCreation", "custom_2026-02-01_to_2026-01-01"),
        )
        .unwrap_err();
    assert_eq!(Rule::DateStartAfterEnd, errors[0].rule);
    let errors = validator
        .validate_strict(&RawInput::new().with("dateCreation", "custom_2026-02-01"))
        .unwrap_err();
    assert_eq!(Rule::InvalidFormat, errors[0].rule);
}

#[test]
fn invalid_enumerations() {
    let registry = registry();
    let validator = Validator::new(&registry, TODAY);
    let input = RawInput::new()
        .with("sortBy", "random")
        .with("activeTab", "youtube")
        .with("onlyAdult", "maybe");
    let sanitized = validator.validate_safe(&input);
    assert_eq!(FilterSet::default(), sanitized.filters);
    assert_eq!(3, sanitized.rejected.len());
    assert_eq!(0, sanitized.validated_count);
    assert_eq!("not_allowed", sanitized.rejected[0].rule.code());
}

#[test]
fn parse_raw_input_from_query() {
    let input = RawInput::from_query("?cr_languages=en,de&devices[]=mobile&devices[]=desktop&x=1&x=2");
    assert_eq!(
        Some(&RawValue::Text("en,de".to_owned())),
        input.get("cr_languages")
    );
    assert_eq!(
        Some(&RawValue::List(vec!["mobile".to_owned(), "desktop".to_owned()])),
        input.get("devices")
    );
    assert_eq!(
        Some(&RawValue::List(vec!["1".to_owned(), "2".to_owned()])),
        input.get("x")
    );
    assert_eq!(3, input.len());
}

#[test]
fn display_validation_error() {
    let err = ValidationError::new(Field::Keyword, Rule::TooLong { max: 255 }, None);
    assert_eq!("searchKeyword: exceeds 255 characters", err.to_string());
}
