// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Validation and sanitization of untrusted filter input.
//!
//! Input may originate from URL query parameters, JSON request bodies or
//! stored presets. It is always resolved into a complete [`FilterSet`].

use std::collections::BTreeSet;

use jiff::civil::Date;
use strum::IntoStaticStr;

use crate::{
    filter::{
        ActiveTab, COUNTRY_ALL, COUNTRY_DEFAULT, CUSTOM_RANGE_MAX_AGE_YEARS, CUSTOM_RANGE_MAX_DAYS,
        CustomDateRangeInvalidity, DateFilter, Field, FilterSet, IMAGE_SIZES, KEYWORD_MAX_CHARS,
        MultiSelect, PAGE_MAX, PAGE_MIN, SortBy, clamp_page, snap_per_page,
    },
    prelude::*,
    registry::{EntityKind, EntityRegistry},
    util::string::{LIST_ITEM_MAX_CHARS, parse_flag, parse_integer, sanitize_text, split_list},
};

mod raw;
pub use self::raw::{RawInput, RawValue};

/// The violated constraint of a rejected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, thiserror::Error)]
#[strum(serialize_all = "snake_case")]
pub enum Rule {
    #[error("invalid type")]
    InvalidType,

    #[error("invalid format")]
    InvalidFormat,

    #[error("exceeds {max} characters")]
    TooLong { max: usize },

    #[error("exceeds {max} items")]
    TooManyItems { max: usize },

    #[error("not allowed")]
    NotAllowed,

    #[error("unknown or inactive")]
    Inactive,

    #[error("out of range {min}..={max}")]
    OutOfRange { min: i64, max: i64 },

    #[error("not an allowed page size")]
    PageSize,

    #[error("start date after end date")]
    DateStartAfterEnd,

    #[error("date range exceeds {max_days} days")]
    DateSpanTooLong { max_days: i32 },

    #[error("start date more than {max_years} years ago")]
    DateStartTooOld { max_years: i64 },
}

impl Rule {
    /// Machine-readable identifier.
    #[must_use]
    pub fn code(self) -> &'static str {
        self.into()
    }
}

impl From<CustomDateRangeInvalidity> for Rule {
    fn from(from: CustomDateRangeInvalidity) -> Self {
        match from {
            CustomDateRangeInvalidity::StartAfterEnd => Self::DateStartAfterEnd,
            CustomDateRangeInvalidity::SpanTooLong => Self::DateSpanTooLong {
                max_days: CUSTOM_RANGE_MAX_DAYS,
            },
            CustomDateRangeInvalidity::StartTooOld => Self::DateStartTooOld {
                max_years: CUSTOM_RANGE_MAX_AGE_YEARS,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {rule}")]
pub struct ValidationError {
    pub field: Field,
    pub rule: Rule,

    /// The offending input, if available.
    pub value: Option<String>,
}

impl ValidationError {
    #[must_use]
    pub const fn new(field: Field, rule: Rule, value: Option<String>) -> Self {
        Self { field, rule, value }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Reject the whole input if any value violates a constraint.
    #[default]
    Strict,

    /// Drop invalid values and fall back to defaults.
    Safe,
}

/// The outcome of validating untrusted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub filters: FilterSet,

    /// Values that have been dropped or adjusted.
    pub rejected: Vec<ValidationError>,

    /// Number of recognized fields in the input.
    pub original_count: usize,

    /// Number of recognized fields that have been accepted unmodified.
    pub validated_count: usize,
}

impl Sanitized {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Fields with rejected or adjusted values.
    pub fn rejected_fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.rejected
            .iter()
            .map(|err| err.field)
            .collect::<BTreeSet<_>>()
            .into_iter()
    }
}

/// Findings collected while sanitizing the input.
///
/// Violations are fatal in strict mode. Adjustments are values that have
/// been normalized into the allowed range and are acceptable in both modes.
#[derive(Debug, Default)]
struct Findings {
    violations: Vec<ValidationError>,
    adjustments: Vec<ValidationError>,
}

impl Findings {
    fn violation(&mut self, field: Field, rule: Rule, value: impl ToString) {
        self.violations
            .push(ValidationError::new(field, rule, Some(value.to_string())));
    }

    fn adjustment(&mut self, field: Field, rule: Rule, value: impl ToString) {
        self.adjustments
            .push(ValidationError::new(field, rule, Some(value.to_string())));
    }

    fn len(&self) -> usize {
        self.violations.len() + self.adjustments.len()
    }
}

/// Validates untrusted input against the active entities of a registry.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r, R: ?Sized> {
    registry: &'r R,
    today: Date,
}

impl<'r, R> Validator<'r, R>
where
    R: EntityRegistry + ?Sized,
{
    /// Custom date ranges are checked relative to `today`.
    #[must_use]
    pub const fn new(registry: &'r R, today: Date) -> Self {
        Self { registry, today }
    }

    #[must_use]
    pub const fn today(&self) -> Date {
        self.today
    }

    pub fn validate(
        &self,
        input: &RawInput,
        mode: ValidationMode,
    ) -> Result<Sanitized, Vec<ValidationError>> {
        let (sanitized, violations) = self.sanitize(input);
        match mode {
            ValidationMode::Strict if !violations.is_empty() => Err(violations),
            ValidationMode::Strict => Ok(sanitized),
            ValidationMode::Safe => Ok(merge_rejected(sanitized, violations)),
        }
    }

    /// Either all values are acceptable or all violations are reported.
    ///
    /// Out-of-range page numbers and page sizes are normalized instead
    /// of being rejected.
    pub fn validate_strict(&self, input: &RawInput) -> Result<FilterSet, Vec<ValidationError>> {
        self.validate(input, ValidationMode::Strict)
            .map(|sanitized| sanitized.filters)
    }

    /// Never fails. Invalid values are dropped and reported.
    #[must_use]
    pub fn validate_safe(&self, input: &RawInput) -> Sanitized {
        let (sanitized, violations) = self.sanitize(input);
        let sanitized = merge_rejected(sanitized, violations);
        if !sanitized.is_clean() {
            log::debug!(
                "Rejected {num_rejected} of {original_count} input value(s)",
                num_rejected = sanitized.rejected.len(),
                original_count = sanitized.original_count,
            );
        }
        sanitized
    }

    /// Returns the sanitized result with adjustments and the violations
    /// separately.
    fn sanitize(&self, input: &RawInput) -> (Sanitized, Vec<ValidationError>) {
        let mut filters = FilterSet::default();
        let mut findings = Findings::default();
        let mut original_count = 0;
        let mut validated_count = 0;
        for field in Field::iter_all() {
            let Some(value) = input.lookup(field) else {
                continue;
            };
            original_count += 1;
            let findings_before = findings.len();
            self.apply_field(&mut filters, field, value, &mut findings);
            if findings.len() == findings_before {
                validated_count += 1;
            }
        }
        debug_assert!(filters.is_valid());
        let Findings {
            violations,
            adjustments,
        } = findings;
        let sanitized = Sanitized {
            filters,
            rejected: adjustments,
            original_count,
            validated_count,
        };
        (sanitized, violations)
    }

    #[allow(clippy::too_many_lines)]
    fn apply_field(
        &self,
        filters: &mut FilterSet,
        field: Field,
        value: &RawValue,
        findings: &mut Findings,
    ) {
        match field {
            Field::Keyword => {
                let Some(keyword) = text_value(field, value, findings) else {
                    return;
                };
                if keyword.chars().count() > KEYWORD_MAX_CHARS {
                    findings.violation(
                        field,
                        Rule::TooLong {
                            max: KEYWORD_MAX_CHARS,
                        },
                        keyword,
                    );
                    return;
                }
                filters.keyword = keyword;
            }
            Field::Country => {
                let Some(country) = text_value(field, value, findings) else {
                    return;
                };
                if country.is_empty() || country == COUNTRY_DEFAULT {
                    return;
                }
                if country != COUNTRY_ALL
                    && !self.registry.is_active(EntityKind::Country, &country)
                {
                    findings.violation(field, Rule::Inactive, country);
                    return;
                }
                filters.country = country;
            }
            Field::DateCreation | Field::PeriodDisplay => {
                let Some(date_filter) = self.date_filter_value(field, value, findings) else {
                    return;
                };
                if field == Field::DateCreation {
                    filters.date_creation = date_filter;
                } else {
                    filters.period_display = date_filter;
                }
            }
            Field::SortBy => {
                let Some(text) = text_value(field, value, findings) else {
                    return;
                };
                if text.is_empty() {
                    return;
                }
                let Some(sort_by) = SortBy::parse(&text) else {
                    findings.violation(field, Rule::NotAllowed, text);
                    return;
                };
                filters.sort_by = sort_by;
            }
            Field::OnlyAdult => {
                if let Some(flag) = flag_value(field, value, findings) {
                    filters.only_adult = flag;
                }
            }
            Field::IsDetailedVisible => {
                if let Some(flag) = flag_value(field, value, findings) {
                    filters.is_detailed_visible = flag;
                }
            }
            Field::ActiveTab => {
                let Some(text) = text_value(field, value, findings) else {
                    return;
                };
                if text.is_empty() || text == "default" {
                    return;
                }
                let Ok(active_tab) = text.parse::<ActiveTab>() else {
                    findings.violation(field, Rule::NotAllowed, text);
                    return;
                };
                filters.active_tab = active_tab;
            }
            Field::Page => {
                let Some(page) = integer_value(field, value, findings) else {
                    return;
                };
                let clamped = clamp_page(page);
                if i64::from(clamped) != page {
                    findings.adjustment(
                        field,
                        Rule::OutOfRange {
                            min: PAGE_MIN.into(),
                            max: PAGE_MAX.into(),
                        },
                        page,
                    );
                }
                filters.page = clamped;
            }
            Field::PerPage => {
                let Some(per_page) = integer_value(field, value, findings) else {
                    return;
                };
                let snapped = snap_per_page(per_page);
                if i64::from(snapped) != per_page {
                    findings.adjustment(field, Rule::PageSize, per_page);
                }
                filters.per_page = snapped;
            }
            Field::AdvertisingNetworks
            | Field::Languages
            | Field::OperatingSystems
            | Field::Browsers
            | Field::Devices
            | Field::ImageSizes
            | Field::SavedSettings => {
                let Some(items) = self.multi_select_value(field, value, findings) else {
                    return;
                };
                if let Some(multi_select) = filters.multi_select_mut(field) {
                    *multi_select = items;
                }
            }
        }
    }

    fn date_filter_value(
        &self,
        field: Field,
        value: &RawValue,
        findings: &mut Findings,
    ) -> Option<DateFilter> {
        let text = text_value(field, value, findings)?;
        if text.is_empty() {
            return None;
        }
        let Ok(date_filter) = text.parse::<DateFilter>() else {
            findings.violation(field, Rule::InvalidFormat, text);
            return None;
        };
        if let DateFilter::Custom(range) = date_filter {
            if let Err(invalidity) = range.check(self.today) {
                findings.violation(field, invalidity.into(), text);
                return None;
            }
        }
        Some(date_filter)
    }

    fn multi_select_value(
        &self,
        field: Field,
        value: &RawValue,
        findings: &mut Findings,
    ) -> Option<MultiSelect> {
        let candidates = match value {
            RawValue::Text(text) => {
                let (items, oversized) = split_list(text);
                for item in oversized {
                    findings.violation(
                        field,
                        Rule::TooLong {
                            max: LIST_ITEM_MAX_CHARS,
                        },
                        item,
                    );
                }
                items
            }
            RawValue::List(items) => items
                .iter()
                .map(|item| sanitize_text(item))
                .filter(|item| !item.is_empty())
                .collect(),
            RawValue::Bool(_) | RawValue::Int(_) => {
                findings.violation(field, Rule::InvalidType, value);
                return None;
            }
        };
        let mut items = MultiSelect::new();
        for item in candidates {
            if let Some(rule) = self.check_item(field, &item) {
                findings.violation(field, rule, item);
                continue;
            }
            items.insert(item);
        }
        if let Some(max_items) = field.max_items() {
            if items.len() > max_items {
                findings.violation(field, Rule::TooManyItems { max: max_items }, items.len());
                items.truncate(max_items);
            }
        }
        Some(items)
    }

    fn check_item(&self, field: Field, item: &str) -> Option<Rule> {
        if let Some(max) = field.max_item_chars() {
            if item.chars().count() > max {
                return Some(Rule::TooLong { max });
            }
        }
        if field == Field::ImageSizes {
            return (!IMAGE_SIZES.contains(&item)).then_some(Rule::NotAllowed);
        }
        let kind = EntityKind::of_field(field)?;
        (!self.registry.is_active(kind, item)).then_some(Rule::Inactive)
    }
}

fn merge_rejected(sanitized: Sanitized, violations: Vec<ValidationError>) -> Sanitized {
    let Sanitized {
        filters,
        rejected: adjustments,
        original_count,
        validated_count,
    } = sanitized;
    let mut rejected = violations;
    rejected.extend(adjustments);
    rejected.sort_by_key(|err| err.field);
    Sanitized {
        filters,
        rejected,
        original_count,
        validated_count,
    }
}

/// Extract a sanitized, single-line text.
fn text_value(field: Field, value: &RawValue, findings: &mut Findings) -> Option<String> {
    match value {
        RawValue::Text(text) => Some(sanitize_text(text)),
        RawValue::Int(number) => Some(number.to_string()),
        RawValue::Bool(_) | RawValue::List(_) => {
            findings.violation(field, Rule::InvalidType, value);
            None
        }
    }
}

fn flag_value(field: Field, value: &RawValue, findings: &mut Findings) -> Option<bool> {
    match value {
        RawValue::Bool(flag) => Some(*flag),
        RawValue::Int(0) => Some(false),
        RawValue::Int(1) => Some(true),
        RawValue::Int(_) => {
            findings.violation(field, Rule::InvalidFormat, value);
            None
        }
        RawValue::Text(text) => {
            let flag = parse_flag(text);
            if flag.is_none() {
                findings.violation(field, Rule::InvalidFormat, text);
            }
            flag
        }
        RawValue::List(_) => {
            findings.violation(field, Rule::InvalidType, value);
            None
        }
    }
}

fn integer_value(field: Field, value: &RawValue, findings: &mut Findings) -> Option<i64> {
    match value {
        RawValue::Int(number) => Some(*number),
        RawValue::Text(text) => {
            let number = parse_integer(text);
            if number.is_none() {
                findings.violation(field, Rule::InvalidFormat, text);
            }
            number
        }
        RawValue::Bool(_) | RawValue::List(_) => {
            findings.violation(field, Rule::InvalidType, value);
            None
        }
    }
}

#[cfg(test)]
mod tests;
