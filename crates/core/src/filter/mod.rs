// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

use strum::{EnumIter, EnumString, IntoEnumIterator as _, IntoStaticStr};

use crate::prelude::*;

mod date;
pub use self::date::{
    CUSTOM_RANGE_MAX_AGE_YEARS, CUSTOM_RANGE_MAX_DAYS, CustomDateRange, CustomDateRangeInvalidity,
    DateFilter, DatePreset, ParseDateFilterError,
};

mod multi_select;
pub use self::multi_select::MultiSelect;

pub const KEYWORD_MAX_CHARS: usize = 255;

pub const COUNTRY_DEFAULT: &str = "default";

pub const COUNTRY_ALL: &str = "all";

pub const PAGE_MIN: u32 = 1;

pub const PAGE_MAX: u32 = 10_000;

/// Alternative wire name of [`Field::Keyword`].
pub const KEYWORD_ALIAS: &str = "keyword";

/// Allowed page sizes in ascending order.
pub const PER_PAGE_OPTIONS: [u32; 5] = [6, 12, 24, 48, 96];

pub const PER_PAGE_DEFAULT: u32 = 12;

pub const IMAGE_SIZES: [&str; 8] = ["1x1", "16x9", "9x16", "3x2", "2x3", "4x3", "3x4", "21x9"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortBy {
    #[default]
    Creation,
    Activity,
    Popularity,
}

impl SortBy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Creation => "creation",
            Self::Activity => "activity",
            Self::Popularity => "popularity",
        }
    }

    /// Parses both the canonical names and the legacy `by*` aliases.
    ///
    /// The sentinel `default` resolves to the default order.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let sort_by = match input {
            "creation" | "byCreationDate" | "default" => Self::Creation,
            "activity" | "byActivity" => Self::Activity,
            "popularity" | "byPopularity" => Self::Popularity,
            _ => return None,
        };
        Some(sort_by)
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Traffic category of the creatives.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum ActiveTab {
    #[default]
    Push,
    Inpage,
    Facebook,
    Tiktok,
}

impl ActiveTab {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for ActiveTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All fields of a [`FilterSet`] in canonical order.
///
/// The string representation is the wire name that is used for both
/// JSON and (prefixed) URL query parameters.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum Field {
    #[strum(serialize = "searchKeyword")]
    Keyword,
    Country,
    DateCreation,
    PeriodDisplay,
    SortBy,
    OnlyAdult,
    AdvertisingNetworks,
    Languages,
    OperatingSystems,
    Browsers,
    Devices,
    ImageSizes,
    ActiveTab,
    Page,
    PerPage,
    IsDetailedVisible,
    SavedSettings,
}

impl Field {
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Look up a field by its wire name.
    ///
    /// Accepts `keyword` as an alias of `searchKeyword`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name == KEYWORD_ALIAS {
            return Some(Self::Keyword);
        }
        name.parse().ok()
    }

    pub fn iter_all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Fields that only control the presentation.
    #[must_use]
    pub const fn is_ui_only(self) -> bool {
        matches!(self, Self::IsDetailedVisible | Self::SavedSettings)
    }

    /// Fields that are counted when determining the active filters.
    #[must_use]
    pub const fn is_filter(self) -> bool {
        !self.is_ui_only() && !matches!(self, Self::ActiveTab | Self::Page | Self::PerPage)
    }

    #[must_use]
    pub const fn is_multi_select(self) -> bool {
        matches!(
            self,
            Self::AdvertisingNetworks
                | Self::Languages
                | Self::OperatingSystems
                | Self::Browsers
                | Self::Devices
                | Self::ImageSizes
        )
    }

    /// The maximum number of selected items of a multi-select field.
    #[must_use]
    pub const fn max_items(self) -> Option<usize> {
        let max_items = match self {
            Self::AdvertisingNetworks | Self::Browsers => 50,
            Self::Languages => 100,
            Self::OperatingSystems => 20,
            Self::Devices => 10,
            Self::ImageSizes => IMAGE_SIZES.len(),
            Self::SavedSettings => 100,
            _ => return None,
        };
        Some(max_items)
    }

    /// The maximum length of a single item of a multi-select field.
    #[must_use]
    pub const fn max_item_chars(self) -> Option<usize> {
        let max_chars = match self {
            Self::Languages => 3,
            Self::AdvertisingNetworks | Self::OperatingSystems | Self::Devices => 50,
            Self::ImageSizes => 20,
            Self::Browsers | Self::SavedSettings => 100,
            _ => return None,
        };
        Some(max_chars)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type-erased value of a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Number(u32),
    List(Vec<String>),
}

impl FieldValue {
    /// The textual representation that is used for URL query parameters.
    ///
    /// Lists are comma-joined and flags are encoded as `"1"`/`"0"`.
    #[must_use]
    pub fn to_param_value(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Flag(flag) => if *flag { "1" } else { "0" }.to_owned(),
            Self::Number(number) => number.to_string(),
            Self::List(items) => items.join(","),
        }
    }
}

/// The canonical, fully populated filter state.
///
/// Each field always carries a value. Absent input resolves to the
/// defaults provided by [`FilterSet::default()`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    pub keyword: String,
    pub country: String,
    pub date_creation: DateFilter,
    pub period_display: DateFilter,
    pub sort_by: SortBy,
    pub only_adult: bool,
    pub advertising_networks: MultiSelect,
    pub languages: MultiSelect,
    pub operating_systems: MultiSelect,
    pub browsers: MultiSelect,
    pub devices: MultiSelect,
    pub image_sizes: MultiSelect,
    pub active_tab: ActiveTab,
    pub page: u32,
    pub per_page: u32,

    // Presentation only
    pub is_detailed_visible: bool,
    pub saved_settings: MultiSelect,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            country: COUNTRY_DEFAULT.to_owned(),
            date_creation: DateFilter::Default,
            period_display: DateFilter::Default,
            sort_by: SortBy::default(),
            only_adult: false,
            advertising_networks: MultiSelect::new(),
            languages: MultiSelect::new(),
            operating_systems: MultiSelect::new(),
            browsers: MultiSelect::new(),
            devices: MultiSelect::new(),
            image_sizes: MultiSelect::new(),
            active_tab: ActiveTab::default(),
            page: PAGE_MIN,
            per_page: PER_PAGE_DEFAULT,
            is_detailed_visible: false,
            saved_settings: MultiSelect::new(),
        }
    }
}

impl FilterSet {
    #[must_use]
    pub fn value(&self, field: Field) -> FieldValue {
        match field {
            Field::Keyword => FieldValue::Text(self.keyword.clone()),
            Field::Country => FieldValue::Text(self.country.clone()),
            Field::DateCreation => FieldValue::Text(self.date_creation.to_string()),
            Field::PeriodDisplay => FieldValue::Text(self.period_display.to_string()),
            Field::SortBy => FieldValue::Text(self.sort_by.as_str().to_owned()),
            Field::OnlyAdult => FieldValue::Flag(self.only_adult),
            Field::ActiveTab => FieldValue::Text(self.active_tab.as_str().to_owned()),
            Field::Page => FieldValue::Number(self.page),
            Field::PerPage => FieldValue::Number(self.per_page),
            Field::IsDetailedVisible => FieldValue::Flag(self.is_detailed_visible),
            Field::AdvertisingNetworks
            | Field::Languages
            | Field::OperatingSystems
            | Field::Browsers
            | Field::Devices
            | Field::ImageSizes
            | Field::SavedSettings => FieldValue::List(
                self.multi_select(field)
                    .map(MultiSelect::to_vec)
                    .unwrap_or_default(),
            ),
        }
    }

    /// Access the items of a multi-select field.
    #[must_use]
    pub fn multi_select(&self, field: Field) -> Option<&MultiSelect> {
        let multi_select = match field {
            Field::AdvertisingNetworks => &self.advertising_networks,
            Field::Languages => &self.languages,
            Field::OperatingSystems => &self.operating_systems,
            Field::Browsers => &self.browsers,
            Field::Devices => &self.devices,
            Field::ImageSizes => &self.image_sizes,
            Field::SavedSettings => &self.saved_settings,
            _ => return None,
        };
        Some(multi_select)
    }

    pub fn multi_select_mut(&mut self, field: Field) -> Option<&mut MultiSelect> {
        let multi_select = match field {
            Field::AdvertisingNetworks => &mut self.advertising_networks,
            Field::Languages => &mut self.languages,
            Field::OperatingSystems => &mut self.operating_systems,
            Field::Browsers => &mut self.browsers,
            Field::Devices => &mut self.devices,
            Field::ImageSizes => &mut self.image_sizes,
            Field::SavedSettings => &mut self.saved_settings,
            _ => return None,
        };
        Some(multi_select)
    }

    /// Checks if the field has its default value.
    #[must_use]
    pub fn is_default(&self, field: Field) -> bool {
        let default = Self::default();
        match field {
            Field::Keyword => self.keyword == default.keyword,
            Field::Country => self.country == default.country,
            Field::DateCreation => self.date_creation == default.date_creation,
            Field::PeriodDisplay => self.period_display == default.period_display,
            Field::SortBy => self.sort_by == default.sort_by,
            Field::OnlyAdult => self.only_adult == default.only_adult,
            Field::ActiveTab => self.active_tab == default.active_tab,
            Field::Page => self.page == default.page,
            Field::PerPage => self.per_page == default.per_page,
            Field::IsDetailedVisible => self.is_detailed_visible == default.is_detailed_visible,
            _ => self.multi_select(field).is_none_or(MultiSelect::is_empty),
        }
    }

    /// Semantic equality that ignores presentation-only fields.
    ///
    /// The order of items in multi-select fields is irrelevant.
    #[must_use]
    pub fn semantic_eq(&self, other: &Self) -> bool {
        Field::iter_all()
            .filter(|field| !field.is_ui_only())
            .all(|field| match (self.multi_select(field), other.multi_select(field)) {
                (Some(lhs), Some(rhs)) => lhs == rhs,
                _ => self.value(field) == other.value(field),
            })
    }

    /// Checks if the non-page filter criteria are equal.
    ///
    /// Used for deciding if a modification must reset the current page.
    #[must_use]
    pub fn criteria_eq(&self, other: &Self) -> bool {
        Self {
            page: other.page,
            ..self.clone()
        }
        .semantic_eq(other)
    }

    #[must_use]
    pub fn has_search(&self) -> bool {
        !self.keyword.is_empty()
    }

    pub fn active_fields(&self) -> impl Iterator<Item = Field> + '_ {
        Field::iter_all().filter(|field| field.is_filter() && !self.is_default(*field))
    }

    #[must_use]
    pub fn active_filters(&self) -> Vec<(Field, FieldValue)> {
        self.active_fields()
            .map(|field| (field, self.value(field)))
            .collect()
    }

    #[must_use]
    pub fn active_filters_count(&self) -> usize {
        self.active_fields().count()
    }

    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        self.active_fields().next().is_some()
    }

    /// Reset all filter criteria.
    ///
    /// Keeps the selected tab, the page size and all presentation
    /// settings. Returns `true` if anything has been changed.
    pub fn reset(&mut self) -> bool {
        let reset = Self {
            active_tab: self.active_tab,
            per_page: self.per_page,
            is_detailed_visible: self.is_detailed_visible,
            saved_settings: self.saved_settings.clone(),
            ..Default::default()
        };
        if *self == reset {
            return false;
        }
        *self = reset;
        true
    }

    /// The zero-based offset of the first item on the current page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.max(PAGE_MIN) - 1) * u64::from(self.per_page)
    }
}

/// Snap a requested page size to the nearest allowed option.
///
/// Equidistant candidates resolve to the larger option.
#[must_use]
pub fn snap_per_page(per_page: i64) -> u32 {
    let mut nearest = PER_PAGE_OPTIONS[0];
    for option in PER_PAGE_OPTIONS {
        let distance = i64::from(option).abs_diff(per_page);
        let nearest_distance = i64::from(nearest).abs_diff(per_page);
        // Options are sorted in ascending order, i.e. `<=` prefers the larger one
        if distance <= nearest_distance {
            nearest = option;
        }
    }
    nearest
}

#[must_use]
pub fn clamp_page(page: i64) -> u32 {
    page.clamp(i64::from(PAGE_MIN), i64::from(PAGE_MAX)) as u32
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FilterSetInvalidity {
    KeywordTooLong,
    CountryEmpty,
    PageOutOfRange,
    PerPageNotAllowed,
    TooManyItems(Field),
    ItemTooLong(Field),
}

impl Validate for FilterSet {
    type Invalidity = FilterSetInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let mut context = ValidationContext::new()
            .invalidate_if(
                self.keyword.chars().count() > KEYWORD_MAX_CHARS,
                Self::Invalidity::KeywordTooLong,
            )
            .invalidate_if(self.country.is_empty(), Self::Invalidity::CountryEmpty)
            .invalidate_if(
                !(PAGE_MIN..=PAGE_MAX).contains(&self.page),
                Self::Invalidity::PageOutOfRange,
            )
            .invalidate_if(
                !PER_PAGE_OPTIONS.contains(&self.per_page),
                Self::Invalidity::PerPageNotAllowed,
            );
        for field in Field::iter_all().filter(|field| field.is_multi_select()) {
            let Some(multi_select) = self.multi_select(field) else {
                continue;
            };
            if let Some(max_items) = field.max_items() {
                context = context.invalidate_if(
                    multi_select.len() > max_items,
                    Self::Invalidity::TooManyItems(field),
                );
            }
            if let Some(max_chars) = field.max_item_chars() {
                context = context.invalidate_if(
                    multi_select
                        .iter()
                        .any(|item| item.chars().count() > max_chars),
                    Self::Invalidity::ItemTooLong(field),
                );
            }
        }
        context.into()
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////
