// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use anyhow::anyhow;

use crate::prelude::*;

mod _core {
    pub(super) use filtersync_core::filter::{
        ActiveTab, COUNTRY_DEFAULT, DateFilter, FieldValue, FilterSet, PAGE_MIN, PER_PAGE_DEFAULT,
        SortBy,
    };
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    Creation,
    Activity,
    Popularity,
}

impl From<SortBy> for _core::SortBy {
    fn from(from: SortBy) -> Self {
        match from {
            SortBy::Creation => Self::Creation,
            SortBy::Activity => Self::Activity,
            SortBy::Popularity => Self::Popularity,
        }
    }
}

impl From<_core::SortBy> for SortBy {
    fn from(from: _core::SortBy) -> Self {
        match from {
            _core::SortBy::Creation => Self::Creation,
            _core::SortBy::Activity => Self::Activity,
            _core::SortBy::Popularity => Self::Popularity,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub enum ActiveTab {
    #[default]
    Push,
    Inpage,
    Facebook,
    Tiktok,
}

impl From<ActiveTab> for _core::ActiveTab {
    fn from(from: ActiveTab) -> Self {
        match from {
            ActiveTab::Push => Self::Push,
            ActiveTab::Inpage => Self::Inpage,
            ActiveTab::Facebook => Self::Facebook,
            ActiveTab::Tiktok => Self::Tiktok,
        }
    }
}

impl From<_core::ActiveTab> for ActiveTab {
    fn from(from: _core::ActiveTab) -> Self {
        match from {
            _core::ActiveTab::Push => Self::Push,
            _core::ActiveTab::Inpage => Self::Inpage,
            _core::ActiveTab::Facebook => Self::Facebook,
            _core::ActiveTab::Tiktok => Self::Tiktok,
        }
    }
}

/// The value of a single field, e.g. of an active filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Number(u32),
    Text(String),
    List(Vec<String>),
}

impl From<FieldValue> for _core::FieldValue {
    fn from(from: FieldValue) -> Self {
        match from {
            FieldValue::Flag(flag) => Self::Flag(flag),
            FieldValue::Number(number) => Self::Number(number),
            FieldValue::Text(text) => Self::Text(text),
            FieldValue::List(items) => Self::List(items),
        }
    }
}

impl From<_core::FieldValue> for FieldValue {
    fn from(from: _core::FieldValue) -> Self {
        match from {
            _core::FieldValue::Flag(flag) => Self::Flag(flag),
            _core::FieldValue::Number(number) => Self::Number(number),
            _core::FieldValue::Text(text) => Self::Text(text),
            _core::FieldValue::List(items) => Self::List(items),
        }
    }
}

fn default_country() -> String {
    _core::COUNTRY_DEFAULT.to_owned()
}

fn default_date_filter() -> String {
    "default".to_owned()
}

const fn default_page() -> u32 {
    _core::PAGE_MIN
}

const fn default_per_page() -> u32 {
    _core::PER_PAGE_DEFAULT
}

/// The canonical filter state as exchanged with clients.
///
/// Missing fields are filled with their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct FilterSet {
    #[serde(default, alias = "keyword")]
    pub search_keyword: String,

    #[serde(default = "default_country")]
    pub country: String,

    #[serde(default = "default_date_filter")]
    pub date_creation: String,

    #[serde(default = "default_date_filter")]
    pub period_display: String,

    #[serde(default)]
    pub sort_by: SortBy,

    #[serde(default)]
    pub only_adult: bool,

    #[serde(default)]
    pub advertising_networks: Vec<String>,

    #[serde(default)]
    pub languages: Vec<String>,

    #[serde(default)]
    pub operating_systems: Vec<String>,

    #[serde(default)]
    pub browsers: Vec<String>,

    #[serde(default)]
    pub devices: Vec<String>,

    #[serde(default)]
    pub image_sizes: Vec<String>,

    #[serde(default)]
    pub active_tab: ActiveTab,

    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[serde(default)]
    pub is_detailed_visible: bool,

    #[serde(default)]
    pub saved_settings: Vec<String>,
}

impl From<_core::FilterSet> for FilterSet {
    fn from(from: _core::FilterSet) -> Self {
        let _core::FilterSet {
            keyword,
            country,
            date_creation,
            period_display,
            sort_by,
            only_adult,
            advertising_networks,
            languages,
            operating_systems,
            browsers,
            devices,
            image_sizes,
            active_tab,
            page,
            per_page,
            is_detailed_visible,
            saved_settings,
        } = from;
        Self {
            search_keyword: keyword,
            country,
            date_creation: date_creation.to_string(),
            period_display: period_display.to_string(),
            sort_by: sort_by.into(),
            only_adult,
            advertising_networks: advertising_networks.into(),
            languages: languages.into(),
            operating_systems: operating_systems.into(),
            browsers: browsers.into(),
            devices: devices.into(),
            image_sizes: image_sizes.into(),
            active_tab: active_tab.into(),
            page,
            per_page,
            is_detailed_visible,
            saved_settings: saved_settings.into(),
        }
    }
}

/// Structural conversion without consulting any registry.
///
/// Only use for trusted input, e.g. responses of the own server.
/// Untrusted input must be validated instead.
impl TryFrom<FilterSet> for _core::FilterSet {
    type Error = anyhow::Error;

    fn try_from(from: FilterSet) -> anyhow::Result<Self> {
        let FilterSet {
            search_keyword,
            country,
            date_creation,
            period_display,
            sort_by,
            only_adult,
            advertising_networks,
            languages,
            operating_systems,
            browsers,
            devices,
            image_sizes,
            active_tab,
            page,
            per_page,
            is_detailed_visible,
            saved_settings,
        } = from;
        let date_creation = date_creation
            .parse::<_core::DateFilter>()
            .map_err(|err| anyhow!("invalid dateCreation \"{date_creation}\": {err}"))?;
        let period_display = period_display
            .parse::<_core::DateFilter>()
            .map_err(|err| anyhow!("invalid periodDisplay \"{period_display}\": {err}"))?;
        let into = Self {
            keyword: search_keyword,
            country,
            date_creation,
            period_display,
            sort_by: sort_by.into(),
            only_adult,
            advertising_networks: advertising_networks.into_iter().collect(),
            languages: languages.into_iter().collect(),
            operating_systems: operating_systems.into_iter().collect(),
            browsers: browsers.into_iter().collect(),
            devices: devices.into_iter().collect(),
            image_sizes: image_sizes.into_iter().collect(),
            active_tab: active_tab.into(),
            page,
            per_page,
            is_detailed_visible,
            saved_settings: saved_settings.into_iter().collect(),
        };
        Ok(into)
    }
}
