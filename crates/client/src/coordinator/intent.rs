// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use filtersync_core::{
    filter::{ActiveTab, DateFilter, Field, FilterSet, SortBy, clamp_page, snap_per_page},
    preset::FilterPreset,
    registry::EntityRegistry,
    validate::Validator,
};

use super::{Origin, State, StateUpdated, Task};

/// A single modification of the filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    SetKeyword(String),
    SetCountry(String),
    SetDateCreation(DateFilter),
    SetPeriodDisplay(DateFilter),
    SetSortBy(SortBy),
    SetOnlyAdult(bool),

    /// Select or deselect an item of a multi-select field.
    ToggleItem {
        field: Field,
        item: String,
    },

    /// Replace all items of a multi-select field.
    SetItems {
        field: Field,
        items: Vec<String>,
    },

    SetActiveTab(ActiveTab),

    /// Snapped to the nearest allowed page size.
    SetPerPage(u32),

    /// Navigate to another page without modifying the other filters.
    GoToPage(u32),

    SetDetailedVisible(bool),
    SetSavedSettings(Vec<String>),

    /// Replace all filters, except the presentation fields.
    ApplyPreset(FilterPreset),

    /// Restore the defaults, except the tab, page size and
    /// presentation fields.
    Reset,
}

impl FilterUpdate {
    #[must_use]
    pub const fn is_page_navigation(&self) -> bool {
        matches!(self, Self::GoToPage(_))
    }

    /// Modify the filters.
    ///
    /// The validator is needed for resolving presets.
    pub(super) fn apply_on<R>(self, filters: &mut FilterSet, validator: &Validator<'_, R>)
    where
        R: EntityRegistry + ?Sized,
    {
        match self {
            Self::SetKeyword(keyword) => filters.keyword = keyword.trim().to_owned(),
            Self::SetCountry(country) => filters.country = country,
            Self::SetDateCreation(date_filter) => filters.date_creation = date_filter,
            Self::SetPeriodDisplay(date_filter) => filters.period_display = date_filter,
            Self::SetSortBy(sort_by) => filters.sort_by = sort_by,
            Self::SetOnlyAdult(only_adult) => filters.only_adult = only_adult,
            Self::ToggleItem { field, item } => {
                if let Some(multi_select) = filters.multi_select_mut(field) {
                    multi_select.toggle(item);
                } else {
                    log::warn!("Cannot toggle item of {field}");
                }
            }
            Self::SetItems { field, items } => {
                if let Some(multi_select) = filters.multi_select_mut(field) {
                    *multi_select = items.into_iter().collect();
                } else {
                    log::warn!("Cannot set items of {field}");
                }
            }
            Self::SetActiveTab(active_tab) => filters.active_tab = active_tab,
            Self::SetPerPage(per_page) => filters.per_page = snap_per_page(per_page.into()),
            Self::GoToPage(page) => filters.page = clamp_page(page.into()),
            Self::SetDetailedVisible(is_detailed_visible) => {
                filters.is_detailed_visible = is_detailed_visible;
            }
            Self::SetSavedSettings(saved_settings) => {
                filters.saved_settings = saved_settings.into_iter().collect();
            }
            Self::ApplyPreset(preset) => {
                let sanitized = preset.filters_with_defaults(validator);
                if !sanitized.is_clean() {
                    log::info!(
                        "Ignoring rejected values of preset \"{name}\": {rejected:?}",
                        name = preset.name,
                        rejected = sanitized.rejected,
                    );
                }
                let mut preset_filters = sanitized.filters;
                preset_filters.is_detailed_visible = filters.is_detailed_visible;
                preset_filters.saved_settings = std::mem::take(&mut filters.saved_settings);
                *filters = preset_filters;
            }
            Self::Reset => {
                filters.reset();
            }
        }
    }
}

#[derive(Debug)]
pub enum Intent {
    /// Seed the store from the current location.
    Initialize,
    UpdateFilters(FilterUpdate),

    /// The location has been changed from the outside.
    UrlChanged {
        query: String,
    },
    Retry,
}

impl From<FilterUpdate> for Intent {
    fn from(update: FilterUpdate) -> Self {
        Self::UpdateFilters(update)
    }
}

impl Intent {
    /// The side that is affected by this intent.
    #[must_use]
    pub const fn origin(&self) -> Option<Origin> {
        match self {
            Self::UrlChanged { .. } => Some(Origin::Url),
            Self::UpdateFilters(_) => Some(Origin::Store),
            Self::Initialize | Self::Retry => None,
        }
    }

    pub fn apply_on(self, state: &mut State) -> StateUpdated {
        log::trace!("Applying intent {self:?}");
        match self {
            Self::Initialize => {
                if !state.can_initialize() {
                    log::warn!("Already initialized");
                    return StateUpdated::unchanged();
                }
                state.set_initializing();
                StateUpdated::maybe_changed([Task::ReadLocation.into()])
            }
            Self::UpdateFilters(update) => {
                if !state.is_initialized() {
                    log::warn!("Rejecting filter update before initialization: {update:?}");
                    return StateUpdated::unchanged();
                }
                state.update_filters(update)
            }
            Self::UrlChanged { query } => {
                if !state.is_initialized() {
                    log::warn!("Ignoring location change before initialization: {query}");
                    return StateUpdated::unchanged();
                }
                state.location_changed(query)
            }
            Self::Retry => {
                if !state.is_initialized() {
                    log::warn!("Cannot retry before initialization");
                    return StateUpdated::unchanged();
                }
                state.retry()
            }
        }
    }
}
