// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::time::Duration;

use serde::{Deserialize, Serialize};

use filtersync_core::filter::FilterSet;

pub const DEFAULT_FILTER_DEBOUNCE: Duration = Duration::from_millis(300);

pub const DEFAULT_URL_DEBOUNCE: Duration = Duration::from_millis(150);

pub const DEFAULT_PAGE_DEBOUNCE: Duration = Duration::ZERO;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Results of keyword searches change more frequently.
pub const DEFAULT_KEYWORD_CACHE_TTL: Duration = Duration::from_secs(30);

pub const DEFAULT_LOOP_GUARD_MAX_SYNCS: usize = 10;

pub const DEFAULT_LOOP_GUARD_WINDOW: Duration = Duration::from_secs(1);

/// Timing and limits of the [`Coordinator`](crate::Coordinator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Delay between a filter change and the URL write and fetch.
    pub filter_debounce: Duration,

    /// Delay between an URL change and the store update.
    pub url_debounce: Duration,

    /// Delay between a page navigation and the URL write and fetch.
    pub page_debounce: Duration,

    pub cache_ttl: Duration,
    pub keyword_cache_ttl: Duration,

    /// Synchronization is disabled when exceeding this number of
    /// propagations within [`Self::loop_guard_window`].
    pub loop_guard_max_syncs: usize,
    pub loop_guard_window: Duration,
}

impl CoordinatorConfig {
    /// The time to live of cached responses for the given filters.
    #[must_use]
    pub fn cache_ttl_for(&self, filters: &FilterSet) -> Duration {
        if filters.has_search() {
            self.keyword_cache_ttl
        } else {
            self.cache_ttl
        }
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            filter_debounce: DEFAULT_FILTER_DEBOUNCE,
            url_debounce: DEFAULT_URL_DEBOUNCE,
            page_debounce: DEFAULT_PAGE_DEBOUNCE,
            cache_ttl: DEFAULT_CACHE_TTL,
            keyword_cache_ttl: DEFAULT_KEYWORD_CACHE_TTL,
            loop_guard_max_syncs: DEFAULT_LOOP_GUARD_MAX_SYNCS,
            loop_guard_window: DEFAULT_LOOP_GUARD_WINDOW,
        }
    }
}
