// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{collections::HashSet, fmt, mem, sync::Arc};

use jiff::{Zoned, civil::Date};
use tokio::time::Instant;

use filtersync_core::{
    filter::{FilterSet, PAGE_MIN, PER_PAGE_DEFAULT},
    fingerprint::Fingerprint,
    pagination::PaginationInfo,
    registry::EntityRegistry,
    response::{ResponseEnvelope, ResponseMeta, ResponseStatus},
    url_codec::{self, URL_PARAM_PREFIX, UrlParams},
    validate::Validator,
};

use crate::{
    cache::ResponseCache,
    config::CoordinatorConfig,
    fetch::{FetchResponse, Item},
    loop_guard::LoopGuard,
};

use super::{
    Action, Effect, FilterUpdate, Message, Origin, Phase, Snapshot, StateUpdated,
    SyncLoopDetected, Task, effect::Ticket, task::SyncTarget,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Initializing,
    Ready,
}

/// The outcome of the last fetch for the filters at that time.
#[derive(Debug, Clone)]
pub struct FetchState {
    pub status: Option<ResponseStatus>,
    pub items: Vec<Item>,
    pub pagination: PaginationInfo,
    pub meta: Option<ResponseMeta>,
    pub error: Option<String>,

    /// Identifies the filters of the applied response.
    pub fingerprint: Option<Fingerprint>,
}

impl Default for FetchState {
    fn default() -> Self {
        Self {
            status: None,
            items: Vec::new(),
            pagination: PaginationInfo::empty(PER_PAGE_DEFAULT.into()),
            meta: None,
            error: None,
            fingerprint: None,
        }
    }
}

fn today() -> Date {
    Zoned::now().date()
}

/// Only the namespaced parameters of a query.
fn namespaced_params(query: &str) -> UrlParams {
    UrlParams::from_query(query)
        .iter()
        .filter(|(key, _)| key.starts_with(URL_PARAM_PREFIX))
        .collect()
}

pub struct State {
    config: CoordinatorConfig,
    registry: Arc<dyn EntityRegistry + Send + Sync>,
    lifecycle: Lifecycle,
    filters: FilterSet,

    /// Set while handling a message that propagates changes from
    /// one side to the other.
    origin: Option<Origin>,

    url_ticket: Ticket,
    pending_url_write: bool,

    /// Page navigations are not counted by the loop guard.
    pending_page_navigation: bool,

    store_ticket: Ticket,
    pending_location: Option<String>,

    last_written_params: Option<UrlParams>,
    in_flight: HashSet<Fingerprint>,
    fetched: FetchState,
    cache: ResponseCache,
    loop_guard: LoopGuard,
    sync_loop_detected: Option<SyncLoopDetected>,
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("lifecycle", &self.lifecycle)
            .field("filters", &self.filters)
            .field("origin", &self.origin)
            .field("pending_url_write", &self.pending_url_write)
            .field("pending_location", &self.pending_location)
            .field("in_flight", &self.in_flight)
            .field("sync_loop_detected", &self.sync_loop_detected)
            .finish_non_exhaustive()
    }
}

impl State {
    #[must_use]
    pub fn new(config: CoordinatorConfig, registry: Arc<dyn EntityRegistry + Send + Sync>) -> Self {
        let CoordinatorConfig {
            loop_guard_max_syncs,
            loop_guard_window,
            ..
        } = config;
        Self {
            config,
            registry,
            lifecycle: Lifecycle::Uninitialized,
            filters: FilterSet::default(),
            origin: None,
            url_ticket: 0,
            pending_url_write: false,
            pending_page_navigation: false,
            store_ticket: 0,
            pending_location: None,
            last_written_params: None,
            in_flight: HashSet::new(),
            fetched: FetchState::default(),
            cache: ResponseCache::new(),
            loop_guard: LoopGuard::new(loop_guard_max_syncs, loop_guard_window),
            sync_loop_detected: None,
        }
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterSet {
        &self.filters
    }

    #[must_use]
    pub const fn fetched(&self) -> &FetchState {
        &self.fetched
    }

    #[must_use]
    pub const fn sync_loop_detected(&self) -> Option<SyncLoopDetected> {
        self.sync_loop_detected
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match self.lifecycle {
            Lifecycle::Uninitialized => Phase::Uninitialized,
            Lifecycle::Initializing => Phase::Initializing,
            Lifecycle::Ready => {
                if self.pending_url_write || self.pending_location.is_some() {
                    Phase::Syncing
                } else if self.is_loading() {
                    Phase::Fetching
                } else {
                    Phase::Idle
                }
            }
        }
    }

    /// Checks if the results of the current filters are pending.
    ///
    /// Outstanding requests for stale filters are not considered.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.contains(&self.filters.fingerprint())
    }

    #[must_use]
    pub fn status(&self) -> Option<ResponseStatus> {
        if self.is_loading() {
            Some(ResponseStatus::Loading)
        } else {
            self.fetched.status
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let status = self.status();
        let error = if status == Some(ResponseStatus::Error) {
            self.fetched.error.clone()
        } else {
            None
        };
        Snapshot {
            phase: self.phase(),
            filters: self.filters.clone(),
            status,
            items: self.fetched.items.clone(),
            pagination: self.fetched.pagination,
            meta: self.fetched.meta.clone(),
            error,
            sync_loop_detected: self.sync_loop_detected,
        }
    }

    pub fn update(&mut self, message: Message) -> StateUpdated {
        let origin = match &message {
            Message::Intent(intent) => intent.origin(),
            Message::Effect(effect) => effect.origin(),
        };
        debug_assert!(self.origin.is_none());
        self.origin = origin;
        let updated = match message {
            Message::Intent(intent) => intent.apply_on(self),
            Message::Effect(effect) => effect.apply_on(self),
        };
        self.origin = None;
        updated
    }

    pub(super) fn can_initialize(&self) -> bool {
        self.lifecycle == Lifecycle::Uninitialized
    }

    pub(super) fn is_initialized(&self) -> bool {
        self.lifecycle == Lifecycle::Ready
    }

    pub(super) fn set_initializing(&mut self) {
        debug_assert!(self.can_initialize());
        self.lifecycle = Lifecycle::Initializing;
    }

    pub(super) fn initialize_from_location(&mut self, query: &str) -> StateUpdated {
        if self.lifecycle != Lifecycle::Initializing {
            log::warn!("Unexpected location read: {query}");
            return StateUpdated::unchanged();
        }
        self.lifecycle = Lifecycle::Ready;
        let mut next_actions = Vec::with_capacity(2);
        if url_codec::has_params(query) {
            let sanitized = url_codec::decode_filters(query, &Validator::new(&*self.registry, today()));
            let is_clean = sanitized.is_clean();
            self.filters = sanitized.filters;
            if !is_clean {
                log::info!(
                    "Correcting {num_rejected} rejected value(s) of the location",
                    num_rejected = sanitized.rejected.len()
                );
                next_actions.extend(self.write_url());
            }
        } else {
            log::debug!("Initializing location with default filters");
            next_actions.extend(self.write_url());
        }
        next_actions.extend(self.request_fetch(false));
        StateUpdated::maybe_changed(next_actions)
    }

    pub(super) fn update_filters(&mut self, update: FilterUpdate) -> StateUpdated {
        debug_assert_eq!(Some(Origin::Store), self.origin);
        let is_page_navigation = update.is_page_navigation();
        let filters_before = self.filters.clone();
        update.apply_on(&mut self.filters, &Validator::new(&*self.registry, today()));
        if self.filters.semantic_eq(&filters_before) {
            if self.filters == filters_before {
                return StateUpdated::unchanged();
            }
            // Only presentation fields have been modified
            return StateUpdated::maybe_changed([]);
        }
        if !is_page_navigation && !self.filters.criteria_eq(&filters_before) {
            self.filters.page = PAGE_MIN;
        }
        if self.sync_loop_detected.is_some() {
            log::warn!("Synchronization is disabled");
            return StateUpdated::maybe_changed([]);
        }
        let delay = if is_page_navigation {
            self.config.page_debounce
        } else {
            self.config.filter_debounce
        };
        self.url_ticket += 1;
        self.pending_url_write = true;
        self.pending_page_navigation = is_page_navigation;
        let task = Task::Debounce {
            target: SyncTarget::Url,
            ticket: self.url_ticket,
            delay,
        };
        StateUpdated::maybe_changed([task.into()])
    }

    /// Checks if a location change has been caused by the last write.
    fn is_echo(&self, query: &str) -> bool {
        self.last_written_params.as_ref() == Some(&namespaced_params(query))
    }

    pub(super) fn location_changed(&mut self, query: String) -> StateUpdated {
        debug_assert_eq!(Some(Origin::Url), self.origin);
        if self.is_echo(&query) {
            log::debug!("Ignoring echo of location write: {query}");
            return StateUpdated::unchanged();
        }
        if self.sync_loop_detected.is_some() {
            log::warn!("Synchronization is disabled");
            return StateUpdated::unchanged();
        }
        // Navigating back to the last written location must not be
        // mistaken for an echo
        self.last_written_params = None;
        self.store_ticket += 1;
        self.pending_location = Some(query);
        let task = Task::Debounce {
            target: SyncTarget::Store,
            ticket: self.store_ticket,
            delay: self.config.url_debounce,
        };
        StateUpdated::maybe_changed([task.into()])
    }

    pub(super) fn debounce_elapsed(&mut self, target: SyncTarget, ticket: Ticket) -> StateUpdated {
        match target {
            SyncTarget::Url => {
                if ticket != self.url_ticket {
                    log::debug!("Ignoring superseded location write #{ticket}");
                    return StateUpdated::unchanged();
                }
                self.pending_url_write = false;
                let is_page_navigation = mem::take(&mut self.pending_page_navigation);
                if !is_page_navigation && !self.record_sync() {
                    return StateUpdated::maybe_changed([]);
                }
                let mut next_actions = Vec::with_capacity(2);
                next_actions.extend(self.write_url());
                next_actions.extend(self.request_fetch(false));
                StateUpdated::maybe_changed(next_actions)
            }
            SyncTarget::Store => {
                if ticket != self.store_ticket {
                    log::debug!("Ignoring superseded location change #{ticket}");
                    return StateUpdated::unchanged();
                }
                let Some(query) = self.pending_location.take() else {
                    return StateUpdated::unchanged();
                };
                if !self.record_sync() {
                    return StateUpdated::maybe_changed([]);
                }
                self.apply_location(&query)
            }
        }
    }

    /// Replace the filters by those of a location without writing
    /// them back.
    fn apply_location(&mut self, query: &str) -> StateUpdated {
        if self.origin == Some(Origin::Store) {
            log::warn!("Suppressing store write while handling a store change");
            return StateUpdated::unchanged();
        }
        let sanitized = url_codec::decode_filters(query, &Validator::new(&*self.registry, today()));
        if sanitized.filters.semantic_eq(&self.filters) {
            log::debug!("Location matches the current filters");
            return StateUpdated::maybe_changed([]);
        }
        let mut filters = sanitized.filters;
        filters.is_detailed_visible = self.filters.is_detailed_visible;
        filters.saved_settings = mem::take(&mut self.filters.saved_settings);
        self.filters = filters;
        // A pending write of the previous filters is obsolete
        self.url_ticket += 1;
        self.pending_url_write = false;
        self.pending_page_navigation = false;
        StateUpdated::maybe_changed(self.request_fetch(false))
    }

    /// Returns `false` if synchronization is disabled.
    fn record_sync(&mut self) -> bool {
        if self.sync_loop_detected.is_some() {
            return false;
        }
        if self.loop_guard.record_at(Instant::now()) {
            return true;
        }
        let detected = SyncLoopDetected {
            max_syncs: self.config.loop_guard_max_syncs,
            window: self.config.loop_guard_window,
        };
        log::error!("{detected}");
        self.sync_loop_detected = Some(detected);
        false
    }

    fn write_url(&mut self) -> Option<Action> {
        if self.origin == Some(Origin::Url) {
            log::warn!("Suppressing location write while handling a location change");
            return None;
        }
        match url_codec::encode(&self.filters, self.filters.active_tab, self.filters.page) {
            Ok(params) => {
                self.last_written_params = Some(params.clone());
                Some(Task::WriteUrl { params }.into())
            }
            Err(err) => {
                log::warn!("Failed to encode filters: {err}");
                None
            }
        }
    }

    fn request_fetch(&mut self, bypass_cache: bool) -> Option<Action> {
        let fingerprint = self.filters.fingerprint();
        if !bypass_cache {
            if let Some(response) = self.cache.get_at(&fingerprint, Instant::now()) {
                let effect = Effect::CachedResponseFound {
                    fingerprint,
                    response: response.clone(),
                };
                return Some(effect.into());
            }
        }
        if !self.in_flight.insert(fingerprint) {
            log::debug!("Already fetching {fingerprint}");
            return None;
        }
        let task = Task::Fetch {
            fingerprint,
            filters: self.filters.clone(),
        };
        Some(task.into())
    }

    pub(super) fn retry(&mut self) -> StateUpdated {
        StateUpdated::maybe_changed(self.request_fetch(true))
    }

    fn cache_response(&mut self, fingerprint: Fingerprint, response: FetchResponse) {
        let ttl = self.config.cache_ttl_for(&response.applied_filters);
        self.cache.insert_at(fingerprint, response, ttl, Instant::now());
    }

    pub(super) fn fetch_finished(
        &mut self,
        fingerprint: Fingerprint,
        result: anyhow::Result<FetchResponse>,
    ) -> StateUpdated {
        self.in_flight.remove(&fingerprint);
        let is_current = fingerprint == self.filters.fingerprint();
        match result {
            Ok(response) => {
                self.cache_response(fingerprint, response.clone());
                if !is_current {
                    log::debug!("Discarding stale response for {fingerprint}");
                    return StateUpdated::unchanged();
                }
                self.apply_response(fingerprint, response)
            }
            Err(err) => {
                if !is_current {
                    log::debug!("Discarding stale error for {fingerprint}: {err:#}");
                    return StateUpdated::unchanged();
                }
                log::warn!("Failed to fetch {fingerprint}: {err:#}");
                // Keep the previous items and pagination
                self.fetched.status = Some(ResponseStatus::Error);
                self.fetched.error = Some(format!("{err:#}"));
                StateUpdated::maybe_changed([])
            }
        }
    }

    pub(super) fn apply_response(
        &mut self,
        fingerprint: Fingerprint,
        response: FetchResponse,
    ) -> StateUpdated {
        if fingerprint != self.filters.fingerprint() {
            log::debug!("Discarding response for {fingerprint}");
            return StateUpdated::unchanged();
        }
        let mut next_actions = Vec::new();
        let mut applied_fingerprint = fingerprint;
        let applied_page = response.applied_filters.page;
        if applied_page != self.filters.page {
            log::debug!(
                "Page {requested_page} has been adjusted to {applied_page}",
                requested_page = self.filters.page
            );
            self.filters.page = applied_page;
            applied_fingerprint = self.filters.fingerprint();
            self.cache_response(applied_fingerprint, response.clone());
            next_actions.extend(self.write_url());
        }
        let ResponseEnvelope {
            status,
            items,
            pagination,
            error,
            meta,
            ..
        } = response;
        self.fetched = FetchState {
            status: Some(status),
            items,
            pagination,
            meta: Some(meta),
            error,
            fingerprint: Some(applied_fingerprint),
        };
        StateUpdated::maybe_changed(next_actions)
    }
}
