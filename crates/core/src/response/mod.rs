// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use jiff::Timestamp;

use crate::{
    filter::{Field, FieldValue, FilterSet},
    fingerprint::Fingerprint,
    pagination::{PaginationInfo, paginate},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Success,
    Error,
    Loading,
    Empty,
}

/// Summary of the applied filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMeta {
    pub has_search: bool,
    pub active_filters_count: usize,
    pub has_active_filters: bool,
    pub active_filters: Vec<(Field, FieldValue)>,
    pub timestamp: Timestamp,
}

impl ResponseMeta {
    #[must_use]
    pub fn new(filters: &FilterSet, timestamp: Timestamp) -> Self {
        let active_filters = filters.active_filters();
        Self {
            has_search: filters.has_search(),
            active_filters_count: active_filters.len(),
            has_active_filters: !active_filters.is_empty(),
            active_filters,
            timestamp,
        }
    }
}

/// A page of items together with the canonical filters that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEnvelope<T> {
    pub status: ResponseStatus,
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
    pub applied_filters: FilterSet,
    pub fingerprint: Fingerprint,
    pub error: Option<String>,
    pub meta: ResponseMeta,
}

impl<T> ResponseEnvelope<T> {
    fn new(
        status: ResponseStatus,
        filters: FilterSet,
        items: Vec<T>,
        pagination: PaginationInfo,
        error: Option<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            status,
            items,
            pagination,
            fingerprint: filters.fingerprint(),
            meta: ResponseMeta::new(&filters, timestamp),
            applied_filters: filters,
            error,
        }
    }

    /// A page of `items` out of `total` matching items.
    ///
    /// The status is [`ResponseStatus::Empty`] if nothing matches.
    #[must_use]
    pub fn success(filters: FilterSet, items: Vec<T>, total: u64, timestamp: Timestamp) -> Self {
        let pagination = paginate(total, filters.per_page.into(), filters.page.into());
        let status = if total > 0 {
            ResponseStatus::Success
        } else {
            ResponseStatus::Empty
        };
        Self::new(status, filters, items, pagination, None, timestamp)
    }

    #[must_use]
    pub fn empty(filters: FilterSet, timestamp: Timestamp) -> Self {
        let pagination = PaginationInfo::empty(filters.per_page.into());
        Self::new(
            ResponseStatus::Empty,
            filters,
            Vec::new(),
            pagination,
            None,
            timestamp,
        )
    }

    #[must_use]
    pub fn loading(filters: FilterSet, timestamp: Timestamp) -> Self {
        let pagination = PaginationInfo::empty(filters.per_page.into());
        Self::new(
            ResponseStatus::Loading,
            filters,
            Vec::new(),
            pagination,
            None,
            timestamp,
        )
    }

    #[must_use]
    pub fn error(filters: FilterSet, message: impl Into<String>, timestamp: Timestamp) -> Self {
        let pagination = PaginationInfo::empty(filters.per_page.into());
        Self::new(
            ResponseStatus::Error,
            filters,
            Vec::new(),
            pagination,
            Some(message.into()),
            timestamp,
        )
    }

    #[must_use]
    pub fn map_items<U>(self, map: impl FnMut(T) -> U) -> ResponseEnvelope<U> {
        let Self {
            status,
            items,
            pagination,
            applied_filters,
            fingerprint,
            error,
            meta,
        } = self;
        ResponseEnvelope {
            status,
            items: items.into_iter().map(map).collect(),
            pagination,
            applied_filters,
            fingerprint,
            error,
            meta,
        }
    }
}
