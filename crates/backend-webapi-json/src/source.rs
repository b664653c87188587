// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::Arc;

use filtersync_core::filter::FilterSet;

/// Opaque, JSON-encoded item.
pub type Item = serde_json::Value;

/// Provides the items that match a set of filters.
///
/// Implementations may block and are invoked outside of the async runtime.
pub trait ItemSource {
    /// Total number of matching items.
    fn count(&self, filters: &FilterSet) -> anyhow::Result<u64>;

    /// A page of matching items in the order requested by the filters.
    fn load(&self, filters: &FilterSet, offset: u64, limit: u32) -> anyhow::Result<Vec<Item>>;
}

impl<T> ItemSource for Arc<T>
where
    T: ItemSource + ?Sized,
{
    fn count(&self, filters: &FilterSet) -> anyhow::Result<u64> {
        (**self).count(filters)
    }

    fn load(&self, filters: &FilterSet, offset: u64, limit: u32) -> anyhow::Result<Vec<Item>> {
        (**self).load(filters, offset, limit)
    }
}
