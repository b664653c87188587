// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{future::Future, sync::Arc};

use filtersync_core::{filter::FilterSet, response::ResponseEnvelope};

#[cfg(feature = "webapi-backend")]
mod webapi;
#[cfg(feature = "webapi-backend")]
pub use self::webapi::WebApiBackend;

/// Opaque, JSON-encoded item.
pub type Item = serde_json::Value;

pub type FetchResponse = ResponseEnvelope<Item>;

/// Queries the server for a page of items.
///
/// Failures are considered transient. They are never retried
/// automatically.
pub trait FetchBackend {
    fn fetch(&self, filters: FilterSet)
    -> impl Future<Output = anyhow::Result<FetchResponse>> + Send;
}

impl<T> FetchBackend for Arc<T>
where
    T: FetchBackend + ?Sized,
{
    fn fetch(
        &self,
        filters: FilterSet,
    ) -> impl Future<Output = anyhow::Result<FetchResponse>> + Send {
        (**self).fetch(filters)
    }
}
