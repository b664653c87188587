// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::time::Duration;

use filtersync_core::{
    filter::FilterSet,
    fingerprint::Fingerprint,
    url_codec::{UrlParams, merge_into_query},
};

use crate::{fetch::FetchBackend, location::UrlLocation};

use super::{Effect, effect::Ticket};

/// The side that is written after a debounce delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTarget {
    /// Write the URL and fetch results after the store has changed.
    Url,

    /// Update the store after the URL has changed.
    Store,
}

#[derive(Debug)]
pub enum Task {
    ReadLocation,
    Debounce {
        target: SyncTarget,
        ticket: Ticket,
        delay: Duration,
    },

    /// Replace all namespaced parameters of the current location.
    WriteUrl {
        params: UrlParams,
    },
    Fetch {
        fingerprint: Fingerprint,
        filters: FilterSet,
    },
}

impl Task {
    pub async fn execute<B, L>(self, backend: &B, location: &L) -> Option<Effect>
    where
        B: FetchBackend,
        L: UrlLocation,
    {
        log::debug!("Executing task {self:?}");
        match self {
            Self::ReadLocation => {
                let query = location.read_query();
                Some(Effect::LocationRead { query })
            }
            Self::Debounce {
                target,
                ticket,
                delay,
            } => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Some(Effect::DebounceElapsed { target, ticket })
            }
            Self::WriteUrl { params } => {
                let existing_query = location.read_query();
                let query = merge_into_query(&existing_query, &params);
                if query == existing_query {
                    return None;
                }
                location.replace_query(&query);
                Some(Effect::UrlWritten { query })
            }
            Self::Fetch {
                fingerprint,
                filters,
            } => {
                let result = backend.fetch(filters).await;
                Some(Effect::FetchFinished {
                    fingerprint,
                    result,
                })
            }
        }
    }
}
