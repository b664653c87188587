// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use filtersync_core::fingerprint::Fingerprint;

use crate::fetch::FetchResponse;

use super::{Origin, State, StateUpdated, task::SyncTarget};

/// Generation counter of debounce timers.
///
/// Only the timer carrying the latest ticket takes effect.
pub type Ticket = u64;

#[derive(Debug)]
pub enum Effect {
    LocationRead {
        query: String,
    },
    DebounceElapsed {
        target: SyncTarget,
        ticket: Ticket,
    },
    UrlWritten {
        query: String,
    },
    CachedResponseFound {
        fingerprint: Fingerprint,
        response: FetchResponse,
    },
    FetchFinished {
        fingerprint: Fingerprint,
        result: anyhow::Result<FetchResponse>,
    },
}

impl Effect {
    /// The side that is affected by this effect.
    #[must_use]
    pub const fn origin(&self) -> Option<Origin> {
        match self {
            Self::DebounceElapsed {
                target: SyncTarget::Store,
                ..
            } => Some(Origin::Url),
            Self::DebounceElapsed {
                target: SyncTarget::Url,
                ..
            } => Some(Origin::Store),
            Self::LocationRead { .. }
            | Self::UrlWritten { .. }
            | Self::CachedResponseFound { .. }
            | Self::FetchFinished { .. } => None,
        }
    }

    pub fn apply_on(self, state: &mut State) -> StateUpdated {
        log::trace!("Applying effect {self:?}");
        match self {
            Self::LocationRead { query } => state.initialize_from_location(&query),
            Self::DebounceElapsed { target, ticket } => state.debounce_elapsed(target, ticket),
            Self::UrlWritten { query } => {
                log::debug!("Location replaced: {query}");
                StateUpdated::unchanged()
            }
            Self::CachedResponseFound {
                fingerprint,
                response,
            } => {
                log::debug!("Applying cached response for {fingerprint}");
                state.apply_response(fingerprint, response)
            }
            Self::FetchFinished {
                fingerprint,
                result,
            } => state.fetch_finished(fingerprint, result),
        }
    }
}
