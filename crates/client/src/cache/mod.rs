// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{collections::HashMap, time::Duration};

use tokio::time::Instant;

use filtersync_core::{fingerprint::Fingerprint, response::ResponseEnvelope};

use crate::fetch::Item;

#[derive(Debug)]
struct CacheEntry {
    expires_at: Instant,
    response: ResponseEnvelope<Item>,
}

/// Recently received responses, keyed by the fingerprint of the
/// requested filters.
///
/// Each entry carries its own time to live.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: HashMap<Fingerprint, CacheEntry>,
}

impl ResponseCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A fresh response, if available.
    #[must_use]
    pub fn get_at(&self, fingerprint: &Fingerprint, now: Instant) -> Option<&ResponseEnvelope<Item>> {
        self.entries
            .get(fingerprint)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| &entry.response)
    }

    /// Insert or replace a response.
    ///
    /// Expired entries are purged.
    pub fn insert_at(
        &mut self,
        fingerprint: Fingerprint,
        response: ResponseEnvelope<Item>,
        ttl: Duration,
        now: Instant,
    ) {
        self.entries.retain(|_, entry| now < entry.expires_at);
        self.entries.insert(
            fingerprint,
            CacheEntry {
                expires_at: now + ttl,
                response,
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
