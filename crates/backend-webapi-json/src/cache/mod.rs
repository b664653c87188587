// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use parking_lot::Mutex;

use filtersync_core::fingerprint::Fingerprint;
use filtersync_core_json::response::ResponseEnvelope;

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

pub const DEFAULT_CAPACITY: usize = 1_000;

#[derive(Debug)]
struct CacheEntry {
    inserted_at: Instant,
    response: ResponseEnvelope,
}

/// Responses keyed by the fingerprint of the requested filters.
///
/// Entries expire after a fixed TTL. When full the oldest entry is
/// evicted.
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    capacity: usize,
    entries: Mutex<HashMap<Fingerprint, CacheEntry>>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}

impl ResponseCache {
    #[must_use]
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity,
            entries: Mutex::new(HashMap::with_capacity(capacity.min(DEFAULT_CAPACITY))),
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    #[must_use]
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<ResponseEnvelope> {
        self.get_at(fingerprint, Instant::now())
    }

    #[must_use]
    pub fn get_at(&self, fingerprint: &Fingerprint, now: Instant) -> Option<ResponseEnvelope> {
        let mut entries = self.entries.lock();
        let entry = entries.get(fingerprint)?;
        if now.saturating_duration_since(entry.inserted_at) < self.ttl {
            return Some(entry.response.clone());
        }
        entries.remove(fingerprint);
        None
    }

    pub fn insert(&self, fingerprint: Fingerprint, response: ResponseEnvelope) {
        self.insert_at(fingerprint, response, Instant::now());
    }

    pub fn insert_at(&self, fingerprint: Fingerprint, response: ResponseEnvelope, now: Instant) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.lock();
        if entries.len() >= self.capacity && !entries.contains_key(&fingerprint) {
            let ttl = self.ttl;
            entries.retain(|_, entry| now.saturating_duration_since(entry.inserted_at) < ttl);
            if entries.len() >= self.capacity {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.inserted_at)
                    .map(|(fingerprint, _)| *fingerprint);
                if let Some(oldest) = oldest {
                    log::debug!("Evicting cached response {oldest}");
                    entries.remove(&oldest);
                }
            }
        }
        entries.insert(
            fingerprint,
            CacheEntry {
                inserted_at: now,
                response,
            },
        );
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
