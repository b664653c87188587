// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{collections::VecDeque, time::Duration};

use tokio::time::Instant;

/// Detects runaway synchronization by counting propagations within a
/// sliding time window.
#[derive(Debug, Clone)]
pub struct LoopGuard {
    max_syncs: usize,
    window: Duration,
    recent: VecDeque<Instant>,
}

impl LoopGuard {
    #[must_use]
    pub fn new(max_syncs: usize, window: Duration) -> Self {
        Self {
            max_syncs,
            window,
            recent: VecDeque::with_capacity(max_syncs + 1),
        }
    }

    /// Record a propagation.
    ///
    /// Returns `false` if the number of propagations within the window
    /// exceeds the limit.
    pub fn record_at(&mut self, now: Instant) -> bool {
        while let Some(oldest) = self.recent.front() {
            if now.duration_since(*oldest) < self.window {
                break;
            }
            self.recent.pop_front();
        }
        self.recent.push_back(now);
        self.recent.len() <= self.max_syncs
    }

    /// Number of propagations within the current window.
    #[must_use]
    pub fn recent_syncs(&self) -> usize {
        self.recent.len()
    }
}

#[cfg(test)]
mod tests;
