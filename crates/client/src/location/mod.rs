// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::Arc;

use parking_lot::Mutex;

/// Access to the query string of the current location.
///
/// Implementations are expected to replace the current history entry
/// instead of pushing a new one.
pub trait UrlLocation {
    /// The current query string without the leading `?`.
    fn read_query(&self) -> String;

    fn replace_query(&self, query: &str);
}

impl<T> UrlLocation for Arc<T>
where
    T: UrlLocation + ?Sized,
{
    fn read_query(&self) -> String {
        (**self).read_query()
    }

    fn replace_query(&self, query: &str) {
        (**self).replace_query(query);
    }
}

#[derive(Debug, Default)]
struct MemoryLocationState {
    query: String,
    replaced: usize,
}

/// A location that only exists in memory.
#[derive(Debug, Default)]
pub struct MemoryLocation {
    state: Mutex<MemoryLocationState>,
}

impl MemoryLocation {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(MemoryLocationState {
                query: query.into(),
                replaced: 0,
            }),
        }
    }

    /// Number of times the query has been replaced.
    #[must_use]
    pub fn replaced_count(&self) -> usize {
        self.state.lock().replaced
    }

    /// Move to another query, e.g. when navigating the history.
    ///
    /// Not counted as a replacement.
    pub fn navigate(&self, query: impl Into<String>) {
        self.state.lock().query = query.into();
    }
}

impl UrlLocation for MemoryLocation {
    fn read_query(&self) -> String {
        self.state.lock().query.clone()
    }

    fn replace_query(&self, query: &str) {
        let mut state = self.state.lock();
        query.clone_into(&mut state.query);
        state.replaced += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_and_navigate() {
        let location = Arc::new(MemoryLocation::new("utm_source=mail"));
        location.replace_query("utm_source=mail&cr_country=US");
        assert_eq!("utm_source=mail&cr_country=US", location.read_query());
        location.navigate("cr_country=DE");
        assert_eq!("cr_country=DE", location.read_query());
        assert_eq!(1, location.replaced_count());
    }
}
