// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// An ordered set of strings.
///
/// Items are unique and keep their insertion order for display. Equality
/// ignores the order.
#[derive(Debug, Clone, Default, Eq)]
pub struct MultiSelect(Vec<String>);

impl MultiSelect {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, item: &str) -> bool {
        self.0.iter().any(|existing| existing == item)
    }

    /// Returns `true` if the item has been added.
    pub fn insert(&mut self, item: impl Into<String>) -> bool {
        let item = item.into();
        if self.contains(&item) {
            return false;
        }
        self.0.push(item);
        true
    }

    /// Returns `true` if the item has been removed.
    pub fn remove(&mut self, item: &str) -> bool {
        let len_before = self.0.len();
        self.0.retain(|existing| existing != item);
        self.0.len() < len_before
    }

    /// Add the item if missing or remove it otherwise.
    pub fn toggle(&mut self, item: impl Into<String>) {
        let item = item.into();
        if !self.remove(&item) {
            self.0.push(item);
        }
    }

    pub fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// The items in lexicographical order, independent of insertion order.
    #[must_use]
    pub fn sorted(&self) -> Vec<&str> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_unstable();
        sorted
    }
}

impl PartialEq for MultiSelect {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.sorted() == other.sorted()
    }
}

impl<S: Into<String>> FromIterator<S> for MultiSelect {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut multi_select = Self::new();
        for item in iter {
            multi_select.insert(item);
        }
        multi_select
    }
}

impl<'a> IntoIterator for &'a MultiSelect {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<MultiSelect> for Vec<String> {
    fn from(from: MultiSelect) -> Self {
        from.into_vec()
    }
}
